//! # Dispatcher
//!
//! Executes the router's candidates for one event and reduces them to a
//! single [`Outcome`].
//!
//! Each dispatch loads one registry snapshot and uses it throughout, so a
//! concurrent [`RegistryHandle::update`] never changes the candidates of a
//! dispatch already in flight.
//!
//! # Modes
//!
//! - **first-match**: candidates run one at a time in router order until one
//!   succeeds. Recoverable failures (timeouts included) move on; fatal
//!   failures abort.
//! - **fan-out**: every candidate runs concurrently. Dispatch succeeds unless
//!   every branch failed.
//!
//! Every invocation runs on its own spawned task with a timeout budget, so a
//! slow or panicking handler never takes the dispatcher down with it.

mod fanout;
mod first_match;
mod invoke;

use crate::{registry::RegistryHandle, router::Router};
use std::{collections::HashMap, sync::Arc, time::Duration};
use switchyard_core::{DispatchError, DispatchMode, Kind, Outcome, SharedEvent};
use tracing::{Instrument, debug, info_span};

/// Budget applied to handlers that do not declare their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher tuning.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Timeout for handlers without their own budget.
    pub default_timeout: Duration,
    /// Upper bound on concurrently running fan-out branches per dispatch.
    /// `None` is unbounded.
    pub max_fanout_concurrency: Option<usize>,
    /// Per-kind dispatch mode overrides. Kinds not listed use their
    /// strategy's default.
    pub modes: HashMap<Kind, DispatchMode>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_fanout_concurrency: None,
            modes: HashMap::new(),
        }
    }
}

impl DispatcherConfig {
    /// Set the default handler timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Bound fan-out concurrency.
    pub fn with_max_fanout_concurrency(mut self, limit: usize) -> Self {
        self.max_fanout_concurrency = Some(limit);
        self
    }

    /// Override the dispatch mode of a kind.
    pub fn with_mode(mut self, kind: Kind, mode: DispatchMode) -> Self {
        self.modes.insert(kind, mode);
        self
    }
}

/// Dispatches events against the current registry snapshot.
///
/// Cheap to share: wrap in `Arc` and call [`dispatch`](Self::dispatch) from
/// as many tasks as needed.
pub struct Dispatcher {
    registry: Arc<RegistryHandle>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with default configuration.
    pub fn new(registry: impl Into<Arc<RegistryHandle>>) -> Self {
        Self::with_config(registry, DispatcherConfig::default())
    }

    /// Create a dispatcher with explicit configuration.
    pub fn with_config(registry: impl Into<Arc<RegistryHandle>>, config: DispatcherConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    /// The registry handle this dispatcher reads from.
    pub fn registry(&self) -> &Arc<RegistryHandle> {
        &self.registry
    }

    /// The dispatcher configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatch one event.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownKind`] if the event's kind is not registered
    /// - [`DispatchError::NoMatch`] if no handler matched
    /// - [`DispatchError::Fatal`] if a first-match candidate failed fatally
    /// - [`DispatchError::Exhausted`] if every first-match candidate failed
    /// - [`DispatchError::AllFailed`] if every fan-out branch failed
    pub async fn dispatch(&self, event: SharedEvent) -> Result<Outcome, DispatchError> {
        let snapshot = self.registry.snapshot();
        let kind = event.kind().clone();

        let candidates = Router::new(&snapshot).route(event.as_ref())?;
        if candidates.is_empty() {
            debug!(kind = %kind, "no handler matched");
            return Err(DispatchError::NoMatch { kind });
        }

        let mode = match self.config.modes.get(&kind) {
            Some(mode) => *mode,
            None => snapshot
                .strategy_for(&kind)
                .map_err(|_| DispatchError::UnknownKind(kind.clone()))?
                .default_mode(),
        };

        let span = info_span!(
            "dispatch",
            kind = %kind,
            mode = %mode,
            candidates = candidates.len()
        );

        let timeout = self.config.default_timeout;
        async {
            match mode {
                DispatchMode::FirstMatch => {
                    first_match::dispatch_first_match(&kind, &event, &candidates, timeout).await
                }
                DispatchMode::FanOut => {
                    fanout::dispatch_fanout(
                        &kind,
                        &event,
                        &candidates,
                        timeout,
                        self.config.max_fanout_concurrency,
                    )
                    .await
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
