//! Event type registry.
//!
//! The registry maps each [`Kind`] to its matching strategy, which in turn
//! owns that kind's route entries. It is assembled with a
//! [`RegistryBuilder`] during startup and frozen into an immutable
//! [`Registry`]. Later registrations go through [`RegistryHandle`], which
//! swaps whole snapshots so a dispatch always sees one consistent version.

use crate::strategy::{CronStrategy, HttpStrategy};
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use switchyard_core::{Kind, MatchStrategy, RegistryError, Route};
use tracing::debug;

/// Builder for constructing a [`Registry`].
pub struct RegistryBuilder {
    kinds: IndexMap<Kind, Box<dyn MatchStrategy>>,
    next_sequence: u64,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Create an empty builder with no kinds.
    pub fn new() -> Self {
        Self {
            kinds: IndexMap::new(),
            next_sequence: 0,
        }
    }

    /// Create a builder with the built-in `http` and `cron` kinds registered.
    pub fn with_builtin_kinds() -> Self {
        let mut kinds: IndexMap<Kind, Box<dyn MatchStrategy>> = IndexMap::new();
        kinds.insert(Kind::HTTP, Box::new(HttpStrategy::new()));
        kinds.insert(Kind::CRON, Box::new(CronStrategy::new()));
        Self {
            kinds,
            next_sequence: 0,
        }
    }

    /// Introduce a new event kind.
    ///
    /// Fails with [`RegistryError::DuplicateKind`] if `kind` is already
    /// registered.
    pub fn register_kind<S: MatchStrategy>(
        &mut self,
        kind: Kind,
        strategy: S,
    ) -> Result<&mut Self, RegistryError> {
        self.register_boxed_kind(kind, Box::new(strategy))
    }

    /// Introduce a new event kind with an already boxed strategy.
    pub fn register_boxed_kind(
        &mut self,
        kind: Kind,
        strategy: Box<dyn MatchStrategy>,
    ) -> Result<&mut Self, RegistryError> {
        if self.kinds.contains_key(&kind) {
            return Err(RegistryError::DuplicateKind(kind));
        }
        debug!(kind = %kind, strategy = strategy.name(), "registered event kind");
        self.kinds.insert(kind, strategy);
        Ok(self)
    }

    /// Bind a handler to a registered kind.
    ///
    /// Fails with [`RegistryError::UnknownKind`] if the kind was never
    /// registered and with [`RegistryError::InvalidMatchSpec`] if the kind's
    /// strategy rejects the route's spec. Either way the builder is left
    /// unchanged.
    pub fn register_handler(&mut self, kind: &Kind, route: Route) -> Result<&mut Self, RegistryError> {
        let Some(strategy) = self.kinds.get_mut(kind) else {
            return Err(RegistryError::UnknownKind(kind.clone()));
        };

        let entry = Arc::new(route.into_entry(kind.clone(), self.next_sequence));
        strategy
            .insert(Arc::clone(&entry))
            .map_err(|err| RegistryError::InvalidMatchSpec {
                kind: kind.clone(),
                handler: entry.name().to_owned(),
                spec: entry.match_spec().to_owned(),
                reason: err.0,
            })?;

        debug!(
            kind = %kind,
            handler = entry.name(),
            spec = entry.match_spec(),
            priority = entry.priority(),
            "registered handler"
        );
        self.next_sequence += 1;
        Ok(self)
    }

    /// Whether `kind` is registered.
    pub fn contains_kind(&self, kind: &Kind) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Freeze the builder into an immutable registry.
    pub fn build(self) -> Registry {
        Registry {
            kinds: self.kinds,
            next_sequence: self.next_sequence,
        }
    }
}

/// An immutable catalog of event kinds and their route entries.
///
/// Shared behind `Arc` by every concurrent dispatch.
pub struct Registry {
    kinds: IndexMap<Kind, Box<dyn MatchStrategy>>,
    next_sequence: u64,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The matching strategy of a kind.
    pub fn strategy_for(&self, kind: &Kind) -> Result<&dyn MatchStrategy, RegistryError> {
        self.kinds
            .get(kind)
            .map(|strategy| strategy.as_ref())
            .ok_or_else(|| RegistryError::UnknownKind(kind.clone()))
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.kinds.keys()
    }

    /// Whether `kind` is registered.
    pub fn contains_kind(&self, kind: &Kind) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Number of handlers bound to `kind`.
    pub fn handler_count(&self, kind: &Kind) -> Result<usize, RegistryError> {
        self.strategy_for(kind).map(|strategy| strategy.len())
    }

    /// Total number of handlers across all kinds.
    pub fn len(&self) -> usize {
        self.kinds.values().map(|strategy| strategy.len()).sum()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A builder holding the same kinds and handlers as this registry.
    ///
    /// Entries keep their registration sequence, so routing order is
    /// unchanged for existing handlers.
    pub fn to_builder(&self) -> Result<RegistryBuilder, RegistryError> {
        let mut kinds = IndexMap::with_capacity(self.kinds.len());
        for (kind, strategy) in &self.kinds {
            let mut fork = strategy.fork();
            for entry in strategy.entries() {
                fork.insert(Arc::clone(&entry))
                    .map_err(|err| RegistryError::InvalidMatchSpec {
                        kind: kind.clone(),
                        handler: entry.name().to_owned(),
                        spec: entry.match_spec().to_owned(),
                        reason: err.0,
                    })?;
            }
            kinds.insert(kind.clone(), fork);
        }
        Ok(RegistryBuilder {
            kinds,
            next_sequence: self.next_sequence,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, strategy) in &self.kinds {
            map.entry(&kind.as_str(), &strategy.len());
        }
        map.finish()
    }
}

/// The current registry snapshot, replaceable at runtime.
///
/// Readers take a snapshot with [`snapshot`](Self::snapshot) and keep using
/// it for the whole dispatch. [`update`](Self::update) builds the next
/// version off to the side and publishes it atomically.
pub struct RegistryHandle {
    current: ArcSwap<Registry>,
    writer: Mutex<()>,
}

impl RegistryHandle {
    /// Wrap an initial registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
            writer: Mutex::new(()),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    /// Apply registrations to a copy of the current snapshot and publish it.
    ///
    /// If `f` fails, the current snapshot stays in place and the error is
    /// returned. Concurrent updates are serialized.
    pub fn update<F>(&self, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut RegistryBuilder) -> Result<(), RegistryError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut builder = self.current.load().to_builder()?;
        f(&mut builder)?;
        let next = builder.build();
        debug!(handlers = next.len(), "publishing registry snapshot");
        self.current.store(Arc::new(next));
        Ok(())
    }

    /// Replace the current snapshot wholesale.
    pub fn replace(&self, registry: Registry) {
        let _guard = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.current.store(Arc::new(registry));
    }
}

impl From<Registry> for RegistryHandle {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}

impl std::fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RegistryHandle").field(&*self.current.load()).finish()
    }
}
