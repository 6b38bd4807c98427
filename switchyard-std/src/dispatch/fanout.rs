//! Concurrent dispatch: every candidate runs.

use super::invoke::invoke;
use futures::future::join_all;
use std::time::Duration;
use switchyard_core::{DispatchError, Kind, Outcome, RouteMatch, SharedEvent};
use tokio::sync::Semaphore;
use tracing::debug;

/// Invoke every candidate concurrently and aggregate the outcomes.
///
/// At most `max_concurrency` branches of this dispatch run at once. Outcomes
/// are reported in router order. Dispatch fails with
/// [`DispatchError::AllFailed`] only if no branch succeeded.
pub(crate) async fn dispatch_fanout(
    kind: &Kind,
    event: &SharedEvent,
    candidates: &[RouteMatch],
    default_timeout: Duration,
    max_concurrency: Option<usize>,
) -> Result<Outcome, DispatchError> {
    let permits = max_concurrency.map(|limit| Semaphore::new(limit.max(1)));
    let permits = permits.as_ref();
    let branches = candidates.iter().map(|candidate| async move {
        let _permit = match permits {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };
        invoke(candidate, event, default_timeout).await
    });
    let outcomes = join_all(branches).await;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    debug!(succeeded, failed = outcomes.len() - succeeded, "fan-out complete");

    if succeeded == 0 {
        return Err(DispatchError::AllFailed {
            kind: kind.clone(),
            outcomes,
        });
    }
    Ok(Outcome::FanOut { outcomes })
}
