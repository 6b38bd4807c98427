//! Sequential dispatch: the first success wins.

use super::invoke::invoke;
use std::time::Duration;
use switchyard_core::{DispatchError, HandlerOutcome, Kind, Outcome, RouteMatch, SharedEvent};
use tracing::debug;

/// Try candidates in router order.
///
/// A recoverable failure moves on to the next candidate, a fatal one aborts
/// with [`DispatchError::Fatal`]. Later candidates are never invoked once one
/// succeeds.
pub(crate) async fn dispatch_first_match(
    kind: &Kind,
    event: &SharedEvent,
    candidates: &[RouteMatch],
    default_timeout: Duration,
) -> Result<Outcome, DispatchError> {
    let mut failed_attempts = Vec::new();

    for candidate in candidates {
        let HandlerOutcome { handler, result } = invoke(candidate, event, default_timeout).await;
        match result {
            Ok(reply) => {
                return Ok(Outcome::Handled {
                    handler,
                    reply,
                    failed_attempts,
                });
            }
            Err(err) if err.is_recoverable() => {
                failed_attempts.push(HandlerOutcome {
                    handler,
                    result: Err(err),
                });
            }
            Err(source) => return Err(DispatchError::Fatal { handler, source }),
        }
    }

    debug!(attempts = failed_attempts.len(), "every candidate failed");
    Err(DispatchError::Exhausted {
        kind: kind.clone(),
        attempts: failed_attempts,
    })
}
