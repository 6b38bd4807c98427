//! Running one handler invocation in its own task.

use std::{any::Any, sync::Arc, time::Duration};
use switchyard_core::{HandlerOutcome, Invocation, InvocationError, RouteMatch, SharedEvent};
use tokio::time::timeout;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, error, warn};

/// Invoke a matched handler under its timeout budget.
///
/// The handler runs on a spawned task. The task is aborted on timeout and
/// when this future is dropped before the handler finishes. A panic inside
/// the handler is caught by the runtime and reported as
/// [`InvocationError::Panicked`].
pub(crate) async fn invoke(
    candidate: &RouteMatch,
    event: &SharedEvent,
    default_timeout: Duration,
) -> HandlerOutcome {
    let entry = Arc::clone(&candidate.entry);
    let budget = entry.timeout().unwrap_or(default_timeout);
    let invocation = Invocation::new(
        Arc::clone(event),
        candidate.params.clone(),
        entry.shared_name(),
    );

    debug!(handler = entry.name(), ?budget, "invoking handler");

    let task_entry = Arc::clone(&entry);
    let mut task = AbortOnDropHandle::new(tokio::spawn(async move {
        task_entry.handler().call_dyn(invocation).await
    }));

    let result = match timeout(budget, &mut task).await {
        Ok(Ok(Ok(reply))) => Ok(reply),
        Ok(Ok(Err(err))) => Err(InvocationError::Handler(err)),
        Ok(Err(join_err)) if join_err.is_panic() => {
            Err(InvocationError::Panicked(panic_message(join_err.into_panic())))
        }
        Ok(Err(_)) => Err(InvocationError::Cancelled),
        Err(_) => {
            task.abort();
            Err(InvocationError::Timeout(budget))
        }
    };

    match &result {
        Ok(reply) => debug!(handler = entry.name(), status = reply.status(), "handler succeeded"),
        Err(err @ InvocationError::Panicked(_)) => {
            error!(handler = entry.name(), error = %err, "handler panicked");
        }
        Err(err) if err.is_recoverable() => {
            warn!(handler = entry.name(), error = %err, "handler failed");
        }
        Err(err) => error!(handler = entry.name(), error = %err, "handler failed fatally"),
    }

    HandlerOutcome {
        handler: entry.name().to_owned(),
        result,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
