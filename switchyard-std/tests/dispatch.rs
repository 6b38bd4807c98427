//! Dispatch-mode behavior.

mod common;

use common::{dispatcher_with, scripted, text};
use std::time::Duration;
use switchyard_std::{
    dispatch::{Dispatcher, DispatcherConfig},
    events::{CronEvent, CustomEvent, HttpEvent},
    registry::{RegistryBuilder, RegistryHandle},
    strategy::AttributeStrategy,
    switchyard_core::{DispatchError, DispatchMode, Kind, Outcome},
    testing::{CallLog, Script},
};

// ============================================================================
// No match
// ============================================================================

#[tokio::test]
async fn no_match_in_either_mode() {
    let log = CallLog::new();
    let (route, _) = scripted("users", "GET /users", Script::reply("u"), &log);
    let (tick, _) = scripted("tick", "@hourly", Script::reply("t"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::HTTP, route), (Kind::CRON, tick)],
        DispatcherConfig::default(),
    );

    let err = dispatcher
        .dispatch(HttpEvent::new("GET", "/orders").into_shared())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NoMatch { ref kind } if *kind == Kind::HTTP));

    let err = dispatcher
        .dispatch(CronEvent::new("@daily").into_shared())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NoMatch { ref kind } if *kind == Kind::CRON));
    assert!(log.names().is_empty());
}

#[tokio::test]
async fn unregistered_kind_is_rejected() {
    let dispatcher = dispatcher_with(Vec::new(), DispatcherConfig::default());
    let event = CustomEvent::new(Kind::from_static("queue")).into_shared();

    let err = dispatcher.dispatch(event).await.unwrap_err();
    assert!(matches!(err, DispatchError::UnknownKind(ref kind) if kind.as_str() == "queue"));
}

// ============================================================================
// First-match
// ============================================================================

#[tokio::test]
async fn lower_priority_value_runs_first() {
    let log = CallLog::new();
    let (second, _) = scripted("second", "GET /", Script::reply("2"), &log);
    let (first, _) = scripted("first", "GET /", Script::reply("1"), &log);
    let dispatcher = dispatcher_with(
        vec![
            (Kind::HTTP, second.with_priority(2)),
            (Kind::HTTP, first.with_priority(1)),
        ],
        DispatcherConfig::default(),
    );

    let outcome = dispatcher
        .dispatch(HttpEvent::new("GET", "/").into_shared())
        .await
        .unwrap();
    assert_eq!(text(outcome.reply().unwrap().payload()), "1");
    assert_eq!(log.names(), ["first"]);
}

#[tokio::test]
async fn first_success_short_circuits() {
    let log = CallLog::new();
    let (a, a_handler) = scripted("a", "GET /", Script::recoverable("busy"), &log);
    let (b, b_handler) = scripted("b", "GET /", Script::reply("from b"), &log);
    let (c, c_handler) = scripted("c", "GET /", Script::reply("from c"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::HTTP, a), (Kind::HTTP, b), (Kind::HTTP, c)],
        DispatcherConfig::default(),
    );

    let outcome = dispatcher
        .dispatch(HttpEvent::new("GET", "/").into_shared())
        .await
        .unwrap();

    match outcome {
        Outcome::Handled {
            handler,
            reply,
            failed_attempts,
        } => {
            assert_eq!(handler, "b");
            assert_eq!(text(reply.payload()), "from b");
            assert_eq!(failed_attempts.len(), 1);
            assert_eq!(failed_attempts[0].handler, "a");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!((a_handler.calls(), b_handler.calls(), c_handler.calls()), (1, 1, 0));
}

#[tokio::test]
async fn fatal_failure_aborts() {
    let log = CallLog::new();
    let (a, _) = scripted("a", "GET /", Script::fatal("corrupt"), &log);
    let (b, b_handler) = scripted("b", "GET /", Script::reply("b"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::HTTP, a), (Kind::HTTP, b)],
        DispatcherConfig::default(),
    );

    let err = dispatcher
        .dispatch(HttpEvent::new("GET", "/").into_shared())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Fatal { ref handler, .. } if handler == "a"));
    assert_eq!(b_handler.calls(), 0);
}

#[tokio::test]
async fn all_recoverable_failures_exhaust() {
    let log = CallLog::new();
    let (a, _) = scripted("a", "GET /", Script::recoverable("busy"), &log);
    let (b, _) = scripted("b", "GET /", Script::recoverable("also busy"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::HTTP, a), (Kind::HTTP, b)],
        DispatcherConfig::default(),
    );

    let err = dispatcher
        .dispatch(HttpEvent::new("GET", "/").into_shared())
        .await
        .unwrap_err();
    match err {
        DispatchError::Exhausted { kind, attempts } => {
            assert_eq!(kind, Kind::HTTP);
            let names: Vec<_> = attempts.iter().map(|a| a.handler.as_str()).collect();
            assert_eq!(names, ["a", "b"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn timeout_moves_to_next_candidate() {
    let log = CallLog::new();
    let (slow, _) = scripted(
        "slow",
        "GET /",
        Script::reply("late").after(Duration::from_secs(10)),
        &log,
    );
    let (fast, _) = scripted("fast", "GET /", Script::reply("fast"), &log);
    let config = DispatcherConfig::default().with_default_timeout(Duration::from_millis(50));
    let dispatcher = dispatcher_with(vec![(Kind::HTTP, slow), (Kind::HTTP, fast)], config);

    let outcome = dispatcher
        .dispatch(HttpEvent::new("GET", "/").into_shared())
        .await
        .unwrap();

    match outcome {
        Outcome::Handled {
            handler,
            failed_attempts,
            ..
        } => {
            assert_eq!(handler, "fast");
            assert!(failed_attempts[0].error().is_some_and(|e| e.is_timeout()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

// ============================================================================
// Fan-out
// ============================================================================

#[tokio::test]
async fn fan_out_reports_partial_success() {
    let log = CallLog::new();
    let (a, _) = scripted("a", "@hourly", Script::reply("a"), &log);
    let (b, _) = scripted("b", "@hourly", Script::fatal("disk full"), &log);
    let (c, _) = scripted("c", "*", Script::reply("c"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::CRON, a), (Kind::CRON, b), (Kind::CRON, c)],
        DispatcherConfig::default(),
    );

    let outcome = dispatcher
        .dispatch(CronEvent::new("@hourly").into_shared())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded(), 2);
    assert_eq!(outcome.failed(), 1);
    let Outcome::FanOut { outcomes } = outcome else {
        panic!("expected fan-out outcome");
    };
    let names: Vec<_> = outcomes.iter().map(|o| o.handler.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert!(!outcomes[1].is_success());
}

#[tokio::test]
async fn fan_out_fails_only_when_every_branch_fails() {
    let log = CallLog::new();
    let (a, _) = scripted("a", "@daily", Script::recoverable("no"), &log);
    let (b, _) = scripted("b", "@daily", Script::panic("boom"), &log);
    let dispatcher = dispatcher_with(
        vec![(Kind::CRON, a), (Kind::CRON, b)],
        DispatcherConfig::default(),
    );

    let err = dispatcher
        .dispatch(CronEvent::new("@daily").into_shared())
        .await
        .unwrap_err();
    match err {
        DispatchError::AllFailed { outcomes, .. } => assert_eq!(outcomes.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fan_out_branches_run_concurrently() {
    let log = CallLog::new();
    let delay = Duration::from_millis(200);
    let routes = (0..4)
        .map(|i| {
            let (route, _) = scripted(&format!("h{i}"), "*", Script::reply("ok").after(delay), &log);
            (Kind::CRON, route)
        })
        .collect();
    let dispatcher = dispatcher_with(routes, DispatcherConfig::default());

    let started = tokio::time::Instant::now();
    let outcome = dispatcher
        .dispatch(CronEvent::new("@hourly").into_shared())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded(), 4);
    assert!(started.elapsed() < delay * 3);
}

#[tokio::test]
async fn attribute_kinds_fan_out_unless_configured() {
    let queue = Kind::from_static("queue");
    let log = CallLog::new();
    let mut builder = RegistryBuilder::new();
    builder
        .register_kind(queue.clone(), AttributeStrategy::new())
        .unwrap();
    for name in ["x", "y"] {
        let (route, _) = scripted(name, "topic=orders", Script::reply(name), &log);
        builder.register_handler(&queue, route).unwrap();
    }
    let handle = std::sync::Arc::new(RegistryHandle::new(builder.build()));
    let event = || CustomEvent::new(queue.clone()).with_attribute("topic", "orders").into_shared();

    let fan_out = Dispatcher::new(handle.clone());
    assert!(matches!(
        fan_out.dispatch(event()).await.unwrap(),
        Outcome::FanOut { .. }
    ));

    let first_match = Dispatcher::with_config(
        handle,
        DispatcherConfig::default().with_mode(queue.clone(), DispatchMode::FirstMatch),
    );
    assert!(matches!(
        first_match.dispatch(event()).await.unwrap(),
        Outcome::Handled { ref handler, .. } if handler == "x"
    ));
}
