#![cfg(feature = "macros")]

use std::time::Duration;
use switchyard::{
    CronEvent, Dispatcher, HandlerResult, HttpEvent, Invocation, Kind, Outcome, RegistryBuilder,
    RegistryHandle, Reply, handler,
};

#[handler(kind = "http", spec = "GET /users/{id}")]
/// Fetches one user by id.
#[allow(clippy::unused_async)]
async fn get_user(inv: Invocation) -> HandlerResult {
    Ok(Reply::ok(format!("user {}", inv.param("id").unwrap_or_default())))
}

#[handler(kind = "http", spec = "GET /users/me", name = "current-user", priority = -5, timeout_ms = 250)]
async fn current_user(_inv: Invocation) -> HandlerResult {
    Ok(Reply::ok("me"))
}

#[handler(kind = "cron", spec = "@daily job=report")]
async fn daily_report(inv: Invocation) -> HandlerResult {
    Ok(Reply::ok(inv.attribute("job").unwrap_or_default().to_owned()))
}

#[test]
fn generated_metadata() {
    assert_eq!(get_user::NAME, "get_user");
    assert_eq!(get_user::KIND, "http");
    assert_eq!(get_user::SPEC, "GET /users/{id}");
    assert_eq!(get_user::PRIORITY, 0);
    assert_eq!(get_user::kind(), Kind::HTTP);

    assert_eq!(current_user::NAME, "current-user");
    assert_eq!(current_user::PRIORITY, -5);

    let entry = current_user::route().into_entry(current_user::kind(), 0);
    assert_eq!(entry.name(), "current-user");
    assert_eq!(entry.match_spec(), "GET /users/me");
    assert_eq!(entry.priority(), -5);
    assert_eq!(entry.timeout(), Some(Duration::from_millis(250)));

    let entry = get_user::route().into_entry(get_user::kind(), 1);
    assert_eq!(entry.timeout(), None);
}

#[tokio::test]
async fn generated_handlers_dispatch() {
    let mut builder = RegistryBuilder::with_builtin_kinds();
    builder
        .register_handler(&get_user::kind(), get_user::route())
        .unwrap()
        .register_handler(&current_user::kind(), current_user::route())
        .unwrap()
        .register_handler(&daily_report::kind(), daily_report::route())
        .unwrap();
    let dispatcher = Dispatcher::new(RegistryHandle::new(builder.build()));

    let outcome = dispatcher
        .dispatch(HttpEvent::new("GET", "/users/42").into_shared())
        .await
        .unwrap();
    assert_eq!(outcome.reply().unwrap().payload().as_ref(), b"user 42");

    let outcome = dispatcher
        .dispatch(HttpEvent::new("GET", "/users/me").into_shared())
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Handled { ref handler, .. } if handler == "current-user"));

    let outcome = dispatcher
        .dispatch(CronEvent::new("@daily").with_job("report").into_shared())
        .await
        .unwrap();
    assert_eq!(outcome.reply().unwrap().payload().as_ref(), b"report");
}
