//! Registry and router behavior across kinds.

mod common;

use common::handle_with;
use switchyard_std::{
    events::{CronEvent, HttpEvent},
    registry::RegistryBuilder,
    router::Router,
    switchyard_core::{Kind, RegistryError, Route},
    testing::RecordingHandler,
};

fn route(name: &str, spec: &str) -> Route {
    Route::new(name, spec, RecordingHandler::new())
}

#[test]
fn unknown_kind_registration_leaves_registry_unchanged() {
    let mut builder = RegistryBuilder::with_builtin_kinds();
    builder.register_handler(&Kind::HTTP, route("a", "GET /")).unwrap();
    let before: Vec<_> = ["http", "cron"].into_iter().collect();

    let webhook = Kind::new("webhook").unwrap();
    for attempt in 0..3 {
        let err = builder
            .register_handler(&webhook, route(&format!("w{attempt}"), "anything"))
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::UnknownKind(webhook.clone()));
    }

    let registry = builder.build();
    let kinds: Vec<_> = registry.kinds().map(Kind::as_str).collect();
    assert_eq!(kinds, before);
    assert_eq!(registry.len(), 1);
}

#[test]
fn routing_is_deterministic() {
    let handle = handle_with(vec![
        (Kind::HTTP, route("catch-all", "* /{*rest}")),
        (Kind::HTTP, route("param", "GET /{section}/{id}")),
        (Kind::HTTP, route("literal", "GET /docs/intro")),
        (Kind::HTTP, route("param-2", "* /{a}/{b}")),
        (Kind::HTTP, route("urgent", "GET /{*rest}").with_priority(-1)),
    ]);
    let snapshot = handle.snapshot();
    let router = Router::new(&snapshot);
    let event = HttpEvent::new("GET", "/docs/intro");

    let first: Vec<String> = router
        .route(&event)
        .unwrap()
        .iter()
        .map(|m| m.entry.name().to_owned())
        .collect();
    assert_eq!(first, ["urgent", "literal", "param", "param-2", "catch-all"]);

    for _ in 0..50 {
        let again: Vec<String> = router
            .route(&event)
            .unwrap()
            .iter()
            .map(|m| m.entry.name().to_owned())
            .collect();
        assert_eq!(again, first);
    }
}

#[test]
fn specificity_orders_users_routes() {
    let handle = handle_with(vec![
        (Kind::HTTP, route("rest", "GET /users/{*rest}")),
        (Kind::HTTP, route("id", "GET /users/{id}")),
        (Kind::HTTP, route("me", "GET /users/me")),
    ]);
    let snapshot = handle.snapshot();
    let matches = Router::new(&snapshot)
        .route(&HttpEvent::new("GET", "/users/me"))
        .unwrap();

    let names: Vec<_> = matches.iter().map(|m| m.entry.name()).collect();
    assert_eq!(names, ["me", "id", "rest"]);
    assert_eq!(matches[1].params.get("id"), Some("me"));
    assert_eq!(matches[2].params.get("rest"), Some("me"));
}

#[test]
fn cron_routes_prefer_exact_and_job_bound() {
    let handle = handle_with(vec![
        (Kind::CRON, route("every", "*")),
        (Kind::CRON, route("daily", "@daily")),
        (Kind::CRON, route("vacuum", "@daily job=vacuum")),
    ]);
    let snapshot = handle.snapshot();
    let matches = Router::new(&snapshot)
        .route(&CronEvent::new("@midnight").with_job("vacuum"))
        .unwrap();

    let names: Vec<_> = matches.iter().map(|m| m.entry.name()).collect();
    assert_eq!(names, ["vacuum", "daily", "every"]);
}
