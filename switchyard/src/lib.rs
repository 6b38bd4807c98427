//! # switchyard - Event Dispatch Core
//!
//! `switchyard` routes normalized events from heterogeneous triggers (HTTP
//! requests, cron ticks, caller-defined signals) to registered handlers.
//!
//! An event carries a kind tag, attributes and a payload. Each kind has a
//! matching strategy that decides which handlers an event satisfies; the
//! router orders them deterministically and the dispatcher runs them in
//! first-match or fan-out mode, each invocation on its own task with a
//! timeout budget.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchyard::prelude::*;
//!
//! #[handler(kind = "http", spec = "GET /users/{id}")]
//! async fn get_user(inv: Invocation) -> HandlerResult {
//!     Ok(Reply::ok(format!("user {}", inv.param("id").unwrap_or_default())))
//! }
//!
//! let mut builder = RegistryBuilder::with_builtin_kinds();
//! builder.register_handler(&get_user::kind(), get_user::route())?;
//!
//! let dispatcher = Dispatcher::new(RegistryHandle::new(builder.build()));
//! let outcome = dispatcher
//!     .dispatch(HttpEvent::new("GET", "/users/42").into_shared())
//!     .await?;
//! ```
//!
//! ## Crates
//!
//! - `switchyard-core`: the event model, handler and strategy traits, errors
//! - `switchyard-std`: built-in events and strategies, registry, router, dispatcher
//! - `switchyard-macros`: the [`handler`] attribute

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use switchyard_core::{
    // Event model
    Attributes,
    // Errors
    BoxError,
    Bytes,
    DispatchError,
    // Strategy
    DispatchMode,
    DynHandler,
    Event,
    // Handler
    Handler,
    HandlerEntry,
    HandlerError,
    HandlerOutcome,
    HandlerResult,
    InvalidDispatchModeError,
    InvalidKindError,
    Invocation,
    InvocationError,
    Kind,
    MatchSpecError,
    MatchStrategy,
    // Outcome
    Outcome,
    Params,
    RegistryError,
    Reply,
    Route,
    RouteMatch,
    SharedEvent,
    Specificity,
    SwitchyardError,
};

pub use switchyard_std::{
    dispatch::{DEFAULT_TIMEOUT, Dispatcher, DispatcherConfig},
    events::{CronEvent, CustomEvent, HttpEvent},
    registry::{Registry, RegistryBuilder, RegistryHandle},
    router::Router,
    strategy::{AttributeStrategy, CronStrategy, HttpStrategy},
};

pub mod config;
pub mod telemetry;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tower")]
pub mod service;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::testing::*;
}

/// Prelude module - common imports for Switchyard.
///
/// # Usage
///
/// ```rust,ignore
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Events
        CronEvent,
        CustomEvent,
        // Dispatch
        DispatchError,
        DispatchMode,
        Dispatcher,
        DispatcherConfig,
        Event,
        // Handlers
        Handler,
        HandlerError,
        HandlerResult,
        HttpEvent,
        Invocation,
        Kind,
        Outcome,
        // Registry
        RegistryBuilder,
        RegistryHandle,
        Reply,
        Route,
    };

    #[cfg(feature = "macros")]
    pub use crate::handler;
}

#[cfg(feature = "macros")]
pub use switchyard_macros::handler;
