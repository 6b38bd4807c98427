//! # switchyard-core
//!
//! Core traits for the Switchyard event dispatch framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins that introduce new event kinds or handlers without pulling in the
//! standard registry, router and dispatcher from `switchyard-std`.
//!
//! # Layers
//!
//! ## Event Model ([`Event`], [`Kind`])
//!
//! Every trigger family (HTTP requests, cron ticks, custom signals) is
//! normalized into something exposing a kind tag, an attribute lookup and a
//! payload. Nothing downstream branches on the concrete event type.
//!
//! ## Matching ([`MatchStrategy`])
//!
//! One strategy per kind compiles handler match specs into route entries and
//! evaluates events against them, reporting a [`Specificity`] per match.
//!
//! ## Handlers ([`Handler`], [`Route`])
//!
//! The terminal units of work. Handlers consume an [`Invocation`] and return
//! a [`Reply`] or a [`HandlerError`] that classifies the failure as
//! recoverable or fatal.
//!
//! # Error Types
//!
//! - [`SwitchyardError`] - Top-level error type
//! - [`RegistryError`] - Registration-time misconfiguration
//! - [`DispatchError`] - Per-event dispatch failures
//! - [`InvocationError`] - Failure of one handler invocation

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod handler;
mod kind;
mod outcome;
mod route;
mod strategy;

// Re-exports
pub use bytes::Bytes;
pub use error::{
    BoxError, DispatchError, HandlerError, InvalidDispatchModeError, InvalidKindError,
    InvocationError, MatchSpecError, RegistryError, SwitchyardError,
};
pub use event::{Attributes, Event, SharedEvent};
pub use handler::{DynHandler, Handler, HandlerResult, Invocation, Params};
pub use kind::Kind;
pub use outcome::{HandlerOutcome, Outcome, Reply};
pub use route::{HandlerEntry, Route};
pub use strategy::{DispatchMode, MatchStrategy, RouteMatch, Specificity};
