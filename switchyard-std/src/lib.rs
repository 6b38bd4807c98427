//! # switchyard-std
//!
//! Standard implementations for the Switchyard event dispatch framework.
//!
//! This crate provides:
//! - **Events**: [`HttpEvent`](events::HttpEvent), [`CronEvent`](events::CronEvent),
//!   [`CustomEvent`](events::CustomEvent)
//! - **Matching strategies**: HTTP path tries, cron schedules, attribute predicates
//! - **Registry**: [`RegistryBuilder`](registry::RegistryBuilder), frozen
//!   [`Registry`](registry::Registry) snapshots and the hot-swappable
//!   [`RegistryHandle`](registry::RegistryHandle)
//! - **Routing and dispatch**: [`Router`](router::Router),
//!   [`Dispatcher`](dispatch::Dispatcher) with first-match and fan-out modes
//! - **Test doubles**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use switchyard_core;

// Modules
pub mod dispatch;
pub mod events;
pub mod registry;
pub mod router;
pub mod strategy;
pub mod testing;
