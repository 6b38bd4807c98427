//! Concrete event variants.
//!
//! Each variant implements [`Event`](switchyard_core::Event); routers and
//! dispatchers only ever see the trait object.

mod cron;
mod custom;
mod http;

pub(crate) use cron::normalize_schedule;
pub use cron::CronEvent;
pub use custom::CustomEvent;
pub use http::HttpEvent;
