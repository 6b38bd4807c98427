//! Built-in matching strategies.
//!
//! | Strategy              | Kind          | Default mode |
//! |-----------------------|---------------|--------------|
//! | [`HttpStrategy`]      | `http`        | first-match  |
//! | [`CronStrategy`]      | `cron`        | fan-out      |
//! | [`AttributeStrategy`] | custom kinds  | fan-out      |

mod attributes;
mod cron;
mod http;

pub use attributes::AttributeStrategy;
pub use cron::CronStrategy;
pub use http::HttpStrategy;
