//! Procedural macros for Switchyard.
//!
//! Use through the `switchyard` crate, which re-exports them.

use proc_macro::TokenStream;

mod handler;

/// Turn an async function into a registrable handler.
///
/// Generates a unit struct named after the function that implements
/// `switchyard::Handler`, plus a `route()` constructor carrying the
/// registration metadata.
///
/// # Arguments
///
/// - `kind = "http"` (required): the event kind, checked at compile time
/// - `spec = "GET /users/{id}"` (required): the match spec
/// - `priority = -10`: dispatch priority, lower runs first (default `0`)
/// - `timeout_ms = 250`: per-handler timeout budget
/// - `name = "get-user"`: registered handler name (default: the function name)
///
/// # Example
///
/// ```rust,ignore
/// use switchyard::{handler, HandlerResult, Invocation, Reply};
///
/// #[handler(kind = "http", spec = "GET /users/{id}", timeout_ms = 250)]
/// async fn get_user(inv: Invocation) -> HandlerResult {
///     Ok(Reply::ok(format!("user {}", inv.param("id").unwrap_or_default())))
/// }
///
/// builder.register_handler(&get_user::kind(), get_user::route())?;
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}
