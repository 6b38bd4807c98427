#![allow(dead_code)]

use std::sync::Arc;
use switchyard_std::{
    dispatch::{Dispatcher, DispatcherConfig},
    registry::{RegistryBuilder, RegistryHandle},
    switchyard_core::{Kind, Route},
    testing::{CallLog, Script, ScriptedHandler},
};

// ============================================================================
// Fixtures
// ============================================================================

/// A scripted handler registered under `name`, logging to `log`.
pub fn scripted(name: &str, spec: &str, script: Script, log: &CallLog) -> (Route, ScriptedHandler) {
    let handler = ScriptedHandler::new(script).logging_to(log);
    (Route::new(name, spec, handler.clone()), handler)
}

/// Build a dispatcher over the built-in kinds plus `routes`.
pub fn dispatcher_with(routes: Vec<(Kind, Route)>, config: DispatcherConfig) -> Dispatcher {
    Dispatcher::with_config(handle_with(routes), config)
}

/// Build a registry handle over the built-in kinds plus `routes`.
pub fn handle_with(routes: Vec<(Kind, Route)>) -> Arc<RegistryHandle> {
    let mut builder = RegistryBuilder::with_builtin_kinds();
    for (kind, route) in routes {
        builder.register_handler(&kind, route).unwrap();
    }
    Arc::new(RegistryHandle::new(builder.build()))
}

/// The reply payload as UTF-8.
pub fn text(payload: &[u8]) -> &str {
    std::str::from_utf8(payload).unwrap()
}
