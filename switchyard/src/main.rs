use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use switchyard::{
    Dispatcher, HandlerResult, Invocation, RegistryBuilder, RegistryHandle, Reply,
    config::Settings, http, telemetry,
};
use tracing::info;

/// Event dispatch server.
#[derive(Debug, Parser)]
#[command(name = "switchyard", version, about)]
struct Cli {
    /// Configuration file layered over the defaults.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind`.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

#[switchyard::handler(kind = "http", spec = "GET /healthz")]
async fn healthz(_inv: Invocation) -> HandlerResult {
    Ok(Reply::ok("ok").with_content_type("text/plain; charset=utf-8"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }

    telemetry::init_tracing(&settings.logging.level).context("failed to initialize tracing")?;

    let mut builder = RegistryBuilder::with_builtin_kinds();
    builder
        .register_handler(&healthz::kind(), healthz::route())
        .context("failed to register built-in handlers")?;
    let registry = builder.build();
    info!(kinds = registry.kinds().count(), handlers = registry.len(), "registry ready");

    let config = settings
        .dispatcher_config()
        .context("invalid dispatch configuration")?;
    let dispatcher = Arc::new(Dispatcher::with_config(RegistryHandle::new(registry), config));
    let app = http::app(dispatcher, &settings.http);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
