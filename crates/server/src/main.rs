use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use station_runtime::LocalRuntime;
use station_server::cli::Cli;
use station_server::state::{AppState, AuthConfig};
use station_server::{logging, routes};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let runtime = LocalRuntime::connect()
		.await
		.context("failed to initialise placement runtime")?;

	let auth = AuthConfig::from_env(cli.ws_auth);
	if auth.api_key.is_some() {
		info!("API key auth enabled");
	}

	let state = AppState::new(Arc::new(runtime), auth);
	let addr = format!("{}:{}", cli.host, cli.port);
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("failed to bind {addr}"))?;
	info!(%addr, "control plane listening");

	axum::serve(listener, routes::router(state).into_make_service())
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("server error")
}

async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
	info!("shutting down");
}
