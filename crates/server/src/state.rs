//! Shared application state.

use std::sync::Arc;

use station_runtime::PlacementRuntime;

use crate::service::BrowserService;

/// Auth configuration, fixed at startup.
#[derive(Debug, Default)]
pub struct AuthConfig {
	/// Shared secret demanded on mutating routes; `None` disables the check.
	pub api_key: Option<String>,
	/// Whether the WebSocket proxy route demands the secret too.
	pub ws_auth: bool,
}

impl AuthConfig {
	/// Read the shared secret from `BROWSERSTATION_API_KEY`. An empty
	/// value counts as unset.
	pub fn from_env(ws_auth: bool) -> Self {
		let api_key = std::env::var("BROWSERSTATION_API_KEY")
			.ok()
			.filter(|key| !key.is_empty());
		Self { api_key, ws_auth }
	}
}

/// State threaded through every handler.
#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BrowserService>,
	pub auth: Arc<AuthConfig>,
}

impl AppState {
	pub fn new(runtime: Arc<dyn PlacementRuntime>, auth: AuthConfig) -> Self {
		Self {
			service: Arc::new(BrowserService::new(runtime)),
			auth: Arc::new(auth),
		}
	}
}
