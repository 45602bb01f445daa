//! Browser lifecycle service: the CRUD operations behind the HTTP surface.
//!
//! The service owns nothing but a handle to the placement runtime; actor
//! state lives there, and every operation re-resolves actors by name
//! through the [`Registry`].

use std::sync::Arc;

use station_protocol::{
	ActorInfo, BrowserCounts, BrowserInfo, BrowserList, BrowserStatus, BrowserSummary,
};
use station_runtime::{ActorState, PlacementRuntime, Registry};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// CPUs reserved per browser actor.
const CPUS_PER_BROWSER: f64 = 1.0;

pub struct BrowserService {
	runtime: Arc<dyn PlacementRuntime>,
	registry: Registry,
}

impl BrowserService {
	pub fn new(runtime: Arc<dyn PlacementRuntime>) -> Self {
		let registry = Registry::new(runtime.clone());
		Self { runtime, registry }
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Health snapshot: actor counts by state plus cluster resources.
	///
	/// Resource-query failures degrade to empty maps; a failing actor
	/// enumeration makes the whole endpoint unhealthy.
	pub async fn health(&self) -> Result<station_protocol::Health> {
		if !self.runtime.is_connected() {
			return Err(ApiError::Unhealthy("placement runtime not initialised".to_string()));
		}
		let actors = self
			.runtime
			.list()
			.await
			.map_err(|e| ApiError::Unhealthy(e.to_string()))?;

		let mut browsers = BrowserCounts::default();
		for actor in &actors {
			match actor.state {
				ActorState::Alive => browsers.alive += 1,
				ActorState::Pending => browsers.pending += 1,
				ActorState::Dead => browsers.dead += 1,
			}
		}

		Ok(station_protocol::Health {
			status: "healthy".to_string(),
			ray_status: self.runtime.is_connected(),
			browsers,
			cluster: self.runtime.cluster_resources().await.unwrap_or_default(),
			available: self.runtime.available_resources().await.unwrap_or_default(),
		})
	}

	/// Allocate a browser: fresh UUID, one CPU reserved, detached actor.
	pub async fn create_browser(&self) -> Result<ActorInfo> {
		let browser_id = Uuid::new_v4();
		let handle = self
			.runtime
			.spawn_browser(browser_id, CPUS_PER_BROWSER)
			.await
			.map_err(|e| ApiError::Internal(e.to_string()))?;

		// Confirm the actor answers; readiness itself is polled later.
		let _ = handle.get_info().await;

		info!(%browser_id, "browser created");
		Ok(ActorInfo {
			browser_id,
			proxy_url: format!("/ws/browsers/{browser_id}/devtools/browser"),
		})
	}

	/// Enumerate ALIVE and PENDING browsers plus the resource snapshot.
	pub async fn list_browsers(&self) -> Result<BrowserList> {
		let alive = self
			.registry
			.list_by_state(ActorState::Alive)
			.await
			.map_err(|e| ApiError::Unhealthy(e.to_string()))?;
		let pending = self
			.registry
			.list_by_state(ActorState::Pending)
			.await
			.map_err(|e| ApiError::Unhealthy(e.to_string()))?;

		let mut browsers = Vec::with_capacity(alive.len() + pending.len());
		for descriptor in alive {
			browsers.push(BrowserSummary {
				browser_id: descriptor.browser_id,
				state: ActorState::Alive,
				websocket_url: self.websocket_url_for(descriptor.browser_id).await,
			});
		}
		for descriptor in pending {
			browsers.push(BrowserSummary {
				browser_id: descriptor.browser_id,
				state: ActorState::Pending,
				websocket_url: None,
			});
		}

		Ok(BrowserList {
			browsers,
			cluster: self.runtime.cluster_resources().await.unwrap_or_default(),
			available: self.runtime.available_resources().await.unwrap_or_default(),
		})
	}

	/// Connection details for one browser, straight from its actor.
	pub async fn get_browser(&self, browser_id: &str) -> Result<BrowserInfo> {
		let id = parse_id(browser_id)?;
		let handle = self.registry.lookup(id).await?;
		let info = handle
			.get_info()
			.await
			.map_err(|e| ApiError::Internal(e.to_string()))?;
		Ok(info)
	}

	/// Kill a browser actor and report it closed.
	pub async fn delete_browser(&self, browser_id: &str) -> Result<BrowserStatus> {
		let id = parse_id(browser_id)?;
		self.registry.lookup(id).await?;
		match self.runtime.kill(id).await {
			Ok(()) => {
				info!(browser_id = %id, "browser closed");
				Ok(BrowserStatus {
					browser_id: id,
					status: "closed".to_string(),
				})
			}
			Err(station_runtime::Error::NotFound(_)) => Err(ApiError::NotFound),
			Err(err) => {
				warn!(browser_id = %id, error = %err, "kill failed");
				let cause = match err {
					station_runtime::Error::Kill { cause, .. } => cause,
					other => other.to_string(),
				};
				Err(ApiError::KillFailed(cause))
			}
		}
	}

	/// Best-effort `websocket_url` for an alive actor; races with actor
	/// death resolve to `None` rather than failing the listing.
	async fn websocket_url_for(&self, browser_id: Uuid) -> Option<String> {
		let handle = self.registry.lookup(browser_id).await.ok()?;
		handle.get_info().await.ok()?.websocket_url
	}
}

/// Unknown and malformed ids are indistinguishable to callers: both 404.
fn parse_id(browser_id: &str) -> Result<Uuid> {
	Uuid::parse_str(browser_id).map_err(|_| ApiError::NotFound)
}
