//! Stateless actor enumeration and lookup.
//!
//! The registry keeps no table of its own: each call re-queries the
//! placement runtime, so results stay correct across control-plane
//! restarts and replicas. It exists to give the lifecycle service and the
//! proxy one place that turns "name" into "handle or not found".

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::placement::{ActorDescriptor, ActorState, BrowserHandle, PlacementRuntime};

/// Facade over the placement runtime's actor-listing and naming primitives.
#[derive(Clone)]
pub struct Registry {
	runtime: Arc<dyn PlacementRuntime>,
}

impl Registry {
	pub fn new(runtime: Arc<dyn PlacementRuntime>) -> Self {
		Self { runtime }
	}

	/// All browser actors currently in `state`.
	pub async fn list_by_state(&self, state: ActorState) -> Result<Vec<ActorDescriptor>> {
		let actors = self.runtime.list().await?;
		Ok(actors.into_iter().filter(|a| a.state == state).collect())
	}

	/// Resolve an actor handle by id.
	pub async fn lookup(&self, browser_id: Uuid) -> Result<Arc<dyn BrowserHandle>> {
		self.runtime
			.lookup(browser_id)
			.await?
			.ok_or(Error::NotFound(browser_id))
	}
}
