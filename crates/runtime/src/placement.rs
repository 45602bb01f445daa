//! The narrow interface the control plane consumes for actor placement.
//!
//! A placement runtime owns actor lifetime: it materialises a browser actor
//! on some worker, tracks whether it is pending, alive, or dead, and kills
//! it on request. The control plane addresses actors by name (their
//! `browser_id`) and never retains handles across requests, so a lookup
//! always reflects the runtime's current truth - including after control
//! plane restarts and across replicas.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use station_protocol::{BrowserInfo, BrowserState};
use uuid::Uuid;

use crate::discovery::ChromeEndpoint;
use crate::error::Result;

/// Placement-level lifecycle state of one actor.
///
/// Transitions are driven by the runtime, not by the control plane.
pub type ActorState = BrowserState;

/// What the runtime knows about one actor without touching its worker.
#[derive(Debug, Clone)]
pub struct ActorDescriptor {
	pub browser_id: Uuid,
	pub state: ActorState,
}

/// A live reference to one placed browser actor.
///
/// Handles are cheap, per-request, and never cached by callers.
#[async_trait]
pub trait BrowserHandle: Send + Sync + std::fmt::Debug {
	fn browser_id(&self) -> Uuid;

	/// The worker endpoint this actor's Chrome listens on.
	fn endpoint(&self) -> ChromeEndpoint;

	/// Ask the actor for its current connection details.
	async fn get_info(&self) -> Result<BrowserInfo>;
}

/// Cluster substrate providing actor placement, naming, lifecycle, and
/// resource introspection.
#[async_trait]
pub trait PlacementRuntime: Send + Sync {
	/// Materialise a new browser actor named `browser_id`, reserving
	/// `cpus` on some worker. The actor is detached: it outlives the
	/// request and persists until explicitly killed.
	async fn spawn_browser(&self, browser_id: Uuid, cpus: f64) -> Result<Arc<dyn BrowserHandle>>;

	/// Look up an actor by name. `None` when no pending or alive actor
	/// carries that id.
	async fn lookup(&self, browser_id: Uuid) -> Result<Option<Arc<dyn BrowserHandle>>>;

	/// Enumerate every browser actor the runtime knows about, dead ones
	/// included.
	async fn list(&self) -> Result<Vec<ActorDescriptor>>;

	/// Kill the named actor's Chrome and mark it dead.
	async fn kill(&self, browser_id: Uuid) -> Result<()>;

	/// Total cluster resources, by resource name.
	async fn cluster_resources(&self) -> Result<HashMap<String, f64>>;

	/// Currently unreserved resources, by resource name.
	async fn available_resources(&self) -> Result<HashMap<String, f64>>;

	/// Whether the runtime handle is initialised and answering.
	fn is_connected(&self) -> bool;
}
