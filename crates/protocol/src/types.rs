//! Response models for the control-plane HTTP surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a browser actor, as tracked by the placement runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrowserState {
	/// Placement accepted, Chrome not yet materialised on a worker.
	Pending,
	/// The actor is running on a worker node.
	Alive,
	/// The actor was killed or its worker died.
	Dead,
}

/// Connection details for one browser, as reported by its actor.
///
/// `websocket_url` is a path under the control plane, not a worker address;
/// it is `None` until Chrome's discovery endpoint yields a usable target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserInfo {
	pub browser_id: Uuid,
	/// Worker node address captured when the actor was constructed.
	pub pod_ip: String,
	/// Proxy path of the form `/ws/browsers/{id}/devtools/...`.
	pub websocket_url: Option<String>,
	pub chrome_ready: bool,
}

/// Returned by browser creation: the new id plus the canonical proxy path.
///
/// The advertised path always targets the browser-level endpoint; once
/// Chrome exposes a page target, [`BrowserInfo::websocket_url`] may differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorInfo {
	pub browser_id: Uuid,
	pub proxy_url: String,
}

/// One entry in the browser listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSummary {
	pub browser_id: Uuid,
	pub state: BrowserState,
	pub websocket_url: Option<String>,
}

/// Browser listing plus cluster resource snapshot.
///
/// Resource maps degrade to empty mappings when the placement runtime
/// cannot report them; they are never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserList {
	pub browsers: Vec<BrowserSummary>,
	#[serde(default)]
	pub cluster: HashMap<String, f64>,
	#[serde(default)]
	pub available: HashMap<String, f64>,
}

/// Terminal acknowledgement for a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserStatus {
	pub browser_id: Uuid,
	/// The literal string `"closed"`.
	pub status: String,
}

/// Actor counts by state, embedded in [`Health`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BrowserCounts {
	pub alive: usize,
	pub pending: usize,
	pub dead: usize,
}

/// Health snapshot returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
	/// The literal string `"healthy"`; an unhealthy control plane fails
	/// the request with 503 instead.
	pub status: String,
	/// Whether the placement runtime handle is initialised.
	pub ray_status: bool,
	pub browsers: BrowserCounts,
	#[serde(default)]
	pub cluster: HashMap<String, f64>,
	#[serde(default)]
	pub available: HashMap<String, f64>,
}

/// Error body convention for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
	pub detail: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn browser_state_wire_form() {
		assert_eq!(serde_json::to_string(&BrowserState::Alive).unwrap(), "\"ALIVE\"");
		assert_eq!(serde_json::to_string(&BrowserState::Pending).unwrap(), "\"PENDING\"");
		assert_eq!(serde_json::to_string(&BrowserState::Dead).unwrap(), "\"DEAD\"");
	}

	#[test]
	fn browser_info_omits_null_url() {
		let info = BrowserInfo {
			browser_id: Uuid::new_v4(),
			pod_ip: "10.0.0.7".to_string(),
			websocket_url: None,
			chrome_ready: false,
		};
		let value = serde_json::to_value(&info).unwrap();
		assert!(value["websocket_url"].is_null());
		assert_eq!(value["chrome_ready"], false);
	}

	#[test]
	fn empty_resource_maps_serialize_as_objects() {
		let list = BrowserList {
			browsers: Vec::new(),
			cluster: HashMap::new(),
			available: HashMap::new(),
		};
		let value = serde_json::to_value(&list).unwrap();
		assert!(value["cluster"].is_object());
		assert!(value["available"].is_object());
	}
}
