//! The slice of Chrome's DevTools discovery schema the control plane reads.
//!
//! Chrome serves these over plain HTTP on its debugging port: `/json` lists
//! debuggable targets, `/json/version` describes the browser itself, and
//! `PUT /json/new` opens a tab. Only the fields the runtime consumes are
//! modelled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One entry of the `/json` target list (also the body of `/json/new`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpTarget {
	pub id: String,
	/// Target kind: `"page"`, `"background_page"`, `"service_worker"`, ...
	#[serde(rename = "type")]
	pub target_type: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	/// Absent when another client holds the target's debugger.
	#[serde(default)]
	pub web_socket_debugger_url: Option<String>,
}

impl CdpTarget {
	/// Whether this target is a page, the kind CDP clients usually want.
	pub fn is_page(&self) -> bool {
		self.target_type == "page"
	}
}

/// Body of `/json/version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpVersion {
	#[serde(rename = "Browser", default)]
	pub browser: String,
	#[serde(rename = "Protocol-Version", default)]
	pub protocol_version: String,
	/// Browser-level debugger endpoint; supports a subset of the protocol.
	#[serde(default)]
	pub web_socket_debugger_url: Option<String>,
}
