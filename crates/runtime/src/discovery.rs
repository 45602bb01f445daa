//! CDP endpoint discovery against Chrome's `/json` HTTP API.
//!
//! Given a worker address, [`fetch_ws`] resolves a WebSocket URL suitable
//! for driving that Chrome over CDP. Page-level endpoints are preferred
//! (browser-level endpoints only speak a subset of the protocol); a cold
//! Chrome with no open pages gets one created for it via `/json/new`.
//!
//! Chrome reports its debugger URLs with a `localhost` host because it does
//! not know its own external address, so every returned URL has that token
//! rewritten to the worker address the caller supplied.

use std::time::Duration;

use station_protocol::{CdpTarget, CdpVersion};
use tracing::debug;

/// Canonical Chrome remote-debugging port on worker nodes.
pub const CDP_PORT: u16 = 9222;

/// Per-request timeout for discovery HTTP calls.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Address of one worker's Chrome debugging endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeEndpoint {
	/// Worker node IP literal (the actor's `pod_ip`).
	pub ip: String,
	pub port: u16,
}

impl ChromeEndpoint {
	pub fn new(ip: impl Into<String>, port: u16) -> Self {
		Self { ip: ip.into(), port }
	}

	/// Endpoint on the canonical debugging port.
	pub fn canonical(ip: impl Into<String>) -> Self {
		Self::new(ip, CDP_PORT)
	}

	pub fn http_url(&self, path: &str) -> String {
		format!("http://{}:{}{}", self.ip, self.port, path)
	}

	/// WebSocket URL for a discovery-advertised path (no leading slash).
	pub fn ws_url(&self, path: &str) -> String {
		format!("ws://{}:{}/{}", self.ip, self.port, path)
	}
}

impl std::fmt::Display for ChromeEndpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.ip, self.port)
	}
}

/// Resolve a usable CDP WebSocket URL for the Chrome at `endpoint`.
///
/// Scans `/json` for the first page target; if Chrome has no pages yet,
/// opens one with `PUT /json/new?about:blank`, falling back to the
/// browser-level URL from `/json/version` when tab creation is refused.
///
/// Returns `None` whenever Chrome is unreachable, times out, or has no
/// usable target; callers treat that as "not ready yet" and poll.
pub async fn fetch_ws(endpoint: &ChromeEndpoint, timeout: Duration) -> Option<String> {
	let client = reqwest::Client::builder().timeout(timeout).build().ok()?;

	let response = client.get(endpoint.http_url("/json")).send().await.ok()?;
	if !response.status().is_success() {
		return None;
	}
	let targets: Vec<CdpTarget> = response.json().await.ok()?;

	if let Some(page) = targets.iter().find(|t| t.is_page()) {
		// A page without a debugger URL is claimed by another client;
		// report not-ready rather than handing out a browser endpoint.
		let url = page.web_socket_debugger_url.as_deref()?;
		return Some(rewrite_host(url, &endpoint.ip));
	}

	debug!(endpoint = %endpoint, "no page target, creating tab");
	match client.put(endpoint.http_url("/json/new?about:blank")).send().await {
		Ok(response) if response.status().is_success() => {
			let target: CdpTarget = response.json().await.ok()?;
			let url = target.web_socket_debugger_url?;
			Some(rewrite_host(&url, &endpoint.ip))
		}
		_ => {
			let response = client.get(endpoint.http_url("/json/version")).send().await.ok()?;
			if !response.status().is_success() {
				return None;
			}
			let version: CdpVersion = response.json().await.ok()?;
			let url = version.web_socket_debugger_url?;
			Some(rewrite_host(&url, &endpoint.ip))
		}
	}
}

/// Point a Chrome-reported URL at the worker instead of `localhost`,
/// preserving port and path.
fn rewrite_host(url: &str, ip: &str) -> String {
	url.replace("localhost", ip)
}
