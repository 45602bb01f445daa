//! The per-browser actor record.
//!
//! An actor owns exactly one Chrome process on one worker. Its identity
//! (`browser_id`) and its worker endpoint are fixed at construction; the
//! only thing that changes over its lifetime is whether Chrome answers
//! discovery, which [`BrowserActor::get_info`] re-checks on every call.

use station_protocol::BrowserInfo;
use uuid::Uuid;

use crate::discovery::{self, ChromeEndpoint, DISCOVERY_TIMEOUT};

/// One browser actor: an id bound to a worker's Chrome endpoint.
#[derive(Debug, Clone)]
pub struct BrowserActor {
	browser_id: Uuid,
	endpoint: ChromeEndpoint,
}

impl BrowserActor {
	pub fn new(browser_id: Uuid, endpoint: ChromeEndpoint) -> Self {
		Self { browser_id, endpoint }
	}

	pub fn browser_id(&self) -> Uuid {
		self.browser_id
	}

	pub fn endpoint(&self) -> &ChromeEndpoint {
		&self.endpoint
	}

	/// Current connection details for this browser.
	///
	/// Runs discovery against the worker; a failed or empty discovery
	/// yields `websocket_url: None` and `chrome_ready: false`, which
	/// callers interpret as "poll again later".
	pub async fn get_info(&self) -> BrowserInfo {
		let upstream = discovery::fetch_ws(&self.endpoint, DISCOVERY_TIMEOUT).await;
		let websocket_url = upstream
			.as_deref()
			.map(|url| format!("/ws/browsers/{}{}", self.browser_id, path_suffix(url, self.endpoint.port)));
		BrowserInfo {
			browser_id: self.browser_id,
			pod_ip: self.endpoint.ip.clone(),
			chrome_ready: websocket_url.is_some(),
			websocket_url,
		}
	}
}

/// Path component of an upstream debugger URL: everything after the
/// `:{port}` authority. `ws://10.0.0.7:9222/devtools/page/AB` becomes
/// `/devtools/page/AB`.
fn path_suffix(url: &str, port: u16) -> &str {
	let token = format!(":{port}");
	url.split_once(token.as_str()).map_or(url, |(_, tail)| tail)
}
