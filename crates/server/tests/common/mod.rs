//! Shared harness: an in-memory placement runtime plus a fake Chrome
//! worker speaking just enough of the discovery API and CDP transport
//! for the control plane to proxy against.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use station_protocol::BrowserInfo;
use station_runtime::{
	ActorDescriptor, ActorState, BrowserActor, BrowserHandle, ChromeEndpoint, Error,
	PlacementRuntime,
};
use station_server::routes;
use station_server::state::{AppState, AuthConfig};
use uuid::Uuid;

pub struct MockActor {
	pub state: ActorState,
	pub endpoint: ChromeEndpoint,
	/// When set, `get_info` reports this instead of running discovery.
	pub info_override: Option<BrowserInfo>,
}

/// In-memory [`PlacementRuntime`] with switchable failure modes.
#[derive(Default)]
pub struct MockRuntime {
	pub actors: Mutex<HashMap<Uuid, MockActor>>,
	/// Endpoint handed to newly spawned actors.
	pub spawn_endpoint: Mutex<Option<ChromeEndpoint>>,
	pub disconnected: AtomicBool,
	pub fail_list: AtomicBool,
	pub fail_resources: AtomicBool,
	pub fail_kill: AtomicBool,
}

impl MockRuntime {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn spawning_at(endpoint: ChromeEndpoint) -> Arc<Self> {
		let runtime = Self::default();
		*runtime.spawn_endpoint.lock().unwrap() = Some(endpoint);
		Arc::new(runtime)
	}

	pub fn insert(&self, id: Uuid, state: ActorState, endpoint: ChromeEndpoint) {
		self.actors.lock().unwrap().insert(
			id,
			MockActor {
				state,
				endpoint,
				info_override: None,
			},
		);
	}

	/// Actor that claims readiness no matter what its worker says.
	pub fn insert_ready(&self, id: Uuid, endpoint: ChromeEndpoint) {
		self.actors.lock().unwrap().insert(
			id,
			MockActor {
				state: ActorState::Alive,
				endpoint: endpoint.clone(),
				info_override: Some(BrowserInfo {
					browser_id: id,
					pod_ip: endpoint.ip,
					websocket_url: Some(format!("/ws/browsers/{id}/devtools/browser")),
					chrome_ready: true,
				}),
			},
		);
	}
}

#[derive(Debug)]
struct MockHandle {
	id: Uuid,
	endpoint: ChromeEndpoint,
	info_override: Option<BrowserInfo>,
}

#[async_trait]
impl BrowserHandle for MockHandle {
	fn browser_id(&self) -> Uuid {
		self.id
	}

	fn endpoint(&self) -> ChromeEndpoint {
		self.endpoint.clone()
	}

	async fn get_info(&self) -> station_runtime::Result<BrowserInfo> {
		if let Some(info) = &self.info_override {
			return Ok(info.clone());
		}
		Ok(BrowserActor::new(self.id, self.endpoint.clone()).get_info().await)
	}
}

#[async_trait]
impl PlacementRuntime for MockRuntime {
	async fn spawn_browser(
		&self,
		browser_id: Uuid,
		_cpus: f64,
	) -> station_runtime::Result<Arc<dyn BrowserHandle>> {
		let endpoint = self
			.spawn_endpoint
			.lock()
			.unwrap()
			.clone()
			.unwrap_or_else(|| ChromeEndpoint::new("127.0.0.1", 1));
		self.insert(browser_id, ActorState::Alive, endpoint.clone());
		Ok(Arc::new(MockHandle {
			id: browser_id,
			endpoint,
			info_override: None,
		}))
	}

	async fn lookup(
		&self,
		browser_id: Uuid,
	) -> station_runtime::Result<Option<Arc<dyn BrowserHandle>>> {
		let actors = self.actors.lock().unwrap();
		Ok(actors
			.get(&browser_id)
			.filter(|actor| actor.state != ActorState::Dead)
			.map(|actor| {
				Arc::new(MockHandle {
					id: browser_id,
					endpoint: actor.endpoint.clone(),
					info_override: actor.info_override.clone(),
				}) as Arc<dyn BrowserHandle>
			}))
	}

	async fn list(&self) -> station_runtime::Result<Vec<ActorDescriptor>> {
		if self.fail_list.load(Ordering::SeqCst) {
			return Err(Error::NotConnected);
		}
		let actors = self.actors.lock().unwrap();
		Ok(actors
			.iter()
			.map(|(id, actor)| ActorDescriptor {
				browser_id: *id,
				state: actor.state,
			})
			.collect())
	}

	async fn kill(&self, browser_id: Uuid) -> station_runtime::Result<()> {
		if self.fail_kill.load(Ordering::SeqCst) {
			return Err(Error::Kill {
				id: browser_id,
				cause: "worker went away".to_string(),
			});
		}
		let mut actors = self.actors.lock().unwrap();
		match actors.get_mut(&browser_id) {
			Some(actor) if actor.state != ActorState::Dead => {
				actor.state = ActorState::Dead;
				Ok(())
			}
			_ => Err(Error::NotFound(browser_id)),
		}
	}

	async fn cluster_resources(&self) -> station_runtime::Result<HashMap<String, f64>> {
		if self.fail_resources.load(Ordering::SeqCst) {
			return Err(Error::NotConnected);
		}
		Ok(HashMap::from([("CPU".to_string(), 8.0)]))
	}

	async fn available_resources(&self) -> station_runtime::Result<HashMap<String, f64>> {
		if self.fail_resources.load(Ordering::SeqCst) {
			return Err(Error::NotConnected);
		}
		Ok(HashMap::from([("CPU".to_string(), 6.0)]))
	}

	fn is_connected(&self) -> bool {
		!self.disconnected.load(Ordering::SeqCst)
	}
}

/// Serve the control plane on an ephemeral port.
pub async fn spawn_app(runtime: Arc<MockRuntime>, auth: AuthConfig) -> SocketAddr {
	let state = AppState::new(runtime, auth);
	let app = routes::router(state);
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	addr
}

/// A worker-side Chrome stand-in.
pub struct FakeChrome {
	pub endpoint: ChromeEndpoint,
}

/// Start a fake Chrome: `/json` advertises one page target, `/json/version`
/// answers, and the advertised WebSocket path echoes every frame back.
pub async fn start_fake_chrome() -> FakeChrome {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();

	let page = json!({
		"id": "FAKE",
		"type": "page",
		"title": "about:blank",
		"url": "about:blank",
		"webSocketDebuggerUrl": format!("ws://localhost:{port}/devtools/page/FAKE")
	});
	let version = json!({
		"Browser": "FakeChrome/1.0",
		"Protocol-Version": "1.3",
		"webSocketDebuggerUrl": format!("ws://localhost:{port}/devtools/browser/FAKE")
	});

	let page_for_new = page.clone();
	let app = Router::new()
		.route("/json", get(move || async move { Json(json!([page])) }))
		.route("/json/new", put(move || async move { Json(page_for_new) }))
		.route("/json/version", get(move || async move { Json(version) }))
		.route("/devtools/page/FAKE", get(echo_upgrade))
		.route("/devtools/browser/FAKE", get(echo_upgrade));

	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});

	FakeChrome {
		endpoint: ChromeEndpoint::new("127.0.0.1", port),
	}
}

/// Fake Chrome that never becomes ready: no targets, tab creation and
/// version queries both refused.
pub async fn start_cold_chrome() -> FakeChrome {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();

	let app = Router::new()
		.route("/json", get(|| async { Json(json!([])) }))
		.route("/json/new", put(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }))
		.route("/json/version", get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }));

	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});

	FakeChrome {
		endpoint: ChromeEndpoint::new("127.0.0.1", port),
	}
}

async fn echo_upgrade(ws: WebSocketUpgrade) -> Response {
	ws.on_upgrade(echo_socket)
}

async fn echo_socket(mut socket: WebSocket) {
	while let Some(Ok(message)) = socket.recv().await {
		let reply = match message {
			Message::Text(text) => Message::Text(text),
			Message::Binary(bytes) => Message::Binary(bytes),
			Message::Close(_) => break,
			_ => continue,
		};
		if socket.send(reply).await.is_err() {
			break;
		}
	}
}
