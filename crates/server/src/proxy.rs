//! Bidirectional CDP WebSocket proxy.
//!
//! Bridges an external client to `ws://{worker}/{path}` on the actor's
//! Chrome. The client handshake is accepted *before* any preflight check
//! so failures surface as application-level close codes instead of opaque
//! HTTP errors: 1008 for "no such browser", 1011 for "exists but not
//! usable right now".
//!
//! During bridging, frames are forwarded verbatim in both directions and
//! order is preserved within each direction; CDP's request/response
//! correlation depends on that. Either peer closing tears the whole
//! bridge down.

use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message as ClientMessage, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth;
use crate::state::AppState;

/// Timeout for the `/json/version` reachability probe.
const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for the upstream WebSocket handshake.
const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Policy / addressing failure: the id names no live browser.
const CLOSE_POLICY: u16 = 1008;

/// The browser exists but cannot serve CDP right now.
const CLOSE_INTERNAL: u16 = 1011;

type Upstream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `GET /ws/browsers/{browser_id}/{path...}` with upgrade.
pub async fn ws_entry(
	State(state): State<AppState>,
	Path((browser_id, path)): Path<(String, String)>,
	headers: HeaderMap,
	ws: WebSocketUpgrade,
) -> Response {
	if state.auth.ws_auth {
		if let Err(err) = auth::check_api_key(&state.auth, &headers) {
			return err.into_response();
		}
	}
	ws.on_upgrade(move |socket| proxy_session(socket, state, browser_id, path))
}

async fn proxy_session(mut client: WebSocket, state: AppState, browser_id: String, path: String) {
	match preflight(&state, &browser_id, &path).await {
		Ok(upstream) => {
			debug!(%browser_id, %path, "bridge established");
			bridge(client, upstream).await;
			debug!(%browser_id, "bridge torn down");
		}
		Err(close) => {
			warn!(%browser_id, code = close.code, reason = close.reason.as_str(), "proxy preflight failed");
			let _ = client.send(ClientMessage::Close(Some(close))).await;
		}
	}
}

/// Resolve the actor, probe Chrome, and dial the upstream socket.
///
/// Every failure maps to the close frame the client should see.
async fn preflight(state: &AppState, browser_id: &str, path: &str) -> Result<Upstream, CloseFrame> {
	let id = Uuid::parse_str(browser_id).map_err(|_| close(CLOSE_POLICY, "Browser not found"))?;
	let handle = state
		.service
		.registry()
		.lookup(id)
		.await
		.map_err(|_| close(CLOSE_POLICY, "Browser not found"))?;

	let ready = matches!(handle.get_info().await, Ok(info) if info.chrome_ready);
	if !ready {
		return Err(close(CLOSE_INTERNAL, "Chrome not ready"));
	}

	// The actor's readiness is a cache; Chrome may have died since. Probe
	// the worker directly before dialing.
	let endpoint = handle.endpoint();
	let probe = async {
		reqwest::Client::builder()
			.timeout(PREFLIGHT_TIMEOUT)
			.build()?
			.get(endpoint.http_url("/json/version"))
			.send()
			.await?
			.error_for_status()?;
		Ok::<(), reqwest::Error>(())
	};
	if let Err(err) = probe.await {
		return Err(close(CLOSE_INTERNAL, format!("Chrome unreachable: {err}")));
	}

	let url = endpoint.ws_url(path);
	match tokio::time::timeout(DIAL_TIMEOUT, connect_async(url.as_str())).await {
		Ok(Ok((upstream, _response))) => Ok(upstream),
		Ok(Err(err)) => Err(close(CLOSE_INTERNAL, format!("Upstream dial failed: {err}"))),
		Err(_) => Err(close(CLOSE_INTERNAL, "Upstream dial timed out")),
	}
}

/// Forward frames both ways until either peer closes or errors.
///
/// Both directions run in one task under `select!`: when one side
/// finishes, the other's pending read is cancelled at its suspension
/// point and both sockets close on drop, so neither flow can outlive the
/// session.
async fn bridge(client: WebSocket, upstream: Upstream) {
	let (mut client_tx, mut client_rx) = client.split();
	let (mut upstream_tx, mut upstream_rx) = upstream.split();

	let client_to_chrome = async {
		while let Some(Ok(message)) = client_rx.next().await {
			let frame = match message {
				ClientMessage::Text(text) => UpstreamMessage::Text(text.as_str().into()),
				ClientMessage::Binary(bytes) => UpstreamMessage::Binary(bytes),
				ClientMessage::Close(_) => break,
				// Ping/pong stays a per-hop concern.
				_ => continue,
			};
			if upstream_tx.send(frame).await.is_err() {
				break;
			}
		}
	};

	let chrome_to_client = async {
		while let Some(Ok(message)) = upstream_rx.next().await {
			let frame = match message {
				UpstreamMessage::Text(text) => ClientMessage::Text(text.as_str().into()),
				UpstreamMessage::Binary(bytes) => ClientMessage::Binary(bytes),
				UpstreamMessage::Close(_) => break,
				_ => continue,
			};
			if client_tx.send(frame).await.is_err() {
				break;
			}
		}
	};

	tokio::select! {
		() = client_to_chrome => debug!("client side closed"),
		() = chrome_to_client => debug!("upstream side closed"),
	}
}

fn close(code: u16, reason: impl Into<String>) -> CloseFrame {
	CloseFrame {
		code,
		reason: reason.into().into(),
	}
}
