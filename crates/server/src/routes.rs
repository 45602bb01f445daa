//! HTTP route table.
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | GET | `/` | none |
//! | POST | `/browsers` | API key |
//! | GET | `/browsers` | API key |
//! | GET | `/browsers/{id}` | API key |
//! | DELETE | `/browsers/{id}` | API key |
//! | GET (upgrade) | `/ws/browsers/{id}/{path...}` | none unless `--ws-auth` |
//!
//! CORS mirrors the request (any origin, method, header) with credentials
//! allowed; the control plane is expected to sit behind a cluster boundary.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router, middleware};
use station_protocol::{ActorInfo, BrowserInfo, BrowserList, BrowserStatus, Health};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::error::Result;
use crate::state::AppState;
use crate::{auth, proxy};

pub fn router(state: AppState) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::mirror_request())
		.allow_methods(AllowMethods::mirror_request())
		.allow_headers(AllowHeaders::mirror_request())
		.allow_credentials(true);

	let api = Router::new()
		.route("/browsers", axum::routing::post(create_browser).get(list_browsers))
		.route("/browsers/{browser_id}", get(get_browser).delete(delete_browser))
		.route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

	Router::new()
		.route("/", get(health))
		.merge(api)
		.route("/ws/browsers/{browser_id}/{*path}", get(proxy::ws_entry))
		.layer(cors)
		.with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<Health>> {
	state.service.health().await.map(Json)
}

async fn create_browser(State(state): State<AppState>) -> Result<Json<ActorInfo>> {
	state.service.create_browser().await.map(Json)
}

async fn list_browsers(State(state): State<AppState>) -> Result<Json<BrowserList>> {
	state.service.list_browsers().await.map(Json)
}

async fn get_browser(
	State(state): State<AppState>,
	Path(browser_id): Path<String>,
) -> Result<Json<BrowserInfo>> {
	state.service.get_browser(&browser_id).await.map(Json)
}

async fn delete_browser(
	State(state): State<AppState>,
	Path(browser_id): Path<String>,
) -> Result<Json<BrowserStatus>> {
	state.service.delete_browser(&browser_id).await.map(Json)
}
