//! Shared-secret authentication.
//!
//! A single key from `BROWSERSTATION_API_KEY` guards the mutating routes;
//! when the variable is unset or empty the check is skipped entirely.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::{AppState, AuthConfig};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware for the `/browsers` routes.
pub async fn require_api_key(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Response {
	if let Err(err) = check_api_key(&state.auth, request.headers()) {
		return err.into_response();
	}
	next.run(request).await
}

/// Compare the `X-API-Key` header against the configured secret.
pub fn check_api_key(auth: &AuthConfig, headers: &HeaderMap) -> Result<(), ApiError> {
	let Some(expected) = &auth.api_key else {
		return Ok(());
	};
	let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
	if provided != Some(expected.as_str()) {
		return Err(ApiError::InvalidApiKey);
	}
	Ok(())
}
