//! API error type and its HTTP rendering.
//!
//! Every non-2xx response carries a `{"detail": "<message>"}` body. 5xx is
//! reserved for genuinely unexpected failures; addressing errors map to
//! 404, auth to 401, and control-plane degradation to 503.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use station_protocol::ErrorBody;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
	/// Missing or wrong `X-API-Key` header.
	#[error("Invalid API key")]
	InvalidApiKey,

	/// Unknown browser id.
	#[error("Browser not found")]
	NotFound,

	/// The placement runtime is unreachable or failed outright.
	#[error("Unhealthy: {0}")]
	Unhealthy(String),

	/// The placement runtime refused to kill an existing actor.
	#[error("Failed to kill actor: {0}")]
	KillFailed(String),

	/// Anything else.
	#[error("{0}")]
	Internal(String),
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
			ApiError::NotFound => StatusCode::NOT_FOUND,
			ApiError::Unhealthy(_) => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::KillFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			detail: self.to_string(),
		};
		(self.status(), Json(body)).into_response()
	}
}

impl From<station_runtime::Error> for ApiError {
	fn from(err: station_runtime::Error) -> Self {
		match err {
			station_runtime::Error::NotFound(_) => ApiError::NotFound,
			other => ApiError::Internal(other.to_string()),
		}
	}
}
