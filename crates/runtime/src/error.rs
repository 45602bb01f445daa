//! Error types for the placement runtime.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the placement runtime.
#[derive(Debug, Error)]
pub enum Error {
	/// No actor is registered under the given id.
	#[error("browser not found: {0}")]
	NotFound(Uuid),

	/// The runtime handle was used before being initialised.
	#[error("placement runtime not initialised")]
	NotConnected,

	/// No Chromium binary could be located on this host.
	#[error("no Chromium binary found (tried {candidates}); set CHROME_BIN to override")]
	ChromeNotFound {
		/// Comma-separated binary names that were probed.
		candidates: String,
	},

	/// The runtime refused placement because resources are exhausted.
	#[error("placement refused: requested {requested} CPU, {available} available")]
	ResourcesExhausted { requested: f64, available: f64 },

	/// No free debugging port remains in the configured range.
	#[error("no free debugging port in {start}..={end}")]
	PortsExhausted { start: u16, end: u16 },

	/// Launching the Chrome process failed.
	#[error("failed to launch Chrome: {0}")]
	Launch(String),

	/// Killing an actor's Chrome process failed.
	#[error("failed to kill actor {id}: {cause}")]
	Kill { id: Uuid, cause: String },

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
