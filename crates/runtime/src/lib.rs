//! Placement runtime, browser actors, and CDP discovery.
//!
//! This crate holds everything between the control plane's HTTP surface and
//! a worker's Chrome process:
//!
//! - [`placement`] - the narrow interface the control plane consumes for
//!   actor placement, naming, lifecycle, and resource introspection
//! - [`local`] - a single-node [`PlacementRuntime`] that launches one
//!   headless Chromium per actor
//! - [`registry`] - stateless actor enumeration and lookup by id
//! - [`actor`] - the per-browser record and its `BrowserInfo` projection
//! - [`discovery`] - resolving a usable CDP WebSocket URL from Chrome's
//!   `/json` discovery API
//!
//! The control plane never retains actor handles across requests; every
//! lookup goes back to the placement runtime, which owns actor lifetime.

pub mod actor;
pub mod discovery;
pub mod error;
pub mod local;
pub mod placement;
pub mod registry;

pub use actor::BrowserActor;
pub use discovery::{CDP_PORT, ChromeEndpoint};
pub use error::{Error, Result};
pub use local::LocalRuntime;
pub use placement::{ActorDescriptor, ActorState, BrowserHandle, PlacementRuntime};
pub use registry::Registry;
