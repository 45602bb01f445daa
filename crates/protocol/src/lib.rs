//! Wire types for the BrowserStation control plane.
//!
//! This crate contains the serde-serializable types exchanged over the
//! control plane's HTTP surface, plus the subset of Chrome's DevTools
//! discovery schema that the runtime consumes. These types represent the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **Stable**: Changes only when the public API changes
//!
//! Behavior lives in `station-runtime` and `station-server`.

pub mod cdp;
pub mod types;

pub use cdp::*;
pub use types::*;
