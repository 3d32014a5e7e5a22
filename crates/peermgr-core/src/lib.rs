//! peermgr-core — shared peer types and the configuration layer.
//! The registry crate and the simulator both depend on this one.

pub mod config;
pub mod peer;

pub use peer::{PeerId, Timestamp};
