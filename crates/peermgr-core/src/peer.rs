//! Peer identity and activity time.

/// A unique identifier for a remote peer. Opaque to the registry.
pub type PeerId = u64;

/// Activity time in seconds, supplied by the caller.
///
/// Only meaningful relative to other timestamps from the same source;
/// the registry never reads a clock.
pub type Timestamp = i64;
