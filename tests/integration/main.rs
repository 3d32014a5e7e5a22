//! peermgr integration test harness.
//!
//! Exercises the public registry contract only:
//!
//!   cargo test --test integration
//!
//! Randomized tests use fixed seeds so a failure reproduces exactly.

use peermgr::{PeerId, PeerRegistry, Timestamp};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod sampling;
mod shared;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Deterministic generator for picks and workloads.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Registry with `capacity` slots, fed `(peer, timestamp)` pairs in order.
pub fn registry_with(capacity: usize, sightings: &[(PeerId, Timestamp)]) -> PeerRegistry {
    let mut registry = PeerRegistry::new(capacity).expect("capacity must be positive");
    for &(peer, ts) in sightings {
        registry.saw_peer(peer, ts);
    }
    registry
}

/// Tracked peer ids, least recently seen first.
pub fn tracked(registry: &PeerRegistry) -> Vec<PeerId> {
    registry.iter_by_recency().map(|(peer, _)| peer).collect()
}
