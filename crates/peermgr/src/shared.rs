//! Thread-safe handle over a [`PeerRegistry`].
//!
//! Connection handlers on different threads report activity through the
//! same handle. One mutex guards the registry and the picker's generator
//! together, so every `saw_peer` and every pick sees all three registry
//! views in a consistent state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use peermgr_core::config::PeerMgrConfig;
use peermgr_core::{PeerId, Timestamp};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::RegistryError;
use crate::registry::{PeerRegistry, Sighting};

#[derive(Debug)]
struct Inner {
    registry: PeerRegistry,
    rng: StdRng,
}

/// Cloneable, `Send + Sync` registry handle that owns its generator.
#[derive(Debug, Clone)]
pub struct SharedPeerRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl SharedPeerRegistry {
    pub fn new(registry: PeerRegistry, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { registry, rng })),
        }
    }

    /// Deterministic picks, for tests and reproducible simulations.
    pub fn seeded(registry: PeerRegistry, seed: u64) -> Self {
        Self::new(registry, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(registry: PeerRegistry) -> Self {
        Self::new(registry, StdRng::from_entropy())
    }

    /// Build from config: `registry` sizes it, `sampling.seed` fixes the
    /// generator when non-zero.
    pub fn from_config(config: &PeerMgrConfig) -> Result<Self, RegistryError> {
        let registry = PeerRegistry::from_config(&config.registry)?;
        Ok(match config.sampling.fixed_seed() {
            Some(seed) => Self::seeded(registry, seed),
            None => Self::from_entropy(registry),
        })
    }

    pub fn saw_peer(&self, peer: PeerId, timestamp: Timestamp) -> Sighting {
        self.lock().registry.saw_peer(peer, timestamp)
    }

    pub fn pick_random_peer(&self) -> Option<PeerId> {
        let mut inner = self.lock();
        let Inner { registry, rng } = &mut *inner;
        registry.pick_random_peer(rng)
    }

    pub fn len(&self) -> usize {
        self.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().registry.is_empty()
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.lock().registry.contains(peer)
    }

    pub fn last_seen(&self, peer: PeerId) -> Option<Timestamp> {
        self.lock().registry.last_seen(peer)
    }

    /// Copy of the tracked peers, least recently seen first.
    pub fn snapshot(&self) -> Vec<(PeerId, Timestamp)> {
        self.lock().registry.iter_by_recency().collect()
    }

    /// Run `f` against the registry while holding the lock.
    ///
    /// The lock is not reentrant: `f` must not call back into this handle
    /// or any clone of it, or it deadlocks.
    pub fn with<T>(&self, f: impl FnOnce(&PeerRegistry) -> T) -> T {
        f(&self.lock().registry)
    }

    // Registry operations never leave it half-updated, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
