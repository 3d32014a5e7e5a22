//! Bounded peer registry — the N most recently active unique peers.
//!
//! Three views over one arena of slots:
//!
//! ```text
//!   index:  HashMap<PeerId, slot>          identity lookup
//!   slots:  Vec<Slot>                      dense, sampled uniformly
//!   oldest ─► slot ◄─► slot ◄─► slot ◄─ newest   recency list (slot links)
//! ```
//!
//! A slot is both a dense array entry and a recency node, so the index
//! needs one position per peer. Eviction unlinks the oldest slot and
//! swap-removes it; the slot that moved into the hole gets its neighbours,
//! its index entry and the list ends repointed.
//!
//! All operations are O(1) except the iterators.

use std::collections::HashMap;

use peermgr_core::config::RegistryConfig;
use peermgr_core::{PeerId, Timestamp};
use rand::Rng;

use crate::error::RegistryError;

/// What a call to [`PeerRegistry::saw_peer`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// Peer was already tracked; its timestamp and recency were refreshed.
    Touched,
    /// Peer was added without displacing anyone.
    Inserted,
    /// Peer was added after forgetting the least recently seen peer.
    Evicted {
        /// The peer that was forgotten.
        evicted: PeerId,
        /// Its last-seen time when it was forgotten.
        last_seen: Timestamp,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    id: PeerId,
    last_seen: Timestamp,
    /// Next slot towards the oldest end.
    older: Option<usize>,
    /// Next slot towards the newest end.
    newer: Option<usize>,
}

/// Remembers up to `capacity` unique peers, forgetting the least recently
/// seen one when a new peer arrives at capacity.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    capacity: usize,
    index: HashMap<PeerId, usize>,
    slots: Vec<Slot>,
    oldest: Option<usize>,
    newest: Option<usize>,
}

impl PeerRegistry {
    /// Create an empty registry that tracks up to `capacity` peers.
    pub fn new(capacity: usize) -> Result<Self, RegistryError> {
        Self::with_ceiling(capacity, None)
    }

    /// Like [`new`](Self::new), additionally refusing capacities above `max`.
    pub fn with_ceiling(capacity: usize, max: Option<usize>) -> Result<Self, RegistryError> {
        let too_large = max.is_some_and(|max| capacity > max);
        if capacity == 0 || too_large {
            return Err(RegistryError::InvalidCapacity {
                requested: capacity,
                max,
            });
        }

        tracing::trace!(capacity, "peer registry created");
        Ok(Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            oldest: None,
            newest: None,
        })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Self::with_ceiling(config.capacity, config.ceiling())
    }

    /// Record activity from `peer` at `timestamp`.
    ///
    /// A tracked peer is moved to the newest end and gets `timestamp` as
    /// its last-seen time, even if that is earlier than the stored one.
    /// An untracked peer is inserted, evicting the oldest peer first when
    /// the registry is full.
    pub fn saw_peer(&mut self, peer: PeerId, timestamp: Timestamp) -> Sighting {
        if let Some(&slot) = self.index.get(&peer) {
            self.slots[slot].last_seen = timestamp;
            if self.newest != Some(slot) {
                self.unlink(slot);
                self.link_newest(slot);
            }
            tracing::trace!(peer, timestamp, "peer touched");
            return Sighting::Touched;
        }

        let evicted = if self.is_full() {
            self.evict_oldest()
        } else {
            None
        };

        let slot = self.slots.len();
        self.slots.push(Slot {
            id: peer,
            last_seen: timestamp,
            older: None,
            newer: None,
        });
        self.link_newest(slot);
        self.index.insert(peer, slot);
        tracing::trace!(peer, timestamp, count = self.slots.len(), "peer inserted");

        match evicted {
            Some((evicted, last_seen)) => Sighting::Evicted { evicted, last_seen },
            None => Sighting::Inserted,
        }
    }

    /// Pick a tracked peer uniformly at random. `None` if nothing is tracked.
    pub fn pick_random_peer<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PeerId> {
        if self.slots.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.slots.len());
        Some(self.slots[slot].id)
    }

    /// Release the registry and everything it tracks.
    ///
    /// Equivalent to dropping it; taking `self` makes the handle unusable
    /// afterwards.
    pub fn destroy(self) {
        tracing::trace!(count = self.slots.len(), "peer registry destroyed");
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.index.contains_key(&peer)
    }

    /// Last-seen time recorded for `peer`, if tracked.
    pub fn last_seen(&self, peer: PeerId) -> Option<Timestamp> {
        self.index.get(&peer).map(|&slot| self.slots[slot].last_seen)
    }

    /// The peer that would be evicted next.
    pub fn oldest(&self) -> Option<(PeerId, Timestamp)> {
        self.oldest.map(|slot| self.entry(slot))
    }

    /// The most recently seen peer.
    pub fn newest(&self) -> Option<(PeerId, Timestamp)> {
        self.newest.map(|slot| self.entry(slot))
    }

    /// Tracked peers from least to most recently seen.
    pub fn iter_by_recency(&self) -> ByRecency<'_> {
        ByRecency {
            slots: &self.slots,
            next: self.oldest,
            remaining: self.slots.len(),
        }
    }

    /// Tracked peers in storage order (no particular meaning).
    pub fn peers(&self) -> impl ExactSizeIterator<Item = PeerId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    /// Panics if the index, the dense slots and the recency list disagree.
    ///
    /// O(n); only built for tests and debug builds.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.slots.len() <= self.capacity, "count exceeds capacity");
        assert_eq!(self.index.len(), self.slots.len(), "index/slot count mismatch");

        for (slot, entry) in self.slots.iter().enumerate() {
            assert_eq!(
                self.index.get(&entry.id),
                Some(&slot),
                "index does not point at slot {slot} for peer {}",
                entry.id
            );
        }

        let mut seen = vec![false; self.slots.len()];
        let mut prev = None;
        let mut cursor = self.oldest;
        while let Some(slot) = cursor {
            assert!(slot < self.slots.len(), "link to slot {slot} out of bounds");
            assert!(!seen[slot], "recency list revisits slot {slot}");
            seen[slot] = true;
            assert_eq!(self.slots[slot].older, prev, "broken back link at slot {slot}");
            prev = Some(slot);
            cursor = self.slots[slot].newer;
        }
        assert_eq!(prev, self.newest, "newest end does not match list tail");
        assert!(seen.iter().all(|&s| s), "slot missing from recency list");
    }

    fn entry(&self, slot: usize) -> (PeerId, Timestamp) {
        let s = &self.slots[slot];
        (s.id, s.last_seen)
    }

    /// Detach `slot` from the recency list, joining its neighbours.
    fn unlink(&mut self, slot: usize) {
        let Slot { older, newer, .. } = self.slots[slot];
        match older {
            Some(o) => self.slots[o].newer = newer,
            None => self.oldest = newer,
        }
        match newer {
            Some(n) => self.slots[n].older = older,
            None => self.newest = older,
        }
        self.slots[slot].older = None;
        self.slots[slot].newer = None;
    }

    /// Attach a detached `slot` at the newest end.
    fn link_newest(&mut self, slot: usize) {
        self.slots[slot].older = self.newest;
        self.slots[slot].newer = None;
        match self.newest {
            Some(n) => self.slots[n].newer = Some(slot),
            None => self.oldest = Some(slot),
        }
        self.newest = Some(slot);
    }

    /// Forget the least recently seen peer.
    fn evict_oldest(&mut self) -> Option<(PeerId, Timestamp)> {
        let slot = self.oldest?;
        self.unlink(slot);
        let removed = self.slots.swap_remove(slot);
        self.index.remove(&removed.id);

        // The former last slot now lives in the hole.
        let moved_from = self.slots.len();
        if slot < moved_from {
            self.relocated(moved_from, slot);
        }

        tracing::debug!(
            peer = removed.id,
            last_seen = removed.last_seen,
            capacity = self.capacity,
            "evicted least recently seen peer"
        );
        Some((removed.id, removed.last_seen))
    }

    /// Repoint everything that referred to `from` at `to`.
    fn relocated(&mut self, from: usize, to: usize) {
        let Slot {
            id, older, newer, ..
        } = self.slots[to];
        match older {
            Some(o) => self.slots[o].newer = Some(to),
            None => self.oldest = Some(to),
        }
        match newer {
            Some(n) => self.slots[n].older = Some(to),
            None => self.newest = Some(to),
        }
        debug_assert_eq!(self.index.get(&id), Some(&from));
        self.index.insert(id, to);
    }
}

/// Iterator over tracked peers, least recently seen first.
#[derive(Debug, Clone)]
pub struct ByRecency<'a> {
    slots: &'a [Slot],
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for ByRecency<'_> {
    type Item = (PeerId, Timestamp);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = &self.slots[self.next?];
        self.next = slot.newer;
        self.remaining -= 1;
        Some((slot.id, slot.last_seen))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ByRecency<'_> {}
