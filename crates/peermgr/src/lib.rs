//! peermgr — remembers the most recently active peers of a P2P client
//! and picks one of them uniformly at random.
//!
//! ```
//! use peermgr::PeerRegistry;
//! use rand::SeedableRng;
//!
//! let mut registry = PeerRegistry::new(8).unwrap();
//! registry.saw_peer(1234, 1_700_000_000);
//! registry.saw_peer(5432, 1_700_000_001);
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! if let Some(peer) = registry.pick_random_peer(&mut rng) {
//!     assert!(peer == 1234 || peer == 5432);
//! }
//! ```

pub mod error;
pub mod registry;
pub mod shared;

pub use error::RegistryError;
pub use peermgr_core::{PeerId, Timestamp};
pub use registry::{ByRecency, PeerRegistry, Sighting};
pub use shared::SharedPeerRegistry;
