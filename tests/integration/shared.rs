use std::thread;

use crate::*;
use peermgr::SharedPeerRegistry;
use peermgr_core::config::PeerMgrConfig;

#[test]
fn test_shared_registry_from_toml() {
    let config =
        PeerMgrConfig::from_toml("[registry]\ncapacity = 2\n\n[sampling]\nseed = 42\n").unwrap();
    let shared = SharedPeerRegistry::from_config(&config).unwrap();

    shared.saw_peer(1, 10);
    shared.saw_peer(2, 20);
    shared.saw_peer(3, 30);
    assert_eq!(shared.snapshot(), vec![(2, 20), (3, 30)]);
    assert!(matches!(shared.pick_random_peer(), Some(2) | Some(3)));
}

#[test]
fn test_ceiling_from_toml() {
    let config =
        PeerMgrConfig::from_toml("[registry]\ncapacity = 101\nmax_capacity = 100\n").unwrap();
    assert!(SharedPeerRegistry::from_config(&config).is_err());
}

#[test]
fn test_many_threads_one_registry() {
    let shared = SharedPeerRegistry::seeded(PeerRegistry::new(25).unwrap(), 7);

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..1_000u64 {
                    shared.saw_peer(t * 100 + i % 40, i as Timestamp);
                    if let Some(peer) = shared.pick_random_peer() {
                        assert!(peer < 800);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shared.len(), 25);
    shared.with(|registry| registry.debug_validate_invariants());
}
