use std::collections::HashMap;

use crate::*;

#[test]
fn test_uniform_distribution() {
    let registry = registry_with(5, &[(10, 1), (20, 2), (30, 3), (40, 4), (50, 5)]);
    let mut rng = rng(0xabcd);

    let draws = 50_000;
    let mut counts: HashMap<PeerId, usize> = HashMap::new();
    for _ in 0..draws {
        let peer = registry.pick_random_peer(&mut rng).unwrap();
        *counts.entry(peer).or_default() += 1;
    }

    assert_eq!(counts.len(), 5);
    let expected = draws as f64 / 5.0;
    for (peer, count) in counts {
        let deviation = (count as f64 - expected).abs() / expected;
        assert!(
            deviation < 0.05,
            "peer {peer} picked {count} times, expected about {expected}"
        );
    }
}

#[test]
fn test_uniform_after_evictions() {
    // Slots get shuffled by swap-removal; sampling must not care.
    let mut registry = PeerRegistry::new(4).unwrap();
    for (ts, peer) in [1u64, 2, 3, 4, 2, 5, 6, 1, 7].into_iter().enumerate() {
        registry.saw_peer(peer, ts as Timestamp);
    }
    let mut live = tracked(&registry);
    live.sort_unstable();
    assert_eq!(live, vec![1, 5, 6, 7]);

    let mut rng = rng(8);
    let mut counts: HashMap<PeerId, usize> = HashMap::new();
    for _ in 0..40_000 {
        *counts.entry(registry.pick_random_peer(&mut rng).unwrap()).or_default() += 1;
    }
    let mut picked: Vec<_> = counts.keys().copied().collect();
    picked.sort_unstable();
    assert_eq!(picked, live);
    for count in counts.values() {
        assert!((9_000..11_000).contains(count), "skewed count {count}");
    }
}

#[test]
fn test_pick_does_not_mutate() {
    let registry = registry_with(3, &[(1, 1), (2, 2), (3, 3)]);
    let before: Vec<_> = registry.iter_by_recency().collect();
    let mut rng = rng(4);
    for _ in 0..100 {
        registry.pick_random_peer(&mut rng);
    }
    let after: Vec<_> = registry.iter_by_recency().collect();
    assert_eq!(before, after);
}
