//! Randomized soak: a large batch of generated entries, half removed,
//! everything verified by lookup and by full traversal.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u8map::U8Map;

const NUM_ITEMS: usize = 1000;
const MIN_LEN: usize = 4;
const MAX_LEN: usize = 24;

struct TestPair {
    key: Vec<u8>,
    value: Vec<u8>,
    removed: bool,
}

fn random_pairs(rng: &mut StdRng) -> Vec<TestPair> {
    (0..NUM_ITEMS)
        .map(|i| {
            // A numeric prefix keeps keys unique; the tail is random.
            let mut key = format!("{i:04}").into_bytes();
            for _ in 0..rng.gen_range(0..=MAX_LEN - key.len()) {
                key.push(rng.gen_range(0x21..=0x7e));
            }

            let value: Vec<u8> = (0..rng.gen_range(MIN_LEN..=MAX_LEN))
                .map(|_| rng.gen())
                .collect();

            TestPair {
                key,
                value,
                removed: false,
            }
        })
        .collect()
}

#[test]
fn test_insert_remove_retrieve_soak() {
    let mut buffer = vec![0u8; 1024 * 1024];
    let mut map = U8Map::with_default_config(&mut buffer).unwrap();
    let mut rng = StdRng::seed_from_u64(0x00c0_ffee);

    let mut pairs = random_pairs(&mut rng);
    for pair in &pairs {
        map.insert(&pair.key, &pair.value).unwrap();
    }
    assert_eq!(map.len(), NUM_ITEMS);

    // Remove every other entry.
    for pair in pairs.iter_mut().step_by(2) {
        assert!(map.remove(&pair.key));
        pair.removed = true;
    }
    assert_eq!(map.len(), NUM_ITEMS / 2);

    for pair in &pairs {
        if pair.removed {
            assert!(!map.contains_key(&pair.key));
            assert_eq!(map.get(&pair.key), None);
        } else {
            assert_eq!(map.get(&pair.key), Some(&pair.value[..]));
        }
    }
}

#[test]
fn test_traversal_matches_live_set_after_removals() {
    let mut buffer = vec![0u8; 1024 * 1024];
    let mut map = U8Map::with_default_config(&mut buffer).unwrap();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut pairs = random_pairs(&mut rng);
    for pair in &pairs {
        map.insert(&pair.key, &pair.value).unwrap();
    }
    for pair in pairs.iter_mut().step_by(2) {
        assert!(map.remove(&pair.key));
        pair.removed = true;
    }

    let expected: HashSet<Vec<u8>> = pairs
        .iter()
        .filter(|pair| !pair.removed)
        .map(|pair| pair.key.clone())
        .collect();

    // The stateful cursor sees exactly the live set.
    map.reset_cursor();
    let mut seen = HashSet::new();
    while let Some((key, _value)) = map.next_item() {
        assert!(seen.insert(key.to_vec()));
    }
    assert_eq!(map.next_item(), None);
    assert_eq!(seen, expected);

    // So does the borrowing iterator.
    let iterated: HashSet<Vec<u8>> = map.iter().map(|(key, _)| key.to_vec()).collect();
    assert_eq!(iterated.len(), map.len());
    assert_eq!(iterated, expected);
}

#[test]
fn test_churn_stays_within_initial_footprint() {
    let mut buffer = vec![0u8; 256 * 1024];
    let mut map = U8Map::with_default_config(&mut buffer).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let pairs = random_pairs(&mut rng);
    for pair in &pairs {
        map.insert(&pair.key, &pair.value).unwrap();
    }
    let available = map.available_bytes();

    // Full drain and refill in the same order settles back into the same
    // records; the bump pointer must not move.
    for _ in 0..5 {
        for pair in &pairs {
            assert!(map.remove(&pair.key));
        }
        assert!(map.is_empty());
        for pair in &pairs {
            map.insert(&pair.key, &pair.value).unwrap();
        }
        assert_eq!(map.available_bytes(), available);
    }
    assert_eq!(map.len(), NUM_ITEMS);
}
