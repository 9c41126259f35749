//! Property tests over arbitrary elements and operation sequences.

use cuckoocraft::hash::Fingerprinter;
use cuckoocraft::{CuckooFilter, FilterConfig, Operation, Status, StdHasher};
use proptest::prelude::*;

fn elements(max: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..24), 0..max)
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Delete(u16),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (0u16..64).prop_map(Op::Insert),
            (0u16..64).prop_map(Op::Delete),
        ],
        0..200,
    )
}

proptest! {
    /// Every successfully inserted element is found.
    #[test]
    fn no_false_negatives(items in elements(300)) {
        let mut filter = CuckooFilter::new(128, 4, 16).unwrap();
        let statuses = filter.apply_batch(Operation::Insert, &items);

        for (item, status) in items.iter().zip(&statuses) {
            if *status == Status::Success {
                prop_assert!(filter.contains(item));
            }
        }
    }

    /// A rejected insert never changes the table.
    #[test]
    fn failed_insert_is_rolled_back(items in elements(80), seed in any::<u64>()) {
        let config = FilterConfig::new(8, 2, 8).with_seed(seed).with_max_kicks(20);
        let mut filter = CuckooFilter::with_config(config).unwrap();

        for item in &items {
            let before = filter.raw_slots().to_vec();
            let len = filter.len();
            if filter.insert(item) == Status::CapacityExceeded {
                prop_assert_eq!(filter.raw_slots(), &before[..]);
                prop_assert_eq!(filter.len(), len);
            }
        }
    }

    /// `alt_index` maps each candidate bucket to the other.
    #[test]
    fn alt_index_is_involution(
        log_m in 0u32..16,
        bits in 1u32..=32,
        index in any::<usize>(),
        fp in any::<u32>(),
    ) {
        let m = 1usize << log_m;
        let f = Fingerprinter::new(StdHasher::new(), &FilterConfig::new(m, 4, bits)).unwrap();
        let i = index & (m - 1);
        let j = f.alt_index(i, fp);
        prop_assert!(j < m);
        prop_assert_eq!(f.alt_index(j, fp), i);
    }

    /// Candidates always land in range with a non-zero fingerprint.
    #[test]
    fn candidates_in_range(item in proptest::collection::vec(any::<u8>(), 0..64), bits in 1u32..=32) {
        let f = Fingerprinter::new(StdHasher::new(), &FilterConfig::new(256, 4, bits)).unwrap();
        let c = f.candidates(&item);
        prop_assert!(c.fingerprint != 0);
        prop_assert!(bits == 32 || c.fingerprint < (1u32 << bits));
        prop_assert!(c.primary < 256 && c.alternate < 256);
        prop_assert_eq!(c.other(c.primary), c.alternate);
    }

    /// The counter tracks successful inserts minus successful deletes and
    /// always equals the occupied slot count.
    #[test]
    fn counter_matches_table(ops in ops()) {
        let mut filter = CuckooFilter::new(32, 4, 32).unwrap();
        let mut expected = 0usize;

        for op in ops {
            match op {
                Op::Insert(k) => {
                    if filter.insert(&k.to_le_bytes()) == Status::Success {
                        expected += 1;
                    }
                }
                Op::Delete(k) => {
                    if filter.delete(&k.to_le_bytes()) == Status::Success {
                        expected -= 1;
                    }
                }
            }
            prop_assert_eq!(filter.count(), expected);
            prop_assert_eq!(filter.table().occupied(), expected);
        }
    }

    /// Lookups are pure.
    #[test]
    fn lookup_is_idempotent(items in elements(100), probes in elements(50)) {
        let mut filter = CuckooFilter::new(64, 4, 12).unwrap();
        filter.apply_batch(Operation::Insert, &items);
        let slots = filter.raw_slots().to_vec();

        let first = filter.apply_batch(Operation::Lookup, &probes);
        let second = filter.apply_batch(Operation::Lookup, &probes);
        prop_assert_eq!(first, second);
        prop_assert_eq!(filter.raw_slots(), &slots[..]);
    }
}

#[cfg(feature = "serde")]
mod image {
    use super::*;
    use cuckoocraft::ZeroCopyCuckooFilter;

    proptest! {
        /// The binary image preserves slots, count and configuration.
        #[test]
        fn binary_image_preserves_state(items in elements(200), bits in 1u32..=32) {
            let mut filter = CuckooFilter::new(64, 4, bits).unwrap();
            filter.apply_batch(Operation::Insert, &items);

            let bytes = ZeroCopyCuckooFilter::serialize(&filter);
            let restored = ZeroCopyCuckooFilter::deserialize(&bytes).unwrap();
            prop_assert_eq!(restored.raw_slots(), filter.raw_slots());
            prop_assert_eq!(restored.count(), filter.count());
            prop_assert_eq!(restored.config(), filter.config());
        }

        /// Any single corrupted header byte is rejected or decodes to a
        /// valid filter; decoding never panics.
        #[test]
        fn corrupted_header_never_panics(pos in 0usize..32, value in any::<u8>()) {
            let mut filter = CuckooFilter::new(16, 4, 16).unwrap();
            filter.insert("anchor");
            let mut bytes = ZeroCopyCuckooFilter::serialize(&filter);
            bytes[pos] = value;

            if let Ok(decoded) = ZeroCopyCuckooFilter::deserialize(&bytes) {
                prop_assert_eq!(decoded.count(), decoded.table().occupied());
            }
        }
    }
}
