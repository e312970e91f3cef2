//! Property-based tests for splitting and merging.
//!
//! Uses proptest to check the round trip and the part sizing rules over
//! random contents, lengths and part sizes, against an in-memory store.

use proptest::prelude::*;

use splitter::store::MemoryStore;
use splitter::{MergeConfig, Merger, SplitConfig, SplitOutcome, Splitter};

/// Strategy for file contents with at least two bytes, so that some part size
/// smaller than the file exists.
fn arb_contents() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 2..4096)
}

/// Strategy for contents together with a part size smaller than them.
fn arb_split_case() -> impl Strategy<Value = (Vec<u8>, u64)> {
    arb_contents().prop_flat_map(|data| {
        let len = data.len() as u64;
        (Just(data), 1..len)
    })
}

proptest! {
    #[test]
    fn prop_round_trip((data, max) in arb_split_case(), buffer_size in 1usize..512) {
        let store = MemoryStore::new();
        store.insert("file", data.clone());

        let splitter = Splitter::with_config(
            store.clone(),
            SplitConfig::new(max).with_buffer_size(buffer_size),
        );
        splitter.split("file").unwrap();
        store.remove("file");

        let merger = Merger::with_config(
            store.clone(),
            MergeConfig::default().with_buffer_size(buffer_size),
        );
        let outcome = merger.merge("file").unwrap();

        prop_assert_eq!(outcome.bytes_appended, data.len() as u64);
        prop_assert_eq!(store.get("file").unwrap(), data);
    }

    #[test]
    fn prop_part_sizes((data, max) in arb_split_case()) {
        let store = MemoryStore::new();
        store.insert("file", data.clone());

        let outcome = Splitter::new(store.clone(), max).split("file").unwrap();
        let len = data.len() as u64;
        let count = outcome.part_count();

        prop_assert_eq!(count as u64, len.div_ceil(max));
        for i in 0..count - 1 {
            prop_assert_eq!(store.get(&format!("file.{}", i)).unwrap().len() as u64, max);
        }

        let last = store.get(&format!("file.{}", count - 1)).unwrap().len() as u64;
        let expected_last = if len % max == 0 { max } else { len % max };
        prop_assert_eq!(last, expected_last);
        let next_part = format!("file.{}", count);
        prop_assert!(!store.contains(&next_part));
    }

    #[test]
    fn prop_no_split_when_part_size_covers_file(
        data in prop::collection::vec(any::<u8>(), 0..1024),
        extra in 0u64..100,
    ) {
        let store = MemoryStore::new();
        store.insert("file", data.clone());

        let max = data.len() as u64 + extra;
        prop_assume!(max > 0);

        let outcome = Splitter::new(store.clone(), max).split("file").unwrap();

        prop_assert_eq!(outcome, SplitOutcome::Unchanged { source_len: data.len() as u64 });
        prop_assert_eq!(store.names(), vec!["file".to_string()]);
    }
}
