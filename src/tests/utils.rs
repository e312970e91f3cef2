//! Utility functions for tests

use crate::store::MemoryStore;

/// Creates `len` bytes whose values do not repeat with any small period,
/// so that misplaced chunks show up as content mismatches.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| ((i * 7 + i / 251) % 256) as u8)
        .collect()
}

/// Creates a MemoryStore holding a single file.
pub fn store_with_file(name: &str, data: &[u8]) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(name, data.to_vec());
    store
}

/// Installs a logger printing everything, once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}
