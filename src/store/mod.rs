//! Storage backends for source files, part files and merge destinations.
//!
//! The splitter and the merger never touch the filesystem directly; they go
//! through a [`PartStore`]. [`FileStore`] works on a directory on disk and
//! [`MemoryStore`] keeps everything in memory.

mod file_store;
mod memory_store;
mod traits;
mod utils;

// Re-export the main types for easier access
pub use file_store::FileStore;
pub use memory_store::{MemoryFile, MemoryStore};
pub use traits::PartStore;
