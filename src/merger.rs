// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Merging numbered parts back into a single file.
//!
//! Parts are looked up by index, starting at 0, and appended to the
//! destination in that order. The first missing index ends the merge; parts
//! found beyond such a gap are reported but never merged.

use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use crate::constants::{MAX_SUPPORTED_PARTS, TRANSFER_BUFFER_SIZE};
use crate::error::{Result, SplitterError};
use crate::layout::part_file_name;
use crate::store::{FileStore, PartStore};
use crate::transfer::TransferBuffer;

/// Configuration options for a Merger.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Whether to write into a newly created `<base>` file (default: true).
    ///
    /// When false, part 0 becomes the destination and the remaining parts are
    /// appended to it in place.
    pub create_new_file: bool,

    /// Capacity of the transfer buffer in bytes (default: 64 KiB).
    pub buffer_size: usize,

    /// Highest number of parts to look for (default: 100,000).
    pub max_parts: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            create_new_file: true,
            buffer_size: TRANSFER_BUFFER_SIZE,
            max_parts: MAX_SUPPORTED_PARTS,
        }
    }
}

impl MergeConfig {
    /// Create a new configuration with the given destination mode
    pub fn new(create_new_file: bool) -> Self {
        Self {
            create_new_file,
            ..Default::default()
        }
    }

    /// Set the transfer buffer capacity
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the highest number of parts to look for
    pub fn with_max_parts(mut self, max_parts: usize) -> Self {
        self.max_parts = max_parts;
        self
    }
}

/// The result of a successful merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Number of parts whose contents ended up in the destination.
    pub parts_merged: usize,

    /// Number of bytes appended to the destination.
    pub bytes_appended: u64,

    /// Indices of parts that exist past the first missing index.
    pub orphaned_parts: Vec<usize>,
}

/// Merges the parts of a [`PartStore`] back into a single file.
///
/// # Example
///
/// ```no_run
/// use splitter::merger::{MergeConfig, Merger};
/// use splitter::store::FileStore;
///
/// // Append parts 1, 2, ... onto part 0 instead of creating "video.mp4"
/// let merger = Merger::with_config(FileStore::new("/tmp/uploads"), MergeConfig::new(false));
/// let outcome = merger.merge("video.mp4").unwrap();
/// println!("merged {} parts", outcome.parts_merged);
/// ```
pub struct Merger<S: PartStore> {
    /// Where the parts are read from and the destination is written to.
    store: S,

    /// Configuration for the merger.
    config: MergeConfig,
}

impl<S: PartStore> Merger<S> {
    /// Creates a new Merger that writes into a newly created `<base>` file.
    pub fn new(store: S) -> Self {
        Self::with_config(store, MergeConfig::default())
    }

    /// Creates a new Merger with custom configuration.
    pub fn with_config(store: S, config: MergeConfig) -> Self {
        Self { store, config }
    }

    /// The store this merger operates on.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merges the parts of `base_name`.
    ///
    /// A write failure aborts the merge and leaves the destination partially
    /// merged.
    pub fn merge(&self, base_name: &str) -> Result<MergeOutcome> {
        if self.config.max_parts == 0 {
            return Err(SplitterError::InvalidConfig(
                "maximum number of parts must be greater than zero".to_string(),
            ));
        }
        let mut buffer = TransferBuffer::with_capacity(self.config.buffer_size)?;
        let mut outcome = MergeOutcome::default();

        let (mut destination, first_index) = if self.config.create_new_file {
            let destination = self
                .store
                .create_destination(base_name)
                .inspect_err(|e| error!("{}", e))?;
            (destination, 0)
        } else {
            match self.store.open_part_for_append(base_name, 0)? {
                // Part 0 is the destination, so it is already merged
                Some(first) => {
                    outcome.parts_merged = 1;
                    (first, 1)
                }
                None => {
                    info!("{} does not exist, nothing to merge", self.part_name(base_name, 0));
                    outcome.orphaned_parts = self.orphaned_parts(base_name, 0);
                    return Ok(outcome);
                }
            }
        };

        let mut index = first_index;
        while index < self.config.max_parts {
            let Some(mut part) = self.store.open_part(base_name, index)? else {
                info!("{} does not exist", self.part_name(base_name, index));
                break;
            };

            // Always append at the end of the destination
            destination
                .seek(SeekFrom::End(0))
                .map_err(|e| SplitterError::Write(e).in_part(index))?;

            let copied = match buffer.copy_to_end(&mut part, &mut destination) {
                Ok(copied) => copied,
                Err(e) => {
                    let e = e.in_part(index);
                    error!("Merge of {} aborted: {}", base_name, e);
                    return Err(e);
                }
            };
            debug!("Appended part {} ({} bytes)", index, copied);

            outcome.parts_merged += 1;
            outcome.bytes_appended += copied;
            index += 1;
        }

        destination.flush().map_err(SplitterError::Write)?;

        outcome.orphaned_parts = self.orphaned_parts(base_name, index);
        if !outcome.orphaned_parts.is_empty() {
            warn!(
                "Ignored {} parts of {} from index {} on: {:?}",
                outcome.orphaned_parts.len(),
                base_name,
                index,
                outcome.orphaned_parts
            );
        }

        info!(
            "Merged {} parts of {} ({} bytes appended)",
            outcome.parts_merged, base_name, outcome.bytes_appended
        );
        Ok(outcome)
    }

    fn part_name(&self, base_name: &str, index: usize) -> String {
        self.store.describe(&part_file_name(base_name, index))
    }

    /// Existing parts at or after `first_unmerged`, which the merge never reached.
    fn orphaned_parts(&self, base_name: &str, first_unmerged: usize) -> Vec<usize> {
        match self.store.part_indices(base_name) {
            Ok(indices) => indices.into_iter().filter(|&i| i >= first_unmerged).collect(),
            Err(e) => {
                warn!("Could not list the parts of {}: {}", base_name, e);
                Vec::new()
            }
        }
    }
}

/// Merges the parts `dir/base_name.0`, `dir/base_name.1`, ... of a file.
///
/// With `create_new_file` the parts are written into a new `dir/base_name`;
/// otherwise they are appended onto `dir/base_name.0`.
pub fn merge_files(
    dir: impl AsRef<Path>,
    base_name: &str,
    create_new_file: bool,
) -> Result<MergeOutcome> {
    let store = FileStore::new(dir.as_ref());
    Merger::with_config(store, MergeConfig::new(create_new_file)).merge(base_name)
}
