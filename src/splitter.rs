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

//! Splitting a file into numbered parts.
//!
//! The splitter reads a source file and writes it out as a sequence of part
//! files named `<base>.0`, `<base>.1`, ..., each holding at most
//! `max_part_size` bytes. See [`crate::layout`] for how part boundaries are
//! computed.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, error, info, trace, warn};

use crate::constants::{DEFAULT_MAX_PART_SIZE, MAX_SUPPORTED_PARTS, TRANSFER_BUFFER_SIZE};
use crate::error::{Result, SplitterError};
use crate::layout::{PartPlan, PartSpan};
use crate::store::{FileStore, PartStore};
use crate::transfer::TransferBuffer;

/// Configuration options for a Splitter.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Maximum size of a part in bytes (default: 49 MiB).
    pub max_part_size: u64,

    /// Capacity of the transfer buffer in bytes (default: 64 KiB).
    pub buffer_size: usize,

    /// Maximum number of parts a split may produce (default: 100,000).
    ///
    /// Splits that would need more parts are refused before any part is
    /// written, since a merge would not find the parts beyond this limit.
    pub max_parts: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_part_size: DEFAULT_MAX_PART_SIZE,
            buffer_size: TRANSFER_BUFFER_SIZE,
            max_parts: MAX_SUPPORTED_PARTS,
        }
    }
}

impl SplitConfig {
    /// Create a new configuration with the given maximum part size.
    pub fn new(max_part_size: u64) -> Self {
        Self {
            max_part_size,
            ..Default::default()
        }
    }

    /// Set the transfer buffer capacity
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the maximum number of parts
    pub fn with_max_parts(mut self, max_parts: usize) -> Self {
        self.max_parts = max_parts;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_part_size == 0 {
            return Err(SplitterError::InvalidPartSize(
                "maximum bytes per part must be greater than zero".to_string(),
            ));
        }
        if self.max_parts == 0 {
            return Err(SplitterError::InvalidConfig(
                "maximum number of parts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// The result of a successful split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The source already fits into a single part; no part files were created.
    Unchanged {
        /// Size of the source in bytes.
        source_len: u64,
    },

    /// The source was written out as parts.
    Split {
        /// Size of the source in bytes.
        source_len: u64,

        /// The parts that were written, in index order.
        parts: Vec<PartSpan>,
    },
}

impl SplitOutcome {
    /// Size of the source in bytes.
    pub fn source_len(&self) -> u64 {
        match self {
            SplitOutcome::Unchanged { source_len } => *source_len,
            SplitOutcome::Split { source_len, .. } => *source_len,
        }
    }

    /// Number of part files written.
    pub fn part_count(&self) -> usize {
        match self {
            SplitOutcome::Unchanged { .. } => 0,
            SplitOutcome::Split { parts, .. } => parts.len(),
        }
    }
}

/// Splits files of a [`PartStore`] into parts.
///
/// # Example
///
/// ```no_run
/// use splitter::splitter::{Splitter, SplitOutcome};
/// use splitter::store::FileStore;
///
/// let splitter = Splitter::new(FileStore::new("/tmp/uploads"), 10 * 1024 * 1024);
///
/// match splitter.split("video.mp4").unwrap() {
///     SplitOutcome::Unchanged { .. } => println!("small enough already"),
///     SplitOutcome::Split { parts, .. } => println!("wrote {} parts", parts.len()),
/// }
/// ```
pub struct Splitter<S: PartStore> {
    /// Where the source is read from and the parts are written to.
    store: S,

    /// Configuration for the splitter.
    config: SplitConfig,
}

impl<S: PartStore> Splitter<S> {
    /// Creates a new Splitter producing parts of at most `max_part_size` bytes.
    pub fn new(store: S, max_part_size: u64) -> Self {
        Self::with_config(store, SplitConfig::new(max_part_size))
    }

    /// Creates a new Splitter with custom configuration.
    pub fn with_config(store: S, config: SplitConfig) -> Self {
        Self { store, config }
    }

    /// The store this splitter operates on.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration of this splitter.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits the file named `base_name` into parts.
    ///
    /// Nothing is written when the whole file fits into a single part. Any
    /// failure aborts the split; parts written before the failure are left
    /// in place.
    pub fn split(&self, base_name: &str) -> Result<SplitOutcome> {
        self.config.validate()?;
        let mut buffer = TransferBuffer::with_capacity(self.config.buffer_size)?;

        let mut source = self
            .store
            .open_source(base_name)
            .inspect_err(|e| error!("{}", e))?;

        let source_len = source_len(&mut source, &self.store.describe(base_name));
        let plan = PartPlan::new(source_len, self.config.max_part_size)?;

        if plan.fits_in_one_part() {
            trace!(
                "not splitting {}: {} bytes, max bytes per part: {}",
                base_name,
                source_len,
                self.config.max_part_size
            );
            return Ok(SplitOutcome::Unchanged { source_len });
        }

        if plan.part_count() > self.config.max_parts as u64 {
            return Err(SplitterError::TooManyParts {
                required: plan.part_count(),
                limit: self.config.max_parts,
            });
        }

        info!(
            "Splitting {} ({} bytes) into {} parts of at most {} bytes",
            base_name,
            source_len,
            plan.part_count(),
            self.config.max_part_size
        );

        let mut parts = Vec::with_capacity(plan.part_count() as usize);
        for span in plan.spans() {
            if let Err(e) = self.write_part(&mut source, base_name, span, &mut buffer) {
                error!("Split of {} aborted: {}", base_name, e);
                return Err(e);
            }
            parts.push(span);
        }

        Ok(SplitOutcome::Split { source_len, parts })
    }

    /// Copies the bytes of `span` from the source into a new part file.
    fn write_part(
        &self,
        source: &mut S::Source,
        base_name: &str,
        span: PartSpan,
        buffer: &mut TransferBuffer,
    ) -> Result<()> {
        let mut sink = self.store.create_part(base_name, span.index)?;

        source
            .seek(SeekFrom::Start(span.offset))
            .map_err(|e| SplitterError::Read(e).in_part(span.index))?;

        copy_part(source, &mut sink, span, buffer)?;

        debug!(
            "Wrote part {} ({} bytes at offset {})",
            span.index, span.len, span.offset
        );
        Ok(())
    }
}

fn copy_part<R, W>(
    source: &mut R,
    sink: &mut W,
    span: PartSpan,
    buffer: &mut TransferBuffer,
) -> Result<()>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    buffer
        .copy_exact(source, sink, span.len)
        .map_err(|e| e.in_part(span.index))?;
    sink.flush()
        .map_err(|e| SplitterError::Write(e).in_part(span.index))
}

/// Returns the length of `source` by seeking to its end.
///
/// A source whose end cannot be found is treated as empty.
fn source_len<R: Seek + ?Sized>(source: &mut R, name: &str) -> u64 {
    match source.seek(SeekFrom::End(0)) {
        Ok(len) => len,
        Err(e) => {
            warn!("Could not determine the size of {}, assuming 0 bytes: {}", name, e);
            0
        }
    }
}

/// Splits `dir/base_name` into parts `dir/base_name.0`, `dir/base_name.1`, ...
/// of at most `max_part_size` bytes each.
pub fn split_file(
    dir: impl AsRef<Path>,
    base_name: &str,
    max_part_size: u64,
) -> Result<SplitOutcome> {
    Splitter::new(FileStore::new(dir.as_ref()), max_part_size).split(base_name)
}
