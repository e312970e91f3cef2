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

//! Part naming and part boundary planning.
//!
//! A source of `L` bytes split with a maximum part size `M` (where `M < L`)
//! produces `ceil(L / M)` parts. Every part holds exactly `M` bytes except the
//! last one, which holds the remaining `L - (N - 1) * M` bytes. When `L` is an
//! exact multiple of `M` the last part is a full part; no empty trailing part
//! is ever planned.

use crate::constants::PART_INDEX_SEPARATOR;
use crate::error::{Result, SplitterError};

/// Returns the file name of part `index` of `base_name`, e.g. `data.bin.2`.
pub fn part_file_name(base_name: &str, index: usize) -> String {
    format!("{}{}{}", base_name, PART_INDEX_SEPARATOR, index)
}

/// Parses the part index out of a file name produced by [`part_file_name`].
///
/// Only plain decimal indices are accepted: `data.bin.007` or `data.bin.x`
/// are not parts of `data.bin`.
pub fn parse_part_index(base_name: &str, file_name: &str) -> Option<usize> {
    let suffix = file_name
        .strip_prefix(base_name)?
        .strip_prefix(PART_INDEX_SEPARATOR)?;

    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if suffix.len() > 1 && suffix.starts_with('0') {
        return None;
    }
    suffix.parse().ok()
}

/// The byte range of the source covered by one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpan {
    /// Zero-based index of the part.
    pub index: usize,

    /// Offset of the first byte of the part within the source.
    pub offset: u64,

    /// Number of bytes in the part.
    pub len: u64,
}

impl PartSpan {
    /// Offset one past the last byte of the part.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// The planned layout of all parts of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    source_len: u64,
    max_part_size: u64,
    part_count: u64,
}

impl PartPlan {
    /// Plans the parts of a source of `source_len` bytes.
    ///
    /// Fails if `max_part_size` is zero.
    pub fn new(source_len: u64, max_part_size: u64) -> Result<Self> {
        if max_part_size == 0 {
            return Err(SplitterError::InvalidPartSize(
                "maximum bytes per part must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            source_len,
            max_part_size,
            part_count: source_len.div_ceil(max_part_size),
        })
    }

    /// Whether the whole source already fits into a single part.
    pub fn fits_in_one_part(&self) -> bool {
        self.max_part_size >= self.source_len
    }

    /// Number of parts the source is split into.
    pub fn part_count(&self) -> u64 {
        self.part_count
    }

    /// Size of the last part.
    pub fn last_part_len(&self) -> u64 {
        if self.part_count == 0 {
            return 0;
        }
        self.source_len - (self.part_count - 1) * self.max_part_size
    }

    /// Returns the span of part `index`, or `None` past the last part.
    pub fn span(&self, index: usize) -> Option<PartSpan> {
        let i = index as u64;
        if i >= self.part_count {
            return None;
        }

        let len = if i == self.part_count - 1 {
            self.last_part_len()
        } else {
            self.max_part_size
        };

        Some(PartSpan {
            index,
            offset: i * self.max_part_size,
            len,
        })
    }

    /// Iterates over all part spans in index order.
    pub fn spans(&self) -> impl Iterator<Item = PartSpan> + '_ {
        (0..self.part_count as usize).filter_map(move |i| self.span(i))
    }
}
