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

//! Constants shared by the splitter and the merger.

/// Capacity of the transfer buffer in bytes (64 KiB).
pub const TRANSFER_BUFFER_SIZE: usize = 1 << 16;

/// Highest number of parts a split may produce and a merge will scan for.
pub const MAX_SUPPORTED_PARTS: usize = 100_000;

/// Default maximum size of a single part in bytes (49 MiB).
pub const DEFAULT_MAX_PART_SIZE: u64 = 49 * 1024 * 1024;

/// Separator between the base name and the part index, as in `archive.bin.3`.
pub const PART_INDEX_SEPARATOR: char = '.';
