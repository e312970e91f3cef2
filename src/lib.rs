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

//! Splitter cuts a file into fixed-size numbered parts and merges them back.
//!
//! Splitting `dir/archive.tar` with a maximum part size of `M` bytes produces
//! `dir/archive.tar.0`, `dir/archive.tar.1`, ..., where every part but the
//! last holds exactly `M` bytes. Merging concatenates the parts in index
//! order, either into a new `dir/archive.tar` or onto `dir/archive.tar.0`.
//!
//! ```no_run
//! use splitter::{merge_files, split_file};
//!
//! split_file("/tmp/outbox", "archive.tar", 1024 * 1024).unwrap();
//! merge_files("/tmp/outbox", "archive.tar", true).unwrap();
//! ```

pub mod constants;
pub mod error;
pub mod layout;
pub mod merger;
pub mod splitter;
pub mod store;
pub mod transfer;


// Re-exports for a cleaner API
pub use error::{Result, SplitterError};
pub use merger::{merge_files, MergeConfig, MergeOutcome, Merger};
pub use splitter::{split_file, SplitConfig, SplitOutcome, Splitter};
