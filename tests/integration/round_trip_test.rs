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

//! Integration tests for splitting and merging real files.
//!
//! These tests verify that a file split into parts on disk can be merged
//! back into the exact original bytes.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tempfile::tempdir;

use splitter::constants::TRANSFER_BUFFER_SIZE;
use splitter::error::Result;
use splitter::store::FileStore;
use splitter::{merge_files, split_file, MergeConfig, Merger, SplitConfig, SplitOutcome, Splitter};

/// Helper function to write `len` random bytes to `dir/name`.
fn write_random_file(dir: &Path, name: &str, len: usize, seed: u64) -> Result<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);

    fs::write(dir.join(name), &data)?;
    Ok(data)
}

/// Helper function to collect the sizes of all parts of `name`, in index order.
fn part_sizes(dir: &Path, name: &str) -> Vec<u64> {
    let mut sizes = Vec::new();
    while let Ok(meta) = fs::metadata(dir.join(format!("{}.{}", name, sizes.len()))) {
        sizes.push(meta.len());
    }
    sizes
}

/// Test the round trip for lengths around the part size and the buffer size.
#[test]
fn test_split_merge_round_trip() -> Result<()> {
    let cases: [(usize, u64); 6] = [
        (150, 100),
        (1000, 1),
        (4096, 1024),
        (TRANSFER_BUFFER_SIZE * 3 + 17, TRANSFER_BUFFER_SIZE as u64),
        (TRANSFER_BUFFER_SIZE * 2 + 1, (TRANSFER_BUFFER_SIZE * 2) as u64),
        (1_000_003, 250_000),
    ];

    for (seed, (len, max)) in cases.iter().enumerate() {
        // Fresh directory per case
        let temp_dir = tempdir()?;
        let dir = temp_dir.path();
        let data = write_random_file(dir, "blob.bin", *len, seed as u64)?;

        // Split the file
        let outcome = split_file(dir, "blob.bin", *max)?;
        let expected_parts = (*len as u64).div_ceil(*max) as usize;
        assert_eq!(outcome.part_count(), expected_parts, "len {} max {}", len, max);

        // Every part but the last is full, the last holds the remainder
        let sizes = part_sizes(dir, "blob.bin");
        assert_eq!(sizes.len(), expected_parts);
        for size in &sizes[..sizes.len() - 1] {
            assert_eq!(*size, *max);
        }
        let remainder = *len as u64 % *max;
        let expected_last = if remainder == 0 { *max } else { remainder };
        assert_eq!(*sizes.last().unwrap(), expected_last);

        // Remove the original and merge the parts back
        fs::remove_file(dir.join("blob.bin"))?;
        let merged = merge_files(dir, "blob.bin", true)?;
        assert_eq!(merged.parts_merged, expected_parts);
        assert_eq!(merged.bytes_appended, *len as u64);

        // Validate the content
        assert_eq!(fs::read(dir.join("blob.bin"))?, data, "content mismatch for len {}", len);
    }

    Ok(())
}

/// Test the round trip when the parts are appended onto the first part.
#[test]
fn test_round_trip_by_appending_to_first_part() -> Result<()> {
    let temp_dir = tempdir()?;
    let dir = temp_dir.path();
    let data = write_random_file(dir, "video.mp4", 300_000, 42)?;

    // Use a small buffer to force many chunks per part
    let splitter = Splitter::with_config(
        FileStore::new(dir),
        SplitConfig::new(70_000).with_buffer_size(4096),
    );
    let outcome = splitter.split("video.mp4")?;
    assert_eq!(outcome.part_count(), 5);

    // Merge in place, part 0 becomes the whole file
    let merger = Merger::with_config(FileStore::new(dir), MergeConfig::new(false));
    let merged = merger.merge("video.mp4")?;
    assert_eq!(merged.parts_merged, 5);
    assert_eq!(merged.bytes_appended, 300_000 - 70_000);

    assert_eq!(fs::read(dir.join("video.mp4.0"))?, data);

    Ok(())
}

/// Test that random lengths and part sizes all survive the round trip.
#[test]
fn test_random_round_trips() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);

    for round in 0..20 {
        let temp_dir = tempdir()?;
        let dir = temp_dir.path();

        let len = rng.gen_range(2..200_000usize);
        let max = rng.gen_range(1..len as u64);
        let data = write_random_file(dir, "random", len, round)?;

        split_file(dir, "random", max)?;
        merge_files(dir, "random", true)?;

        assert_eq!(fs::read(dir.join("random"))?, data, "round {}: len {} max {}", round, len, max);
    }

    Ok(())
}

/// Test that a file which already fits into one part is left alone.
#[test]
fn test_no_split_needed() -> Result<()> {
    let temp_dir = tempdir()?;
    let dir = temp_dir.path();
    write_random_file(dir, "notes.txt", 100, 1)?;

    // Part size equal to the file size
    let outcome = split_file(dir, "notes.txt", 100)?;
    assert_eq!(outcome, SplitOutcome::Unchanged { source_len: 100 });

    // Part size larger than the file size
    let outcome = split_file(dir, "notes.txt", 1 << 20)?;
    assert_eq!(outcome.part_count(), 0);

    assert!(part_sizes(dir, "notes.txt").is_empty());
    Ok(())
}

/// Test that a merge never crosses a missing part.
#[test]
fn test_merge_stops_at_missing_part() -> Result<()> {
    let temp_dir = tempdir()?;
    let dir = temp_dir.path();
    fs::write(dir.join("data.0"), b"zero ")?;
    fs::write(dir.join("data.1"), b"one ")?;
    fs::write(dir.join("data.3"), b"three")?;

    let outcome = merge_files(dir, "data", true)?;

    assert_eq!(outcome.parts_merged, 2);
    assert_eq!(outcome.orphaned_parts, vec![3]);
    assert_eq!(fs::read(dir.join("data"))?, b"zero one ");
    Ok(())
}
