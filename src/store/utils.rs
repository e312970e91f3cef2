use std::path::Path;

use glob::{glob, Pattern};
use log::warn;

use crate::constants::PART_INDEX_SEPARATOR;
use crate::error::{Result, SplitterError};
use crate::layout::parse_part_index;

/// Helper function to find the indices of all parts of `base_name` in a directory.
///
/// `base_name` may name a file in a subdirectory, e.g. `incoming/data.bin`;
/// parts are then looked up next to it.
pub(crate) fn find_part_indices(dir: &Path, base_name: &str) -> Result<Vec<usize>> {
    let base_path = dir.join(base_name);
    let (Some(parent), Some(file_name)) = (
        base_path.parent(),
        base_path.file_name().and_then(|name| name.to_str()),
    ) else {
        return Ok(Vec::new());
    };

    let glob_pattern = format!("{}{}*", Pattern::escape(file_name), PART_INDEX_SEPARATOR);
    let pattern = Path::new(&Pattern::escape(&parent.to_string_lossy())).join(glob_pattern);
    let pattern_str = pattern.to_string_lossy();

    let mut indices = Vec::new();

    for entry in glob(&pattern_str)
        .map_err(|e| SplitterError::InvalidConfig(format!("Invalid glob pattern: {}", e)))?
    {
        match entry {
            Ok(path) => {
                let index = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| parse_part_index(file_name, name));
                if let Some(index) = index {
                    indices.push(index);
                }
            }
            Err(e) => warn!("Error with glob entry: {}", e),
        }
    }

    // Glob yields paths in lexical order, so "x.10" would come before "x.2"
    indices.sort_unstable();

    Ok(indices)
}
