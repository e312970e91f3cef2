use std::io::{Read, Seek, Write};

use crate::error::Result;

/// The filesystem seen by the splitter and the merger.
///
/// A store knows how to open the file being split, how to create and find
/// numbered part files, and how to produce the destination of a merge. Files
/// are released when the returned handles are dropped.
pub trait PartStore {
    /// Handle used to read the source and the parts.
    type Source: Read + Seek;

    /// Handle used to write parts and the merge destination.
    type Sink: Write + Seek;

    /// Returns a human readable location of `name`, used in logs and errors.
    fn describe(&self, name: &str) -> String;

    /// Opens the file named `base_name` for reading.
    fn open_source(&self, base_name: &str) -> Result<Self::Source>;

    /// Creates (or truncates) part `index` of `base_name` for writing.
    fn create_part(&self, base_name: &str, index: usize) -> Result<Self::Sink>;

    /// Opens part `index` of `base_name` for reading.
    ///
    /// # Returns
    /// - Ok(Some(source)) if the part exists
    /// - Ok(None) if there is no such part
    /// - Err(...) if the part exists but could not be opened
    fn open_part(&self, base_name: &str, index: usize) -> Result<Option<Self::Source>>;

    /// Opens part `index` of `base_name` so that data can be appended to it.
    ///
    /// Returns Ok(None) if there is no such part.
    fn open_part_for_append(&self, base_name: &str, index: usize) -> Result<Option<Self::Sink>>;

    /// Creates (or truncates) the file named `base_name` for writing.
    fn create_destination(&self, base_name: &str) -> Result<Self::Sink>;

    /// Returns the indices of all existing parts of `base_name`, sorted.
    fn part_indices(&self, base_name: &str) -> Result<Vec<usize>>;
}
