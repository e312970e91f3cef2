use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, SplitterError};
use crate::layout::part_file_name;
use crate::store::traits::PartStore;
use crate::store::utils::find_part_indices;

/// A [`PartStore`] backed by a directory on disk.
///
/// The file being split, its parts and the merge destination all live in the
/// same directory: splitting `dir/video.mp4` creates `dir/video.mp4.0`,
/// `dir/video.mp4.1`, and so on.
///
/// # Example
/// ```no_run
/// use splitter::store::{FileStore, PartStore};
///
/// let store = FileStore::new("/tmp/uploads");
/// let part = store.create_part("video.mp4", 0).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the base file and its parts
    dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore over the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store operates in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn open_existing(&self, name: &str, options: &OpenOptions) -> Result<Option<File>> {
        let path = self.path_of(name);
        match options.open(&path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist", path.display());
                Ok(None)
            }
            Err(source) => Err(SplitterError::OpenPart {
                name: path.display().to_string(),
                source,
            }),
        }
    }
}

fn create(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl PartStore for FileStore {
    type Source = File;
    type Sink = File;

    fn describe(&self, name: &str) -> String {
        self.path_of(name).display().to_string()
    }

    fn open_source(&self, base_name: &str) -> Result<File> {
        let path = self.path_of(base_name);
        File::open(&path).map_err(|source| SplitterError::OpenSource {
            name: path.display().to_string(),
            source,
        })
    }

    fn create_part(&self, base_name: &str, index: usize) -> Result<File> {
        let path = self.path_of(&part_file_name(base_name, index));
        create(&path).map_err(|source| SplitterError::CreatePart {
            name: path.display().to_string(),
            source,
        })
    }

    fn open_part(&self, base_name: &str, index: usize) -> Result<Option<File>> {
        self.open_existing(
            &part_file_name(base_name, index),
            OpenOptions::new().read(true),
        )
    }

    fn open_part_for_append(&self, base_name: &str, index: usize) -> Result<Option<File>> {
        self.open_existing(
            &part_file_name(base_name, index),
            OpenOptions::new().read(true).write(true),
        )
    }

    fn create_destination(&self, base_name: &str) -> Result<File> {
        let path = self.path_of(base_name);
        create(&path).map_err(|source| SplitterError::CreateDestination {
            name: path.display().to_string(),
            source,
        })
    }

    fn part_indices(&self, base_name: &str) -> Result<Vec<usize>> {
        find_part_indices(&self.dir, base_name)
    }
}
