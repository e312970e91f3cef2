use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Result, SplitterError};
use crate::layout::{parse_part_index, part_file_name};
use crate::store::traits::PartStore;

#[derive(Debug, Default)]
struct MemoryFiles {
    files: BTreeMap<String, Arc<Mutex<Vec<u8>>>>,
    denied: HashSet<String>,
    size_limits: HashMap<String, u64>,
    failing_reads: HashSet<String>,
    failing_seeks: HashSet<String>,
    denied_opens: HashSet<String>,
}

/// An in-memory [`PartStore`], useful for tests.
///
/// Besides holding files in memory, the store can simulate failures such as
/// refusing to create or open a file, capping how many bytes a file accepts
/// (a full disk), or failing every read or seek of a file.
///
/// Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryFiles>>,
}

impl MemoryStore {
    /// Create an empty MemoryStore.
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, MemoryFiles> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds (or replaces) a file.
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files()
            .files
            .insert(name.into(), Arc::new(Mutex::new(data.into())));
    }

    /// Returns a copy of the contents of a file.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files().files.get(name).map(|data| contents(data))
    }

    /// Whether a file exists.
    pub fn contains(&self, name: &str) -> bool {
        self.files().files.contains_key(name)
    }

    /// Removes a file, returning its contents.
    pub fn remove(&self, name: &str) -> Option<Vec<u8>> {
        self.files().files.remove(name).map(|data| contents(&data))
    }

    /// Names of all files, sorted.
    pub fn names(&self) -> Vec<String> {
        self.files().files.keys().cloned().collect()
    }

    /// Makes every attempt to create `name` fail.
    pub fn deny_create(&self, name: impl Into<String>) {
        self.files().denied.insert(name.into());
    }

    /// Caps the size of `name` at `max_len` bytes; writes beyond it are short.
    pub fn limit_size(&self, name: impl Into<String>, max_len: u64) {
        self.files().size_limits.insert(name.into(), max_len);
    }

    /// Makes every read from `name` fail.
    pub fn fail_reads(&self, name: impl Into<String>) {
        self.files().failing_reads.insert(name.into());
    }

    /// Makes every seek within `name` fail.
    pub fn fail_seeks(&self, name: impl Into<String>) {
        self.files().failing_seeks.insert(name.into());
    }

    /// Makes every attempt to open an existing part `name` fail.
    pub fn deny_open(&self, name: impl Into<String>) {
        self.files().denied_opens.insert(name.into());
    }

    fn create(&self, name: &str) -> io::Result<MemoryFile> {
        let mut files = self.files();
        if files.denied.contains(name) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("creating {} is not allowed", name),
            ));
        }

        let data = Arc::new(Mutex::new(Vec::new()));
        files.files.insert(name.to_string(), data.clone());
        Ok(files.handle(name, data))
    }

    fn open(&self, name: &str) -> Option<MemoryFile> {
        let files = self.files();
        let data = files.files.get(name)?.clone();
        Some(files.handle(name, data))
    }

    fn open_part_named(&self, name: &str) -> Result<Option<MemoryFile>> {
        if self.files().denied_opens.contains(name) {
            return Err(SplitterError::OpenPart {
                name: self.describe(name),
                source: io::Error::new(
                    ErrorKind::PermissionDenied,
                    format!("opening {} is not allowed", name),
                ),
            });
        }
        Ok(self.open(name))
    }
}

impl MemoryFiles {
    fn handle(&self, name: &str, data: Arc<Mutex<Vec<u8>>>) -> MemoryFile {
        MemoryFile {
            data,
            position: 0,
            max_len: self.size_limits.get(name).copied(),
            fail_reads: self.failing_reads.contains(name),
            fail_seeks: self.failing_seeks.contains(name),
        }
    }
}

impl PartStore for MemoryStore {
    type Source = MemoryFile;
    type Sink = MemoryFile;

    fn describe(&self, name: &str) -> String {
        format!("memory:{}", name)
    }

    fn open_source(&self, base_name: &str) -> Result<MemoryFile> {
        self.open(base_name).ok_or_else(|| SplitterError::OpenSource {
            name: self.describe(base_name),
            source: io::Error::new(ErrorKind::NotFound, "no such file"),
        })
    }

    fn create_part(&self, base_name: &str, index: usize) -> Result<MemoryFile> {
        let name = part_file_name(base_name, index);
        self.create(&name)
            .map_err(|source| SplitterError::CreatePart {
                name: self.describe(&name),
                source,
            })
    }

    fn open_part(&self, base_name: &str, index: usize) -> Result<Option<MemoryFile>> {
        self.open_part_named(&part_file_name(base_name, index))
    }

    fn open_part_for_append(&self, base_name: &str, index: usize) -> Result<Option<MemoryFile>> {
        self.open_part_named(&part_file_name(base_name, index))
    }

    fn create_destination(&self, base_name: &str) -> Result<MemoryFile> {
        self.create(base_name)
            .map_err(|source| SplitterError::CreateDestination {
                name: self.describe(base_name),
                source,
            })
    }

    fn part_indices(&self, base_name: &str) -> Result<Vec<usize>> {
        // Names are kept in a BTreeMap, which orders "x.10" before "x.2"
        let mut indices: Vec<usize> = self
            .files()
            .files
            .keys()
            .filter_map(|name| parse_part_index(base_name, name))
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }
}

fn lock(data: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

fn contents(data: &Mutex<Vec<u8>>) -> Vec<u8> {
    lock(data).clone()
}

/// A handle to a file of a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryFile {
    data: Arc<Mutex<Vec<u8>>>,
    position: u64,
    max_len: Option<u64>,
    fail_reads: bool,
    fail_seeks: bool,
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_reads {
            return Err(io::Error::new(ErrorKind::Other, "simulated read failure"));
        }

        let data = lock(&self.data);
        let start = (self.position as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        drop(data);

        self.position += n as u64;
        Ok(n)
    }
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let available = match self.max_len {
            Some(max_len) => max_len.saturating_sub(self.position) as usize,
            None => buf.len(),
        };
        let n = buf.len().min(available);
        if n == 0 {
            return Ok(0);
        }

        let mut data = lock(&self.data);
        let start = self.position as usize;
        let end = start + n;
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(&buf[..n]);
        drop(data);

        self.position = end as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.fail_seeks {
            return Err(io::Error::new(ErrorKind::Other, "simulated seek failure"));
        }

        let len = lock(&self.data).len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if target < 0 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                "seek to a negative position",
            ));
        }
        self.position = target as u64;
        Ok(self.position)
    }
}
