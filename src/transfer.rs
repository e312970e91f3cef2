//! Fixed-capacity buffer used to stream bytes between files.
//!
//! One `TransferBuffer` is allocated per split or merge and reused for every
//! read and write of that operation.

use std::io::{ErrorKind, Read, Write};

use bytes::BytesMut;
use log::{trace, warn};

use crate::constants::TRANSFER_BUFFER_SIZE;
use crate::error::{Result, SplitterError};

/// A reusable streaming buffer.
#[derive(Debug)]
pub struct TransferBuffer {
    buffer: BytesMut,
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self {
            buffer: BytesMut::zeroed(TRANSFER_BUFFER_SIZE),
        }
    }
}

impl TransferBuffer {
    /// Creates a buffer with the default capacity of 64 KiB.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SplitterError::InvalidConfig(
                "transfer buffer capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            buffer: BytesMut::zeroed(capacity),
        })
    }

    /// Capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Copies exactly `len` bytes from `source` to `sink`.
    ///
    /// Each chunk of at most [`capacity`](Self::capacity) bytes is read fully
    /// before it is written. The source running dry before `len` bytes have
    /// been read is a [`SplitterError::ShortRead`].
    pub fn copy_exact<R, W>(&mut self, source: &mut R, sink: &mut W, len: u64) -> Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut copied = 0u64;

        while copied < len {
            let chunk = (len - copied).min(self.capacity() as u64) as usize;
            let buf = &mut self.buffer[..chunk];

            let filled = fill(source, buf)?;
            if filled < chunk {
                return Err(SplitterError::ShortRead {
                    expected: len,
                    actual: copied + filled as u64,
                });
            }
            trace!("read {} of {} bytes", chunk, len - copied);

            sink.write_all(buf).map_err(SplitterError::Write)?;
            copied += chunk as u64;
        }

        Ok(copied)
    }

    /// Copies `source` to `sink` until `source` reports end of stream.
    ///
    /// A failing read ends the copy like an end of stream does; only write
    /// failures are errors. Returns the number of bytes copied.
    pub fn copy_to_end<R, W>(&mut self, source: &mut R, sink: &mut W) -> Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut copied = 0u64;

        loop {
            let read = match source.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("read failed after {} bytes, treating as end of part: {}", copied, e);
                    break;
                }
            };

            sink.write_all(&self.buffer[..read])
                .map_err(SplitterError::Write)?;
            copied += read as u64;
        }

        Ok(copied)
    }
}

/// Reads into `buf` until it is full or the source is exhausted.
fn fill<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SplitterError::Read(e)),
        }
    }
    Ok(filled)
}
