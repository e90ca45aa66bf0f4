//! Byte Reader: bounded, cursor-based access to one input file.
//!
//! Files are memory-mapped once and every read copies out of the mapping
//! into a `Bytes`. All reads count against a per-file budget so a hostile
//! header cannot make the inspector walk an arbitrarily large file.

pub mod error;

use std::fs::File;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use memmap2::Mmap;
use tracing::{debug, trace, warn};

use crate::io::error::{IoError, Result};

/// Upper bounds applied to every opened file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IOLimits {
    /// Largest file that will be opened at all (bytes).
    pub max_file_size: u64,
    /// Total bytes a single reader may hand out over its lifetime.
    pub max_read_bytes: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 256 << 20,
            max_read_bytes: 256 << 20,
        }
    }
}

enum Backing {
    // memmap cannot map empty files.
    Empty,
    Mapped(Mmap),
    Memory(Bytes),
}

impl Backing {
    fn as_slice(&self) -> &[u8] {
        match self {
            Backing::Empty => &[],
            Backing::Mapped(map) => map,
            Backing::Memory(bytes) => bytes,
        }
    }
}

fn check_size(path: &Path, size: u64, limits: &IOLimits) -> Result<()> {
    if size > limits.max_file_size {
        warn!(
            path = %path.display(),
            size = size,
            limit = limits.max_file_size,
            "Refusing oversized file"
        );
        return Err(IoError::FileTooLarge {
            limit: limits.max_file_size,
            found: size,
        });
    }
    Ok(())
}

/// Seekable reader over a file or an in-memory image.
///
/// Reads happen either at an explicit offset or at the current cursor
/// position, which `seek` moves. Every read is charged against
/// `IOLimits::max_read_bytes`.
pub struct SafeReader {
    path: PathBuf,
    backing: Backing,
    limits: IOLimits,
    bytes_read: u64,
    file_size: u64,
    position: u64,
}

impl SafeReader {
    fn with_backing(path: PathBuf, backing: Backing, limits: IOLimits) -> Self {
        let file_size = backing.as_slice().len() as u64;
        Self {
            path,
            backing,
            limits,
            bytes_read: 0,
            file_size,
            position: 0,
        }
    }

    /// Open and map `path`, rejecting files above `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        debug!(path = %path.display(), size = size, "Opening input");
        check_size(path, size, &limits)?;

        let backing = if size == 0 {
            Backing::Empty
        } else {
            // Safety: read-only map of a regular file we hold open.
            Backing::Mapped(unsafe { Mmap::map(&file)? })
        };
        Ok(Self::with_backing(path.to_path_buf(), backing, limits))
    }

    /// Wrap an in-memory image so it can be inspected like a file.
    pub fn from_bytes(data: impl Into<Bytes>, limits: IOLimits) -> Result<Self> {
        let data = data.into();
        let path = PathBuf::from("<memory>");
        check_size(&path, data.len() as u64, &limits)?;
        Ok(Self::with_backing(path, Backing::Memory(data), limits))
    }

    /// `<memory>` for in-memory images.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Bytes handed out so far, charged against the budget.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn limits(&self) -> &IOLimits {
        &self.limits
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking past EOF is allowed; subsequent reads simply find no data.
    pub fn seek(&mut self, offset: u64) -> u64 {
        self.position = offset;
        self.position
    }

    /// Reads up to `len` bytes at the cursor and advances it.
    ///
    /// Returns fewer bytes than requested when EOF is reached first.
    ///
    /// The full requested length is checked against the read budget up front.
    pub fn read(&mut self, len: u64) -> Result<Bytes> {
        self.check_budget(len)?;

        let offset = self.position;
        let data = self.backing.as_slice();
        let start = offset.min(self.file_size) as usize;
        let end = offset.saturating_add(len).min(self.file_size) as usize;
        let out = Bytes::copy_from_slice(&data[start..end]);

        let actual_len = out.len() as u64;
        self.bytes_read += actual_len;
        self.position = offset.saturating_add(actual_len);

        trace!(offset = offset, len = actual_len, "read");

        Ok(out)
    }

    /// Reads exactly `len` bytes at the cursor and advances it.
    ///
    /// # Errors
    ///
    /// Returns `IoError::UnexpectedEof` without moving the cursor if fewer than
    /// `len` bytes remain.
    pub fn read_exact(&mut self, len: u64) -> Result<Bytes> {
        let available = self.file_size.saturating_sub(self.position);
        if available < len {
            debug!(
                path = %self.path.display(),
                offset = self.position,
                requested = len,
                available = available,
                "Exact read runs past EOF"
            );
            return Err(IoError::UnexpectedEof {
                offset: self.position,
                requested: len,
                available,
            });
        }
        self.read(len)
    }

    /// Seeks to `offset` and reads up to `len` bytes.
    pub fn read_at(&mut self, offset: u64, len: u64) -> Result<Bytes> {
        self.seek(offset);
        self.read(len)
    }

    /// Seeks to `offset` and reads exactly `len` bytes.
    pub fn read_exact_at(&mut self, offset: u64, len: u64) -> Result<Bytes> {
        self.seek(offset);
        self.read_exact(len)
    }

    /// Up to `len` bytes from the start of the file.
    pub fn read_prefix(&mut self, len: u64) -> Result<Bytes> {
        self.read_at(0, len)
    }

    fn check_budget(&self, len: u64) -> Result<()> {
        if self.bytes_read.saturating_add(len) > self.limits.max_read_bytes {
            warn!(
                path = %self.path.display(),
                already = self.bytes_read,
                requested = len,
                budget = self.limits.max_read_bytes,
                "Read budget exhausted"
            );
            return Err(IoError::ReadLimitExceeded {
                limit: self.limits.max_read_bytes,
                current: self.bytes_read,
            });
        }
        Ok(())
    }
}
