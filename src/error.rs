//! Error types for ELF inspection.
//!
//! Every variant describes a deterministic outcome of malformed or truncated
//! input, or a failure of the underlying medium. None of them are retried.

use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for parsing a single file.
#[derive(Debug, Error)]
pub enum ElfError {
    /// The first four bytes are not `\x7fELF`.
    #[error("Not an ELF file - it has the wrong magic bytes at the start")]
    InvalidMagic,

    #[error("Unsupported ELF class: {0}")]
    UnsupportedClass(u8),

    #[error("Unsupported ELF data encoding: {0}")]
    UnsupportedData(u8),

    /// Fewer bytes are available than a declared count requires.
    #[error("Truncated file at {offset:#x}: needed {needed} bytes, {available} available")]
    TruncatedFile {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The section-name string table index does not name a section.
    #[error("Section name string table index {index} is out of range ({count} sections)")]
    MissingStringTable { index: usize, count: usize },

    #[error("Name of section {section} at {offset:#x} is not terminated within {max} bytes")]
    UnterminatedName {
        section: usize,
        offset: u64,
        max: usize,
    },

    /// A section body is shorter on disk than its declared size.
    #[error(
        "Section {section} is truncated: expected {expected} bytes at {offset:#x}, {available} available"
    )]
    ShortRead {
        section: usize,
        offset: u64,
        expected: u64,
        available: u64,
    },

    /// Open, seek, read, or resource-limit failure from the byte reader.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, ElfError>;

impl ElfError {
    /// Converts a reader end-of-file into `TruncatedFile`, passing other
    /// reader failures through.
    pub(crate) fn truncated(err: IoError) -> Self {
        match err {
            IoError::UnexpectedEof {
                offset,
                requested,
                available,
            } => ElfError::TruncatedFile {
                offset,
                needed: requested,
                available,
            },
            other => ElfError::Io(other),
        }
    }
}
