//! Errors raised by the byte reader.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("File is {found} bytes, larger than the {limit} byte limit")]
    FileTooLarge { limit: u64, found: u64 },

    #[error("Read budget of {limit} bytes exhausted ({current} bytes already read)")]
    ReadLimitExceeded { limit: u64, current: u64 },

    #[error("Unexpected end of file: needed {requested} bytes at {offset:#x}, {available} available")]
    UnexpectedEof {
        offset: u64,
        requested: u64,
        available: u64,
    },

    #[error("I/O failure: {0}")]
    StdIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;
