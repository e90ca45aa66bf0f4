//! Inspect ELF object files: the file header, the section header table and
//! the raw contents of named sections.
//!
//! Every file is normalized into one canonical shape (64-bit fields, host
//! byte order) whatever its word width and byte order on disk.

pub mod config;
pub mod display;
pub mod error;
pub mod formats;
pub mod inspect;
pub mod io;
pub mod logging;

pub use config::InspectConfig;
pub use error::{ElfError, Result};
pub use inspect::{inspect_file, inspect_files, FileReport, ReadRequest};
