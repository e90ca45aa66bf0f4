//! Raw section contents

use bytes::Bytes;
use tracing::debug;

use crate::error::{ElfError, Result};
use crate::formats::elf::types::SectionEntry;
use crate::io::error::IoError;
use crate::io::SafeReader;

/// Read the file bytes backing `entry`.
///
/// Sections without file data (zero size, or `SHT_NOBITS`) produce an empty
/// buffer. A section whose declared extent runs past the end of the file is
/// an error; partial contents are never returned.
pub fn extract(reader: &mut SafeReader, entry: &SectionEntry) -> Result<Bytes> {
    if !entry.has_file_data() {
        debug!(section = entry.index, name = %entry.name, "Section has no file data");
        return Ok(Bytes::new());
    }

    let offset = entry.offset();
    let expected = entry.size();
    reader
        .read_exact_at(offset, expected)
        .map_err(|err| match err {
            IoError::UnexpectedEof { available, .. } => ElfError::ShortRead {
                section: entry.index,
                offset,
                expected,
                available,
            },
            other => ElfError::Io(other),
        })
}
