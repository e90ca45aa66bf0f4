//! Section name resolution through the section name string table

use tracing::{debug, warn};

use crate::config::{NameConfig, StringTableSource};
use crate::error::{ElfError, Result};
use crate::formats::elf::sections::SectionTable;
use crate::formats::elf::types::{FileHeader, SHN_UNDEF};
use crate::formats::elf::utils::until_nul;
use crate::io::SafeReader;

/// Pick the index of the section holding section names.
fn string_table_index(table: &SectionTable, header: &FileHeader, source: StringTableSource) -> usize {
    match source {
        StringTableSource::HeaderIndex => usize::from(header.e_shstrndx),
        StringTableSource::LastSection => table.len().saturating_sub(1),
    }
}

/// Fill in the display name of every entry in `table`.
///
/// Each name is the NUL-terminated string at `sh_name` bytes into the file
/// contents of the string table section.
pub fn resolve_names(
    table: &mut SectionTable,
    reader: &mut SafeReader,
    header: &FileHeader,
    config: &NameConfig,
) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }

    if config.string_table == StringTableSource::HeaderIndex && header.e_shstrndx == SHN_UNDEF {
        warn!("File has no section name string table; names left empty");
        return Ok(());
    }

    let strndx = string_table_index(table, header, config.string_table);
    let strtab_offset = table
        .get(strndx)
        .map(|entry| entry.offset())
        .ok_or(ElfError::MissingStringTable {
            index: strndx,
            count: table.len(),
        })?;

    debug!(index = strndx, offset = strtab_offset, "Resolving section names");

    let max = config.max_name_len;
    for entry in table.entries_mut() {
        let offset = strtab_offset.saturating_add(u64::from(entry.header.sh_name));
        let window = reader.read_at(offset, max as u64)?;
        let name = until_nul(&window).ok_or(ElfError::UnterminatedName {
            section: entry.index,
            offset,
            max,
        })?;
        entry.name = String::from_utf8_lossy(name).into_owned();
    }

    Ok(())
}
