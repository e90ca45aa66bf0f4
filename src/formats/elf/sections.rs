//! Section table construction and lookup

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::NameConfig;
use crate::error::{ElfError, Result};
use crate::formats::elf::names::resolve_names;
use crate::formats::elf::types::*;
use crate::formats::elf::utils::{needs_swap, swap32, swap_word, NativeRead};
use crate::io::SafeReader;

/// Ordered section header table, in on-disk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionTable {
    entries: Vec<SectionEntry>,
}

impl SectionTable {
    pub fn new(entries: Vec<SectionEntry>) -> Self {
        Self { entries }
    }

    /// Build the table and resolve every section name.
    pub fn load(reader: &mut SafeReader, header: &FileHeader, names: &NameConfig) -> Result<Self> {
        let mut table = build_sections(reader, header)?;
        resolve_names(&mut table, reader, header, names)?;
        Ok(table)
    }

    /// Index of the first section whose name is exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.index)
    }

    /// Get section by index
    pub fn get(&self, index: usize) -> Option<&SectionEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SectionEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionTable {
    type Item = &'a SectionEntry;
    type IntoIter = std::slice::Iter<'a, SectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sections picked for extraction, by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSelection {
    indices: BTreeSet<usize>,
    missing: Vec<String>,
}

impl SectionSelection {
    /// Resolve each requested name; names that match nothing are kept aside.
    pub fn from_names<S: AsRef<str>>(table: &SectionTable, names: &[S]) -> Self {
        let mut selection = Self::default();
        for name in names {
            let name = name.as_ref();
            match table.find_by_name(name) {
                Some(index) => {
                    selection.indices.insert(index);
                }
                None => {
                    debug!(section = name, "Requested section does not exist");
                    selection.missing.push(name.to_string());
                }
            }
        }
        selection
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Selected indices in table order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Requested names that matched no section.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// 32-bit section header as laid out on disk, host order.
struct SectionHeader32 {
    sh_name: u32,
    sh_type: u32,
    sh_flags: u32,
    sh_addr: u32,
    sh_offset: u32,
    sh_size: u32,
    sh_link: u32,
    sh_info: u32,
    sh_addralign: u32,
    sh_entsize: u32,
}

impl SectionHeader32 {
    fn read(data: &[u8]) -> Result<Self> {
        Ok(Self {
            sh_name: data.read_ne_u32(0)?,
            sh_type: data.read_ne_u32(4)?,
            sh_flags: data.read_ne_u32(8)?,
            sh_addr: data.read_ne_u32(12)?,
            sh_offset: data.read_ne_u32(16)?,
            sh_size: data.read_ne_u32(20)?,
            sh_link: data.read_ne_u32(24)?,
            sh_info: data.read_ne_u32(28)?,
            sh_addralign: data.read_ne_u32(32)?,
            sh_entsize: data.read_ne_u32(36)?,
        })
    }

    fn promote(self) -> SectionHeader {
        SectionHeader {
            sh_name: self.sh_name,
            sh_type: self.sh_type,
            sh_flags: u64::from(self.sh_flags),
            sh_addr: u64::from(self.sh_addr),
            sh_offset: u64::from(self.sh_offset),
            sh_size: u64::from(self.sh_size),
            sh_link: self.sh_link,
            sh_info: self.sh_info,
            sh_addralign: u64::from(self.sh_addralign),
            sh_entsize: u64::from(self.sh_entsize),
        }
    }
}

fn read_section_header64(data: &[u8]) -> Result<SectionHeader> {
    Ok(SectionHeader {
        sh_name: data.read_ne_u32(0)?,
        sh_type: data.read_ne_u32(4)?,
        sh_flags: data.read_ne_u64(8)?,
        sh_addr: data.read_ne_u64(16)?,
        sh_offset: data.read_ne_u64(24)?,
        sh_size: data.read_ne_u64(32)?,
        sh_link: data.read_ne_u32(40)?,
        sh_info: data.read_ne_u32(44)?,
        sh_addralign: data.read_ne_u64(48)?,
        sh_entsize: data.read_ne_u64(56)?,
    })
}

impl SectionHeader {
    /// Byte-reverse every field at the width it had in a `class` file.
    pub fn swap_fields(&mut self, class: ElfClass) {
        self.sh_name = swap32(self.sh_name);
        self.sh_type = swap32(self.sh_type);
        self.sh_flags = swap_word(self.sh_flags, class);
        self.sh_addr = swap_word(self.sh_addr, class);
        self.sh_offset = swap_word(self.sh_offset, class);
        self.sh_size = swap_word(self.sh_size, class);
        self.sh_link = swap32(self.sh_link);
        self.sh_info = swap32(self.sh_info);
        self.sh_addralign = swap_word(self.sh_addralign, class);
        self.sh_entsize = swap_word(self.sh_entsize, class);
    }
}

/// Normalize one raw section header record.
pub fn parse_section_header(record: &[u8], class: ElfClass, data: ElfData) -> Result<SectionHeader> {
    let mut header = match class {
        ElfClass::Elf32 => SectionHeader32::read(record)?.promote(),
        ElfClass::Elf64 => read_section_header64(record)?,
    };
    if needs_swap(data) {
        header.swap_fields(class);
    }
    Ok(header)
}

/// Read all `e_shnum` section header records starting at `e_shoff`.
///
/// Names are left empty; see [`resolve_names`].
pub fn build_sections(reader: &mut SafeReader, header: &FileHeader) -> Result<SectionTable> {
    let count = usize::from(header.e_shnum);
    if count == 0 {
        debug!("File declares no section headers");
        return Ok(SectionTable::default());
    }

    let class = header.ident.class;
    let entsize = usize::from(header.e_shentsize);
    let record_size = class.section_header_size();
    if entsize < record_size {
        return Err(ElfError::MalformedHeader(format!(
            "Invalid e_shentsize: expected at least {}, got {}",
            record_size, entsize
        )));
    }

    let total = (count * entsize) as u64;
    debug!(
        offset = header.e_shoff,
        count = count,
        entsize = entsize,
        "Reading section header table"
    );
    let region = reader
        .read_exact_at(header.e_shoff, total)
        .map_err(ElfError::truncated)?;

    let mut entries = Vec::with_capacity(count);
    for (index, record) in region.chunks_exact(entsize).enumerate() {
        let section = parse_section_header(&record[..record_size], class, header.ident.data)?;
        trace!(index = index, sh_type = section.sh_type, "Parsed section header");
        entries.push(SectionEntry {
            index,
            header: section,
            name: String::new(),
        });
    }

    Ok(SectionTable::new(entries))
}
