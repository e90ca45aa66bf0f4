//! ELF (Executable and Linkable Format) parser
//!
//! Reads the file header and section header table of 32/64-bit,
//! little/big-endian ELF files into one canonical representation.

pub mod extract;
pub mod headers;
pub mod names;
pub mod sections;
pub mod types;
pub mod utils;

use bytes::Bytes;
use tracing::debug;

use crate::config::NameConfig;
use crate::error::Result;
use crate::io::SafeReader;
use extract::extract;
use headers::parse_header;
pub use sections::{SectionSelection, SectionTable};
pub use types::*;

/// Main ELF parser, owning the reader for one file.
pub struct ElfParser {
    reader: SafeReader,
    header: FileHeader,
}

impl ElfParser {
    /// Read and normalize the file header.
    pub fn parse(mut reader: SafeReader) -> Result<Self> {
        // Enough for either class; a short file is caught by parse_header.
        let prefix = reader.read_prefix(ElfClass::Elf64.header_size() as u64)?;
        let header = parse_header(&prefix)?;
        debug!(
            class = header.ident.class.bits(),
            data = ?header.ident.data,
            shnum = header.e_shnum,
            shoff = header.e_shoff,
            "Parsed ELF header"
        );
        Ok(Self { reader, header })
    }

    /// Get ELF header
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn identity(&self) -> &ElfIdent {
        &self.header.ident
    }

    /// Build the section table with resolved names.
    pub fn sections(&mut self, names: &NameConfig) -> Result<SectionTable> {
        SectionTable::load(&mut self.reader, &self.header, names)
    }

    /// Raw contents of one section.
    pub fn section_data(&mut self, entry: &SectionEntry) -> Result<Bytes> {
        extract(&mut self.reader, entry)
    }

    /// Raw contents of the first section called `name`, if there is one.
    pub fn section_data_by_name(
        &mut self,
        table: &SectionTable,
        name: &str,
    ) -> Result<Option<Bytes>> {
        match table.find_by_name(name).and_then(|index| table.get(index)) {
            Some(entry) => self.section_data(entry).map(Some),
            None => Ok(None),
        }
    }

    /// Check the header against the values the format prescribes.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let class = self.header.ident.class;

        if usize::from(self.header.e_ehsize) != class.header_size() {
            errors.push(format!(
                "Invalid e_ehsize: expected {}, got {}",
                class.header_size(),
                self.header.e_ehsize
            ));
        }

        if self.header.e_shnum > 0
            && usize::from(self.header.e_shentsize) != class.section_header_size()
        {
            errors.push(format!(
                "Invalid e_shentsize: expected {}, got {}",
                class.section_header_size(),
                self.header.e_shentsize
            ));
        }

        if self.header.e_shnum > 0 && self.header.e_shstrndx >= self.header.e_shnum {
            errors.push(format!(
                "Invalid section string table index: {}",
                self.header.e_shstrndx
            ));
        }

        errors
    }

    /// Give the reader back, e.g. to inspect how much was read.
    pub fn into_reader(self) -> SafeReader {
        self.reader
    }
}
