//! Common test utilities and helpers.
//!
//! `ElfBuilder` lays out a small but well-formed ELF image: the file header,
//! the section contents, the section name string table and finally the
//! section header table. Every multi-byte field is written in the byte order
//! and width the builder was created with.

#![allow(dead_code)]

use std::io::Write;

use elfpeek::formats::elf::{ElfClass, ElfData, SHT_NOBITS, SHT_PROGBITS, SHT_STRTAB};
use tempfile::NamedTempFile;

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    sh_type: u32,
    flags: u64,
    addr: u64,
    data: Vec<u8>,
    /// Size recorded in the header; differs from `data` for NOBITS.
    size: u64,
}

/// Builder for synthetic ELF images.
#[derive(Debug, Clone)]
pub struct ElfBuilder {
    class: ElfClass,
    data: ElfData,
    e_type: u16,
    machine: u16,
    entry: u64,
    sections: Vec<Section>,
    /// Table index of `.shstrtab`; `None` puts it last.
    strtab_index: Option<usize>,
    shstrndx: Option<u16>,
    null_entry: bool,
}

/// Byte-order aware field writer.
struct Fields {
    buf: Vec<u8>,
    class: ElfClass,
    big: bool,
}

impl Fields {
    fn new(class: ElfClass, data: ElfData) -> Self {
        Self {
            buf: Vec::new(),
            class,
            big: !data.is_little_endian(),
        }
    }

    fn u16(&mut self, value: u16) {
        let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
        self.buf.extend_from_slice(&bytes);
    }

    fn u32(&mut self, value: u32) {
        let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
        self.buf.extend_from_slice(&bytes);
    }

    fn u64(&mut self, value: u64) {
        let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
        self.buf.extend_from_slice(&bytes);
    }

    /// A field that is 4 bytes in ELF32 and 8 bytes in ELF64.
    fn word(&mut self, value: u64) {
        match self.class {
            ElfClass::Elf32 => self.u32(value as u32),
            ElfClass::Elf64 => self.u64(value),
        }
    }
}

impl ElfBuilder {
    pub fn new(class: ElfClass, data: ElfData) -> Self {
        Self {
            class,
            data,
            e_type: 1,
            machine: match class {
                ElfClass::Elf32 => 3,
                ElfClass::Elf64 => 62,
            },
            entry: 0,
            sections: Vec::new(),
            strtab_index: None,
            shstrndx: None,
            null_entry: true,
        }
    }

    pub fn elf64_le() -> Self {
        Self::new(ElfClass::Elf64, ElfData::Little)
    }

    pub fn file_type(mut self, e_type: u16) -> Self {
        self.e_type = e_type;
        self
    }

    pub fn machine(mut self, machine: u16) -> Self {
        self.machine = machine;
        self
    }

    pub fn entry(mut self, entry: u64) -> Self {
        self.entry = entry;
        self
    }

    /// Add a PROGBITS section with the given contents.
    pub fn section(self, name: &str, data: &[u8]) -> Self {
        self.typed_section(name, SHT_PROGBITS, 0, 0, data)
    }

    pub fn typed_section(
        mut self,
        name: &str,
        sh_type: u32,
        flags: u64,
        addr: u64,
        data: &[u8],
    ) -> Self {
        self.sections.push(Section {
            name: name.to_string(),
            sh_type,
            flags,
            addr,
            data: data.to_vec(),
            size: data.len() as u64,
        });
        self
    }

    /// Add a NOBITS section occupying `size` bytes in memory only.
    pub fn nobits(mut self, name: &str, size: u64) -> Self {
        self.sections.push(Section {
            name: name.to_string(),
            sh_type: SHT_NOBITS,
            flags: 0x3,
            addr: 0,
            data: Vec::new(),
            size,
        });
        self
    }

    /// Place `.shstrtab` at this table index instead of last.
    pub fn strtab_at(mut self, index: usize) -> Self {
        self.strtab_index = Some(index);
        self
    }

    /// Override `e_shstrndx` regardless of where `.shstrtab` lands.
    pub fn shstrndx(mut self, index: u16) -> Self {
        self.shstrndx = Some(index);
        self
    }

    /// Leave out the customary all-zero entry at index 0.
    pub fn without_null_entry(mut self) -> Self {
        self.null_entry = false;
        self
    }

    fn first_index(&self) -> usize {
        usize::from(self.null_entry)
    }

    /// Table index `.shstrtab` will occupy.
    pub fn strtab_index(&self) -> usize {
        let base = self.first_index();
        self.strtab_index
            .unwrap_or(self.sections.len() + base)
            .clamp(base, self.sections.len() + base)
    }

    /// Number of entries in the section header table.
    pub fn shnum(&self) -> u16 {
        (self.sections.len() + 1 + self.first_index()) as u16
    }

    /// Offset of the section header table in the built image.
    pub fn shoff(&self) -> u64 {
        self.layout().1
    }

    fn table(&self) -> Vec<Section> {
        let mut names = vec![0u8];
        for section in &self.sections {
            names.extend_from_slice(section.name.as_bytes());
            names.push(0);
        }
        names.extend_from_slice(b".shstrtab\0");
        let strtab = Section {
            name: ".shstrtab".to_string(),
            sh_type: SHT_STRTAB,
            flags: 0,
            addr: 0,
            size: names.len() as u64,
            data: names,
        };

        let mut table = self.sections.clone();
        table.insert(self.strtab_index() - self.first_index(), strtab);
        table
    }

    /// Data offsets of every non-null table entry, and the table offset.
    fn layout(&self) -> (Vec<u64>, u64) {
        let mut offset = self.class.header_size() as u64;
        let offsets = self
            .table()
            .iter()
            .map(|section| {
                let at = offset;
                offset += section.data.len() as u64;
                at
            })
            .collect();
        (offsets, (offset + 7) & !7)
    }

    /// Offset of each non-null entry's name inside `.shstrtab`.
    fn name_offsets(&self) -> Vec<u32> {
        let mut next = 1u32;
        let mut offsets = Vec::new();
        for section in &self.sections {
            offsets.push(next);
            next += section.name.len() as u32 + 1;
        }
        offsets.insert(self.strtab_index() - self.first_index(), next);
        offsets
    }

    pub fn build(&self) -> Vec<u8> {
        let table = self.table();
        let (offsets, shoff) = self.layout();
        let names = self.name_offsets();
        let shnum = self.shnum();
        let shstrndx = self.shstrndx.unwrap_or(self.strtab_index() as u16);

        let mut f = Fields::new(self.class, self.data);
        f.buf.extend_from_slice(b"\x7fELF");
        f.buf.push(match self.class {
            ElfClass::Elf32 => 1,
            ElfClass::Elf64 => 2,
        });
        f.buf.push(if self.data.is_little_endian() { 1 } else { 2 });
        f.buf.push(1);
        f.buf.resize(16, 0);

        f.u16(self.e_type);
        f.u16(self.machine);
        f.u32(1);
        f.word(self.entry);
        f.word(0);
        f.word(shoff);
        f.u32(0);
        f.u16(self.class.header_size() as u16);
        f.u16(0);
        f.u16(0);
        f.u16(self.class.section_header_size() as u16);
        f.u16(shnum);
        f.u16(shstrndx);
        assert_eq!(f.buf.len(), self.class.header_size());

        for section in &table {
            f.buf.extend_from_slice(&section.data);
        }
        f.buf.resize(shoff as usize, 0);

        if self.null_entry {
            f.buf
                .resize(shoff as usize + self.class.section_header_size(), 0);
        }
        for ((section, offset), name) in table.iter().zip(&offsets).zip(&names) {
            f.u32(*name);
            f.u32(section.sh_type);
            f.word(section.flags);
            f.word(section.addr);
            f.word(*offset);
            f.word(section.size);
            f.u32(0);
            f.u32(0);
            f.word(1);
            f.word(0);
        }
        f.buf
    }

    pub fn write_temp(&self) -> NamedTempFile {
        create_temp_file(&self.build())
    }
}

/// All four class and byte order combinations.
pub fn all_layouts() -> [(ElfClass, ElfData); 4] {
    [
        (ElfClass::Elf32, ElfData::Little),
        (ElfClass::Elf32, ElfData::Big),
        (ElfClass::Elf64, ElfData::Little),
        (ElfClass::Elf64, ElfData::Big),
    ]
}
