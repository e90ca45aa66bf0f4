//! ELF header parsing and normalization

use tracing::trace;

use crate::error::{ElfError, Result};
use crate::formats::elf::types::*;
use crate::formats::elf::utils::{needs_swap, swap16, swap32, swap_word, NativeRead};

fn truncated(needed: usize, available: usize) -> ElfError {
    ElfError::TruncatedFile {
        offset: 0,
        needed: needed as u64,
        available: available as u64,
    }
}

/// Parse ELF identification bytes
pub fn parse_ident(data: &[u8]) -> Result<ElfIdent> {
    if data.len() < ELF_MAGIC.len() {
        return Err(truncated(ELF_MAGIC.len(), data.len()));
    }

    // Nothing else is meaningful until the magic matches
    if &data[0..4] != ELF_MAGIC {
        return Err(ElfError::InvalidMagic);
    }

    if data.len() < EI_NIDENT {
        return Err(truncated(EI_NIDENT, data.len()));
    }

    let mut bytes = [0u8; EI_NIDENT];
    bytes.copy_from_slice(&data[..EI_NIDENT]);

    Ok(ElfIdent {
        class: ElfClass::from_u8(bytes[4])?,
        data: ElfData::from_u8(bytes[5])?,
        version: bytes[6],
        osabi: bytes[7],
        abiversion: bytes[8],
        bytes,
    })
}

/// 32-bit file header exactly as laid out on disk, host order.
struct FileHeader32 {
    e_type: u16,
    e_machine: u16,
    e_version: u32,
    e_entry: u32,
    e_phoff: u32,
    e_shoff: u32,
    e_flags: u32,
    e_ehsize: u16,
    e_phentsize: u16,
    e_phnum: u16,
    e_shentsize: u16,
    e_shnum: u16,
    e_shstrndx: u16,
}

impl FileHeader32 {
    fn read(data: &[u8]) -> Result<Self> {
        Ok(Self {
            e_type: data.read_ne_u16(16)?,
            e_machine: data.read_ne_u16(18)?,
            e_version: data.read_ne_u32(20)?,
            e_entry: data.read_ne_u32(24)?,
            e_phoff: data.read_ne_u32(28)?,
            e_shoff: data.read_ne_u32(32)?,
            e_flags: data.read_ne_u32(36)?,
            e_ehsize: data.read_ne_u16(40)?,
            e_phentsize: data.read_ne_u16(42)?,
            e_phnum: data.read_ne_u16(44)?,
            e_shentsize: data.read_ne_u16(46)?,
            e_shnum: data.read_ne_u16(48)?,
            e_shstrndx: data.read_ne_u16(50)?,
        })
    }

    /// Zero-extend the address and offset fields into the canonical shape.
    fn promote(self, ident: ElfIdent) -> FileHeader {
        FileHeader {
            ident,
            e_type: self.e_type,
            e_machine: self.e_machine,
            e_version: self.e_version,
            e_entry: u64::from(self.e_entry),
            e_phoff: u64::from(self.e_phoff),
            e_shoff: u64::from(self.e_shoff),
            e_flags: self.e_flags,
            e_ehsize: self.e_ehsize,
            e_phentsize: self.e_phentsize,
            e_phnum: self.e_phnum,
            e_shentsize: self.e_shentsize,
            e_shnum: self.e_shnum,
            e_shstrndx: self.e_shstrndx,
        }
    }
}

fn read_header64(data: &[u8], ident: ElfIdent) -> Result<FileHeader> {
    Ok(FileHeader {
        ident,
        e_type: data.read_ne_u16(16)?,
        e_machine: data.read_ne_u16(18)?,
        e_version: data.read_ne_u32(20)?,
        e_entry: data.read_ne_u64(24)?,
        e_phoff: data.read_ne_u64(32)?,
        e_shoff: data.read_ne_u64(40)?,
        e_flags: data.read_ne_u32(48)?,
        e_ehsize: data.read_ne_u16(52)?,
        e_phentsize: data.read_ne_u16(54)?,
        e_phnum: data.read_ne_u16(56)?,
        e_shentsize: data.read_ne_u16(58)?,
        e_shnum: data.read_ne_u16(60)?,
        e_shstrndx: data.read_ne_u16(62)?,
    })
}

impl FileHeader {
    /// Byte-reverse every multi-byte field, each at its on-disk width.
    ///
    /// Applying this twice restores the original values.
    pub fn swap_fields(&mut self) {
        let class = self.ident.class;
        self.e_type = swap16(self.e_type);
        self.e_machine = swap16(self.e_machine);
        self.e_version = swap32(self.e_version);
        self.e_entry = swap_word(self.e_entry, class);
        self.e_phoff = swap_word(self.e_phoff, class);
        self.e_shoff = swap_word(self.e_shoff, class);
        self.e_flags = swap32(self.e_flags);
        self.e_ehsize = swap16(self.e_ehsize);
        self.e_phentsize = swap16(self.e_phentsize);
        self.e_phnum = swap16(self.e_phnum);
        self.e_shentsize = swap16(self.e_shentsize);
        self.e_shnum = swap16(self.e_shnum);
        self.e_shstrndx = swap16(self.e_shstrndx);
    }
}

/// Parse and normalize the ELF file header.
///
/// `data` must hold at least the on-disk header for the declared class
/// (52 bytes for ELF32, 64 for ELF64). The result is always 64-bit and in
/// host byte order.
pub fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let ident = parse_ident(data)?;

    let header_size = ident.class.header_size();
    if data.len() < header_size {
        return Err(truncated(header_size, data.len()));
    }

    let mut header = match ident.class {
        ElfClass::Elf32 => FileHeader32::read(data)?.promote(ident),
        ElfClass::Elf64 => read_header64(data, ident)?,
    };

    if needs_swap(ident.data) {
        trace!(data = ?ident.data, "Swapping file header to host order");
        header.swap_fields();
    }

    Ok(header)
}
