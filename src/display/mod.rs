//! Human-readable rendering of inspection results.
//!
//! Each listing is a `Display` wrapper so callers can write it wherever they
//! like without intermediate allocation.

pub mod labels;

use std::fmt;

use crate::formats::elf::{FileHeader, SectionTable};
use crate::inspect::SectionDump;
use labels::*;

/// Bytes shown per hex dump line.
pub const HEX_LINE_WIDTH: usize = 16;

/// The "ELF Header:" listing.
pub struct FileHeaderListing<'a>(pub &'a FileHeader);

impl fmt::Display for FileHeaderListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.0;
        let ident = &header.ident;
        let magic: Vec<String> = ident.bytes.iter().map(|b| format!("{:02x}", b)).collect();

        writeln!(f, "ELF Header:")?;
        writeln!(f, "  Magic:   {}", magic.join(" "))?;
        field(f, "Class:", class_label(ident.class))?;
        field(f, "Data:", data_label(ident.data))?;
        field(f, "Version:", ident_version_label(ident.version))?;
        field(f, "OS/ABI:", osabi_label(ident.osabi))?;
        field(f, "ABI Version:", ident.abiversion)?;
        field(f, "Type:", file_type_label(header.e_type))?;
        field(f, "Machine:", machine_label(header.e_machine))?;
        field(f, "Version:", format_args!("{:#x}", header.e_version))?;
        field(f, "Entry point address:", format_args!("{:#x}", header.e_entry))?;
        field(
            f,
            "Start of program headers:",
            format_args!("{} (bytes into file)", header.e_phoff),
        )?;
        field(
            f,
            "Start of section headers:",
            format_args!("{} (bytes into file)", header.e_shoff),
        )?;
        field(f, "Flags:", format_args!("{:#x}", header.e_flags))?;
        field(
            f,
            "Size of this header:",
            format_args!("{} (bytes)", header.e_ehsize),
        )?;
        field(
            f,
            "Size of program headers:",
            format_args!("{} (bytes)", header.e_phentsize),
        )?;
        field(f, "Number of program headers:", header.e_phnum)?;
        field(
            f,
            "Size of section headers:",
            format_args!("{} (bytes)", header.e_shentsize),
        )?;
        field(f, "Number of section headers:", header.e_shnum)?;
        field(f, "Section header string table index:", header.e_shstrndx)
    }
}

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<35}{}", label, value)
}

/// One-line summary printed when the section listing is shown on its own.
pub struct SectionSummary<'a>(pub &'a FileHeader);

impl fmt::Display for SectionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "There are {} section headers, starting at offset {:#x}:",
            self.0.e_shnum, self.0.e_shoff
        )
    }
}

/// The "Section Headers:" listing, four lines per section.
pub struct SectionListing<'a>(pub &'a SectionTable);

impl fmt::Display for SectionListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Section Headers:")?;
        writeln!(f, "  [Nr] Name")?;
        writeln!(
            f,
            "       Type             Address           Offset            Link"
        )?;
        writeln!(
            f,
            "       Size             EntSize           Info              Align"
        )?;
        writeln!(f, "       Flags")?;

        for entry in self.0 {
            let sh = &entry.header;
            writeln!(f, "  [{:2}] {}", entry.index, entry.name)?;
            writeln!(
                f,
                "       {:<16} {:016x}  {:016x}  {}",
                section_type_label(sh.sh_type),
                sh.sh_addr,
                sh.sh_offset,
                sh.sh_link
            )?;
            writeln!(
                f,
                "       {:016x} {:016x}  {:<16}  {}",
                sh.sh_size, sh.sh_entsize, sh.sh_info, sh.sh_addralign
            )?;
            writeln!(
                f,
                "       [{:016x}]: {}",
                sh.sh_flags,
                section_flags_label(entry.flags())
            )?;
        }
        Ok(())
    }
}

/// Hex and ASCII dump of one section's raw bytes.
pub struct HexDump<'a>(pub &'a SectionDump);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = self.0;
        if dump.contents.is_empty() {
            return writeln!(f, "Section '{}' has no data to dump.", dump.name);
        }

        writeln!(f)?;
        writeln!(f, "Hex dump of section '{}':", dump.name)?;
        for (line, chunk) in dump.contents.as_bytes().chunks(HEX_LINE_WIDTH).enumerate() {
            write!(f, "  0x{:08x} ", line * HEX_LINE_WIDTH)?;
            for group in 0..HEX_LINE_WIDTH / 4 {
                let words = chunk.chunks(4).nth(group).map(hex::encode).unwrap_or_default();
                write!(f, "{:<8} ", words)?;
            }
            let ascii: String = chunk
                .iter()
                .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
                .collect();
            writeln!(f, "{}", ascii)?;
        }
        writeln!(f)
    }
}
