//! Value-to-label tables for header and section fields.

use crate::formats::elf::types::*;

pub fn class_label(class: ElfClass) -> &'static str {
    match class {
        ElfClass::Elf32 => "ELF32",
        ElfClass::Elf64 => "ELF64",
    }
}

pub fn data_label(data: ElfData) -> &'static str {
    match data {
        ElfData::Little => "2's complement, little endian",
        ElfData::Big => "2's complement, big endian",
    }
}

pub fn ident_version_label(version: u8) -> String {
    match version {
        1 => "1 (current)".to_string(),
        other => other.to_string(),
    }
}

pub fn osabi_label(osabi: u8) -> String {
    let label = match osabi {
        0 => "UNIX - System V",
        1 => "HP-UX",
        2 => "NetBSD",
        3 => "Linux",
        4 => "GNU Hurd",
        6 => "Solaris",
        7 => "AIX",
        8 => "IRIX",
        9 => "FreeBSD",
        10 => "TRU64",
        12 => "OpenBSD",
        97 => "ARM",
        255 => "Standalone App",
        other => return format!("<unknown: {:x}>", other),
    };
    label.to_string()
}

pub fn file_type_label(e_type: u16) -> String {
    match ElfType::from(e_type) {
        ElfType::None => "NONE (No file type)".to_string(),
        ElfType::Relocatable => "REL (Relocatable file)".to_string(),
        ElfType::Executable => "EXEC (Executable file)".to_string(),
        ElfType::SharedObject => "DYN (Shared object file)".to_string(),
        ElfType::Core => "CORE (Core file)".to_string(),
        ElfType::Other(other) => format!("<unknown>: {:x}", other),
    }
}

pub fn machine_label(e_machine: u16) -> String {
    let label = match ElfMachine::from(e_machine) {
        ElfMachine::None => "None",
        ElfMachine::M32 => "WE32100",
        ElfMachine::Sparc => "Sparc",
        ElfMachine::X86 => "Intel 80386",
        ElfMachine::Mips => "MIPS R3000",
        ElfMachine::PowerPC => "PowerPC",
        ElfMachine::PowerPC64 => "PowerPC64",
        ElfMachine::S390 => "IBM S/390",
        ElfMachine::ARM => "ARM",
        ElfMachine::X86_64 => "Advanced Micro Devices X86-64",
        ElfMachine::AArch64 => "AArch64",
        ElfMachine::RiscV => "RISC-V",
        ElfMachine::Other(other) => return format!("<unknown>: 0x{:x}", other),
    };
    label.to_string()
}

pub fn section_type_label(sh_type: u32) -> &'static str {
    match sh_type {
        SHT_NULL => "NULL",
        SHT_PROGBITS => "PROGBITS",
        SHT_SYMTAB => "SYMTAB",
        SHT_STRTAB => "STRTAB",
        SHT_RELA => "RELA",
        SHT_HASH => "HASH",
        SHT_DYNAMIC => "DYNAMIC",
        SHT_NOTE => "NOTE",
        SHT_NOBITS => "NOBITS",
        SHT_REL => "REL",
        SHT_SHLIB => "SHLIB",
        SHT_DYNSYM => "DYNSYM",
        SHT_INIT_ARRAY => "INIT_ARRAY",
        SHT_FINI_ARRAY => "FINI_ARRAY",
        SHT_PREINIT_ARRAY => "PREINIT_ARRAY",
        SHT_GROUP => "GROUP",
        SHT_SYMTAB_SHNDX => "SYMTAB SECTION INDICES",
        SHT_GNU_HASH => "GNU_HASH",
        SHT_GNU_VERDEF => "VERDEF",
        SHT_GNU_VERNEED => "VERNEED",
        SHT_GNU_VERSYM => "VERSYM",
        _ => "???",
    }
}

/// Comma separated flag names, unknown bits as `UNKNOWN (0x..)`.
pub fn section_flags_label(flags: SectionFlags) -> String {
    let mut parts: Vec<String> = flags
        .iter_names()
        .map(|(name, _)| match name {
            "EXECINSTR" => "EXEC".to_string(),
            "INFO_LINK" => "INFO LINK".to_string(),
            "LINK_ORDER" => "LINK ORDER".to_string(),
            "OS_NONCONFORMING" => "OS NONCONF".to_string(),
            other => other.to_string(),
        })
        .collect();
    let unknown = flags.bits() & !SectionFlags::all().bits();
    if unknown != 0 {
        parts.push(format!("UNKNOWN ({:#x})", unknown));
    }
    parts.join(", ")
}
