//! Compare against files produced and parsed by the `object` crate.

use object::write::Object as ObjectWriter;
use object::{Architecture, BinaryFormat, Endianness, Object, ObjectSection, SectionKind};

use elfpeek::config::NameConfig;
use elfpeek::formats::elf::{ElfClass, ElfData, ElfParser};
use elfpeek::io::{IOLimits, SafeReader};

fn write_object(architecture: Architecture, endian: Endianness) -> Vec<u8> {
    let mut obj = ObjectWriter::new(BinaryFormat::Elf, architecture, endian);

    let text = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);
    obj.append_section_data(text, &[0x90, 0x90, 0xc3, 0xcc, 0x0f, 0x0b], 16);

    let data = obj.add_section(Vec::new(), b".data".to_vec(), SectionKind::Data);
    obj.append_section_data(data, b"hello, elf\0", 8);

    let rodata = obj.add_section(Vec::new(), b".rodata.str1.1".to_vec(), SectionKind::ReadOnlyString);
    obj.append_section_data(rodata, b"%s\n\0", 1);

    let bss = obj.add_section(Vec::new(), b".bss".to_vec(), SectionKind::UninitializedData);
    obj.append_section_bss(bss, 256, 8);

    obj.write().unwrap()
}

fn crosscheck(architecture: Architecture, endian: Endianness) {
    let bytes = write_object(architecture, endian);
    let reference = object::File::parse(&*bytes).unwrap();

    let reader = SafeReader::from_bytes(bytes.clone(), IOLimits::default()).unwrap();
    let mut elf = ElfParser::parse(reader).unwrap();
    let expected_class = if reference.is_64() {
        ElfClass::Elf64
    } else {
        ElfClass::Elf32
    };
    let expected_data = if reference.is_little_endian() {
        ElfData::Little
    } else {
        ElfData::Big
    };
    assert_eq!(elf.identity().class, expected_class);
    assert_eq!(elf.identity().data, expected_data);
    assert!(elf.validate().is_empty(), "{:?}", elf.validate());

    let table = elf.sections(&NameConfig::default()).unwrap();
    let mut checked = 0;
    for section in reference.sections() {
        let entry = table
            .get(section.index().0)
            .unwrap_or_else(|| panic!("no entry {}", section.index().0));
        assert_eq!(entry.name(), section.name().unwrap());
        assert_eq!(entry.offset(), section.file_range().map_or(entry.offset(), |r| r.0));
        assert_eq!(entry.header.sh_addralign, section.align());

        let ours = elf.section_data(entry).unwrap();
        assert_eq!(&ours[..], section.data().unwrap(), "{}", entry.name());
        checked += 1;
    }
    assert!(checked >= 4);

    let text = elf.section_data_by_name(&table, ".text").unwrap().unwrap();
    assert_eq!(&text[..], &[0x90, 0x90, 0xc3, 0xcc, 0x0f, 0x0b]);
    assert!(elf.section_data_by_name(&table, ".missing").unwrap().is_none());

    let bss = table.find_by_name(".bss").and_then(|i| table.get(i)).unwrap();
    assert_eq!(bss.size(), 256);
    assert!(elf.section_data(bss).unwrap().is_empty());
}

#[test]
fn test_x86_64_little_endian() {
    crosscheck(Architecture::X86_64, Endianness::Little);
}

#[test]
fn test_i386_little_endian() {
    crosscheck(Architecture::I386, Endianness::Little);
}

#[test]
fn test_powerpc_big_endian() {
    crosscheck(Architecture::PowerPc, Endianness::Big);
}

#[test]
fn test_powerpc64_big_endian() {
    crosscheck(Architecture::PowerPc64, Endianness::Big);
}
