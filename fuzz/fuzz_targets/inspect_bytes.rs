#![no_main]
use elfpeek::inspect::{inspect_reader, ReadRequest};
use elfpeek::io::{IOLimits, SafeReader};
use elfpeek::InspectConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = IOLimits {
        max_file_size: 1 << 20,
        max_read_bytes: 1 << 22,
    };
    let Ok(reader) = SafeReader::from_bytes(data.to_vec(), limits) else {
        return;
    };
    let request = ReadRequest {
        file_header: true,
        section_headers: true,
        dump_sections: vec![".text".into(), ".shstrtab".into(), "".into()],
    };
    let _ = inspect_reader(reader, &request, &InspectConfig::default());
});
