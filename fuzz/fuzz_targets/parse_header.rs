#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = elfpeek::formats::elf::headers::parse_header(data);
});
