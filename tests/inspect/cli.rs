//! The `elfpeek` binary.

use std::process::{Command, Output};

use crate::common::{create_temp_file, ElfBuilder};

fn elfpeek(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_elfpeek"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run elfpeek")
}

fn sample() -> tempfile::NamedTempFile {
    ElfBuilder::elf64_le()
        .file_type(3)
        .typed_section(".text", 1, 0x6, 0x1000, b"Hello, world!\n\x00\x01ELF")
        .nobits(".bss", 0x20)
        .write_temp()
}

#[test]
fn test_header_sections_and_dump() {
    let file = sample();
    let path = file.path().to_str().unwrap();
    let output = elfpeek(&["-h", "-t", "-x", ".text", path]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ELF Header:\n"));
    assert!(stdout.contains("  Type:                              DYN (Shared object file)\n"));
    assert!(stdout.contains("  Number of section headers:         4\n"));
    assert!(!stdout.contains("There are "));
    assert!(stdout.contains("  [ 1] .text\n"));
    assert!(stdout.contains("       [0000000000000006]: ALLOC, EXEC\n"));
    assert!(stdout.contains("Hex dump of section '.text':\n"));
    assert!(stdout.contains("  0x00000010 454c46                              ELF\n"));
    assert!(!stdout.contains("File: "));
}

#[test]
fn test_section_summary_without_header() {
    let file = sample();
    let output = elfpeek(&["-t", file.path().to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("There are 4 section headers, starting at offset 0x"));
    assert!(stdout.contains("  [ 2] .bss\n"));
}

#[test]
fn test_missing_and_empty_sections() {
    let file = sample();
    let output = elfpeek(&["-x", ".bss", "-x", ".rodata", file.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stdout, "Section '.bss' has no data to dump.\n");
    assert!(stderr.contains("Warning: Section '.rodata' was not dumped because it does not exist!"));
    assert_eq!(stderr.matches("was not dumped").count(), 1, "{}", stderr);
    assert!(!stderr.contains('\x1b'));
}

#[test]
fn test_multiple_files_with_a_failure() {
    let good = sample();
    let junk = create_temp_file(b"not an elf file at all");
    let output = elfpeek(&[
        "-h",
        good.path().to_str().unwrap(),
        junk.path().to_str().unwrap(),
        good.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stdout.matches("\nFile: ").count(), 3);
    assert_eq!(stdout.matches("ELF Header:").count(), 2);
    assert!(stderr.contains("Error: Not an ELF file"), "{}", stderr);
    assert_eq!(stderr.matches("Not an ELF file").count(), 1, "{}", stderr);
    assert!(!stderr.contains('\x1b'));
}

#[test]
fn test_json_output() {
    let file = sample();
    let output = elfpeek(&["--json", "-t", "-x", ".text", file.path().to_str().unwrap()]);
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &rows[0]["report"];
    assert_eq!(report["header"]["e_shnum"], 4);
    assert_eq!(report["sections"][1]["name"], ".text");
    assert_eq!(report["dumps"][0]["contents"]["bytes"], "48656c6c6f2c20776f726c64210a0001454c46");
    assert!(rows[0].get("error").is_none());
}

#[test]
fn test_requires_an_action() {
    let file = sample();
    let output = elfpeek(&[file.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_rejected_config_is_reported_once() {
    let file = sample();
    let config = create_temp_file(br#"{"names": {"max_name_len": 0}}"#);
    let output = elfpeek(&[
        "--config",
        config.path().to_str().unwrap(),
        "-t",
        file.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("max_name_len").count(), 1, "{}", stderr);
}
