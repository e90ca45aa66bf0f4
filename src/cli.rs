//! Command-line interface definitions for elfpeek.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

use elfpeek::ReadRequest;

/// Display information about the contents of ELF format files.
#[derive(Parser, Debug)]
#[command(name = "elfpeek", version, about, disable_help_flag = true)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["file_header", "section_headers", "hex_dump"])
))]
pub struct Cli {
    /// Display the ELF file header.
    #[arg(short = 'h', long = "file-header")]
    pub file_header: bool,

    /// Display the section details.
    #[arg(short = 't', long = "section-details")]
    pub section_headers: bool,

    /// Dump the contents of section <name> as bytes (repeatable).
    #[arg(short = 'x', long = "hex-dump", value_name = "name")]
    pub hex_dump: Vec<String>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Load inspection settings from a JSON file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Inspect files on a thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Emit log records as JSON.
    #[arg(long)]
    pub log_json: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// ELF files to inspect.
    #[arg(required = true, value_name = "elf-file")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn request(&self) -> ReadRequest {
        ReadRequest {
            file_header: self.file_header,
            section_headers: self.section_headers,
            dump_sections: self.hex_dump.clone(),
        }
    }
}
