//! Per-file inspection sessions.
//!
//! A session opens one file, normalizes its header, builds the section table
//! when the request needs it, and extracts the requested sections. Sessions
//! share nothing, so several files can be inspected side by side.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::InspectConfig;
use crate::error::Result;
use crate::formats::elf::{ElfIdent, ElfParser, FileHeader, SectionSelection, SectionTable};
use crate::io::SafeReader;

/// What to produce for each file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadRequest {
    pub file_header: bool,
    pub section_headers: bool,
    /// Names of sections whose raw contents should be dumped.
    pub dump_sections: Vec<String>,
}

impl ReadRequest {
    pub fn needs_sections(&self) -> bool {
        self.section_headers || !self.dump_sections.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.file_header && !self.needs_sections()
    }
}

/// Contents of one dumped section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionContents {
    /// The section occupies no bytes in the file.
    Empty,
    Bytes(#[serde(serialize_with = "serialize_hex")] Bytes),
}

impl SectionContents {
    pub fn len(&self) -> usize {
        match self {
            SectionContents::Empty => 0,
            SectionContents::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SectionContents::Empty => &[],
            SectionContents::Bytes(bytes) => bytes,
        }
    }
}

impl From<Bytes> for SectionContents {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            SectionContents::Empty
        } else {
            SectionContents::Bytes(bytes)
        }
    }
}

fn serialize_hex<S: Serializer>(bytes: &Bytes, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDump {
    pub index: usize,
    pub name: String,
    pub contents: SectionContents,
}

/// Everything learned about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub header: FileHeader,
    /// Present when the request needed the section table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionTable>,
    /// Requested sections, in table order.
    pub dumps: Vec<SectionDump>,
    /// Requested section names that matched nothing.
    pub missing: Vec<String>,
    /// Header values that deviate from the format.
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn identity(&self) -> &ElfIdent {
        &self.header.ident
    }
}

/// Outcome of one file in a multi-file run.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileReport>,
}

/// Inspect the file at `path`.
pub fn inspect_file<P: AsRef<Path>>(
    path: P,
    request: &ReadRequest,
    config: &InspectConfig,
) -> Result<FileReport> {
    let path = path.as_ref();
    let span = crate::span_trace!("inspect", path = %path.display());
    let _guard = span.enter();

    let reader = SafeReader::open(path, config.io.limits())?;
    inspect_reader(reader, request, config)
}

/// Inspect an already opened reader.
pub fn inspect_reader(
    reader: SafeReader,
    request: &ReadRequest,
    config: &InspectConfig,
) -> Result<FileReport> {
    let path = reader.path().to_path_buf();
    let mut elf = ElfParser::parse(reader)?;
    let header = *elf.header();

    let warnings = elf.validate();
    for problem in &warnings {
        debug!(problem = %problem, "Header deviates from the format");
    }

    let mut report = FileReport {
        path,
        header,
        sections: None,
        dumps: Vec::new(),
        missing: Vec::new(),
        warnings,
    };

    if !request.needs_sections() {
        return Ok(report);
    }

    let table = elf.sections(&config.names)?;
    debug!(count = table.len(), "Built section table");

    let selection = SectionSelection::from_names(&table, &request.dump_sections);
    for name in selection.missing() {
        debug!(section = %name, "Requested section not in table");
    }

    for index in selection.indices() {
        if let Some(entry) = table.get(index) {
            let contents = elf.section_data(entry)?;
            report.dumps.push(SectionDump {
                index,
                name: entry.name.clone(),
                contents: contents.into(),
            });
        }
    }

    report.missing = selection.missing().to_vec();
    report.sections = Some(table);

    let reader = elf.into_reader();
    debug!(bytes_read = reader.bytes_read(), "Inspection finished");
    Ok(report)
}

/// Inspect several files; a failure on one never stops the others.
///
/// Outcomes come back in input order.
pub fn inspect_files<P: AsRef<Path> + Sync>(
    paths: &[P],
    request: &ReadRequest,
    config: &InspectConfig,
) -> Vec<FileOutcome> {
    let run = |path: &P| {
        let path = path.as_ref();
        let result = inspect_file(path, request, config);
        if let Err(err) = &result {
            debug!(path = %path.display(), error = %err, "Inspection failed");
        }
        FileOutcome {
            path: path.to_path_buf(),
            result,
        }
    };

    if config.parallel {
        paths.par_iter().map(run).collect()
    } else {
        paths.iter().map(run).collect()
    }
}
