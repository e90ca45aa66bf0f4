//! elfpeek command-line entry point.

mod cli;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use elfpeek::display::{FileHeaderListing, HexDump, SectionListing, SectionSummary};
use elfpeek::inspect::FileOutcome;
use elfpeek::{inspect_files, logging, FileReport, InspectConfig, ReadRequest};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if cli.log_json {
        logging::init_tracing_json(logging::DEFAULT_FILTER);
    } else {
        logging::init_tracing(logging::DEFAULT_FILTER);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("elfpeek: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file was inspected successfully.
fn run(cli: &cli::Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => InspectConfig::from_json_file(path)?,
        None => InspectConfig::default(),
    };
    config.parallel |= cli.parallel;

    let request = cli.request();
    let outcomes = inspect_files(&cli.files, &request, &config);
    let all_ok = outcomes.iter().all(|outcome| outcome.result.is_ok());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json(&mut out, &outcomes)?;
    } else {
        let multiple = outcomes.len() > 1;
        for outcome in &outcomes {
            if multiple {
                writeln!(out, "\nFile: {}", outcome.path.display())?;
            }
            match &outcome.result {
                Ok(report) => write_report(&mut out, report, &request)?,
                Err(err) => {
                    out.flush()?;
                    eprintln!("elfpeek: {}: Error: {}", outcome.path.display(), err);
                }
            }
        }
    }
    out.flush().context("flushing output")?;

    Ok(all_ok)
}

fn write_report(out: &mut impl Write, report: &FileReport, request: &ReadRequest) -> Result<()> {
    if request.file_header {
        write!(out, "{}", FileHeaderListing(&report.header))?;
    }

    if let Some(sections) = &report.sections {
        if request.section_headers {
            if !request.file_header {
                write!(out, "{}", SectionSummary(&report.header))?;
            }
            write!(out, "{}", SectionListing(sections))?;
        }
    }

    if !report.missing.is_empty() {
        out.flush()?;
        for name in &report.missing {
            eprintln!(
                "elfpeek: {}: Warning: Section '{}' was not dumped because it does not exist!",
                report.path.display(),
                name
            );
        }
    }

    for dump in &report.dumps {
        write!(out, "{}", HexDump(dump))?;
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn write_json(out: &mut impl Write, outcomes: &[FileOutcome]) -> Result<()> {
    let rows: Vec<JsonOutcome<'_>> = outcomes
        .iter()
        .map(|outcome| JsonOutcome {
            path: &outcome.path,
            report: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|err| err.to_string()),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows).context("writing JSON report")?;
    writeln!(out)?;
    Ok(())
}
