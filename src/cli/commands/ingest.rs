//! Ingest command implementation.
//!
//! Reads a transcript from a file or stdin, splits it into segments and
//! submits them for classification, then prints the per-segment results.

use std::io::{self, Read, Write};
use std::path::Path;

use chrono::Utc;

use crate::cli::{Cli, IngestArgs, OutputFormat};
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::flows::{submit_transcript, SubmissionRequest};
use crate::render::ingest::INGEST_HEADERS;
use crate::render::{ingest_rows, IngestRow};
use crate::store::BoardStore;

use super::{build_runtime, connect_api, tsv_cell};

/// Run the ingest command.
pub fn run(cli: &Cli, config: &Config, args: &IngestArgs) -> Result<()> {
    let text = read_transcript(args.file.as_deref())?;
    let source = args
        .source
        .clone()
        .unwrap_or_else(|| config.board.default_source.clone());
    let request = SubmissionRequest::new(text, source);

    let mut out = io::stdout().lock();

    if args.dry_run {
        let segments = request.prepare(Utc::now())?;
        match cli.effective_output() {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&segments)?)?,
            _ => {
                for segment in &segments {
                    writeln!(out, "{}\t{}", segment.segment_id, tsv_cell(&segment.text))?;
                }
            }
        }
        return Ok(());
    }

    let runtime = build_runtime()?;
    let api = connect_api(cli, config)?;
    let mut store = BoardStore::new();
    let outcome = runtime.block_on(submit_transcript(
        api.as_ref(),
        &mut store,
        &request,
        config.board.fresh_window(),
    ))?;

    let rows = ingest_rows(&outcome.results);
    match cli.effective_output() {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "{}", INGEST_HEADERS.join("\t"))?;
            for row in &rows {
                let cells: Vec<String> = row.cells().iter().map(|c| tsv_cell(c)).collect();
                writeln!(out, "{}", cells.join("\t"))?;
            }
        }
        OutputFormat::Compact => {
            for segment in &outcome.segments {
                writeln!(out, "{}", segment.segment_id)?;
            }
        }
        OutputFormat::Text => {
            writeln!(out, "{}", outcome.status_message().message)?;
            for toast in outcome.toast_messages().iter().skip(1) {
                writeln!(out, "{}", toast.message)?;
            }
            if !rows.is_empty() {
                writeln!(out)?;
                write_table(&rows, &mut out)?;
            }
        }
    }

    Ok(())
}

/// Read the transcript from `path`, or stdin when absent or `-`.
fn read_transcript(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(BoardError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            std::fs::read_to_string(path)
                .map_err(|e| BoardError::io(format!("Failed to read {}", path.display()), e))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| BoardError::io("Failed to read transcript from stdin", e))?;
            Ok(text)
        }
    }
}

/// Write rows as an aligned table.
fn write_table<W: Write>(rows: &[IngestRow], out: &mut W) -> Result<()> {
    let cells: Vec<[String; 7]> = rows.iter().map(IngestRow::cells).collect();
    let widths: Vec<usize> = INGEST_HEADERS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(INGEST_HEADERS.to_vec()))?;
    for row in &cells {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngestResult;

    #[test]
    fn test_write_table_aligns_columns() {
        let rows = ingest_rows(&[IngestResult {
            snippet: "pricing review".to_string(),
            grid_id: Some(8),
            status: "new_entry".to_string(),
            ..IngestResult::default()
        }]);
        let mut buf = Vec::new();
        write_table(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#  Snippet"));
        assert!(lines[1].starts_with("1  pricing review"));
        assert_eq!(lines[0].find("Grid"), lines[1].find("#8"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_transcript(Some(Path::new("/nonexistent/transcript.txt"))).unwrap_err();
        assert!(matches!(err, BoardError::FileNotFound { .. }));
    }
}
