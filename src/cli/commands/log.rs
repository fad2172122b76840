//! Log command implementation.
//!
//! Prints the change history of one segment. Falls back to a sample
//! history when the API cannot provide one.

use std::io::{self, Write};

use crate::cli::{Cli, LogArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::flows::get_segment_log;
use crate::render::log_lines;

use super::{build_runtime, connect_api, tsv_cell};

/// Run the log command.
pub fn run(cli: &Cli, config: &Config, args: &LogArgs) -> Result<()> {
    let runtime = build_runtime()?;
    let api = connect_api(cli, config)?;
    let history = runtime.block_on(get_segment_log(api.as_ref(), &args.segment_id));

    let mut out = io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "segment_id": args.segment_id,
                "history": history,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "action\tsimilarity\tcomment")?;
            for entry in &history {
                writeln!(out, "{}\t{}\t{}", entry.action, entry.similarity, tsv_cell(&entry.comment))?;
            }
        }
        OutputFormat::Compact => {
            for entry in &history {
                writeln!(out, "{}", entry.action)?;
            }
        }
        OutputFormat::Text => {
            writeln!(out, "Log {}", args.segment_id)?;
            for line in log_lines(&history) {
                writeln!(out, "  {:<10} {}", line.action, line.similarity)?;
                if !line.comment.is_empty() {
                    writeln!(out, "             {}", line.comment)?;
                }
            }
        }
    }

    Ok(())
}
