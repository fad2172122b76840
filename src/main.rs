//! mandala: terminal client for the Mandala strategy board.
//!
//! Browse the nine grids interactively, or script against them: list grids,
//! print a board, search entries, submit transcripts.

use std::process::ExitCode;

use mandala_board::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run from --log-level and --log-format
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            if std::env::var("RUST_BACKTRACE").is_ok() {
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    eprintln!("Caused by: {cause}");
                    source = cause.source();
                }
            }

            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
