//! Utility functions for common operations.
//!
//! - Atomic file writes for the config file
//! - Character-aware truncation for display

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{BoardError, Result};

/// Atomically write content to a file.
///
/// Writes to a temporary file in the same directory, flushes it and renames
/// it over the target, so the original file (if any) survives a failure.
/// Missing parent directories are created.
///
/// # Example
///
/// ```rust,no_run
/// use mandala_board::util::atomic_write;
///
/// atomic_write("config.toml", b"[api]\n").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(BoardError::IoError {
                context: format!("Cannot determine parent directory for: {}", path.display()),
                source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            })
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            BoardError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the rename on one filesystem
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        BoardError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        BoardError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        BoardError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        BoardError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Truncate to at most `max_chars` characters, appending `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}…", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Truncate to at most `max_chars` characters without a marker.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_and_replaces() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("a").join("b.txt");

        atomic_write(&path, b"first").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_with_ellipsis("short", 15), "short");
        assert_eq!(truncate_with_ellipsis("exactly5", 8), "exactly5");
        assert_eq!(truncate_with_ellipsis("abcdefghij", 4), "abcd…");
        // Multi-byte text must not split a character.
        assert_eq!(truncate_with_ellipsis("學員價值與定位", 3), "學員價…");
        assert_eq!(truncate_chars("學員價值與定位", 2), "學員");
    }
}
