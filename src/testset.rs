//! Testset file handling
//!
//! A testset is a plain text file holding one decimal byte offset per line, in
//! replay order, with a trailing newline after the last entry and nothing else.
//! The external benchmark executable reads it line by line.

use crate::error::PatternError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

type Result<T> = std::result::Result<T, PatternError>;

/// Write offsets to any sink, one per line
pub fn write_offsets<W: Write>(mut writer: W, offsets: &[u64]) -> std::io::Result<()> {
    for offset in offsets {
        writeln!(writer, "{}", offset)?;
    }
    writer.flush()
}

/// Write a testset file, replacing any existing file at `path`
///
/// # Errors
///
/// `IoFailure` if the file cannot be created or written. Nothing is retried.
pub fn write_testset(path: &Path, offsets: &[u64]) -> Result<()> {
    let file = File::create(path).map_err(|e| PatternError::io(path, e))?;
    write_offsets(BufWriter::new(file), offsets).map_err(|e| PatternError::io(path, e))?;

    log::debug!("wrote {} offsets to {}", offsets.len(), path.display());
    Ok(())
}

/// Parse offsets from a reader
///
/// Blank lines are skipped. `source` only labels error messages.
pub fn read_offsets<R: BufRead>(reader: R, source: &Path) -> Result<Vec<u64>> {
    let mut offsets = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PatternError::io(source, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let offset = line.parse::<u64>().map_err(|_| {
            PatternError::invalid(format!(
                "{} line {}: '{}' is not a byte offset",
                source.display(),
                index + 1,
                line
            ))
        })?;
        offsets.push(offset);
    }

    Ok(offsets)
}

/// Read a testset file back into memory
pub fn read_testset(path: &Path) -> Result<Vec<u64>> {
    let file = File::open(path).map_err(|e| PatternError::io(path, e))?;
    read_offsets(BufReader::new(file), path)
}
