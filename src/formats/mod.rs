//! Sequence and annotation file loading.
//!
//! Sequence input is either FASTA (first record only) or plain text.
//! Format detection priority:
//! 1. Explicit format specification (-f option)
//! 2. File extension
//! 3. Content-based detection (a leading `>` means FASTA)

pub mod annotations;
pub mod fasta;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::alphabet::{strip_bom, validate_sequence, ValidationError};
use crate::model::Sequence;
use fasta::{validate_fasta, HEADER_SENTINEL};

/// Input format of a sequence file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Fasta,
    /// Bare nucleotides, whitespace allowed anywhere
    Plain,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Fasta => write!(f, "FASTA"),
            InputFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Errors that can occur while loading a sequence file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Result type for loading operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Detects format from file extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<InputFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    match ext.to_lowercase().as_str() {
        "fa" | "fas" | "fasta" | "fna" | "ffn" | "frn" => Some(InputFormat::Fasta),
        "txt" | "seq" | "raw" => Some(InputFormat::Plain),
        _ => None,
    }
}

/// Detects the format by examining the first non-empty line.
pub fn detect_format_from_content(content: &str) -> InputFormat {
    let first = strip_bom(content).lines().map(str::trim).find(|line| !line.is_empty());
    match first {
        Some(line) if line.starts_with(HEADER_SENTINEL) => InputFormat::Fasta,
        _ => InputFormat::Plain,
    }
}

/// Validates in-memory text in the given format.
pub fn parse_str(content: &str, format: InputFormat) -> ParseResult<Sequence> {
    let sequence = match format {
        InputFormat::Fasta => validate_fasta(content)?,
        InputFormat::Plain => validate_sequence(content)?,
    };
    Ok(sequence)
}

/// Loads and validates a sequence file.
///
/// `forced_format` overrides detection. Plain files get their file stem as
/// the sequence name.
pub fn load_sequence_file<P: AsRef<Path>>(path: P, forced_format: Option<InputFormat>) -> ParseResult<Sequence> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let content = strip_bom(&raw);
    let format = forced_format
        .or_else(|| detect_format_from_extension(path))
        .unwrap_or_else(|| detect_format_from_content(content));
    debug!(path = %path.display(), %format, bytes = content.len(), "loading sequence file");

    let sequence = parse_str(content, format)?;
    if sequence.name.is_none() && format == InputFormat::Plain {
        let stem = path.file_stem().and_then(OsStr::to_str).map(str::to_string);
        return Ok(sequence.with_name(stem));
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(detect_format_from_extension("x.FASTA"), Some(InputFormat::Fasta));
        assert_eq!(detect_format_from_extension("x.fa"), Some(InputFormat::Fasta));
        assert_eq!(detect_format_from_extension("x.txt"), Some(InputFormat::Plain));
        assert_eq!(detect_format_from_extension("x.gb"), None);
        assert_eq!(detect_format_from_extension("noext"), None);
    }

    #[test]
    fn test_detect_from_content() {
        assert_eq!(detect_format_from_content("\n  >seq\nACGT"), InputFormat::Fasta);
        assert_eq!(detect_format_from_content("ACGT\n>seq"), InputFormat::Plain);
        assert_eq!(detect_format_from_content(""), InputFormat::Plain);
    }

    #[test]
    fn test_load_fasta_by_content() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">plasmid\nATGC\nGATC").unwrap();

        let seq = load_sequence_file(file.path(), None).unwrap();
        assert_eq!(seq.bases(), "ATGCGATC");
        assert_eq!(seq.name.as_deref(), Some("plasmid"));
    }

    #[test]
    fn test_load_fasta_with_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.fa");
        fs::write(&path, "\u{feff}>seq1\nATGC\n").unwrap();

        let seq = load_sequence_file(&path, None).unwrap();
        assert_eq!(seq.bases(), "ATGC");
        assert_eq!(seq.name.as_deref(), Some("seq1"));

        // Content detection sees past the mark too
        let unnamed = dir.path().join("x");
        fs::write(&unnamed, "\u{feff}>seq2\nGGCC\n").unwrap();
        assert_eq!(load_sequence_file(&unnamed, None).unwrap().name.as_deref(), Some("seq2"));
    }

    #[test]
    fn test_load_plain_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insert.txt");
        fs::write(&path, "acgu acgu\n").unwrap();

        let seq = load_sequence_file(&path, None).unwrap();
        assert_eq!(seq.bases(), "ACGUACGU");
        assert_eq!(seq.name.as_deref(), Some("insert"));
    }

    #[test]
    fn test_forced_format() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, ">header\nACGT").unwrap();

        // Forcing plain makes the header invalid sequence text
        let err = load_sequence_file(file.path(), Some(InputFormat::Plain)).unwrap_err();
        assert!(matches!(err, ParseError::Invalid(ValidationError::InvalidSymbols(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_sequence_file("/nonexistent/seq.fa", None).unwrap_err();
        assert!(matches!(err, ParseError::IoError(_)));
    }
}
