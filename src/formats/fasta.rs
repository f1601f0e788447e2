//! FASTA input handling.
//!
//! Only the first record is used. A header line (starting with `>`) is
//! optional; when present its text becomes the sequence name. Sequence lines
//! are concatenated until the next header.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence      (ignored)
//! TGCATGCATGCA...
//! ```

use tracing::debug;

use crate::alphabet::{strip_bom, validate_sequence, ValidationError, ValidationResult};
use crate::model::Sequence;

/// Marks a header line.
pub const HEADER_SENTINEL: char = '>';

/// The raw first record of a FASTA text, before alphabet validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header text without the sentinel, trimmed; `None` when absent or blank
    pub header: Option<String>,
    /// Concatenated sequence lines (each trimmed)
    pub data: String,
}

/// Extracts the first record of a FASTA text.
///
/// A header only counts as the record's header when it precedes every
/// sequence line; any later header ends the record.
pub fn first_record(content: &str) -> FastaRecord {
    let mut header = None;
    let mut data = String::new();
    let mut in_first_record = false;

    for line in strip_bom(content).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(HEADER_SENTINEL) {
            if in_first_record {
                // Next record: stop
                break;
            }
            let rest = rest.trim();
            header = (!rest.is_empty()).then(|| rest.to_string());
            in_first_record = true;
            continue;
        }

        data.push_str(line);
        in_first_record = true;
    }

    FastaRecord { header, data }
}

/// Validates the first record of a FASTA text.
///
/// Fails with [`ValidationError::NoSequenceFound`] when the first record
/// has no sequence lines; otherwise delegates to
/// [`validate_sequence`] and attaches the header as the sequence name.
pub fn validate_fasta(content: &str) -> ValidationResult<Sequence> {
    let record = first_record(content);
    if record.data.is_empty() {
        debug!(header = ?record.header, "FASTA input has no sequence lines");
        return Err(ValidationError::NoSequenceFound);
    }

    Ok(validate_sequence(&record.data)?.with_name(record.header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequenceType;

    #[test]
    fn test_header_and_wrapped_lines() {
        let seq = validate_fasta(">my-seq\nATGC\nGATTACA\n").unwrap();
        assert_eq!(seq.bases(), "ATGCGATTACA");
        assert_eq!(seq.name.as_deref(), Some("my-seq"));
        assert_eq!(seq.seq_type(), SequenceType::Dna);
    }

    #[test]
    fn test_without_header() {
        let seq = validate_fasta("ATGC\nGATTACA").unwrap();
        assert_eq!(seq.bases(), "ATGCGATTACA");
        assert!(seq.name.is_none());
    }

    #[test]
    fn test_only_first_record_is_used() {
        let seq = validate_fasta(">first\nATGC\n>second\nGATTACA").unwrap();
        assert_eq!(seq.bases(), "ATGC");
        assert_eq!(seq.name.as_deref(), Some("first"));
    }

    #[test]
    fn test_header_after_sequence_ends_record() {
        let record = first_record("ATGC\n>second\nGGGG");
        assert_eq!(record.header, None);
        assert_eq!(record.data, "ATGC");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let seq = validate_fasta("\r\n>  spaced name  \r\n\r\naugc\r\n  augc  \r\n").unwrap();
        assert_eq!(seq.bases(), "AUGCAUGC");
        assert_eq!(seq.name.as_deref(), Some("spaced name"));
        assert_eq!(seq.seq_type(), SequenceType::Rna);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let seq = validate_fasta("\u{feff}>seq1\nATGC\n").unwrap();
        assert_eq!(seq.bases(), "ATGC");
        assert_eq!(seq.name.as_deref(), Some("seq1"));
    }

    #[test]
    fn test_blank_header_is_no_name() {
        let seq = validate_fasta(">\nACGT").unwrap();
        assert!(seq.name.is_none());
    }

    #[test]
    fn test_no_sequence_found() {
        assert_eq!(validate_fasta(">only-header"), Err(ValidationError::NoSequenceFound));
        assert_eq!(validate_fasta(""), Err(ValidationError::NoSequenceFound));
        assert_eq!(validate_fasta("  \n \n"), Err(ValidationError::NoSequenceFound));
        assert_eq!(
            validate_fasta(">first\n>second\nACGT"),
            Err(ValidationError::NoSequenceFound)
        );
    }

    #[test]
    fn test_validation_errors_pass_through() {
        assert_eq!(validate_fasta(">x\nATGU"), Err(ValidationError::MixedAlphabet));
        assert_eq!(
            validate_fasta(">x\nATGN"),
            Err(ValidationError::InvalidSymbols(vec!['N']))
        );
    }
}
