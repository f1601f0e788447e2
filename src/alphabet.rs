//! Nucleotide alphabet validation.
//!
//! Raw user text is cleaned (all whitespace removed, uppercased) and then
//! classified as DNA (`ACGT`) or RNA (`ACGU`). A sequence may use T or U,
//! never both.
//!
//! ```
//! use seqview::alphabet::validate_sequence;
//! use seqview::model::SequenceType;
//!
//! let seq = validate_sequence(" a t g c \n").unwrap();
//! assert_eq!(seq.bases(), "ATGC");
//! assert_eq!(seq.seq_type(), SequenceType::Dna);
//! ```

use thiserror::Error;
use tracing::debug;

use crate::model::{Sequence, SequenceType};

/// Maximum number of bases accepted after cleaning.
pub const MAX_SEQUENCE_LENGTH: usize = 100_000;

/// Symbols accepted by the validator (union of the DNA and RNA alphabets).
pub const VALID_SYMBOLS: &[u8] = b"ACGTU";

/// UTF-8 byte-order mark, skipped like whitespace.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == BYTE_ORDER_MARK
}

/// Drops a leading byte-order mark.
pub fn strip_bom(input: &str) -> &str {
    input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input)
}

/// Reasons a raw input is rejected.
///
/// These are categorical and never retried; callers display them as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Sequence cannot be empty")]
    EmptyInput,

    #[error("Sequence exceeds maximum length of {max} bases (got {length})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid characters found: {}. Only A, T, G, C (DNA) or A, U, G, C (RNA) are allowed.", join_symbols(.0))]
    InvalidSymbols(Vec<char>),

    #[error("Sequence cannot contain both T (DNA) and U (RNA). Please use one type only.")]
    MixedAlphabet,

    #[error("No sequence found in FASTA input")]
    NoSequenceFound,
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn join_symbols(symbols: &[char]) -> String {
    symbols
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Removes every whitespace character (and byte-order mark) and uppercases the rest.
pub fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|&c| !is_blank(c))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Validates and classifies raw text as a DNA or RNA sequence.
///
/// Checks run in a fixed order so that the reported error is stable:
/// emptiness, length, symbol set, then T/U mixing.
pub fn validate_sequence(input: &str) -> ValidationResult<Sequence> {
    if input.trim_matches(is_blank).is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let cleaned = clean(input);
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    // Count chars, not bytes: uppercasing can turn one char into several.
    let length = cleaned.chars().count();
    if length > MAX_SEQUENCE_LENGTH {
        debug!(length, "rejecting oversized sequence");
        return Err(ValidationError::TooLong {
            length,
            max: MAX_SEQUENCE_LENGTH,
        });
    }

    let mut invalid: Vec<char> = Vec::new();
    for c in cleaned.chars() {
        let valid = c.is_ascii() && VALID_SYMBOLS.contains(&(c as u8));
        if !valid && !invalid.contains(&c) {
            invalid.push(c);
        }
    }
    if !invalid.is_empty() {
        debug!(?invalid, "rejecting sequence with invalid symbols");
        return Err(ValidationError::InvalidSymbols(invalid));
    }

    let has_t = cleaned.contains('T');
    let has_u = cleaned.contains('U');
    if has_t && has_u {
        return Err(ValidationError::MixedAlphabet);
    }

    let seq_type = if has_u {
        SequenceType::Rna
    } else {
        SequenceType::Dna
    };

    Ok(Sequence::from_validated(cleaned, seq_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleans_whitespace_and_case() {
        let seq = validate_sequence(" a t g c \n").unwrap();
        assert_eq!(seq.bases(), "ATGC");
        assert_eq!(seq.seq_type(), SequenceType::Dna);
        assert!(seq.name.is_none());
    }

    #[test]
    fn test_detects_rna() {
        let seq = validate_sequence("augc\r\nAUGC").unwrap();
        assert_eq!(seq.bases(), "AUGCAUGC");
        assert_eq!(seq.seq_type(), SequenceType::Rna);
    }

    #[test]
    fn test_no_t_or_u_defaults_to_dna() {
        let seq = validate_sequence("GGCCA").unwrap();
        assert_eq!(seq.seq_type(), SequenceType::Dna);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let seq = validate_sequence("\u{feff}ATGC\n").unwrap();
        assert_eq!(seq.bases(), "ATGC");
        assert_eq!(validate_sequence("\u{feff} \n"), Err(ValidationError::EmptyInput));
        assert_eq!(strip_bom("\u{feff}>x"), ">x");
        assert_eq!(strip_bom("ACGT"), "ACGT");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_sequence(""), Err(ValidationError::EmptyInput));
        assert_eq!(validate_sequence("  \n\t "), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn test_too_long() {
        let input = "A".repeat(MAX_SEQUENCE_LENGTH + 1);
        assert_eq!(
            validate_sequence(&input),
            Err(ValidationError::TooLong {
                length: MAX_SEQUENCE_LENGTH + 1,
                max: MAX_SEQUENCE_LENGTH
            })
        );

        // Whitespace does not count toward the limit
        let mut input = "A".repeat(MAX_SEQUENCE_LENGTH);
        input.push_str("\n\n  ");
        assert_eq!(validate_sequence(&input).unwrap().len(), MAX_SEQUENCE_LENGTH);
    }

    #[test]
    fn test_invalid_symbols_are_distinct_and_ordered() {
        let err = validate_sequence("ATGNNXatgx").unwrap_err();
        assert_eq!(err, ValidationError::InvalidSymbols(vec!['N', 'X']));
        assert_eq!(
            err.to_string(),
            "Invalid characters found: N, X. Only A, T, G, C (DNA) or A, U, G, C (RNA) are allowed."
        );
    }

    #[test]
    fn test_non_ascii_symbols_rejected() {
        let err = validate_sequence("ATGé").unwrap_err();
        assert_eq!(err, ValidationError::InvalidSymbols(vec!['É']));
    }

    #[test]
    fn test_length_checked_before_symbols() {
        let input = "N".repeat(MAX_SEQUENCE_LENGTH + 1);
        assert!(matches!(
            validate_sequence(&input),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_mixed_alphabet() {
        assert_eq!(validate_sequence("ATGU"), Err(ValidationError::MixedAlphabet));
    }
}
