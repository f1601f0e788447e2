//! Tab-separated annotation snapshots.
//!
//! One annotation per line, 1-based inclusive coordinates:
//!
//! ```text
//! # start  end  label  [color]  [type]
//! 1	120	lacZ	#ef4444	gene
//! 80	95	promoter
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Annotations get
//! ids from their line number and keep file order, which is their
//! creation order for coverage resolution.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::model::{Annotation, DEFAULT_ANNOTATION_COLOR};

/// Errors that can occur while reading an annotation file.
#[derive(Error, Debug)]
pub enum AnnotationFileError {
    #[error("Failed to read annotation file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Line {line}: invalid position range {start}-{end} (start and end must be >= 1, and start <= end)")]
    InvalidRange { line: usize, start: usize, end: usize },
}

/// Result type for annotation file operations.
pub type AnnotationFileResult<T> = Result<T, AnnotationFileError>;

fn parse_position(field: Option<&str>, name: &str, line: usize) -> AnnotationFileResult<usize> {
    let field = field.map(str::trim).ok_or_else(|| AnnotationFileError::Malformed {
        line,
        message: format!("missing {name}"),
    })?;
    field.parse().map_err(|_| AnnotationFileError::Malformed {
        line,
        message: format!("{name} must be a number (got {field:?})"),
    })
}

/// Parses annotation lines from a string.
pub fn parse_annotations_str(content: &str) -> AnnotationFileResult<Vec<Annotation>> {
    let mut annotations = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }

        let mut fields = raw.split('\t');
        let start = parse_position(fields.next(), "start", line)?;
        let end = parse_position(fields.next(), "end", line)?;
        if start < 1 || end < 1 || start > end {
            return Err(AnnotationFileError::InvalidRange { line, start, end });
        }

        let label = fields.next().map(str::trim).unwrap_or_default();
        if label.is_empty() {
            return Err(AnnotationFileError::Malformed {
                line,
                message: "label is required".to_string(),
            });
        }

        let color = fields
            .next()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ANNOTATION_COLOR);

        let mut annotation = Annotation::new(format!("line{line}"), start, end, label, color);
        if let Some(kind) = fields.next().map(str::trim).filter(|k| !k.is_empty()) {
            annotation = annotation.with_kind(kind);
        }
        annotations.push(annotation);
    }

    debug!(count = annotations.len(), "parsed annotations");
    Ok(annotations)
}

/// Loads an annotation file.
pub fn load_annotations_file<P: AsRef<Path>>(path: P) -> AnnotationFileResult<Vec<Annotation>> {
    let content = fs::read_to_string(path)?;
    parse_annotations_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_and_minimal_lines() {
        let content = "# header\n1\t120\tlacZ\t#ef4444\tgene\n\n80\t95\tpromoter\n";
        let annotations = parse_annotations_str(content).unwrap();

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].id, "line2");
        assert_eq!((annotations[0].start, annotations[0].end), (1, 120));
        assert_eq!(annotations[0].color, "#ef4444");
        assert_eq!(annotations[0].kind.as_deref(), Some("gene"));
        assert_eq!(annotations[1].label, "promoter");
        assert_eq!(annotations[1].color, DEFAULT_ANNOTATION_COLOR);
        assert!(annotations[1].kind.is_none());
    }

    #[test]
    fn test_invalid_range() {
        let err = parse_annotations_str("10\t5\tbackwards").unwrap_err();
        assert!(matches!(err, AnnotationFileError::InvalidRange { line: 1, start: 10, end: 5 }));

        let err = parse_annotations_str("0\t5\tzero").unwrap_err();
        assert!(matches!(err, AnnotationFileError::InvalidRange { .. }));
    }

    #[test]
    fn test_malformed_lines() {
        let err = parse_annotations_str("1\tx\tlabel").unwrap_err();
        assert_eq!(err.to_string(), "Line 1: end must be a number (got \"x\")");

        let err = parse_annotations_str("# c\n1\t2").unwrap_err();
        assert!(matches!(err, AnnotationFileError::Malformed { line: 2, .. }));

        let err = parse_annotations_str("5").unwrap_err();
        assert!(matches!(err, AnnotationFileError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "3\t9\tsite\t#22c55e").unwrap();

        let annotations = load_annotations_file(file.path()).unwrap();
        assert_eq!(annotations, vec![Annotation::new("line1", 3, 9, "site", "#22c55e")]);
    }
}
