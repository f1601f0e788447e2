//! Record store for sequences, annotations and comments.
//!
//! A stored sequence has two identifiers: a short public view slug and a
//! longer secret edit token. Reads work with either; every mutation needs
//! the edit token, and annotations and comments may only be changed through
//! the token of the sequence that owns them.
//!
//! [`RecordStore`] is the seam; [`MemoryStore`] keeps everything in memory.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use crate::alphabet::{validate_sequence, ValidationError};
use crate::model::{Annotation, Comment, Sequence, SequenceType};

/// Length of public view slugs.
pub const VIEW_SLUG_LEN: usize = 10;
/// Length of secret edit tokens.
pub const EDIT_TOKEN_LEN: usize = 21;
/// Length of annotation and comment ids.
const RECORD_ID_LEN: usize = 16;

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Author recorded for comments submitted without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Errors returned by record store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Missing edit token")]
    MissingEditToken,

    #[error("Invalid edit token")]
    InvalidEditToken,

    #[error("Sequence not found")]
    SequenceNotFound,

    #[error("Annotation not found or access denied")]
    AnnotationNotFound,

    #[error("Comment not found or access denied")]
    CommentNotFound,

    #[error("Invalid position range {start}-{end}. start and end must be >= 1, and start <= end")]
    InvalidRange { start: usize, end: usize },

    #[error("label is required and must be a non-empty string")]
    EmptyLabel,

    #[error("color is required and must be a non-empty string")]
    EmptyColor,

    #[error("text is required and must be a non-empty string")]
    EmptyCommentText,

    #[error("No valid fields to update")]
    NoFieldsToUpdate,

    #[error("Sequence type mismatch. Detected: {detected}, provided: {provided}")]
    TypeMismatch {
        detected: SequenceType,
        provided: SequenceType,
    },

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Identifiers returned when a sequence is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceHandles {
    pub view_slug: String,
    pub edit_token: String,
}

/// A stored sequence with its annotations in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub view_slug: String,
    pub sequence: Sequence,
    pub annotations: Vec<Annotation>,
}

/// Fields of a new annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDraft {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub color: String,
    pub kind: Option<String>,
}

/// Partial update of an annotation; `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationPatch {
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub label: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the type.
    pub kind: Option<Option<String>>,
}

impl AnnotationPatch {
    fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.label.is_none()
            && self.color.is_none()
            && self.kind.is_none()
    }
}

/// Storage collaborator for sequences, annotations and comments.
pub trait RecordStore {
    /// Validates and stores a sequence. The declared type must match the detected one.
    fn create_sequence(
        &mut self,
        nucleotides: &str,
        seq_type: SequenceType,
        name: Option<String>,
    ) -> StoreResult<SequenceHandles>;

    fn sequence_by_view_slug(&self, view_slug: &str) -> StoreResult<SequenceRecord>;

    fn sequence_by_edit_token(&self, edit_token: &str) -> StoreResult<SequenceRecord>;

    fn create_annotation(&mut self, edit_token: &str, draft: AnnotationDraft) -> StoreResult<Annotation>;

    fn update_annotation(
        &mut self,
        edit_token: &str,
        annotation_id: &str,
        patch: AnnotationPatch,
    ) -> StoreResult<Annotation>;

    /// Deletes an annotation and its comments.
    fn delete_annotation(&mut self, edit_token: &str, annotation_id: &str) -> StoreResult<()>;

    fn create_comment(
        &mut self,
        edit_token: &str,
        annotation_id: &str,
        author: Option<&str>,
        text: &str,
    ) -> StoreResult<Comment>;

    fn delete_comment(&mut self, edit_token: &str, comment_id: &str) -> StoreResult<()>;

    /// Comments on an annotation, oldest first.
    fn comments(&self, annotation_id: &str) -> StoreResult<Vec<Comment>>;
}

fn validate_range(start: usize, end: usize) -> StoreResult<()> {
    if start < 1 || end < 1 || start > end {
        return Err(StoreError::InvalidRange { start, end });
    }
    Ok(())
}

fn non_empty(value: &str, err: StoreError) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Debug)]
struct StoredSequence {
    view_slug: String,
    sequence: Sequence,
}

#[derive(Debug)]
struct StoredAnnotation {
    sequence_key: String,
    annotation: Annotation,
}

/// In-memory [`RecordStore`].
///
/// Sequences are keyed by edit token. Annotation and comment order is
/// creation order.
#[derive(Debug)]
pub struct MemoryStore {
    rng: StdRng,
    sequences: HashMap<String, StoredSequence>,
    annotations: Vec<StoredAnnotation>,
    comments: Vec<Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Store with reproducible identifiers.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            sequences: HashMap::new(),
            annotations: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn random_id(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    /// Resolves an edit token to the key of the sequence it grants.
    fn authorize(&self, edit_token: &str) -> StoreResult<String> {
        if edit_token.is_empty() {
            return Err(StoreError::MissingEditToken);
        }
        if self.sequences.contains_key(edit_token) {
            Ok(edit_token.to_string())
        } else {
            Err(StoreError::InvalidEditToken)
        }
    }

    /// Index of an annotation owned by `sequence_key`.
    fn owned_annotation(&self, sequence_key: &str, annotation_id: &str) -> StoreResult<usize> {
        self.annotations
            .iter()
            .position(|a| a.annotation.id == annotation_id && a.sequence_key == sequence_key)
            .ok_or(StoreError::AnnotationNotFound)
    }

    fn record(&self, key: &str) -> StoreResult<SequenceRecord> {
        let stored = self.sequences.get(key).ok_or(StoreError::SequenceNotFound)?;
        let annotations = self
            .annotations
            .iter()
            .filter(|a| a.sequence_key == key)
            .map(|a| a.annotation.clone())
            .collect();
        Ok(SequenceRecord {
            view_slug: stored.view_slug.clone(),
            sequence: stored.sequence.clone(),
            annotations,
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn create_sequence(
        &mut self,
        nucleotides: &str,
        seq_type: SequenceType,
        name: Option<String>,
    ) -> StoreResult<SequenceHandles> {
        let sequence = validate_sequence(nucleotides)?;
        if sequence.seq_type() != seq_type {
            return Err(StoreError::TypeMismatch {
                detected: sequence.seq_type(),
                provided: seq_type,
            });
        }
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let view_slug = self.random_id(VIEW_SLUG_LEN);
        let edit_token = self.random_id(EDIT_TOKEN_LEN);
        info!(%view_slug, length = sequence.len(), %seq_type, "created sequence");

        self.sequences.insert(
            edit_token.clone(),
            StoredSequence {
                view_slug: view_slug.clone(),
                sequence: sequence.with_name(name),
            },
        );
        Ok(SequenceHandles { view_slug, edit_token })
    }

    fn sequence_by_view_slug(&self, view_slug: &str) -> StoreResult<SequenceRecord> {
        let key = self
            .sequences
            .iter()
            .find(|(_, s)| s.view_slug == view_slug)
            .map(|(key, _)| key.as_str())
            .ok_or(StoreError::SequenceNotFound)?;
        self.record(key)
    }

    fn sequence_by_edit_token(&self, edit_token: &str) -> StoreResult<SequenceRecord> {
        self.record(edit_token)
    }

    fn create_annotation(&mut self, edit_token: &str, draft: AnnotationDraft) -> StoreResult<Annotation> {
        let key = self.authorize(edit_token)?;
        validate_range(draft.start, draft.end)?;
        let label = non_empty(&draft.label, StoreError::EmptyLabel)?;
        let color = non_empty(&draft.color, StoreError::EmptyColor)?;

        let id = self.random_id(RECORD_ID_LEN);
        let mut annotation = Annotation::new(id, draft.start, draft.end, label, color);
        annotation.kind = draft.kind.filter(|k| !k.trim().is_empty());
        info!(id = %annotation.id, start = annotation.start, end = annotation.end, "created annotation");

        self.annotations.push(StoredAnnotation {
            sequence_key: key,
            annotation: annotation.clone(),
        });
        Ok(annotation)
    }

    fn update_annotation(
        &mut self,
        edit_token: &str,
        annotation_id: &str,
        patch: AnnotationPatch,
    ) -> StoreResult<Annotation> {
        let key = self.authorize(edit_token)?;
        let index = self.owned_annotation(&key, annotation_id)?;
        if patch.is_empty() {
            return Err(StoreError::NoFieldsToUpdate);
        }

        let mut updated = self.annotations[index].annotation.clone();
        if let Some(start) = patch.start {
            updated.start = start;
        }
        if let Some(end) = patch.end {
            updated.end = end;
        }
        validate_range(updated.start, updated.end)?;
        if let Some(label) = patch.label {
            updated.label = non_empty(&label, StoreError::EmptyLabel)?;
        }
        if let Some(color) = patch.color {
            updated.color = non_empty(&color, StoreError::EmptyColor)?;
        }
        if let Some(kind) = patch.kind {
            updated.kind = kind.filter(|k| !k.trim().is_empty());
        }

        info!(id = %updated.id, "updated annotation");
        self.annotations[index].annotation = updated.clone();
        Ok(updated)
    }

    fn delete_annotation(&mut self, edit_token: &str, annotation_id: &str) -> StoreResult<()> {
        let key = self.authorize(edit_token)?;
        let index = self.owned_annotation(&key, annotation_id)?;
        self.annotations.remove(index);
        self.comments.retain(|c| c.annotation_id != annotation_id);
        info!(id = %annotation_id, "deleted annotation");
        Ok(())
    }

    fn create_comment(
        &mut self,
        edit_token: &str,
        annotation_id: &str,
        author: Option<&str>,
        text: &str,
    ) -> StoreResult<Comment> {
        let key = self.authorize(edit_token)?;
        let text = non_empty(text, StoreError::EmptyCommentText)?;
        self.owned_annotation(&key, annotation_id)?;

        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string();
        let comment = Comment {
            id: self.random_id(RECORD_ID_LEN),
            annotation_id: annotation_id.to_string(),
            author,
            text,
        };
        info!(id = %comment.id, annotation = %annotation_id, "created comment");
        self.comments.push(comment.clone());
        Ok(comment)
    }

    fn delete_comment(&mut self, edit_token: &str, comment_id: &str) -> StoreResult<()> {
        let key = self.authorize(edit_token)?;
        // Ownership chain: comment -> annotation -> sequence -> token
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .filter(|&i| self.owned_annotation(&key, &self.comments[i].annotation_id).is_ok())
            .ok_or(StoreError::CommentNotFound)?;
        self.comments.remove(index);
        info!(id = %comment_id, "deleted comment");
        Ok(())
    }

    fn comments(&self, annotation_id: &str) -> StoreResult<Vec<Comment>> {
        if !self.annotations.iter().any(|a| a.annotation.id == annotation_id) {
            return Err(StoreError::AnnotationNotFound);
        }
        Ok(self
            .comments
            .iter()
            .filter(|c| c.annotation_id == annotation_id)
            .cloned()
            .collect())
    }
}
