//! # seqview - Sequence Layout Engine and Viewer
//!
//! Turns a DNA/RNA sequence and its annotations into display rows:
//! codon groups in a chosen reading frame, chunked into rows that never
//! split a codon, with annotations packed into non-overlapping lanes.
//!
//! ## Architecture
//!
//! The layout engine is pure and deterministic:
//! - `alphabet`: input cleaning and nucleotide validation
//! - `genetic_code`: codon tables and translation
//! - `segment`: reading frames and codon groups
//! - `rows`: chunking groups into rows
//! - `lanes`: packing annotations into lanes per row
//! - `coverage`: which annotation colors a base
//! - `layout`: the whole pipeline for one sequence
//!
//! Around it:
//! - `model`: domain types and interactive viewer state
//! - `formats`: FASTA/plain sequence and annotation file loading
//! - `store`: sequences, annotations and comments with edit-token access
//! - `text_view`: plain-text rendering of a layout
//! - `event`, `ui`, `controller`: the ratatui viewer
//! - `logging`: tracing subscriber setup

pub mod alphabet;
pub mod config;
pub mod controller;
pub mod coverage;
pub mod event;
pub mod formats;
pub mod genetic_code;
pub mod lanes;
pub mod layout;
pub mod logging;
pub mod model;
pub mod rows;
pub mod segment;
pub mod store;
pub mod text_view;
pub mod ui;
