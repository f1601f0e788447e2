//! Reading-frame aware codon segmentation.
//!
//! A validated sequence is split into [`CodonGroup`]s: leading orphan bases
//! for frames 1 and 2, then in-frame triplets, with a possibly truncated
//! final group. Positions are 1-indexed and contiguous across the output.
//!
//! ```text
//! frame 0:  ATG|GCA|TAA
//! frame 1:  A|TGG|CAT|AA
//! frame 2:  A|T|GGC|ATA|A
//! ```

use std::fmt;

use crate::genetic_code::{AminoAcid, GeneticCode, STANDARD};
use crate::model::Sequence;

/// Offset (0, 1 or 2) at which codon segmentation begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadingFrame {
    #[default]
    Zero,
    One,
    Two,
}

impl ReadingFrame {
    pub const ALL: [ReadingFrame; 3] = [ReadingFrame::Zero, ReadingFrame::One, ReadingFrame::Two];

    /// Builds a frame from a 0-based offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset > 2`. An out-of-range frame is a caller bug; use
    /// `TryFrom<u8>` for untrusted values.
    pub fn from_offset(offset: usize) -> Self {
        match offset {
            0 => ReadingFrame::Zero,
            1 => ReadingFrame::One,
            2 => ReadingFrame::Two,
            _ => panic!("reading frame offset must be 0, 1 or 2 (got {offset})"),
        }
    }

    /// Number of leading bases skipped before the first in-frame codon.
    pub fn offset(self) -> usize {
        match self {
            ReadingFrame::Zero => 0,
            ReadingFrame::One => 1,
            ReadingFrame::Two => 2,
        }
    }
}

impl TryFrom<u8> for ReadingFrame {
    type Error = String;

    fn try_from(offset: u8) -> Result<Self, Self::Error> {
        match offset {
            0..=2 => Ok(ReadingFrame::from_offset(offset as usize)),
            _ => Err(format!("reading frame offset must be 0, 1 or 2 (got {offset})")),
        }
    }
}

impl fmt::Display for ReadingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Displayed 1-based, like the CLI flag
        write!(f, "+{}", self.offset() + 1)
    }
}

/// A 1 to 3 base unit of a segmented sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonGroup {
    pub bases: String,
    /// `None` for orphan bases and for a truncated final group.
    pub amino_acid: Option<AminoAcid>,
    /// 1-indexed position of the first base.
    pub position: usize,
    pub is_orphan: bool,
}

impl CodonGroup {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// 1-indexed position of the last base.
    pub fn end(&self) -> usize {
        self.position + self.len() - 1
    }

    pub fn is_complete(&self) -> bool {
        self.len() == 3 && !self.is_orphan
    }
}

/// Splits a sequence into codon groups using the standard genetic code.
pub fn split_into_codon_groups(sequence: &Sequence, frame: ReadingFrame) -> Vec<CodonGroup> {
    split_into_codon_groups_with(sequence, frame, &STANDARD)
}

/// Splits a sequence into codon groups, translating with `code`.
pub fn split_into_codon_groups_with(
    sequence: &Sequence,
    frame: ReadingFrame,
    code: &GeneticCode,
) -> Vec<CodonGroup> {
    let bases = sequence.bases();
    let offset = frame.offset();
    let mut groups = Vec::with_capacity(bases.len() / 3 + offset + 1);

    // Orphans never exceed the sequence length
    for i in 0..offset.min(bases.len()) {
        groups.push(CodonGroup {
            bases: bases[i..i + 1].to_string(),
            amino_acid: None,
            position: i + 1,
            is_orphan: true,
        });
    }

    let mut i = offset;
    while i < bases.len() {
        let end = (i + 3).min(bases.len());
        let codon = &bases[i..end];
        let amino_acid = if codon.len() == 3 {
            Some(code.translate_codon(codon.as_bytes()))
        } else {
            None
        };
        groups.push(CodonGroup {
            bases: codon.to_string(),
            amino_acid,
            position: i + 1,
            is_orphan: false,
        });
        i += 3;
    }

    groups
}

/// Translated amino acids of complete codons, in order.
pub fn translation(groups: &[CodonGroup]) -> String {
    groups
        .iter()
        .filter_map(|g| g.amino_acid)
        .map(AminoAcid::symbol)
        .collect()
}
