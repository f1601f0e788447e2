//! Genetic code definitions and codon translation.
//!
//! This module provides:
//! - The standard genetic code (NCBI table 1) and a few alternative NCBI tables
//! - Codon to amino acid translation for DNA and RNA codons
//!
//! Tables are stored in NCBI `ncbieaa` order (TTT, TTC, TTA, TTG, TCT, ...),
//! so a codon is looked up by computing its index instead of hashing.

use std::fmt;

/// Result of translating one codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    /// One of the 20 standard amino acids, by one-letter code.
    Residue(char),
    /// Stop codon.
    Stop,
    /// Codon outside the table (not three of A, C, G, T/U).
    Unknown,
}

impl AminoAcid {
    /// Single display symbol: the one-letter code, `*` for stop, `?` for unknown.
    pub fn symbol(self) -> char {
        match self {
            AminoAcid::Residue(c) => c,
            AminoAcid::Stop => '*',
            AminoAcid::Unknown => '?',
        }
    }

    pub fn is_stop(self) -> bool {
        self == AminoAcid::Stop
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: &'static str,
    /// 64 amino acid symbols in NCBI codon order, `*` for stop
    ncbieaa: &'static [u8; 64],
}

/// NCBI table 1.
pub const STANDARD: GeneticCode = GeneticCode {
    id: 1,
    name: "Standard",
    ncbieaa: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
};

const ALTERNATIVE_CODES: [GeneticCode; 5] = [
    GeneticCode {
        id: 2,
        name: "Vertebrate Mitochondrial",
        ncbieaa: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 3,
        name: "Yeast Mitochondrial",
        ncbieaa: b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 4,
        name: "Mold/Protozoan/Coelenterate Mitochondrial",
        ncbieaa: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 5,
        name: "Invertebrate Mitochondrial",
        ncbieaa: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 11,
        name: "Bacterial/Archaeal/Plant Plastid",
        ncbieaa: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
];

/// Position of a nucleotide in NCBI ordering (T, C, A, G). U is read as T.
fn base_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

impl GeneticCode {
    /// Looks up a genetic code by NCBI id.
    pub fn by_id(id: u8) -> Option<GeneticCode> {
        if id == STANDARD.id {
            return Some(STANDARD);
        }
        ALTERNATIVE_CODES.iter().find(|c| c.id == id).copied()
    }

    /// All codes this crate knows, standard first.
    pub fn all() -> impl Iterator<Item = GeneticCode> {
        std::iter::once(STANDARD).chain(ALTERNATIVE_CODES)
    }

    /// Translates a single codon.
    ///
    /// DNA and RNA codons are both accepted (T and U are equivalent) and
    /// case is ignored. Anything that is not exactly three valid nucleotides
    /// yields [`AminoAcid::Unknown`]; this never fails.
    pub fn translate_codon(&self, codon: &[u8]) -> AminoAcid {
        let [b1, b2, b3] = codon else {
            return AminoAcid::Unknown;
        };
        let (Some(i1), Some(i2), Some(i3)) = (base_index(*b1), base_index(*b2), base_index(*b3))
        else {
            return AminoAcid::Unknown;
        };

        match self.ncbieaa[i1 * 16 + i2 * 4 + i3] {
            b'*' => AminoAcid::Stop,
            aa => AminoAcid::Residue(aa as char),
        }
    }

    pub fn is_stop_codon(&self, codon: &[u8]) -> bool {
        self.translate_codon(codon).is_stop()
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        STANDARD
    }
}

/// Translates a codon with the standard genetic code.
pub fn translate_codon(codon: &str) -> AminoAcid {
    STANDARD.translate_codon(codon.as_bytes())
}
