//! Amino-acid alphabet and sequence validation.

use crate::error::{PeptideError, Result};

/// The 20 standard amino acids, in the order used by the residue tables.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Map an amino-acid letter (either case) to its index 0–19.
pub fn residue_index(residue: char) -> Option<usize> {
    match residue.to_ascii_uppercase() {
        'A' => Some(0),
        'C' => Some(1),
        'D' => Some(2),
        'E' => Some(3),
        'F' => Some(4),
        'G' => Some(5),
        'H' => Some(6),
        'I' => Some(7),
        'K' => Some(8),
        'L' => Some(9),
        'M' => Some(10),
        'N' => Some(11),
        'P' => Some(12),
        'Q' => Some(13),
        'R' => Some(14),
        'S' => Some(15),
        'T' => Some(16),
        'V' => Some(17),
        'W' => Some(18),
        'Y' => Some(19),
        _ => None,
    }
}

/// Check a sequence against the amino-acid alphabet, case-insensitively.
///
/// Fails on an empty sequence, or names the first residue outside the
/// alphabet with its 1-based position.
pub fn validate(sequence: &str) -> Result<()> {
    if sequence.is_empty() {
        return Err(PeptideError::EmptySequence);
    }
    match sequence
        .chars()
        .enumerate()
        .find(|(_, c)| residue_index(*c).is_none())
    {
        Some((i, residue)) => Err(PeptideError::InvalidResidue { residue, position: i + 1 }),
        None => Ok(()),
    }
}

pub fn is_valid(sequence: &str) -> bool {
    validate(sequence).is_ok()
}

/// Split text-area input into sequences: one per line, trimmed, blank lines dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
