//! Composition statistics over a peptide.
//!
//! Each source turns one sequence into a row of named numeric columns. The
//! feature extractor only relies on the column names, so a source may emit
//! columns the model ignores or omit columns the model expects.
//!
//! Per-residue values describe the free amino acid (e.g. alanine is
//! C3H7NO2). Bond counts use the Kekulé form of aromatic rings; the hydrogen
//! bond column counts covalent bonds to hydrogen.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::sequence::{residue_index, validate};

/// One row of named composition values.
pub type CompositionRow = BTreeMap<String, f64>;

pub trait CompositionSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Compute the row for one sequence.
    fn compute(&self, sequence: &str) -> Result<CompositionRow>;
}

// ── Residue tables ──────────────────────────────────────────────
// Rows follow `sequence::AMINO_ACIDS` order.

/// Atom counts per residue: [C, H, N, O, S].
const ATOMS: [[u32; 5]; 20] = [
    [3, 7, 1, 2, 0],   // A
    [3, 7, 1, 2, 1],   // C
    [4, 7, 1, 4, 0],   // D
    [5, 9, 1, 4, 0],   // E
    [9, 11, 1, 2, 0],  // F
    [2, 5, 1, 2, 0],   // G
    [6, 9, 3, 2, 0],   // H
    [6, 13, 1, 2, 0],  // I
    [6, 14, 2, 2, 0],  // K
    [6, 13, 1, 2, 0],  // L
    [5, 11, 1, 2, 1],  // M
    [4, 8, 2, 3, 0],   // N
    [5, 9, 1, 2, 0],   // P
    [5, 10, 2, 3, 0],  // Q
    [6, 14, 4, 2, 0],  // R
    [3, 7, 1, 3, 0],   // S
    [4, 9, 1, 3, 0],   // T
    [5, 11, 1, 2, 0],  // V
    [11, 12, 2, 2, 0], // W
    [9, 11, 1, 3, 0],  // Y
];

/// Bond counts per residue: [total, hydrogen, single, double].
const BONDS: [[u32; 4]; 20] = [
    [12, 7, 11, 1],  // A
    [13, 7, 12, 1],  // C
    [15, 7, 13, 2],  // D
    [18, 9, 16, 2],  // E
    [23, 11, 19, 4], // F
    [9, 5, 8, 1],    // G
    [20, 9, 17, 3],  // H
    [21, 13, 20, 1], // I
    [23, 14, 22, 1], // K
    [21, 13, 20, 1], // L
    [19, 11, 18, 1], // M
    [16, 8, 14, 2],  // N
    [17, 9, 16, 1],  // P
    [19, 10, 17, 2], // Q
    [25, 14, 23, 2], // R
    [13, 7, 12, 1],  // S
    [16, 9, 15, 1],  // T
    [18, 11, 17, 1], // V
    [28, 12, 23, 5], // W
    [24, 11, 20, 4], // Y
];

const ATOM_COLUMNS: [&str; 5] = ["ATC_C", "ATC_H", "ATC_N", "ATC_O", "ATC_S"];
const BOND_COLUMNS: [&str; 4] = ["BTC_T", "BTC_H", "BTC_S", "BTC_D"];

/// Sum a per-residue table over the sequence. Caller has validated it.
fn sum_table<const N: usize>(sequence: &str, table: &[[u32; N]; 20]) -> [u64; N] {
    let mut totals = [0u64; N];
    for idx in sequence.chars().filter_map(residue_index) {
        for (total, count) in totals.iter_mut().zip(table[idx]) {
            *total += u64::from(count);
        }
    }
    totals
}

/// Atom-type composition: each atom type's share of all atoms in the peptide.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomComposition;

impl CompositionSource for AtomComposition {
    fn name(&self) -> &'static str {
        "atom-type composition"
    }

    fn compute(&self, sequence: &str) -> Result<CompositionRow> {
        validate(sequence)?;
        let counts = sum_table(sequence, &ATOMS);
        let total: u64 = counts.iter().sum();

        Ok(ATOM_COLUMNS
            .iter()
            .zip(counts)
            .map(|(col, count)| (col.to_string(), count as f64 / total as f64))
            .collect())
    }
}

/// Bond-type composition: absolute bond counts summed over the peptide.
#[derive(Debug, Default, Clone, Copy)]
pub struct BondComposition;

impl CompositionSource for BondComposition {
    fn name(&self) -> &'static str {
        "bond-type composition"
    }

    fn compute(&self, sequence: &str) -> Result<CompositionRow> {
        validate(sequence)?;
        let counts = sum_table(sequence, &BONDS);

        Ok(BOND_COLUMNS
            .iter()
            .zip(counts)
            .map(|(col, count)| (col.to_string(), count as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeptideError;
    use crate::sequence::AMINO_ACIDS;

    #[test]
    fn test_bond_table_consistent_with_atoms() {
        for (i, aa) in AMINO_ACIDS.chars().enumerate() {
            let [total, hydrogen, single, double] = BONDS[i];
            assert_eq!(total, single + double, "{aa}: total != single + double");
            assert_eq!(hydrogen, ATOMS[i][1], "{aa}: one bond per hydrogen atom");
        }
    }

    #[test]
    fn test_acyclic_residues_have_atoms_minus_one_bonds() {
        // Everything except P, F, H, W, Y is a tree.
        for (i, aa) in AMINO_ACIDS.chars().enumerate() {
            if "PFHWY".contains(aa) {
                continue;
            }
            let atoms: u32 = ATOMS[i].iter().sum();
            assert_eq!(BONDS[i][0], atoms - 1, "{aa}");
        }
    }

    #[test]
    fn test_atom_fractions_for_known_peptide() {
        let row = AtomComposition.compute("AAACCCDDDEEE").unwrap();
        // C 45, H 90, N 12, O 36, S 3 → 186 atoms
        assert!((row["ATC_C"] - 45.0 / 186.0).abs() < 1e-12);
        assert!((row["ATC_H"] - 90.0 / 186.0).abs() < 1e-12);
        assert!((row["ATC_S"] - 3.0 / 186.0).abs() < 1e-12);
        let sum: f64 = row.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bond_counts_case_insensitive() {
        let upper = BondComposition.compute("GW").unwrap();
        let lower = BondComposition.compute("gw").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper["BTC_T"], 37.0);
        assert_eq!(upper["BTC_D"], 6.0);
    }

    #[test]
    fn test_invalid_sequence_is_error_not_panic() {
        assert!(matches!(
            AtomComposition.compute(""),
            Err(PeptideError::EmptySequence)
        ));
        assert!(BondComposition.compute("AXA").is_err());
    }
}
