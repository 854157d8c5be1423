//! Feature assembly: composition rows → fixed 9-column model input.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::composition::{AtomComposition, BondComposition, CompositionRow, CompositionSource};
use crate::error::Result;

/// Column order the classifier was trained on.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "ATC_C", "ATC_H", "ATC_N", "ATC_O", "ATC_S",
    "BTC_T", "BTC_H", "BTC_S", "BTC_D",
];

pub const N_FEATURES: usize = FEATURE_COLUMNS.len();

/// One model input row, in `FEATURE_COLUMNS` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }

    /// Reindex a row onto the fixed schema: absent columns are 0, extra columns dropped.
    pub fn from_row(row: &CompositionRow) -> Self {
        let mut values = [0.0; N_FEATURES];
        for (value, col) in values.iter_mut().zip(FEATURE_COLUMNS) {
            if let Some(v) = row.get(col) {
                *value = *v;
            }
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.0
    }

    /// Look up a feature by column name.
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.0[i])
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(N_FEATURES))?;
        for (col, value) in FEATURE_COLUMNS.iter().zip(self.0.iter()) {
            map.serialize_entry(col, value)?;
        }
        map.end()
    }
}

/// Runs the atom and bond composition sources and joins their rows.
pub struct FeatureExtractor {
    atom: Box<dyn CompositionSource>,
    bond: Box<dyn CompositionSource>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Box::new(AtomComposition), Box::new(BondComposition))
    }
}

impl FeatureExtractor {
    pub fn new(atom: Box<dyn CompositionSource>, bond: Box<dyn CompositionSource>) -> Self {
        Self { atom, bond }
    }

    /// One feature vector per sequence, in input order.
    pub fn extract<S: AsRef<str>>(&self, sequences: &[S]) -> Result<Vec<FeatureVector>> {
        let atom_rows = sequences
            .iter()
            .map(|s| self.atom.compute(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let bond_rows = sequences
            .iter()
            .map(|s| self.bond.compute(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Computed {} and {} for {} sequences",
            self.atom.name(),
            self.bond.name(),
            sequences.len()
        );

        // Column-wise join by row position; on a name clash the atom row wins.
        let vectors = atom_rows
            .into_iter()
            .zip(bond_rows)
            .map(|(mut joined, bond)| {
                for (col, value) in bond {
                    joined.entry(col).or_insert(value);
                }
                FeatureVector::from_row(&joined)
            })
            .collect();

        Ok(vectors)
    }
}
