use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::StructureError;

/// PDB text returned by the folding service.
#[derive(Debug, Clone, PartialEq)]
pub struct StructurePayload(pub String);

impl StructurePayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of ATOM/HETATM records.
    pub fn atom_count(&self) -> usize {
        self.0
            .lines()
            .filter(|l| l.starts_with("ATOM") || l.starts_with("HETATM"))
            .count()
    }
}

/// Folding result for one input, at its 1-based input position.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureOutcome {
    pub index: usize,
    pub sequence: String,
    pub result: Result<StructurePayload, StructureError>,
}

impl StructureOutcome {
    pub fn payload(&self) -> Option<&StructurePayload> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&StructureError> {
        self.result.as_ref().err()
    }
}

// {"index", "sequence", "status": "folded", "pdb"} or {..., "status": "failed", "error"}
impl Serialize for StructureOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StructureOutcome", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("sequence", &self.sequence)?;
        match &self.result {
            Ok(payload) => {
                state.serialize_field("status", "folded")?;
                state.serialize_field("pdb", payload.as_str())?;
            }
            Err(e) => {
                state.serialize_field("status", "failed")?;
                state.serialize_field("error", e)?;
            }
        }
        state.end()
    }
}
