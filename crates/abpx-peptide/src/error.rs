//! Error types for the peptide prediction pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PeptideError>;

#[derive(Error, Debug)]
pub enum PeptideError {
    #[error("Empty sequence")]
    EmptySequence,

    #[error("Invalid residue '{residue}' at position {position}")]
    InvalidResidue { residue: char, position: usize },

    #[error("No sequences submitted")]
    EmptyInput,

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PeptideError {
    /// True for errors the user can fix by editing the sequence.
    pub fn is_invalid_sequence(&self) -> bool {
        matches!(self, PeptideError::EmptySequence | PeptideError::InvalidResidue { .. })
    }
}
