//! abpx-peptide: From raw peptide text to antibacterial-activity predictions.
//!
//! 1. Splitting free text and FASTA uploads into sequences
//! 2. Validating sequences against the 20 standard amino acids
//! 3. Atom- and bond-type composition features
//! 4. Random-forest classification
//! 5. Per-entry screening that keeps invalid entries in place

pub mod error;
pub mod sequence;
pub mod fasta;
pub mod composition;
pub mod features;
pub mod classifier;
pub mod pipeline;

pub use classifier::{Classifier, ForestClassifier, ModelInfo};
pub use error::{PeptideError, Result};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_COLUMNS};
pub use pipeline::{Prediction, PredictionPipeline, ScreenedPeptide, Verdict};
