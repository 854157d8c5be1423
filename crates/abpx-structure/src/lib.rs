//! abpx-structure: 3D structure prediction for submitted peptides.
//!
//! Each sequence is posted to the folding service on its own; every input
//! gets exactly one tagged outcome at its input position, so a failed call
//! never shifts or drops the others.

pub mod error;
pub mod esm;
pub mod outcome;

pub use error::StructureError;
pub use esm::FoldingClient;
pub use outcome::{StructureOutcome, StructurePayload};
