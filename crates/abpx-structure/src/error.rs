//! Per-sequence folding failures.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StructureError {
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Folding service returned status {0}")]
    Status(u16),

    #[error("Folding service timed out after {0}s")]
    Timeout(u64),

    #[error("Folding service unreachable: {0}")]
    Transport(String),

    #[error("Folding endpoint refused by policy: {0}")]
    Blocked(String),
}
