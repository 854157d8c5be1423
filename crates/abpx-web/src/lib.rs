//! abpx-web: Web front end for ABP-Xplorer.
//! Provides:
//!   - Sequence submission (text area or FASTA upload)
//!   - Prediction results table with CSV export
//!   - Structure prediction pager with PDB downloads
//!   - JSON API for predictions and folding

pub mod router;
pub mod handlers;
pub mod state;
pub mod session;
pub mod error;
pub mod export;
pub mod render;
