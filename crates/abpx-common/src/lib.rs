//! abpx-common: Shared errors, configuration, and the outbound HTTP client
//! used across all ABP-Xplorer crates.

pub mod error;
pub mod config;
pub mod sandbox;

// Re-export commonly used types
pub use config::{AppConfig, FoldingConfig, ModelConfig, ServerConfig, SessionConfig};
pub use error::{AbpxError, Result};
pub use sandbox::SandboxClient;
