//! Configuration loading for ABP-Xplorer.
//! Reads abpx.toml from the current directory or the path in the ABPX_CONFIG env var.
//! Every field has a default, so a missing file yields a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{AbpxError, Result};

/// Default ESM Atlas folding endpoint.
pub const ESM_ATLAS_ENDPOINT: &str = "https://api.esmatlas.com/foldSequence/v1/pdb/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub folding: FoldingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16    { 8501 }
fn default_max_upload() -> usize  { 2 * 1024 * 1024 }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON random-forest artifact
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String { "models/abp_forest.json".to_string() }

impl Default for ModelConfig {
    fn default() -> Self {
        Self { path: default_model_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldingConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
    /// Hosts the outbound client may contact; subdomains are allowed too.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

fn default_endpoint()    -> String { ESM_ATLAS_ENDPOINT.to_string() }
fn default_timeout()     -> u64    { 60 }
fn default_concurrency() -> usize  { 4 }

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "api.esmatlas.com".to_string(),
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ]
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            max_concurrency: default_concurrency(),
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is evicted.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_ttl()         -> u64    { 3600 }
fn default_cookie_name() -> String { "abpx_session".to_string() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}


impl AppConfig {
    /// Load configuration from abpx.toml.
    /// Checks ABPX_CONFIG env var first, then the current directory, then applies
    /// ABPX_HOST / ABPX_PORT / ABPX_MODEL_PATH overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("ABPX_CONFIG")
            .unwrap_or_else(|_| "abpx.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else {
            warn!("Config file not found: {path}; using built-in defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a specific TOML file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment-style overrides. `lookup` maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ABPX_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ABPX_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| AbpxError::Config(format!("ABPX_PORT is not a port number: {port}")))?;
        }
        if let Some(model) = lookup("ABPX_MODEL_PATH") {
            self.model.path = model;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.folding.max_concurrency == 0 {
            return Err(AbpxError::Config("folding.max_concurrency must be at least 1".into()));
        }
        if self.folding.timeout_secs == 0 {
            return Err(AbpxError::Config("folding.timeout_secs must be at least 1".into()));
        }
        if self.session.cookie_name.is_empty() {
            return Err(AbpxError::Config("session.cookie_name must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
