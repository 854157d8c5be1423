use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbpxError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security policy violation: {0}")]
    Security(String),
}

impl From<toml::de::Error> for AbpxError {
    fn from(e: toml::de::Error) -> Self {
        AbpxError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AbpxError>;
