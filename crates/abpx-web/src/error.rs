//! Errors surfaced by web handlers.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minijinja::context;
use thiserror::Error;
use tracing::error;

use abpx_common::AbpxError;
use abpx_peptide::PeptideError;

use crate::render;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Please enter peptide sequences or upload a FASTA file.")]
    EmptyInput,

    #[error("Could not read upload: {0}")]
    BadUpload(String),

    #[error("No prediction results in this session. Submit sequences first.")]
    NoResults,

    #[error("No structure available for entry {0}")]
    StructureNotFound(usize),

    #[error(transparent)]
    Peptide(#[from] PeptideError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("CSV export failed: {0}")]
    Csv(String),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Common(#[from] AbpxError),
}

impl From<MultipartError> for WebError {
    fn from(e: MultipartError) -> Self {
        WebError::BadUpload(e.body_text())
    }
}

impl From<csv::Error> for WebError {
    fn from(e: csv::Error) -> Self {
        WebError::Csv(e.to_string())
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::EmptyInput | WebError::BadUpload(_) => StatusCode::BAD_REQUEST,
            WebError::Peptide(PeptideError::EmptyInput) => StatusCode::BAD_REQUEST,
            WebError::Peptide(e) if e.is_invalid_sequence() => StatusCode::BAD_REQUEST,
            WebError::NoResults | WebError::StructureNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let message = self.to_string();
        let page = render::environment()
            .and_then(|env| render::render(&env, "error.html", context! { message => &message }));
        match page {
            Ok(page) => (status, page).into_response(),
            Err(e) => {
                error!("Error page failed to render: {}", e);
                (status, message).into_response()
            }
        }
    }
}
