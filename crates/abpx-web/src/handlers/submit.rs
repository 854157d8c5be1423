//! Sequence submission, the Back button and the CSV download.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use tracing::{info, warn};

use abpx_peptide::{fasta, sequence, Verdict};

use crate::error::WebError;
use crate::export::{results_csv, CSV_FILE_NAME};
use crate::handlers::pages::input_page;
use crate::session::{Page, SessionId};
use crate::state::SharedState;

/// Fields of the submission form.
#[derive(Debug, Default)]
struct SubmitForm {
    sequences: String,
    fasta_file: Option<Vec<u8>>,
}

impl SubmitForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, WebError> {
        let mut form = SubmitForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("sequences") => form.sequences = field.text().await?,
                Some("fasta_file") => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        form.fasta_file = Some(bytes.to_vec());
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// An uploaded file takes precedence over the text area.
    fn sequences(&self) -> Result<Vec<String>, WebError> {
        match &self.fasta_file {
            Some(bytes) => {
                let content = std::str::from_utf8(bytes)
                    .map_err(|_| WebError::BadUpload("file is not UTF-8 text".into()))?;
                Ok(fasta::parse_str(content))
            }
            None => Ok(sequence::split_lines(&self.sequences)),
        }
    }
}

/// POST `/submit`: screen the submitted sequences and move to the results page.
pub async fn submit(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let form = SubmitForm::read(&mut multipart).await?;
    let submit_count = state
        .sessions
        .with(id, |s| {
            s.submit_count += 1;
            s.submit_count
        })
        .await;

    let sequences = form.sequences()?;
    if sequences.is_empty() {
        let page = input_page(
            &state.templates,
            submit_count,
            Some(&WebError::EmptyInput.to_string()),
            &form.sequences,
        )?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    info!("Submission {} with {} sequences", submit_count, sequences.len());
    let worker = state.clone();
    let results = tokio::task::spawn_blocking(move || worker.pipeline.screen(&sequences)).await??;

    if results.iter().all(|r| r.prediction().is_none()) {
        let reasons: Vec<String> = results
            .iter()
            .filter_map(|r| match &r.verdict {
                Verdict::Invalid { reason } => Some(format!("Entry {} ({}): {}", r.index, r.sequence, reason)),
                Verdict::Predicted(_) => None,
            })
            .collect();
        warn!("Submission {} had no valid sequences", submit_count);
        let page = input_page(
            &state.templates,
            submit_count,
            Some(&reasons.join("\n")),
            &form.sequences,
        )?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    state.sessions.with(id, |s| s.show_results(results)).await;
    Ok(Redirect::to("/").into_response())
}

/// POST `/back`
pub async fn back(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Redirect {
    state.sessions.with(id, |s| s.back()).await;
    Redirect::to("/")
}

/// GET `/results.csv`
pub async fn download_csv(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<Response, WebError> {
    let csv = state
        .sessions
        .with(id, |s| {
            if s.page != Page::Output || s.results.is_empty() {
                return Err(WebError::NoResults);
            }
            results_csv(&s.results)
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
