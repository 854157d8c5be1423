//! Structure prediction for the current results, the pager and PDB downloads.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use tracing::{info, warn};

use crate::error::WebError;
use crate::session::{Page, SessionId};
use crate::state::SharedState;

/// POST `/structures`: fold every entry of the current results.
pub async fn predict_structures(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<Redirect, WebError> {
    let (cycle, sequences): (u64, Vec<String>) = state
        .sessions
        .with(id, |s| {
            if s.page != Page::Output {
                return (s.cycle(), Vec::new());
            }
            (s.cycle(), s.results.iter().map(|r| r.sequence.clone()).collect())
        })
        .await;
    if sequences.is_empty() {
        return Err(WebError::NoResults);
    }

    // Entries are stored in input order, so outcome indices match result indices
    let outcomes = state.folding.fold_all(&sequences).await;
    let folded = outcomes.iter().filter(|o| o.payload().is_some()).count();
    info!("Session structures: {}/{} folded", folded, outcomes.len());

    // The visitor may have gone back or resubmitted while folding ran
    let total = outcomes.len();
    if !state.sessions.with(id, |s| s.attach_structures(cycle, outcomes)).await {
        warn!("Discarding {} structures from a superseded submission", total);
    }
    Ok(Redirect::to("/"))
}

/// POST `/structures/next`
pub async fn next_structure(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Redirect {
    state.sessions.with(id, |s| s.next_structure()).await;
    Redirect::to("/")
}

/// POST `/structures/prev`
pub async fn prev_structure(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Redirect {
    state.sessions.with(id, |s| s.prev_structure()).await;
    Redirect::to("/")
}

/// GET `/structures/{n}/download`: PDB of input entry `n` (1-based).
pub async fn download_structure(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(n): Path<usize>,
) -> Result<Response, WebError> {
    let pdb = state
        .sessions
        .with(id, |s| {
            s.structures
                .iter()
                .find(|o| o.index == n)
                .and_then(|o| o.payload())
                .map(|p| p.as_str().to_string())
        })
        .await
        .ok_or(WebError::StructureNotFound(n))?;

    Ok((
        [
            (header::CONTENT_TYPE, "chemical/x-pdb".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"structure_{}.pdb\"", n),
            ),
        ],
        pdb,
    )
        .into_response())
}
