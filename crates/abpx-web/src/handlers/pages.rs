//! Page rendering: the submission form and the results view.

use axum::{
    extract::State,
    response::Html,
    Extension,
};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::WebError;
use crate::render::render;
use crate::session::{Page, Session, SessionId};
use crate::state::SharedState;

#[derive(Serialize)]
struct StructureView<'a> {
    index: usize,
    sequence: &'a str,
    position: usize,
    total: usize,
    atom_count: usize,
    pdb: &'a str,
}

#[derive(Serialize)]
struct FailedView<'a> {
    index: usize,
    sequence: &'a str,
    error: String,
}

/// GET `/`: whichever page the session is on.
pub async fn index(
    State(state): State<SharedState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<Html<String>, WebError> {
    state
        .sessions
        .with(id, |session| match session.page {
            Page::Input => input_page(&state.templates, session.submit_count, None, ""),
            Page::Output => results_page(&state.templates, session),
        })
        .await
}

/// The submission form, optionally with an error banner and the text to refill.
pub fn input_page(
    templates: &Environment<'_>,
    submit_count: u32,
    error: Option<&str>,
    sequences: &str,
) -> Result<Html<String>, WebError> {
    render(
        templates,
        "input.html",
        context! {
            submit_count => submit_count,
            error => error,
            sequences => sequences,
        },
    )
}

fn results_page(templates: &Environment<'_>, session: &Session) -> Result<Html<String>, WebError> {
    let predicted = session
        .results
        .iter()
        .filter(|r| r.prediction().is_some())
        .count();

    let current = session.current_structure().and_then(|(position, total, outcome)| {
        outcome.payload().map(|pdb| StructureView {
            index: outcome.index,
            sequence: &outcome.sequence,
            position,
            total,
            atom_count: pdb.atom_count(),
            pdb: pdb.as_str(),
        })
    });

    let failed: Vec<FailedView<'_>> = session
        .structures
        .iter()
        .filter_map(|o| {
            o.error().map(|e| FailedView {
                index: o.index,
                sequence: &o.sequence,
                error: e.to_string(),
            })
        })
        .collect();

    render(
        templates,
        "results.html",
        context! {
            results => &session.results,
            predicted => predicted,
            structures_run => !session.structures.is_empty(),
            current => current,
            failed => failed,
        },
    )
}
