//! JSON API mirroring the HTML flow.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use abpx_peptide::{ModelInfo, ScreenedPeptide};
use abpx_structure::StructureOutcome;

use crate::state::SharedState;

/// Envelope for every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
    pub execution_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            execution_time_ms: None,
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            execution_time_ms: None,
        }
    }

    pub fn timed(mut self, started: Instant) -> Self {
        self.execution_time_ms = Some(started.elapsed().as_millis() as u64);
        self
    }
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn fail<T>(status: StatusCode, message: &str, started: Instant) -> ApiResult<T> {
    (status, Json(ApiResponse::error(message).timed(started)))
}

#[derive(Debug, Deserialize)]
pub struct SequencesRequest {
    pub sequences: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub model: ModelInfo,
    pub folding_endpoint: String,
}

/// GET `/api/health`
pub async fn api_health(State(state): State<SharedState>) -> Json<ApiResponse<Health>> {
    Json(ApiResponse::success(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.pipeline.classifier().info(),
        folding_endpoint: state.folding.endpoint().to_string(),
    }))
}

/// POST `/api/predict`: one screened entry per input sequence.
pub async fn api_predict(
    State(state): State<SharedState>,
    payload: Result<Json<SequencesRequest>, JsonRejection>,
) -> ApiResult<Vec<ScreenedPeptide>> {
    let started = Instant::now();
    let sequences = match payload {
        Ok(Json(req)) => req.sequences,
        Err(e) => return fail(e.status(), &e.body_text(), started),
    };
    if sequences.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "No sequences provided", started);
    }

    let worker = state.clone();
    match tokio::task::spawn_blocking(move || worker.pipeline.screen(&sequences)).await {
        Ok(Ok(results)) => (StatusCode::OK, Json(ApiResponse::success(results).timed(started))),
        Ok(Err(e)) => {
            warn!("Prediction failed: {}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), started)
        }
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), started),
    }
}

/// POST `/api/fold`: one tagged structure outcome per input sequence.
pub async fn api_fold(
    State(state): State<SharedState>,
    payload: Result<Json<SequencesRequest>, JsonRejection>,
) -> ApiResult<Vec<StructureOutcome>> {
    let started = Instant::now();
    let sequences = match payload {
        Ok(Json(req)) => req.sequences,
        Err(e) => return fail(e.status(), &e.body_text(), started),
    };
    if sequences.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "No sequences provided", started);
    }

    let outcomes = state.folding.fold_all(&sequences).await;
    (StatusCode::OK, Json(ApiResponse::success(outcomes).timed(started)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success(3).timed(Instant::now())).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 3);
        assert!(ok["error"].is_null());
        assert!(ok["execution_time_ms"].is_u64());

        let err = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "nope");
        assert!(err["execution_time_ms"].is_null());
    }
}
