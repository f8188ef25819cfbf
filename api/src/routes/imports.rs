use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use craly_core::feedback::Feedback;
use craly_core::import::{self, CollectionSummary, ImportOutcome};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/imports", post(upload_import))
        .route("/v1/imports/validate", post(validate_import))
        .route("/v1/imports/example", get(example_import))
}

/// Outcome of an import: operator feedback plus per-collection counts.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImportResponse {
    #[serde(flatten)]
    pub feedback: Feedback,
    /// Empty unless the payload passed validation
    pub summaries: Vec<CollectionSummary>,
}

/// Validate, classify and commit a catalog payload in one atomic batch
///
/// The body is the raw JSON document. Malformed JSON is reported as a
/// validation failure, not a request error. Categories and workflows whose
/// id already exists are skipped; tools are always written in full.
#[utoipa::path(
    post,
    path = "/v1/imports",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Payload committed, or nothing new to write", body = ImportResponse),
        (status = 400, description = "Payload failed validation; nothing was written", body = ImportResponse),
        (status = 500, description = "Reading existing ids or committing failed; nothing was written", body = ImportResponse)
    ),
    tag = "imports"
)]
pub async fn upload_import(State(state): State<AppState>, body: String) -> impl IntoResponse {
    match import::run_import(state.store.as_ref(), &body, Utc::now()).await {
        Ok(outcome) => {
            let status = match outcome {
                ImportOutcome::Invalid(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            };
            let summaries = match &outcome {
                ImportOutcome::Invalid(_) => Vec::new(),
                ImportOutcome::NothingToDo(plan) | ImportOutcome::Committed(plan) => {
                    plan.summaries.clone()
                }
            };
            (
                status,
                Json(ImportResponse {
                    feedback: outcome.feedback(),
                    summaries,
                }),
            )
        }
        Err(err) => {
            tracing::error!("Import failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImportResponse {
                    feedback: import::import_failure(&err),
                    summaries: Vec::new(),
                }),
            )
        }
    }
}

/// Check a payload without reading or writing the catalog
#[utoipa::path(
    post,
    path = "/v1/imports/validate",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Payload is valid", body = Feedback),
        (status = 400, description = "Payload is invalid", body = Feedback)
    ),
    tag = "imports"
)]
pub async fn validate_import(body: String) -> impl IntoResponse {
    let feedback = import::validate_text(&body);
    let status = if feedback.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(feedback))
}

/// Example payload covering every importable collection
#[utoipa::path(
    get,
    path = "/v1/imports/example",
    responses((status = 200, description = "Example import document", body = serde_json::Value)),
    tag = "imports"
)]
pub async fn example_import() -> Json<serde_json::Value> {
    Json(import::example_payload())
}
