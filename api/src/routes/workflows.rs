use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use craly_core::catalog;
use craly_core::model::{Workflow, WorkflowInput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/workflows", get(list_workflows).post(create_workflow))
        .route(
            "/v1/workflows/{id}",
            get(get_workflow)
                .put(update_workflow)
                .delete(delete_workflow),
        )
}

#[utoipa::path(
    get,
    path = "/v1/workflows",
    responses((status = 200, body = Vec<Workflow>)),
    tag = "workflows"
)]
pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<Vec<Workflow>>, AppError> {
    Ok(Json(catalog::list_workflows(state.store.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/v1/workflows/{id}",
    params(("id" = String, Path, description = "Workflow id")),
    responses(
        (status = 200, body = Workflow),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "workflows"
)]
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, AppError> {
    Ok(Json(catalog::get_workflow(state.store.as_ref(), &id).await?))
}

/// Create a workflow; `steps` is set from the journey length
#[utoipa::path(
    post,
    path = "/v1/workflows",
    request_body = WorkflowInput,
    responses(
        (status = 201, body = Workflow),
        (status = 400, body = craly_core::error::ApiError)
    ),
    tag = "workflows"
)]
pub async fn create_workflow(
    State(state): State<AppState>,
    AppJson(input): AppJson<WorkflowInput>,
) -> Result<(StatusCode, Json<Workflow>), AppError> {
    let workflow = catalog::create_workflow(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(workflow)))
}

#[utoipa::path(
    put,
    path = "/v1/workflows/{id}",
    params(("id" = String, Path, description = "Workflow id")),
    request_body = WorkflowInput,
    responses(
        (status = 200, body = Workflow),
        (status = 400, body = craly_core::error::ApiError),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "workflows"
)]
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<WorkflowInput>,
) -> Result<Json<Workflow>, AppError> {
    Ok(Json(
        catalog::update_workflow(state.store.as_ref(), &id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/workflows/{id}",
    params(("id" = String, Path, description = "Workflow id")),
    responses(
        (status = 200, description = "Deleted workflow", body = Workflow),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "workflows"
)]
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, AppError> {
    Ok(Json(
        catalog::delete_workflow(state.store.as_ref(), &id).await?,
    ))
}
