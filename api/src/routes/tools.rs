use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use craly_core::catalog::{self, ToolView};
use craly_core::model::{Tool, ToolInput};
use craly_core::relationships;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::SearchQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tools", get(list_tools).post(create_tool))
        .route(
            "/v1/tools/{id}",
            get(get_tool).put(update_tool).delete(delete_tool),
        )
        .route("/v1/tools/{id}/toggle", post(toggle_tool))
}

/// List tools ordered by name
#[utoipa::path(
    get,
    path = "/v1/tools",
    params(SearchQuery),
    responses((status = 200, description = "Tools with resolved category names", body = Vec<ToolView>)),
    tag = "tools"
)]
pub async fn list_tools(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ToolView>>, AppError> {
    let tools = catalog::list_tools(state.store.as_ref(), query.search.as_deref()).await?;
    Ok(Json(tools))
}

#[utoipa::path(
    get,
    path = "/v1/tools/{id}",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, body = Tool),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, AppError> {
    Ok(Json(catalog::get_tool(state.store.as_ref(), &id).await?))
}

/// Create a tool and add it to its category's membership list
///
/// `category` may be a category id or, for older data, its name; the stored
/// reference is always the id.
#[utoipa::path(
    post,
    path = "/v1/tools",
    request_body = ToolInput,
    responses(
        (status = 201, description = "Tool created", body = Tool),
        (status = 400, description = "Missing name or unknown category", body = craly_core::error::ApiError),
        (status = 500, description = "Tool saved but membership write failed", body = craly_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn create_tool(
    State(state): State<AppState>,
    AppJson(input): AppJson<ToolInput>,
) -> Result<(StatusCode, Json<Tool>), AppError> {
    let tool = relationships::create_tool(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

/// Edit a tool, moving it between categories when its category changes
///
/// The move is two sequential writes (remove from old, add to new). If the
/// second fails the tool is listed by neither category and the response is a
/// `partial_relationship_update` error.
#[utoipa::path(
    put,
    path = "/v1/tools/{id}",
    params(("id" = String, Path, description = "Tool id")),
    request_body = ToolInput,
    responses(
        (status = 200, body = Tool),
        (status = 400, body = craly_core::error::ApiError),
        (status = 404, body = craly_core::error::ApiError),
        (status = 500, description = "Tool saved but membership write failed", body = craly_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn update_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<ToolInput>,
) -> Result<Json<Tool>, AppError> {
    Ok(Json(
        relationships::update_tool(state.store.as_ref(), &id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/tools/{id}",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, description = "Deleted tool", body = Tool),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn delete_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, AppError> {
    Ok(Json(
        relationships::delete_tool(state.store.as_ref(), &id).await?,
    ))
}

/// Flip the tool's `enabled` flag
#[utoipa::path(
    post,
    path = "/v1/tools/{id}/toggle",
    params(("id" = String, Path, description = "Tool id")),
    responses(
        (status = 200, body = Tool),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn toggle_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, AppError> {
    Ok(Json(catalog::toggle_tool(state.store.as_ref(), &id).await?))
}
