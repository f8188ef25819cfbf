use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use craly_core::catalog;
use craly_core::model::{Category, CategoryInput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::SearchQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/categories", get(list_categories).post(create_category))
        .route(
            "/v1/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/v1/categories/{id}/toggle", post(toggle_category))
}

/// List categories ordered by name
#[utoipa::path(
    get,
    path = "/v1/categories",
    params(SearchQuery),
    responses((status = 200, body = Vec<Category>)),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(
        catalog::list_categories(state.store.as_ref(), query.search.as_deref()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, body = Category),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(catalog::get_category(state.store.as_ref(), &id).await?))
}

/// Create a category; its id is derived from the name
#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CategoryInput,
    responses(
        (status = 201, body = Category),
        (status = 400, body = craly_core::error::ApiError),
        (status = 409, description = "A category with the derived id exists", body = craly_core::error::ApiError)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = catalog::create_category(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Edit a category's descriptive fields. Membership is not editable here.
#[utoipa::path(
    put,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, body = Category),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        catalog::update_category(state.store.as_ref(), &id, input).await?,
    ))
}

/// Delete a category. Tools referencing it are not touched.
#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted category", body = Category),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        catalog::delete_category(state.store.as_ref(), &id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/v1/categories/{id}/toggle",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, body = Category),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "categories"
)]
pub async fn toggle_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        catalog::toggle_category(state.store.as_ref(), &id).await?,
    ))
}
