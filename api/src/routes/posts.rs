use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use craly_core::catalog::{self, PostView};
use craly_core::model::{Post, PostInput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/posts", get(list_posts).post(create_post))
        .route(
            "/v1/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

/// List posts, newest first, with tool and category names resolved
#[utoipa::path(
    get,
    path = "/v1/posts",
    responses((status = 200, body = Vec<PostView>)),
    tag = "posts"
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostView>>, AppError> {
    Ok(Json(catalog::list_post_views(state.store.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, body = Post),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(catalog::get_post(state.store.as_ref(), &id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/posts",
    request_body = PostInput,
    responses(
        (status = 201, body = Post),
        (status = 400, body = craly_core::error::ApiError)
    ),
    tag = "posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    AppJson(input): AppJson<PostInput>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = catalog::create_post(state.store.as_ref(), input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Edit a post; its timestamp is preserved
#[utoipa::path(
    put,
    path = "/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    request_body = PostInput,
    responses(
        (status = 200, body = Post),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "posts"
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<PostInput>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(
        catalog::update_post(state.store.as_ref(), &id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Deleted post", body = Post),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(catalog::delete_post(state.store.as_ref(), &id).await?))
}
