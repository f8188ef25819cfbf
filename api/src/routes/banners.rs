use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use craly_core::catalog;
use craly_core::model::{Banner, BannerInput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::SearchQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/banners", get(list_banners).post(create_banner))
        .route(
            "/v1/banners/{id}",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
        .route("/v1/banners/{id}/toggle", post(toggle_banner))
}

/// List banners by display order
#[utoipa::path(
    get,
    path = "/v1/banners",
    params(SearchQuery),
    responses((status = 200, body = Vec<Banner>)),
    tag = "banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Banner>>, AppError> {
    Ok(Json(
        catalog::list_banners(state.store.as_ref(), query.search.as_deref()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/v1/banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    responses(
        (status = 200, body = Banner),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "banners"
)]
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Banner>, AppError> {
    Ok(Json(catalog::get_banner(state.store.as_ref(), &id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/banners",
    request_body = BannerInput,
    responses(
        (status = 201, body = Banner),
        (status = 400, body = craly_core::error::ApiError)
    ),
    tag = "banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    AppJson(input): AppJson<BannerInput>,
) -> Result<(StatusCode, Json<Banner>), AppError> {
    let banner = catalog::create_banner(state.store.as_ref(), input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

#[utoipa::path(
    put,
    path = "/v1/banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    request_body = BannerInput,
    responses(
        (status = 200, body = Banner),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "banners"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<BannerInput>,
) -> Result<Json<Banner>, AppError> {
    Ok(Json(
        catalog::update_banner(state.store.as_ref(), &id, input, Utc::now()).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    responses(
        (status = 200, description = "Deleted banner", body = Banner),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "banners"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Banner>, AppError> {
    Ok(Json(catalog::delete_banner(state.store.as_ref(), &id).await?))
}

#[utoipa::path(
    post,
    path = "/v1/banners/{id}/toggle",
    params(("id" = String, Path, description = "Banner id")),
    responses(
        (status = 200, body = Banner),
        (status = 404, body = craly_core::error::ApiError)
    ),
    tag = "banners"
)]
pub async fn toggle_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Banner>, AppError> {
    Ok(Json(
        catalog::toggle_banner(state.store.as_ref(), &id, Utc::now()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::send;
    use serde_json::json;

    #[tokio::test]
    async fn banner_lifecycle() {
        let app = router().with_state(AppState::in_memory());
        let body = json!({"title": "Launch week", "order": "2", "position": "middle"});

        let (status, created) = send(&app, "POST", "/v1/banners", Some(body.to_string())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["order"], 2);
        assert_eq!(created["position"], "middle");
        assert_eq!(created["enabled"], true);
        assert!(created["createdAt"].is_string());
        let id = created["id"].as_str().unwrap().to_string();

        let (status, toggled) =
            send(&app, "POST", &format!("/v1/banners/{id}/toggle"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["enabled"], false);

        let (status, listed) = send(&app, "GET", "/v1/banners?search=launch", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/v1/banners/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &format!("/v1/banners/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_position_is_a_validation_error() {
        let app = router().with_state(AppState::in_memory());
        let body = json!({"title": "Launch week", "position": "sidebar"}).to_string();
        let (status, err) = send(&app, "POST", "/v1/banners", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "validation_failed");
    }
}
