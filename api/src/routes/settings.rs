use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use craly_core::catalog;
use craly_core::model::{PrivacyPolicy, PrivacyPolicyInput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/v1/settings/privacy-policy",
        get(get_privacy_policy).put(update_privacy_policy),
    )
}

/// Current privacy policy; empty content when none has been saved
#[utoipa::path(
    get,
    path = "/v1/settings/privacy-policy",
    responses((status = 200, body = PrivacyPolicy)),
    tag = "settings"
)]
pub async fn get_privacy_policy(
    State(state): State<AppState>,
) -> Result<Json<PrivacyPolicy>, AppError> {
    Ok(Json(catalog::get_privacy_policy(state.store.as_ref()).await?))
}

/// Replace the privacy policy text
#[utoipa::path(
    put,
    path = "/v1/settings/privacy-policy",
    request_body = PrivacyPolicyInput,
    responses(
        (status = 200, body = PrivacyPolicy),
        (status = 400, body = craly_core::error::ApiError)
    ),
    tag = "settings"
)]
pub async fn update_privacy_policy(
    State(state): State<AppState>,
    AppJson(input): AppJson<PrivacyPolicyInput>,
) -> Result<Json<PrivacyPolicy>, AppError> {
    Ok(Json(
        catalog::save_privacy_policy(state.store.as_ref(), input.content, Utc::now()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::send;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn policy_round_trips_through_put_and_get() {
        let app = router().with_state(AppState::in_memory());

        let (status, empty) = send(&app, "GET", "/v1/settings/privacy-policy", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty["content"], "");

        let body = json!({"content": "We keep nothing."}).to_string();
        let (status, saved) = send(&app, "PUT", "/v1/settings/privacy-policy", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(saved["updatedAt"].is_string());

        let (_, stored) = send(&app, "GET", "/v1/settings/privacy-policy", None).await;
        assert_eq!(stored["content"], "We keep nothing.");
    }
}
