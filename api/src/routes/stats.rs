use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use craly_core::catalog::{self, DashboardStats};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/stats", get(dashboard_stats))
}

/// Document counts per collection, for the dashboard
#[utoipa::path(
    get,
    path = "/v1/stats",
    responses((status = 200, body = DashboardStats)),
    tag = "system"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(catalog::dashboard_stats(state.store.as_ref()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::send;
    use axum::http::StatusCode;
    use craly_core::store::{Collection, DocumentStore, Fields, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn counts_every_collection() {
        let store = Arc::new(MemoryStore::new());
        for id in ["a", "b"] {
            store.set(Collection::Tools, id, Fields::new()).await.unwrap();
        }
        store.set(Collection::Posts, "p", Fields::new()).await.unwrap();

        let app = router().with_state(AppState::with_store(store));
        let (status, body) = send(&app, "GET", "/v1/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tools"], 2);
        assert_eq!(body["categories"], 0);
        assert_eq!(body["workflows"], 0);
        assert_eq!(body["posts"], 1);
    }
}
