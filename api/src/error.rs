use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use craly_core::error::{self, ApiError, CatalogError};
use craly_core::store::{Collection, StoreError};

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// Document does not exist (404)
    NotFound { collection: Collection, id: String },
    /// Document already exists (409)
    Conflict { collection: Collection, id: String },
    /// Tool saved but category membership left half-updated (500)
    PartialRelationship { tool_id: String, message: String },
    /// Store error (500)
    Store(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::NotFound { collection, id } => (
                StatusCode::NOT_FOUND,
                ApiError {
                    error: error::codes::NOT_FOUND.to_string(),
                    message: format!("No document '{id}' in {collection}"),
                    field: Some("id".to_string()),
                    received: Some(serde_json::Value::String(id)),
                    request_id,
                    docs_hint: None,
                },
            ),
            AppError::Conflict { collection, id } => (
                StatusCode::CONFLICT,
                ApiError {
                    error: error::codes::CONFLICT.to_string(),
                    message: format!("A document '{id}' already exists in {collection}"),
                    field: Some("name".to_string()),
                    received: Some(serde_json::Value::String(id)),
                    request_id,
                    docs_hint: Some(
                        "Category ids are derived from the name. Pick a different name or edit the existing category."
                            .to_string(),
                    ),
                },
            ),
            AppError::PartialRelationship { tool_id, message } => {
                tracing::error!(tool = %tool_id, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::PARTIAL_RELATIONSHIP.to_string(),
                        message,
                        field: Some("category".to_string()),
                        received: Some(serde_json::Value::String(tool_id)),
                        request_id,
                        docs_hint: Some(
                            "The tool record was saved. Re-save the tool to repair category membership."
                                .to_string(),
                        ),
                    },
                )
            }
            AppError::Store(StoreError::NotFound { collection, id }) => {
                return AppError::NotFound { collection, id }.into_response();
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::INTERNAL_ERROR.to_string(),
                        message: "An internal error occurred".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Store(err) => AppError::Store(err),
            CatalogError::NotFound { collection, id } => AppError::NotFound { collection, id },
            CatalogError::Conflict { collection, id } => AppError::Conflict { collection, id },
            CatalogError::Invalid {
                field,
                message,
                hint,
            } => AppError::Validation {
                message,
                field: Some(field),
                received: None,
                docs_hint: hint,
            },
            CatalogError::PartialRelationship { tool_id, step, .. } => {
                AppError::PartialRelationship {
                    message: format!("Tool '{tool_id}' was saved, but {step} failed"),
                    tool_id,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craly_core::error::MembershipStep;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[tokio::test]
    async fn partial_relationship_names_the_failed_step() {
        let err = AppError::from(CatalogError::PartialRelationship {
            tool_id: "sora".to_string(),
            step: MembershipStep::AddTo {
                category_id: "video".to_string(),
            },
            source: StoreError::Backend("connection reset".to_string()),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "partial_relationship_update");
        assert_eq!(body["received"], "sora");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("adding to category 'video'")
        );
    }

    #[tokio::test]
    async fn store_not_found_maps_to_404() {
        let err = AppError::from(StoreError::NotFound {
            collection: Collection::Tools,
            id: "ghost".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn backend_errors_are_not_leaked() {
        let response = AppError::from(StoreError::Backend("password=hunter2".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
    }
}
