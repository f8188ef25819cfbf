use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::store::{Collection, StoreError};

/// Structured error response returned by the admin API.
/// Carries enough context for the console to show the operator what went
/// wrong and which field to fix.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "not_found", "conflict")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const PARTIAL_RELATIONSHIP: &str = "partial_relationship_update";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const RATE_LIMITED: &str = "rate_limited";
}

/// Which membership write of a single-entity tool flow failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipStep {
    AddTo { category_id: String },
    RemoveFrom { category_id: String },
}

impl std::fmt::Display for MembershipStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipStep::AddTo { category_id } => write!(f, "adding to category '{category_id}'"),
            MembershipStep::RemoveFrom { category_id } => {
                write!(f, "removing from category '{category_id}'")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{collection} '{id}' not found")]
    NotFound { collection: Collection, id: String },
    #[error("invalid '{field}': {message}")]
    Invalid {
        field: String,
        message: String,
        hint: Option<String>,
    },
    #[error("{collection} '{id}' already exists")]
    Conflict { collection: Collection, id: String },
    /// The tool record was written but a membership write after it failed.
    /// Earlier writes are not rolled back.
    #[error("tool '{tool_id}' saved, but {step} failed: {source}")]
    PartialRelationship {
        tool_id: String,
        step: MembershipStep,
        #[source]
        source: StoreError,
    },
}

impl CatalogError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CatalogError::Invalid {
            field: field.to_string(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn not_found(collection: Collection, id: &str) -> Self {
        CatalogError::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}
