use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Error,
    Warning,
}

/// Operator-facing outcome of a validate or import request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    /// Ordered detail lines (violations, skips, per-collection summaries)
    pub details: Vec<String>,
}

impl Feedback {
    pub fn success(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
            details,
        }
    }

    pub fn warning(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            kind: FeedbackKind::Warning,
            message: message.into(),
            details,
        }
    }

    pub fn error(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
            details,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}
