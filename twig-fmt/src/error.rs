use serde::{Deserialize, Serialize};

/// Errors that abort a format pass.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Malformed {kind} node: {message}")]
    Malformed { kind: String, message: String },

    #[error("Tree nesting depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("Invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    pub(crate) fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// A diagnostic message produced during formatting.
///
/// Diagnostics are non-fatal: the formatter still produces output for the
/// whole document when they are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
