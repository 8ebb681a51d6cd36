// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for shot submission and the persistence gateway

use std::fmt;
use thiserror::Error;

/// Result type for shot operations
pub type ShotResult<T> = Result<T, ShotError>;

/// Anything that can stop a shot from being submitted.
///
/// None of these are fatal: the draft is always left in place so the user
/// can correct it and submit again.
#[derive(Debug, Error)]
pub enum ShotError {
    /// Required field missing or malformed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storyboard upload failed; nothing was inserted
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Insert into the shot table failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ShotError {
    /// Validation details, if this is a validation failure
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// One field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field key, e.g. `scene`
    pub field: String,
    /// What is wrong with it
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid shot: {}", join_issues(.issues))]
pub struct ValidationError {
    /// Individual failures (never empty)
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Single-field validation failure
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: field.into(),
                reason: reason.into(),
            }],
        }
    }

    /// Whether `field` is among the failures
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }

    /// Failing field keys
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

/// Storyboard upload failure
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport-level failure
    #[error("storyboard upload failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Storage answered with a non-success status
    #[error("storyboard upload rejected ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for the user
        body: String,
    },

    /// Storage refused the object for another reason
    #[error("storyboard upload failed: {0}")]
    Rejected(String),
}

/// Shot table failure
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Transport-level failure
    #[error("shot table request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("shot table rejected request ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for the user
        body: String,
    },

    /// Rows could not be decoded
    #[error("unreadable shot rows: {0}")]
    Decode(#[from] serde_json::Error),

    /// Service refused the write for another reason
    #[error("shot was not saved: {0}")]
    Rejected(String),
}

impl UploadError {
    /// Build from an HTTP status and body
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

impl PersistenceError {
    /// Build from an HTTP status and body
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ValidationError {
            issues: vec![
                FieldIssue { field: "scene".into(), reason: "required".into() },
                FieldIssue { field: "description".into(), reason: "required".into() },
            ],
        };
        assert_eq!(err.to_string(), "invalid shot: scene: required; description: required");
        assert!(err.mentions("scene"));
        assert!(!err.mentions("shot"));
        assert_eq!(err.fields(), vec!["scene", "description"]);
    }

    #[test]
    fn test_shot_error_is_transparent() {
        let err: ShotError = PersistenceError::from_http_status(503, "down").into();
        assert_eq!(err.to_string(), "shot table rejected request (503): down");
        assert!(err.as_validation().is_none());

        let err: ShotError = ValidationError::field("shot", "must be a number").into();
        assert!(err.as_validation().is_some_and(|v| v.mentions("shot")));
    }

    #[test]
    fn test_upload_status_message() {
        let err = UploadError::from_http_status(413, "too large");
        assert!(matches!(err, UploadError::Status { status: 413, .. }));
        assert!(err.to_string().contains("too large"));
    }
}
