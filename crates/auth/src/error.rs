use thiserror::Error;

use crate::{Action, Resource};

/// Outcome of a failed authorization check.
///
/// `Forbidden` and `NotFound` are expected, user-facing results; only
/// `Misconfigured` signals a programming defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No (or an invalid) user snapshot reached the boundary.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {action} on {resource}")]
    Forbidden { resource: Resource, action: Action },

    /// The addressed record does not exist (or could not be resolved).
    #[error("not found")]
    NotFound,

    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

impl AuthzError {
    pub fn forbidden(resource: Resource, action: Action) -> Self {
        Self::Forbidden { resource, action }
    }

    pub fn misconfigured(msg: impl Into<String>) -> Self {
        Self::Misconfigured(msg.into())
    }
}
