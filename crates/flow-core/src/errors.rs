//! Workflow error taxonomy.
//!
//! Every mutation in the workflow core fails with one of these variants and
//! leaves stored state untouched. Storage and transport crates wrap this type
//! in their own error enums and convert back into it at the boundary.

use thiserror::Error;

use crate::enums::{EntityType, TaskField, WorkStatus};

/// Errors raised by the workflow core.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input failed validation (empty body, remarks too long, bad parent...).
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// The actor lacks rights for the attempted mutation.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Assignee removal blocked because the assignees already started work.
    #[error("Conflict: cannot unassign {} (work already started)", .user_ids.join(", "))]
    Conflict { user_ids: Vec<String> },

    /// Backend unreachable, timed out, or answered with a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// Status change rejected by the configured transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: WorkStatus, to: WorkStatus },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Validation error attached to a task form field.
    #[must_use]
    pub fn field(field: TaskField, message: impl Into<String>) -> Self {
        Self::validation(field.as_str(), message)
    }

    pub fn not_found(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Only transport failures may be retried by the caller. Nothing retries
    /// automatically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
