//! Task form validation.
//!
//! Shared by task creation and creator edits so both paths reject the same
//! input with the same field-level messages.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskField};
use crate::errors::WorkflowError;

/// Maximum remarks length, in characters.
pub const MAX_REMARKS_LEN: usize = 500;

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewTask {
    pub name: String,
    pub project_id: Option<String>,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub remarks: Option<String>,
}

impl NewTask {
    /// Return a normalized copy (trimmed name, empty remarks dropped) or the
    /// first validation failure.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` naming the offending field.
    pub fn validated(self, created_date: NaiveDate) -> Result<Self, WorkflowError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            remarks: validate_remarks(self.remarks.as_deref())?,
            deadline: validate_deadline(self.deadline, created_date)?,
            ..self
        })
    }
}

/// # Errors
///
/// Returns `WorkflowError::Validation` if the trimmed name is empty.
pub fn validate_name(name: &str) -> Result<String, WorkflowError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::field(TaskField::Name, "name is required"));
    }
    Ok(trimmed.to_string())
}

/// # Errors
///
/// Returns `WorkflowError::Validation` if the remarks exceed
/// [`MAX_REMARKS_LEN`] characters.
pub fn validate_remarks(remarks: Option<&str>) -> Result<Option<String>, WorkflowError> {
    let Some(text) = remarks.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let len = text.chars().count();
    if len > MAX_REMARKS_LEN {
        return Err(WorkflowError::field(
            TaskField::Remarks,
            format!("remarks must be at most {MAX_REMARKS_LEN} characters (got {len})"),
        ));
    }
    Ok(Some(text.to_string()))
}

/// # Errors
///
/// Returns `WorkflowError::Validation` if `deadline` is before `created_date`.
pub fn validate_deadline(
    deadline: NaiveDate,
    created_date: NaiveDate,
) -> Result<NaiveDate, WorkflowError> {
    if deadline < created_date {
        return Err(WorkflowError::field(
            TaskField::Deadline,
            format!("deadline {deadline} is before the creation date {created_date}"),
        ));
    }
    Ok(deadline)
}
