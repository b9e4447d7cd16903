use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::WorkStatus;

/// One assignee on a task together with their individual status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Assignment {
    pub task_id: String,
    pub user_id: String,
    /// Display name copied from the user directory when assigned.
    pub name: String,
    pub status: WorkStatus,
    /// Point of contact. Informational; several assignees may carry it.
    pub is_poc: bool,
}

impl Assignment {
    /// Fresh assignment in the initial `not-acknowledge` state.
    #[must_use]
    pub fn new(task_id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            status: WorkStatus::NotAcknowledge,
            is_poc: false,
        }
    }

    #[must_use]
    pub const fn is_removable(&self) -> bool {
        self.status.is_removable()
    }
}
