use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, WorkStatus};

/// A unit of work created by one user and assigned to others.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
    pub creator_id: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub remarks: Option<String>,
    /// Creator-set status. Independent of the assignees' own statuses.
    pub task_status: WorkStatus,
    /// Immutable lower bound for `deadline`.
    pub created_date: NaiveDate,
}

impl Task {
    #[must_use]
    pub fn is_creator(&self, actor_id: &str) -> bool {
        self.creator_id == actor_id
    }
}
