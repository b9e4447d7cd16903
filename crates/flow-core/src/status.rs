//! Task status engine.
//!
//! Decides who a `set_status` call acts on and whether the transition is
//! allowed. The creator writes the task-level `task_status`; an assignee writes
//! their own assignment status; anyone else is rejected. The two kinds of
//! status are independent: changing one never recomputes the other.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assignments;
use crate::entities::{Assignment, Task};
use crate::enums::{TransitionMode, WorkStatus};
use crate::errors::WorkflowError;

/// Which status field a `set_status` call writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusTarget {
    /// The creator's task-level status.
    Task,
    /// The actor's own assignment.
    Assignment { user_id: String },
}

/// A validated status change, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusChange {
    pub task_id: String,
    pub target: StatusTarget,
    pub from: WorkStatus,
    pub to: WorkStatus,
}

/// Resolve which status `actor_id` is allowed to write on `task`.
///
/// # Errors
///
/// Returns `WorkflowError::Permission` if the actor is neither the creator nor
/// an assignee.
pub fn resolve_target(
    task: &Task,
    assignments: &[Assignment],
    actor_id: &str,
) -> Result<StatusTarget, WorkflowError> {
    if task.is_creator(actor_id) {
        return Ok(StatusTarget::Task);
    }
    if assignments::find(assignments, actor_id).is_some() {
        return Ok(StatusTarget::Assignment {
            user_id: actor_id.to_string(),
        });
    }
    Err(WorkflowError::Permission(format!(
        "actor {actor_id} not associated with task {}",
        task.id
    )))
}

/// Validate a `set_status` request and describe the write it implies.
///
/// # Errors
///
/// - `WorkflowError::Validation` if `new_status` is not a recognised state.
/// - `WorkflowError::Permission` if the actor may not set any status here.
/// - `WorkflowError::InvalidTransition` if `mode` forbids the move.
pub fn plan_status_change(
    task: &Task,
    assignments: &[Assignment],
    actor_id: &str,
    new_status: WorkStatus,
    mode: TransitionMode,
) -> Result<StatusChange, WorkflowError> {
    if !new_status.is_known() {
        return Err(WorkflowError::validation(
            "status",
            "status must be one of not-acknowledge, acknowledge, in-progress, completed",
        ));
    }

    let target = resolve_target(task, assignments, actor_id)?;
    let from = match &target {
        StatusTarget::Task => task.task_status,
        StatusTarget::Assignment { user_id } => assignments::find(assignments, user_id)
            .map(|a| a.status)
            .unwrap_or_default(),
    };

    if !mode.allows(from, new_status) {
        return Err(WorkflowError::InvalidTransition {
            from,
            to: new_status,
        });
    }

    Ok(StatusChange {
        task_id: task.id.clone(),
        target,
        from,
        to: new_status,
    })
}

/// Per-status counts over a task's assignments. Informational only: the
/// task-level status is never derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusSummary {
    pub not_acknowledge: u32,
    pub acknowledge: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub other: u32,
}

impl StatusSummary {
    #[must_use]
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut summary = Self::default();
        for assignment in assignments {
            match assignment.status {
                WorkStatus::NotAcknowledge => summary.not_acknowledge += 1,
                WorkStatus::Acknowledge => summary.acknowledge += 1,
                WorkStatus::InProgress => summary.in_progress += 1,
                WorkStatus::Completed => summary.completed += 1,
                WorkStatus::Other => summary.other += 1,
            }
        }
        summary
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.not_acknowledge + self.acknowledge + self.in_progress + self.completed + self.other
    }

    /// True when there is at least one assignee and all of them completed.
    #[must_use]
    pub const fn all_completed(&self) -> bool {
        self.completed > 0 && self.completed == self.total()
    }
}
