//! Assignment registry rules: removability and assignee-set replacement.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Assignment;
use crate::errors::WorkflowError;

/// Whether `assignment` may be unassigned. False once the assignee has started
/// (`in-progress`) or finished (`completed`).
#[must_use]
pub const fn is_removable(assignment: &Assignment) -> bool {
    assignment.is_removable()
}

/// User ids of every assignment that may currently be removed.
#[must_use]
pub fn removable_ids(assignments: &[Assignment]) -> BTreeSet<String> {
    assignments
        .iter()
        .filter(|a| is_removable(a))
        .map(|a| a.user_id.clone())
        .collect()
}

#[must_use]
pub fn find<'a>(assignments: &'a [Assignment], user_id: &str) -> Option<&'a Assignment> {
    assignments.iter().find(|a| a.user_id == user_id)
}

/// Outcome of comparing the current assignee set with a requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssigneeDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
}

impl AssigneeDiff {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the changes needed to turn `current` into `requested`.
///
/// The plan is all-or-nothing: if any assignee that would be removed is not
/// removable, no plan is produced.
///
/// # Errors
///
/// Returns `WorkflowError::Conflict` naming every blocked assignee.
pub fn plan_replacement(
    current: &[Assignment],
    requested: &BTreeSet<String>,
) -> Result<AssigneeDiff, WorkflowError> {
    let current_ids: BTreeSet<&str> = current.iter().map(|a| a.user_id.as_str()).collect();

    let mut diff = AssigneeDiff::default();
    let mut blocked = Vec::new();

    for assignment in current {
        if requested.contains(&assignment.user_id) {
            diff.kept.push(assignment.user_id.clone());
        } else if assignment.is_removable() {
            diff.removed.push(assignment.user_id.clone());
        } else {
            blocked.push(assignment.user_id.clone());
        }
    }

    if !blocked.is_empty() {
        return Err(WorkflowError::Conflict { user_ids: blocked });
    }

    diff.added = requested
        .iter()
        .filter(|id| !current_ids.contains(id.as_str()))
        .cloned()
        .collect();

    Ok(diff)
}
