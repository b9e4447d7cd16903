//! Permission resolver.
//!
//! [`resolve_permissions`] is the single place where role checks happen. UI
//! and storage code ask the resulting [`Permissions`] instead of comparing ids
//! themselves. It is a pure function and is recomputed after every mutation.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assignments;
use crate::entities::{Assignment, Task};
use crate::enums::TaskField;
use crate::errors::WorkflowError;

/// Capability set of one actor on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Permissions {
    pub actor_id: String,
    pub is_creator: bool,
    pub is_assignee: bool,
    pub editable_fields: BTreeSet<TaskField>,
    /// Assignees whose status still allows unassignment.
    pub removable_assignee_ids: BTreeSet<String>,
}

/// Compute what `actor_id` may do on `task`.
#[must_use]
pub fn resolve_permissions(task: &Task, assignments: &[Assignment], actor_id: &str) -> Permissions {
    let is_creator = task.is_creator(actor_id);
    let editable_fields = if is_creator {
        TaskField::ALL.into_iter().collect()
    } else {
        BTreeSet::from([TaskField::Status])
    };

    Permissions {
        actor_id: actor_id.to_string(),
        is_creator,
        is_assignee: assignments::find(assignments, actor_id).is_some(),
        editable_fields,
        removable_assignee_ids: assignments::removable_ids(assignments),
    }
}

impl Permissions {
    #[must_use]
    pub fn can_edit(&self, field: TaskField) -> bool {
        self.editable_fields.contains(&field)
    }

    /// Whether a form control for `field` should be enabled.
    ///
    /// Non-status fields need the creator with the form in edit mode. The
    /// status control ignores edit mode: the creator edits the task status,
    /// an assignee edits their own.
    #[must_use]
    pub fn is_field_editable(&self, field: TaskField, edit_mode: bool) -> bool {
        match field {
            TaskField::Status => self.is_creator || self.is_assignee,
            other => self.is_creator && edit_mode && self.can_edit(other),
        }
    }

    /// Whether this actor may take `user_id` off the task right now.
    #[must_use]
    pub fn can_unassign(&self, user_id: &str) -> bool {
        self.is_creator && self.removable_assignee_ids.contains(user_id)
    }

    /// Reject the request unless this actor created the task.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Permission` for non-creators.
    pub fn ensure_creator(&self, action: &str) -> Result<(), WorkflowError> {
        if self.is_creator {
            Ok(())
        } else {
            Err(WorkflowError::Permission(format!(
                "only the task creator may {action}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Priority, WorkStatus};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn task() -> Task {
        Task {
            id: "tsk-1".into(),
            name: "Onboarding".into(),
            project_id: Some("prj-1".into()),
            creator_id: "usr-a".into(),
            deadline: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            priority: Priority::High,
            remarks: Some("bring laptop".into()),
            task_status: WorkStatus::Acknowledge,
            created_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        }
    }

    fn assignees() -> Vec<Assignment> {
        vec![
            Assignment {
                status: WorkStatus::InProgress,
                ..Assignment::new("tsk-1", "usr-b", "Bob")
            },
            Assignment::new("tsk-1", "usr-c", "Carol"),
        ]
    }

    #[test]
    fn creator_gets_every_field() {
        let perms = resolve_permissions(&task(), &assignees(), "usr-a");
        assert!(perms.is_creator);
        assert!(!perms.is_assignee);
        assert_eq!(perms.editable_fields.len(), TaskField::ALL.len());
        assert!(perms.ensure_creator("edit").is_ok());
    }

    #[test]
    fn assignee_gets_status_only() {
        let perms = resolve_permissions(&task(), &assignees(), "usr-b");
        assert!(!perms.is_creator);
        assert!(perms.is_assignee);
        assert_eq!(perms.editable_fields, BTreeSet::from([TaskField::Status]));
        assert!(matches!(
            perms.ensure_creator("edit the task"),
            Err(WorkflowError::Permission(_))
        ));
    }

    #[test]
    fn removable_ids_do_not_depend_on_actor() {
        let a = resolve_permissions(&task(), &assignees(), "usr-a");
        let b = resolve_permissions(&task(), &assignees(), "usr-b");
        assert_eq!(a.removable_assignee_ids, BTreeSet::from(["usr-c".to_string()]));
        assert_eq!(a.removable_assignee_ids, b.removable_assignee_ids);
        assert!(a.can_unassign("usr-c"));
        assert!(!a.can_unassign("usr-b"));
        assert!(!b.can_unassign("usr-c"));
    }

    #[test]
    fn field_editability_follows_mode_and_role() {
        let creator = resolve_permissions(&task(), &assignees(), "usr-a");
        assert!(!creator.is_field_editable(TaskField::Name, false));
        assert!(creator.is_field_editable(TaskField::Name, true));
        assert!(creator.is_field_editable(TaskField::Status, false));

        let assignee = resolve_permissions(&task(), &assignees(), "usr-c");
        assert!(!assignee.is_field_editable(TaskField::Deadline, true));
        assert!(assignee.is_field_editable(TaskField::Status, false));

        let stranger = resolve_permissions(&task(), &assignees(), "usr-z");
        assert!(stranger.can_edit(TaskField::Status));
        assert!(!stranger.is_field_editable(TaskField::Status, true));
    }

    #[test]
    fn resolution_is_deterministic() {
        let first = resolve_permissions(&task(), &assignees(), "usr-b");
        let second = resolve_permissions(&task(), &assignees(), "usr-b");
        assert_eq!(first, second);
    }
}
