//! Assignment registry: listing, atomic assignee replacement and the POC flag.

use std::collections::BTreeSet;

use flow_core::assignments::{self, AssigneeDiff, plan_replacement};
use flow_core::entities::Assignment;
use flow_core::enums::{AuditAction, EntityType, EventKind};
use flow_core::errors::WorkflowError;
use flow_core::events::WorkflowEvent;
use flow_core::permissions::resolve_permissions;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_enum};
use crate::repos::task::assignment_key;
use crate::service::{FlowService, finish_tx};

const SELECT_COLS: &str = "a.task_id, a.user_id, a.name, a.status, a.is_poc";

fn row_to_assignment(row: &libsql::Row) -> Result<Assignment, DatabaseError> {
    Ok(Assignment {
        task_id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        is_poc: get_flag(row, 4)?,
    })
}

impl FlowService {
    /// Assignments of `task_id` in the order they were added.
    pub async fn list_for_task(&self, task_id: &str) -> Result<Vec<Assignment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM assignments a
                     WHERE a.task_id = ?1
                     ORDER BY a.position, a.user_id"
                ),
                [task_id],
            )
            .await?;
        let mut list = Vec::new();
        while let Some(row) = rows.next().await? {
            list.push(row_to_assignment(&row)?);
        }
        Ok(list)
    }

    /// Replace the assignee set of `task_id` with `user_ids`.
    ///
    /// New assignees start at `not-acknowledge`; kept assignees keep their
    /// status. If any assignee that would be dropped has started work, nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Permission` unless `actor_id` created the task.
    /// - `WorkflowError::Conflict` naming every assignee that cannot be removed.
    /// - `WorkflowError::Validation` for unknown user ids.
    pub async fn replace_assignees(
        &self,
        task_id: &str,
        user_ids: &BTreeSet<String>,
        actor_id: &str,
    ) -> Result<AssigneeDiff, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let current = self.list_for_task(task_id).await?;
        let diff = resolve_permissions(&task, &current, actor_id)
            .ensure_creator("replace assignees")
            .and_then(|()| plan_replacement(&current, user_ids))
            .inspect_err(|e| tracing::warn!(task_id, actor_id, error = %e, "assignee replacement rejected"))?;
        self.require_users("assignees", diff.added.iter().map(String::as_str))
            .await?;

        if diff.is_noop() {
            return Ok(diff);
        }

        let tx = self.begin().await?;
        let result = self.write_replacement(task_id, actor_id, &diff).await;
        finish_tx(tx, result).await?;

        tracing::info!(
            task_id,
            added = ?diff.added,
            removed = ?diff.removed,
            "assignees replaced"
        );
        self.emit(&WorkflowEvent::new(task_id, EventKind::AssigneesChanged, actor_id));
        Ok(diff)
    }

    async fn write_replacement(
        &self,
        task_id: &str,
        actor_id: &str,
        diff: &AssigneeDiff,
    ) -> Result<(), DatabaseError> {
        for user_id in &diff.removed {
            self.db()
                .conn()
                .execute(
                    "DELETE FROM assignments WHERE task_id = ?1 AND user_id = ?2",
                    libsql::params![task_id, user_id.as_str()],
                )
                .await?;
        }
        for user_id in &diff.added {
            self.insert_assignment(task_id, user_id).await?;
        }
        self.record(
            actor_id,
            task_id,
            EntityType::Task,
            task_id,
            AuditAction::AssigneesReplaced,
            Some(serde_json::to_value(diff)?),
        )
        .await
    }

    /// Insert a fresh `not-acknowledge` assignment at the end of the list.
    ///
    /// The user's current display name is copied into the row; later renames
    /// do not touch it.
    pub(crate) async fn insert_assignment(
        &self,
        task_id: &str,
        user_id: &str,
    ) -> Result<(), DatabaseError> {
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO assignments (task_id, user_id, name, status, is_poc, position)
                 SELECT ?1, u.id, u.name, 'not-acknowledge', 0,
                        (SELECT COALESCE(MAX(position), -1) + 1 FROM assignments WHERE task_id = ?1)
                 FROM users u WHERE u.id = ?2",
                libsql::params![task_id, user_id],
            )
            .await?;
        if inserted == 0 {
            return Err(WorkflowError::validation("assignees", format!("unknown user id: {user_id}")).into());
        }
        Ok(())
    }

    /// Set or clear the point-of-contact flag on one assignment.
    ///
    /// Several assignees may carry the flag at once.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Permission` unless `actor_id` created the task.
    /// - `WorkflowError::NotFound` if `user_id` is not assigned.
    pub async fn set_point_of_contact(
        &self,
        task_id: &str,
        actor_id: &str,
        user_id: &str,
        is_poc: bool,
    ) -> Result<Assignment, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let current = self.list_for_task(task_id).await?;
        resolve_permissions(&task, &current, actor_id)
            .ensure_creator("change the point of contact")
            .inspect_err(|e| tracing::warn!(task_id, actor_id, error = %e, "poc change rejected"))?;
        let assignment = assignments::find(&current, user_id)
            .cloned()
            .ok_or_else(|| WorkflowError::not_found(EntityType::Assignment, assignment_key(task_id, user_id)))?;

        if assignment.is_poc == is_poc {
            return Ok(assignment);
        }

        let tx = self.begin().await?;
        let result = async {
            self.db()
                .conn()
                .execute(
                    "UPDATE assignments SET is_poc = ?1 WHERE task_id = ?2 AND user_id = ?3",
                    libsql::params![i64::from(is_poc), task_id, user_id],
                )
                .await?;
            self.record(
                actor_id,
                task_id,
                EntityType::Assignment,
                &assignment_key(task_id, user_id),
                AuditAction::PocChanged,
                Some(serde_json::json!({ "is_poc": is_poc })),
            )
            .await
        }
        .await;
        finish_tx(tx, result).await?;

        tracing::info!(task_id, user_id, is_poc, "point of contact changed");
        Ok(Assignment { is_poc, ..assignment })
    }
}
