//! Task repository: creation, creator-only edits and `set_status`.

use std::collections::BTreeSet;

use chrono::Utc;
use flow_core::assignments;
use flow_core::entities::Task;
use flow_core::enums::{AuditAction, EntityType, EventKind, WorkStatus};
use flow_core::errors::WorkflowError;
use flow_core::events::WorkflowEvent;
use flow_core::ids::PREFIX_TASK;
use flow_core::permissions::resolve_permissions;
use flow_core::status::{StatusChange, StatusTarget, plan_status_change};
use flow_core::validation::{NewTask, validate_deadline, validate_name, validate_remarks};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_enum};
use crate::service::{FlowService, finish_tx};
use crate::updates::task::TaskUpdate;

const SELECT_COLS: &str =
    "id, name, project_id, creator_id, deadline, priority, remarks, task_status, created_date";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        project_id: get_opt_string(row, 2)?,
        creator_id: row.get(3)?,
        deadline: parse_date(&row.get::<String>(4)?)?,
        priority: parse_enum(&row.get::<String>(5)?)?,
        remarks: get_opt_string(row, 6)?,
        task_status: parse_enum(&row.get::<String>(7)?)?,
        created_date: parse_date(&row.get::<String>(8)?)?,
    })
}

impl FlowService {
    /// Create a task owned by `actor_id` and assign it to `assignee_ids`.
    ///
    /// The creation date is today (UTC) and is the lower bound for the
    /// deadline. Every assignment starts at `not-acknowledge`.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Validation` for bad fields or unknown user ids.
    /// - `DatabaseError` if the write fails.
    pub async fn create_task(
        &self,
        actor_id: &str,
        new: NewTask,
        assignee_ids: &BTreeSet<String>,
    ) -> Result<Task, DatabaseError> {
        let _writer = self.lock_writes().await;
        let created_date = Utc::now().date_naive();
        let new = new.validated(created_date)?;
        self.require_users("creator_id", [actor_id]).await?;
        self.require_users("assignees", assignee_ids.iter().map(String::as_str))
            .await?;

        let id = self.db().generate_id(PREFIX_TASK).await?;
        let task = Task {
            id,
            name: new.name,
            project_id: new.project_id,
            creator_id: actor_id.to_string(),
            deadline: new.deadline,
            priority: new.priority,
            remarks: new.remarks,
            task_status: WorkStatus::NotAcknowledge,
            created_date,
        };

        let tx = self.begin().await?;
        let result = self.write_new_task(&task, assignee_ids).await;
        finish_tx(tx, result).await?;

        tracing::info!(task_id = %task.id, creator = actor_id, assignees = assignee_ids.len(), "task created");
        Ok(task)
    }

    async fn write_new_task(
        &self,
        task: &Task,
        assignee_ids: &BTreeSet<String>,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO tasks ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                libsql::params![
                    task.id.as_str(),
                    task.name.as_str(),
                    task.project_id.as_deref(),
                    task.creator_id.as_str(),
                    task.deadline.to_string(),
                    task.priority.as_str(),
                    task.remarks.as_deref(),
                    task.task_status.as_str(),
                    task.created_date.to_string()
                ],
            )
            .await?;
        for user_id in assignee_ids {
            self.insert_assignment(&task.id, user_id).await?;
        }
        self.record(
            &task.creator_id,
            &task.id,
            EntityType::Task,
            &task.id,
            AuditAction::Created,
            Some(serde_json::json!({ "assignees": assignee_ids })),
        )
        .await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| WorkflowError::not_found(EntityType::Task, id))?;
        row_to_task(&row)
    }

    /// Tasks ordered by deadline.
    pub async fn list_tasks(&self, limit: u32) -> Result<Vec<Task>, DatabaseError> {
        self.query_tasks(
            &format!("SELECT {SELECT_COLS} FROM tasks ORDER BY deadline, created_date, id LIMIT {limit}"),
            (),
        )
        .await
    }

    /// Tasks `user_id` created or is assigned to, ordered by deadline.
    pub async fn list_tasks_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Task>, DatabaseError> {
        self.query_tasks(
            &format!(
                "SELECT {SELECT_COLS} FROM tasks
                 WHERE creator_id = ?1
                    OR id IN (SELECT task_id FROM assignments WHERE user_id = ?1)
                 ORDER BY deadline, created_date, id LIMIT {limit}"
            ),
            [user_id],
        )
        .await
    }

    async fn query_tasks(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, params).await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Apply a creator-only edit to the task's own fields.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Permission` unless `actor_id` created the task.
    /// - `WorkflowError::Validation` for bad field values.
    pub async fn update_task(
        &self,
        task_id: &str,
        actor_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let current = self.list_for_task(task_id).await?;
        resolve_permissions(&task, &current, actor_id)
            .ensure_creator("edit the task")
            .inspect_err(|e| tracing::warn!(task_id, actor_id, error = %e, "task edit rejected"))?;

        let update = validate_update(&task, update)?;
        if update.is_empty() {
            return Ok(task);
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.clone().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref project_id) = update.project_id {
            params.push(project_id.clone().map_or(libsql::Value::Null, Into::into));
            sets.push(format!("project_id = ?{}", params.len()));
        }
        if let Some(deadline) = update.deadline {
            params.push(deadline.to_string().into());
            sets.push(format!("deadline = ?{}", params.len()));
        }
        if let Some(priority) = update.priority {
            params.push(priority.as_str().into());
            sets.push(format!("priority = ?{}", params.len()));
        }
        if let Some(ref remarks) = update.remarks {
            params.push(remarks.clone().map_or(libsql::Value::Null, Into::into));
            sets.push(format!("remarks = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(task_id.into());
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{}", sets.join(", "), params.len());

        let tx = self.begin().await?;
        let result = async {
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
            self.record(
                actor_id,
                task_id,
                EntityType::Task,
                task_id,
                AuditAction::Updated,
                Some(serde_json::to_value(&update)?),
            )
            .await
        }
        .await;
        finish_tx(tx, result).await?;

        tracing::info!(task_id, fields = ?update.fields(), "task updated");
        self.get_task(task_id).await
    }

    /// Set a status on behalf of `actor_id`.
    ///
    /// The creator writes the task-level `task_status`; an assignee writes
    /// their own assignment status. The other kind of status is untouched.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Permission` if the actor is neither creator nor assignee.
    /// - `WorkflowError::Validation` if `new_status` is not recognised.
    /// - `WorkflowError::InvalidTransition` if the configured table forbids it.
    pub async fn set_status(
        &self,
        task_id: &str,
        actor_id: &str,
        new_status: WorkStatus,
    ) -> Result<StatusChange, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let current = self.list_for_task(task_id).await?;
        let change = plan_status_change(&task, &current, actor_id, new_status, self.transitions())
            .inspect_err(|e| tracing::warn!(task_id, actor_id, error = %e, "status change rejected"))?;

        let tx = self.begin().await?;
        let result = self.write_status_change(actor_id, &change).await;
        finish_tx(tx, result).await?;

        tracing::info!(
            task_id,
            actor_id,
            from = %change.from,
            to = %change.to,
            "status changed"
        );
        self.emit(&WorkflowEvent::new(task_id, EventKind::StatusChanged, actor_id));
        Ok(change)
    }

    async fn write_status_change(
        &self,
        actor_id: &str,
        change: &StatusChange,
    ) -> Result<(), DatabaseError> {
        let (entity_type, entity_id) = match &change.target {
            StatusTarget::Task => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE tasks SET task_status = ?1, updated_at = ?2 WHERE id = ?3",
                        libsql::params![
                            change.to.as_str(),
                            Utc::now().to_rfc3339(),
                            change.task_id.as_str()
                        ],
                    )
                    .await?;
                (EntityType::Task, change.task_id.clone())
            }
            StatusTarget::Assignment { user_id } => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE assignments SET status = ?1 WHERE task_id = ?2 AND user_id = ?3",
                        libsql::params![change.to.as_str(), change.task_id.as_str(), user_id.as_str()],
                    )
                    .await?;
                (EntityType::Assignment, assignment_key(&change.task_id, user_id))
            }
        };
        self.record(
            actor_id,
            &change.task_id,
            entity_type,
            &entity_id,
            AuditAction::StatusChanged,
            Some(serde_json::json!({ "from": change.from, "to": change.to })),
        )
        .await
    }

    /// Whether `user_id` is currently assigned to `task_id`.
    pub async fn is_assigned(&self, task_id: &str, user_id: &str) -> Result<bool, DatabaseError> {
        let current = self.list_for_task(task_id).await?;
        Ok(assignments::find(&current, user_id).is_some())
    }
}

/// Audit entity id for an assignment row.
pub(crate) fn assignment_key(task_id: &str, user_id: &str) -> String {
    format!("{task_id}/{user_id}")
}

fn validate_update(task: &Task, update: TaskUpdate) -> Result<TaskUpdate, WorkflowError> {
    Ok(TaskUpdate {
        name: update.name.as_deref().map(validate_name).transpose()?,
        deadline: update
            .deadline
            .map(|d| validate_deadline(d, task.created_date))
            .transpose()?,
        remarks: update
            .remarks
            .as_ref()
            .map(|r| validate_remarks(r.as_deref()))
            .transpose()?,
        project_id: update
            .project_id
            .map(|p| p.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
        priority: update.priority,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{future_deadline, ids, new_task, seeded_service};
    use crate::updates::task::TaskUpdateBuilder;
    use chrono::Days;
    use flow_core::enums::{Priority, TransitionMode};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_task_roundtrip() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Ship release"), &ids(&["usr-b", "usr-c"]))
            .await
            .unwrap();

        assert!(task.id.starts_with("tsk-"));
        assert_eq!(task.task_status, WorkStatus::NotAcknowledge);
        assert_eq!(task.created_date, Utc::now().date_naive());

        let fetched = svc.get_task(&task.id).await.unwrap();
        assert_eq!(fetched, task);

        let assigned = svc.list_for_task(&task.id).await.unwrap();
        assert_eq!(assigned.len(), 2);
        assert!(assigned.iter().all(|a| a.status == WorkStatus::NotAcknowledge));
    }

    #[tokio::test]
    async fn create_rejects_bad_fields_and_unknown_users() {
        let svc = seeded_service().await;

        let mut past = new_task("Late");
        past.deadline = Utc::now().date_naive() - Days::new(1);
        let err = svc.create_task("usr-a", past, &ids(&[])).await.unwrap_err();
        assert!(matches!(
            err.as_workflow(),
            Some(WorkflowError::Validation { field, .. }) if field == "deadline"
        ));

        let err = svc
            .create_task("usr-a", new_task("Ghosts"), &ids(&["usr-ghost"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_workflow(),
            Some(WorkflowError::Validation { field, .. }) if field == "assignees"
        ));

        assert!(svc.list_tasks(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let svc = seeded_service().await;
        let err = svc.get_task("tsk-nope").await.unwrap_err();
        assert!(matches!(err.as_workflow(), Some(WorkflowError::NotFound { .. })));
    }

    #[tokio::test]
    async fn creator_edits_fields() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Draft"), &ids(&["usr-b"]))
            .await
            .unwrap();

        let update = TaskUpdateBuilder::new()
            .name("  Final ")
            .priority(Priority::High)
            .remarks(Some("needs review".into()))
            .deadline(future_deadline() + Days::new(3))
            .build();
        let updated = svc.update_task(&task.id, "usr-a", update).await.unwrap();
        assert_eq!(updated.name, "Final");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.remarks.as_deref(), Some("needs review"));
        assert_eq!(updated.task_status, task.task_status);

        let cleared = svc
            .update_task(&task.id, "usr-a", TaskUpdateBuilder::new().remarks(None).build())
            .await
            .unwrap();
        assert_eq!(cleared.remarks, None);
    }

    #[tokio::test]
    async fn assignee_cannot_edit_fields() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Locked"), &ids(&["usr-b"]))
            .await
            .unwrap();

        let err = svc
            .update_task(&task.id, "usr-b", TaskUpdateBuilder::new().name("Mine").build())
            .await
            .unwrap_err();
        assert!(matches!(err.as_workflow(), Some(WorkflowError::Permission(_))));
        assert_eq!(svc.get_task(&task.id).await.unwrap().name, "Locked");
    }

    #[tokio::test]
    async fn edit_revalidates_remarks_and_deadline() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Bounds"), &ids(&[]))
            .await
            .unwrap();

        let too_long = TaskUpdateBuilder::new().remarks(Some("x".repeat(501))).build();
        assert!(svc.update_task(&task.id, "usr-a", too_long).await.is_err());

        let early = TaskUpdateBuilder::new()
            .deadline(task.created_date - Days::new(1))
            .build();
        assert!(svc.update_task(&task.id, "usr-a", early).await.is_err());
        assert_eq!(svc.get_task(&task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn creator_sets_task_status_only() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Status"), &ids(&["usr-b"]))
            .await
            .unwrap();

        let change = svc
            .set_status(&task.id, "usr-a", WorkStatus::Completed)
            .await
            .unwrap();
        assert_eq!(change.target, StatusTarget::Task);
        assert_eq!(svc.get_task(&task.id).await.unwrap().task_status, WorkStatus::Completed);
        assert_eq!(
            svc.list_for_task(&task.id).await.unwrap()[0].status,
            WorkStatus::NotAcknowledge
        );
    }

    #[tokio::test]
    async fn assignee_sets_own_status_and_can_regress() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Own"), &ids(&["usr-b", "usr-c"]))
            .await
            .unwrap();

        svc.set_status(&task.id, "usr-b", WorkStatus::Completed)
            .await
            .unwrap();
        svc.set_status(&task.id, "usr-b", WorkStatus::Acknowledge)
            .await
            .unwrap();

        let assigned = svc.list_for_task(&task.id).await.unwrap();
        let b = assignments::find(&assigned, "usr-b").unwrap();
        let c = assignments::find(&assigned, "usr-c").unwrap();
        assert_eq!(b.status, WorkStatus::Acknowledge);
        assert_eq!(c.status, WorkStatus::NotAcknowledge);
        assert_eq!(svc.get_task(&task.id).await.unwrap().task_status, WorkStatus::NotAcknowledge);
    }

    #[tokio::test]
    async fn stranger_cannot_set_status() {
        let svc = seeded_service().await;
        let task = svc
            .create_task("usr-a", new_task("Private"), &ids(&["usr-b"]))
            .await
            .unwrap();
        let err = svc
            .set_status(&task.id, "usr-c", WorkStatus::InProgress)
            .await
            .unwrap_err();
        assert!(matches!(err.as_workflow(), Some(WorkflowError::Permission(_))));
    }

    #[tokio::test]
    async fn progressive_table_is_enforced() {
        let svc = seeded_service()
            .await
            .with_transitions(TransitionMode::Progressive);
        let task = svc
            .create_task("usr-a", new_task("Steps"), &ids(&["usr-b"]))
            .await
            .unwrap();

        let err = svc
            .set_status(&task.id, "usr-b", WorkStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_workflow(),
            Some(WorkflowError::InvalidTransition { .. })
        ));
        svc.set_status(&task.id, "usr-b", WorkStatus::Acknowledge)
            .await
            .unwrap();
        assert!(svc.is_assigned(&task.id, "usr-b").await.unwrap());
    }

    #[tokio::test]
    async fn list_for_user_includes_created_and_assigned() {
        let svc = seeded_service().await;
        svc.create_task("usr-a", new_task("Mine"), &ids(&[])).await.unwrap();
        svc.create_task("usr-b", new_task("Assigned to A"), &ids(&["usr-a"]))
            .await
            .unwrap();
        svc.create_task("usr-b", new_task("Not A's"), &ids(&["usr-c"]))
            .await
            .unwrap();

        assert_eq!(svc.list_tasks(10).await.unwrap().len(), 3);
        assert_eq!(svc.list_tasks_for_user("usr-a", 10).await.unwrap().len(), 2);
        assert_eq!(svc.list_tasks(1).await.unwrap().len(), 1);
    }
}
