//! Comment store: flat storage, reply trees and author-only mutation.

use chrono::Utc;
use flow_core::comments::{
    build_tree, ensure_author, validate_body, validate_parent, validate_reply_depth,
};
use flow_core::entities::{Comment, CommentNode};
use flow_core::enums::{AuditAction, EntityType, EventKind};
use flow_core::errors::WorkflowError;
use flow_core::events::WorkflowEvent;
use flow_core::ids::PREFIX_COMMENT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{FlowService, finish_tx};

const SELECT_COLS: &str =
    "c.id, c.task_id, c.author_id, u.name, c.body, c.parent_id, c.created_at";

fn row_to_comment(row: &libsql::Row) -> Result<Comment, DatabaseError> {
    Ok(Comment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        author_id: row.get(2)?,
        author_name: row.get(3)?,
        body: row.get(4)?,
        parent_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl FlowService {
    /// Flat comment list of a task, oldest first.
    pub async fn list_by_task(&self, task_id: &str) -> Result<Vec<Comment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM comments c
                     JOIN users u ON u.id = c.author_id
                     WHERE c.task_id = ?1
                     ORDER BY c.created_at, c.rowid"
                ),
                [task_id],
            )
            .await?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(row_to_comment(&row)?);
        }
        Ok(comments)
    }

    /// Reply trees of a task. Replies whose parent was deleted are hidden.
    /// So is anything nested deeper than `MAX_REPLY_DEPTH`.
    pub async fn comment_tree(&self, task_id: &str) -> Result<Vec<CommentNode>, DatabaseError> {
        let _writer = self.lock_writes().await;
        Ok(build_tree(&self.list_by_task(task_id).await?))
    }

    pub async fn get_comment(&self, id: &str) -> Result<Comment, DatabaseError> {
        self.find_comment(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(EntityType::Comment, id).into())
    }

    async fn find_comment(&self, id: &str) -> Result<Option<Comment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM comments c
                     JOIN users u ON u.id = c.author_id
                     WHERE c.id = ?1"
                ),
                [id],
            )
            .await?;
        rows.next().await?.as_ref().map(row_to_comment).transpose()
    }

    /// Post a comment, or a reply when `parent_id` is given.
    ///
    /// The body is stored trimmed. Concurrent posts under the same parent all
    /// succeed as siblings.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Validation` for an empty body, an unknown author, a
    ///   parent that is missing or on another task, or a reply that would nest
    ///   deeper than `MAX_REPLY_DEPTH`.
    /// - `WorkflowError::NotFound` if the task does not exist.
    pub async fn add_comment(
        &self,
        task_id: &str,
        author_id: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, DatabaseError> {
        let body = validate_body(body)?;
        let _writer = self.lock_writes().await;
        self.get_task(task_id).await?;
        let author = self
            .find_user(author_id)
            .await?
            .ok_or_else(|| WorkflowError::validation("author_id", format!("unknown user id: {author_id}")))?;
        if let Some(parent_id) = parent_id {
            let parent = self.find_comment(parent_id).await?;
            validate_parent(task_id, parent_id, parent.as_ref())?;
            validate_reply_depth(&self.list_by_task(task_id).await?, parent_id)?;
        }

        let comment = Comment {
            id: self.db().generate_id(PREFIX_COMMENT).await?,
            task_id: task_id.to_string(),
            author_id: author.id,
            author_name: author.name,
            body,
            parent_id: parent_id.map(String::from),
            created_at: Utc::now(),
        };

        let tx = self.begin().await?;
        let result = async {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO comments (id, task_id, author_id, body, parent_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    libsql::params![
                        comment.id.as_str(),
                        comment.task_id.as_str(),
                        comment.author_id.as_str(),
                        comment.body.as_str(),
                        comment.parent_id.as_deref(),
                        comment.created_at.to_rfc3339()
                    ],
                )
                .await?;
            self.record(
                author_id,
                task_id,
                EntityType::Comment,
                &comment.id,
                AuditAction::Created,
                comment
                    .parent_id
                    .as_ref()
                    .map(|p| serde_json::json!({ "parent_id": p })),
            )
            .await
        }
        .await;
        finish_tx(tx, result).await?;

        tracing::info!(task_id, comment_id = %comment.id, reply = parent_id.is_some(), "comment added");
        self.emit(&WorkflowEvent::new(task_id, EventKind::CommentAdded, author_id));
        Ok(comment)
    }

    /// Replace the body of a comment. Author only.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Permission` if `actor_id` is not the author.
    /// - `WorkflowError::Validation` for an empty body.
    pub async fn edit_comment(
        &self,
        comment_id: &str,
        actor_id: &str,
        new_body: &str,
    ) -> Result<Comment, DatabaseError> {
        let _writer = self.lock_writes().await;
        let comment = self.get_comment(comment_id).await?;
        ensure_author(&comment, actor_id)
            .inspect_err(|e| tracing::warn!(comment_id, actor_id, error = %e, "comment edit rejected"))?;
        let body = validate_body(new_body)?;

        let tx = self.begin().await?;
        let result = async {
            self.db()
                .conn()
                .execute(
                    "UPDATE comments SET body = ?1 WHERE id = ?2",
                    libsql::params![body.as_str(), comment_id],
                )
                .await?;
            self.record(
                actor_id,
                &comment.task_id,
                EntityType::Comment,
                comment_id,
                AuditAction::Updated,
                None,
            )
            .await
        }
        .await;
        finish_tx(tx, result).await?;

        tracing::info!(comment_id, "comment edited");
        Ok(Comment { body, ..comment })
    }

    /// Delete a single comment. Author only. Replies stay in storage and drop
    /// out of the reply tree.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Permission` if `actor_id` is not the author.
    pub async fn delete_comment(&self, comment_id: &str, actor_id: &str) -> Result<(), DatabaseError> {
        let _writer = self.lock_writes().await;
        let comment = self.get_comment(comment_id).await?;
        ensure_author(&comment, actor_id)
            .inspect_err(|e| tracing::warn!(comment_id, actor_id, error = %e, "comment delete rejected"))?;

        let tx = self.begin().await?;
        let result = async {
            self.db()
                .conn()
                .execute("DELETE FROM comments WHERE id = ?1", [comment_id])
                .await?;
            self.record(
                actor_id,
                &comment.task_id,
                EntityType::Comment,
                comment_id,
                AuditAction::Deleted,
                Some(serde_json::to_value(&comment)?),
            )
            .await
        }
        .await;
        finish_tx(tx, result).await?;

        tracing::info!(comment_id, "comment deleted");
        Ok(())
    }
}
