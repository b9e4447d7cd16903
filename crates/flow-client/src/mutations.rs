//! Write side: validate locally, send, re-fetch.
//!
//! Every write first loads a fresh snapshot and runs the same rules the local
//! store runs, so most rejections never reach the network. The backend may
//! still reject a request that raced with another writer; its answer wins.
//!
//! New comments carry an id generated here, so re-sending the same request
//! cannot create a second comment.

use std::collections::BTreeSet;

use flow_core::assignments::{AssigneeDiff, plan_replacement};
use flow_core::comments::{ensure_author, validate_body, validate_parent, validate_reply_depth};
use flow_core::enums::{EntityType, EventKind, WorkStatus};
use flow_core::errors::WorkflowError;
use flow_core::events::WorkflowEvent;
use flow_core::ids::{PREFIX_COMMENT, format_id};
use flow_core::status::{StatusChange, plan_status_change};
use tracing::{info, warn};

use crate::BackendClient;
use crate::error::ClientError;
use crate::http::check_response;
use crate::snapshot::TaskSnapshot;
use crate::wire::{AddCommentRequest, EditCommentRequest, ReplaceAssigneesRequest, SetStatusRequest};

/// A write the backend accepted, plus the state re-fetched afterwards.
///
/// `snapshot` is an error when only the re-fetch failed. The write itself
/// stands and must not be sent again.
#[derive(Debug)]
pub struct Applied<T> {
    pub change: T,
    pub snapshot: Result<TaskSnapshot, ClientError>,
}

impl<T> Applied<T> {
    /// Re-fetched state, if the re-fetch succeeded.
    #[must_use]
    pub fn refreshed(&self) -> Option<&TaskSnapshot> {
        self.snapshot.as_ref().ok()
    }
}

/// Fresh client-side comment id, `cmt-` plus 8 random hex chars.
///
/// # Errors
///
/// Returns `WorkflowError::Other` if the OS random source fails.
pub fn new_comment_id() -> Result<String, ClientError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| WorkflowError::Other(anyhow::anyhow!("failed to generate comment id: {e}")))?;
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format_id(PREFIX_COMMENT, &suffix))
}

fn rejected<T>(action: &str, task_id: &str, err: WorkflowError) -> Result<T, ClientError> {
    warn!(action, task_id, error = %err, "mutation rejected");
    Err(err.into())
}

impl BackendClient {
    /// Set the status the actor owns on this task.
    ///
    /// The creator writes `task_status`; an assignee writes their own
    /// assignment status.
    ///
    /// # Errors
    ///
    /// Workflow rejections as `ClientError::Workflow`, transport failures as
    /// the other variants.
    pub async fn set_status(
        &self,
        task_id: &str,
        actor_id: &str,
        status: WorkStatus,
    ) -> Result<Applied<StatusChange>, ClientError> {
        let before = self.fetch_snapshot(task_id).await?;
        let change = match plan_status_change(
            &before.task,
            &before.assignments,
            actor_id,
            status,
            self.transitions(),
        ) {
            Ok(change) => change,
            Err(err) => return rejected("set_status", task_id, err),
        };

        let url = self.url(&["tasks", task_id, "status"]);
        let body = SetStatusRequest { actor_id, status };
        check_response(self.http.put(&url).json(&body).send().await?).await?;
        info!(task_id, actor_id, from = %change.from, to = %change.to, "status changed");
        self.emit(&WorkflowEvent::new(task_id, EventKind::StatusChanged, actor_id));

        Ok(self.refetch(task_id, change).await)
    }

    /// Replace the assignee set. All-or-nothing: if any assignee who would
    /// be dropped has started work, nothing is sent.
    ///
    /// # Errors
    ///
    /// `Permission` for non-creators, `Conflict` naming blocked assignees,
    /// plus transport failures.
    pub async fn replace_assignees(
        &self,
        task_id: &str,
        actor_id: &str,
        user_ids: &BTreeSet<String>,
    ) -> Result<Applied<AssigneeDiff>, ClientError> {
        let before = self.fetch_snapshot(task_id).await?;
        let planned = before
            .permissions(actor_id)
            .ensure_creator("change assignees")
            .and_then(|()| plan_replacement(&before.assignments, user_ids));
        let diff = match planned {
            Ok(diff) => diff,
            Err(err) => return rejected("replace_assignees", task_id, err),
        };
        if diff.is_noop() {
            return Ok(Applied {
                change: diff,
                snapshot: Ok(before),
            });
        }

        let url = self.url(&["tasks", task_id, "assignees"]);
        let body = ReplaceAssigneesRequest {
            actor_id,
            user_ids: user_ids.iter().map(String::as_str).collect(),
        };
        check_response(self.http.put(&url).json(&body).send().await?).await?;
        info!(
            task_id,
            actor_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "assignees replaced"
        );
        self.emit(&WorkflowEvent::new(task_id, EventKind::AssigneesChanged, actor_id));

        Ok(self.refetch(task_id, diff).await)
    }

    /// Post a comment, optionally as a reply, under a freshly generated id.
    ///
    /// The change is the new comment's id. To re-send after a transport
    /// failure, pass that id to [`add_comment_with_id`](Self::add_comment_with_id).
    ///
    /// # Errors
    ///
    /// `Validation` for an empty body, an unknown parent or a reply nested too
    /// deep, plus transport failures.
    pub async fn add_comment(
        &self,
        task_id: &str,
        actor_id: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Applied<String>, ClientError> {
        let comment_id = new_comment_id()?;
        self.add_comment_with_id(task_id, &comment_id, actor_id, body, parent_id)
            .await
    }

    /// Post a comment under a caller-chosen id. The backend treats a repeat
    /// of the same id as the same comment.
    ///
    /// # Errors
    ///
    /// Same as [`add_comment`](Self::add_comment).
    pub async fn add_comment_with_id(
        &self,
        task_id: &str,
        comment_id: &str,
        actor_id: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Applied<String>, ClientError> {
        let body = match validate_body(body) {
            Ok(body) => body,
            Err(err) => return rejected("add_comment", task_id, err),
        };
        if let Some(parent_id) = parent_id {
            let before = self.fetch_snapshot(task_id).await?;
            let checked = validate_parent(task_id, parent_id, before.comment(parent_id))
                .and_then(|()| validate_reply_depth(&before.comments, parent_id));
            if let Err(err) = checked {
                return rejected("add_comment", task_id, err);
            }
        }

        let url = self.url(&["tasks", task_id, "comments"]);
        let request = AddCommentRequest {
            id: comment_id,
            actor_id,
            comment: &body,
            parent_id,
        };
        check_response(self.http.post(&url).json(&request).send().await?).await?;
        info!(task_id, comment_id, actor_id, reply = parent_id.is_some(), "comment added");
        self.emit(&WorkflowEvent::new(task_id, EventKind::CommentAdded, actor_id));

        Ok(self.refetch(task_id, comment_id.to_string()).await)
    }

    /// Replace the body of the actor's own comment.
    ///
    /// # Errors
    ///
    /// `NotFound` if the comment is not on this task, `Permission` for
    /// non-authors, `Validation` for an empty body, plus transport failures.
    pub async fn edit_comment(
        &self,
        task_id: &str,
        comment_id: &str,
        actor_id: &str,
        body: &str,
    ) -> Result<Applied<String>, ClientError> {
        let before = self.fetch_snapshot(task_id).await?;
        let checked = own_comment(&before, comment_id, actor_id).and_then(|()| validate_body(body));
        let body = match checked {
            Ok(body) => body,
            Err(err) => return rejected("edit_comment", task_id, err),
        };

        let url = self.url(&["comments", comment_id]);
        let request = EditCommentRequest {
            actor_id,
            comment: &body,
        };
        check_response(self.http.put(&url).json(&request).send().await?).await?;
        info!(task_id, comment_id, actor_id, "comment edited");

        Ok(self.refetch(task_id, comment_id.to_string()).await)
    }

    /// Delete the actor's own comment. Replies to it become orphans and drop
    /// out of the tree.
    ///
    /// # Errors
    ///
    /// `NotFound` if the comment is not on this task, `Permission` for
    /// non-authors, plus transport failures.
    pub async fn delete_comment(
        &self,
        task_id: &str,
        comment_id: &str,
        actor_id: &str,
    ) -> Result<Applied<String>, ClientError> {
        let before = self.fetch_snapshot(task_id).await?;
        if let Err(err) = own_comment(&before, comment_id, actor_id) {
            return rejected("delete_comment", task_id, err);
        }

        let url = format!(
            "{}?actor_id={}",
            self.url(&["comments", comment_id]),
            urlencoding::encode(actor_id)
        );
        check_response(self.http.delete(&url).send().await?).await?;
        info!(task_id, comment_id, actor_id, "comment deleted");

        Ok(self.refetch(task_id, comment_id.to_string()).await)
    }

    /// Re-fetch after an accepted write. A failure here is logged and kept
    /// on the result; it does not turn the write into an error.
    async fn refetch<T>(&self, task_id: &str, change: T) -> Applied<T> {
        let snapshot = self.fetch_snapshot(task_id).await;
        if let Err(err) = &snapshot {
            warn!(task_id, error = %err, "write applied but re-fetch failed");
        }
        Applied { change, snapshot }
    }
}

fn own_comment(snapshot: &TaskSnapshot, comment_id: &str, actor_id: &str) -> Result<(), WorkflowError> {
    let comment = snapshot
        .comment(comment_id)
        .ok_or_else(|| WorkflowError::not_found(EntityType::Comment, comment_id))?;
    ensure_author(comment, actor_id)
}
