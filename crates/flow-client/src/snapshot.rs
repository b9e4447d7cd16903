//! Read side: fetch a task with its assignments and comments.

use flow_core::comments::build_tree;
use flow_core::entities::{Assignment, Comment, CommentNode, Task};
use flow_core::permissions::{Permissions, resolve_permissions};
use flow_core::responses::TaskView;
use tracing::debug;

use crate::BackendClient;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::wire::{AssignmentRecord, CommentRecord, TaskRecord};

/// Backend state of one task as of the last fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub task: Task,
    pub assignments: Vec<Assignment>,
    /// Flat, in backend order.
    pub comments: Vec<Comment>,
}

impl TaskSnapshot {
    #[must_use]
    pub fn tree(&self) -> Vec<CommentNode> {
        build_tree(&self.comments)
    }

    #[must_use]
    pub fn permissions(&self, actor_id: &str) -> Permissions {
        resolve_permissions(&self.task, &self.assignments, actor_id)
    }

    #[must_use]
    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Resolve a display view for `actor_id`.
    #[must_use]
    pub fn view(self, actor_id: &str) -> TaskView {
        TaskView::compose(self.task, self.assignments, &self.comments, actor_id)
    }
}

impl BackendClient {
    /// Fetch the task record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures, non-success statuses or
    /// malformed bodies.
    pub async fn fetch_task(&self, task_id: &str) -> Result<Task, ClientError> {
        let url = self.url(&["tasks", task_id]);
        debug!(%url, "fetching task");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        let record: TaskRecord = read_json(resp).await?;
        Ok(record.into())
    }

    /// Fetch the task's assignments in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures, non-success statuses or
    /// malformed bodies.
    pub async fn fetch_assignments(&self, task_id: &str) -> Result<Vec<Assignment>, ClientError> {
        let url = self.url(&["tasks", task_id, "assignments"]);
        debug!(%url, "fetching assignments");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        let records: Vec<AssignmentRecord> = read_json(resp).await?;
        Ok(records
            .into_iter()
            .map(|r| r.into_assignment(task_id))
            .collect())
    }

    /// Fetch the task's comments as a flat list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures, non-success statuses or
    /// malformed bodies.
    pub async fn fetch_comments(&self, task_id: &str) -> Result<Vec<Comment>, ClientError> {
        let url = self.url(&["tasks", task_id, "comments"]);
        debug!(%url, "fetching comments");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        let records: Vec<CommentRecord> = read_json(resp).await?;
        Ok(records.into_iter().map(|r| r.into_comment(task_id)).collect())
    }

    /// Fetch task, assignments and comments concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error among the three requests.
    pub async fn fetch_snapshot(&self, task_id: &str) -> Result<TaskSnapshot, ClientError> {
        let (task, assignments, comments) = tokio::join!(
            self.fetch_task(task_id),
            self.fetch_assignments(task_id),
            self.fetch_comments(task_id),
        );
        Ok(TaskSnapshot {
            task: task?,
            assignments: assignments?,
            comments: comments?,
        })
    }

    /// Fetch a snapshot and resolve it for `actor_id`.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_snapshot`](Self::fetch_snapshot).
    pub async fn task_view(&self, task_id: &str, actor_id: &str) -> Result<TaskView, ClientError> {
        Ok(self.fetch_snapshot(task_id).await?.view(actor_id))
    }
}
