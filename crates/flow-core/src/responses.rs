//! Read-side view types returned by services and the CLI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::comments::build_tree;
use crate::entities::{Assignment, Comment, CommentNode, Task};
use crate::permissions::{Permissions, resolve_permissions};
use crate::status::StatusSummary;

/// Everything a task screen needs, resolved for one actor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    pub assignments: Vec<Assignment>,
    pub comments: Vec<CommentNode>,
    pub permissions: Permissions,
    pub summary: StatusSummary,
}

impl TaskView {
    /// Compose a view from freshly fetched records.
    #[must_use]
    pub fn compose(
        task: Task,
        assignments: Vec<Assignment>,
        comments: &[Comment],
        actor_id: &str,
    ) -> Self {
        let permissions = resolve_permissions(&task, &assignments, actor_id);
        let summary = StatusSummary::from_assignments(&assignments);
        Self {
            comments: build_tree(comments),
            task,
            assignments,
            permissions,
            summary,
        }
    }
}
