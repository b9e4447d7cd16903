use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A discussion entry on a task. `parent_id = None` marks a top-level comment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub task_id: String,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    #[must_use]
    pub fn is_authored_by(&self, actor_id: &str) -> bool {
        self.author_id == actor_id
    }
}

/// A comment with its replies attached, as produced by
/// [`build_tree`](crate::comments::build_tree), which bounds the nesting at
/// [`MAX_REPLY_DEPTH`](crate::comments::MAX_REPLY_DEPTH).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    #[must_use]
    pub const fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first iterator over the comments in this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Comment> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.replies.iter().rev());
            Some(&node.comment)
        })
    }
}
