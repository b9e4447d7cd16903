//! Comment threading and comment mutation rules.
//!
//! Comments are stored flat with an optional `parent_id`. [`build_tree`] turns
//! the flat list into reply trees for display. A comment whose parent cannot be
//! resolved is an orphan: it is dropped from the tree together with everything
//! that replies to it. Replies nest at most [`MAX_REPLY_DEPTH`] levels below a
//! top-level comment; anything deeper is dropped the same way.

use std::collections::{HashMap, HashSet};

use crate::entities::{Comment, CommentNode};
use crate::errors::WorkflowError;

/// Deepest reply level accepted on write and shown in a tree. Top-level
/// comments sit at depth 0.
pub const MAX_REPLY_DEPTH: usize = 50;

/// Build reply trees from a flat comment list.
///
/// Roots are comments without a parent. Roots and replies keep input order.
/// Comments are attached to their parent only when the parent id resolves to
/// another comment in `comments`; unresolved comments and their descendants do
/// not appear in the output. Duplicate ids keep the first occurrence. Replies
/// deeper than [`MAX_REPLY_DEPTH`] are cut off together with their descendants.
#[must_use]
pub fn build_tree(comments: &[Comment]) -> Vec<CommentNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        index.entry(comment.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        if index.get(comment.id.as_str()) != Some(&i) {
            continue;
        }
        match comment.parent_id.as_deref() {
            None => roots.push(i),
            Some(parent_id) => {
                if let Some(&parent) = index.get(parent_id) {
                    if parent != i {
                        children[parent].push(i);
                    }
                }
            }
        }
    }

    let mut forest = Vec::with_capacity(roots.len());
    for root in roots {
        assemble(root, comments, &children, &mut forest);
    }
    forest
}

struct Frame {
    at: usize,
    next_child: usize,
    replies: Vec<CommentNode>,
}

impl Frame {
    const fn new(at: usize) -> Self {
        Self {
            at,
            next_child: 0,
            replies: Vec::new(),
        }
    }
}

/// Post-order assembly of one root on an explicit stack. The stack never
/// holds more than `MAX_REPLY_DEPTH + 1` frames.
fn assemble(root: usize, comments: &[Comment], children: &[Vec<usize>], out: &mut Vec<CommentNode>) {
    let mut stack = vec![Frame::new(root)];
    while let Some(top) = stack.last_mut() {
        if let Some(&child) = children[top.at].get(top.next_child) {
            top.next_child += 1;
            if stack.len() <= MAX_REPLY_DEPTH {
                stack.push(Frame::new(child));
            }
            continue;
        }
        let Some(done) = stack.pop() else { break };
        let node = CommentNode {
            comment: comments[done.at].clone(),
            replies: done.replies,
        };
        match stack.last_mut() {
            Some(parent) => parent.replies.push(node),
            None => out.push(node),
        }
    }
}

/// Depth of comment `id` within `thread`: 0 for a top-level comment, one more
/// per parent hop. The walk stops at a parent that does not resolve or at a
/// cycle, and never counts past `MAX_REPLY_DEPTH + 1`.
#[must_use]
pub fn reply_depth(thread: &[Comment], id: &str) -> usize {
    let by_id: HashMap<&str, &Comment> = thread.iter().rev().map(|c| (c.id.as_str(), c)).collect();
    let mut seen = HashSet::new();
    let mut depth = 0;
    let mut current = id;
    while depth <= MAX_REPLY_DEPTH && seen.insert(current) {
        match by_id.get(current).and_then(|c| c.parent_id.as_deref()) {
            Some(parent) if by_id.contains_key(parent) => {
                depth += 1;
                current = parent;
            }
            _ => break,
        }
    }
    depth
}

/// Reject a reply that would land deeper than [`MAX_REPLY_DEPTH`].
///
/// `thread` is the flat comment list of the task holding `parent_id`.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` on `parent_id` when the parent already
/// sits at the deepest allowed level.
pub fn validate_reply_depth(thread: &[Comment], parent_id: &str) -> Result<(), WorkflowError> {
    if reply_depth(thread, parent_id) >= MAX_REPLY_DEPTH {
        return Err(WorkflowError::validation(
            "parent_id",
            format!("replies nest at most {MAX_REPLY_DEPTH} levels deep"),
        ));
    }
    Ok(())
}

/// Comments that [`build_tree`] leaves out, in input order.
#[must_use]
pub fn excluded<'a>(comments: &'a [Comment], tree: &[CommentNode]) -> Vec<&'a Comment> {
    let shown: HashSet<&str> = tree
        .iter()
        .flat_map(CommentNode::iter)
        .map(|c| c.id.as_str())
        .collect();
    comments
        .iter()
        .filter(|c| !shown.contains(c.id.as_str()))
        .collect()
}

/// Total number of comments in a forest.
#[must_use]
pub fn count_nodes(tree: &[CommentNode]) -> usize {
    tree.iter().map(CommentNode::subtree_size).sum()
}

/// Trim a comment body and reject it if nothing is left.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` for an empty or whitespace-only body.
pub fn validate_body(body: &str) -> Result<String, WorkflowError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::validation("body", "comment cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Check that a reply target exists and belongs to the same task.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if `parent` is missing or sits on a
/// different task.
pub fn validate_parent(
    task_id: &str,
    parent_id: &str,
    parent: Option<&Comment>,
) -> Result<(), WorkflowError> {
    match parent {
        Some(p) if p.task_id == task_id => Ok(()),
        Some(_) => Err(WorkflowError::validation(
            "parent_id",
            format!("comment {parent_id} belongs to another task"),
        )),
        None => Err(WorkflowError::validation(
            "parent_id",
            format!("comment {parent_id} does not exist"),
        )),
    }
}

/// Only the author may edit or delete a comment.
///
/// # Errors
///
/// Returns `WorkflowError::Permission` if `actor_id` did not write `comment`.
pub fn ensure_author(comment: &Comment, actor_id: &str) -> Result<(), WorkflowError> {
    if comment.is_authored_by(actor_id) {
        Ok(())
    } else {
        Err(WorkflowError::Permission(format!(
            "only the author may modify comment {}",
            comment.id
        )))
    }
}
