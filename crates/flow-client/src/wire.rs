//! Backend wire records.
//!
//! The backend speaks its own field names (`comment` for the body, `user_id`
//! for the author, split date and time). These structs deserialize that shape
//! and convert into the core entities.

use chrono::{NaiveDate, NaiveTime};
use flow_core::entities::{Assignment, Comment, Task};
use flow_core::enums::{Priority, WorkStatus};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    #[serde(alias = "creatorId")]
    pub creator_id: String,
    #[serde(default, alias = "projectId", deserialize_with = "empty_as_none")]
    pub project_id: Option<String>,
    pub deadline: NaiveDate,
    pub priority: Priority,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub task_status: WorkStatus,
    pub created_date: NaiveDate,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            project_id: r.project_id,
            creator_id: r.creator_id,
            deadline: r.deadline,
            priority: r.priority,
            remarks: r.remarks,
            task_status: r.task_status,
            created_date: r.created_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRecord {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default, deserialize_with = "flag")]
    pub is_poc: bool,
}

impl AssignmentRecord {
    #[must_use]
    pub fn into_assignment(self, task_id: &str) -> Assignment {
        Assignment {
            status: self.status,
            is_poc: self.is_poc,
            ..Assignment::new(task_id, self.user_id, self.name)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    pub comment: String,
    pub created_date: NaiveDate,
    pub created_time: NaiveTime,
}

impl CommentRecord {
    /// Convert into a core comment. Date and time are read as UTC.
    #[must_use]
    pub fn into_comment(self, task_id: &str) -> Comment {
        Comment {
            id: self.id,
            task_id: task_id.to_string(),
            author_id: self.user_id,
            author_name: self.name,
            body: self.comment,
            parent_id: self.parent_id,
            created_at: self.created_date.and_time(self.created_time).and_utc(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SetStatusRequest<'a> {
    pub actor_id: &'a str,
    pub status: WorkStatus,
}

#[derive(Debug, Serialize)]
pub struct ReplaceAssigneesRequest<'a> {
    pub actor_id: &'a str,
    pub user_ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct AddCommentRequest<'a> {
    /// Client-generated, so a re-sent request names the same comment.
    pub id: &'a str,
    pub actor_id: &'a str,
    pub comment: &'a str,
    pub parent_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct EditCommentRequest<'a> {
    pub actor_id: &'a str,
    pub comment: &'a str,
}

/// The backend sends `""` for "no parent" and "no remarks".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Accepts `true`/`false` as well as `0`/`1`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}
