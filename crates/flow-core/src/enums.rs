//! Status enums, field names, entity types and actions for Taskflow.
//!
//! Enums use lowercase serialization (`kebab-case` for work status, `snake_case`
//! for everything else). `WorkStatus` carries the transition tables used by the
//! status engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// WorkStatus
// ---------------------------------------------------------------------------

/// Progress status shared by assignee statuses and the creator-set task status.
///
/// ```text
/// not-acknowledge → acknowledge → in-progress → completed
/// (open table: every state reachable from every state)
/// ```
///
/// `Other` absorbs status strings this build does not recognise. It is never a
/// valid target for a status change, and an assignment carrying it stays
/// removable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    #[default]
    NotAcknowledge,
    Acknowledge,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

impl WorkStatus {
    /// The four recognised states, in lifecycle order.
    pub const KNOWN: [Self; 4] = [
        Self::NotAcknowledge,
        Self::Acknowledge,
        Self::InProgress,
        Self::Completed,
    ];

    /// Valid next states under the open table: any recognised state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        &Self::KNOWN
    }

    /// Valid next states under the progressive table.
    ///
    /// Staying in place is always allowed; `completed` may be reopened.
    #[must_use]
    pub const fn progressive_next_states(self) -> &'static [Self] {
        match self {
            Self::NotAcknowledge => &[Self::NotAcknowledge, Self::Acknowledge],
            Self::Acknowledge => &[Self::Acknowledge, Self::InProgress],
            Self::InProgress => &[Self::InProgress, Self::Completed],
            Self::Completed => &[Self::Completed, Self::InProgress],
            Self::Other => &[Self::NotAcknowledge],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether an assignment in this status may still be unassigned.
    #[must_use]
    pub const fn is_removable(self) -> bool {
        !matches!(self, Self::InProgress | Self::Completed)
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Other)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAcknowledge => "not-acknowledge",
            Self::Acknowledge => "acknowledge",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransitionMode
// ---------------------------------------------------------------------------

/// Which transition table `set_status` validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Every recognised state is reachable from every state.
    #[default]
    Open,
    /// One step forward at a time, with `completed → in-progress` reopening.
    Progressive,
}

impl TransitionMode {
    #[must_use]
    pub fn allows(self, from: WorkStatus, to: WorkStatus) -> bool {
        match self {
            Self::Open => from.can_transition_to(to),
            Self::Progressive => from.progressive_next_states().contains(&to),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Progressive => "progressive",
        }
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskField
// ---------------------------------------------------------------------------

/// Editable surface of a task, as seen by the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    Name,
    Project,
    Deadline,
    Priority,
    Remarks,
    Assignees,
    Status,
}

impl TaskField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Project,
        Self::Deadline,
        Self::Priority,
        Self::Remarks,
        Self::Assignees,
        Self::Status,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Project => "project",
            Self::Deadline => "deadline",
            Self::Priority => "priority",
            Self::Remarks => "remarks",
            Self::Assignees => "assignees",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Kind of workflow event handed to the notification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CommentAdded,
    StatusChanged,
    AssigneesChanged,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommentAdded => "comment_added",
            Self::StatusChanged => "status_changed",
            Self::AssigneesChanged => "assignees_changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    AssigneesReplaced,
    PocChanged,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::AssigneesReplaced => "assignees_replaced",
            Self::PocChanged => "poc_changed",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity types that appear in the audit trail and in `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Task,
    Assignment,
    Comment,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Task => "task",
            Self::Assignment => "assignment",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn work_status_serializes_kebab_case() {
        let json = serde_json::to_string(&WorkStatus::NotAcknowledge).unwrap();
        assert_eq!(json, "\"not-acknowledge\"");
        let back: WorkStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, WorkStatus::InProgress);
    }

    #[test]
    fn unknown_status_deserializes_as_other() {
        let status: WorkStatus = serde_json::from_str("\"on-hold\"").unwrap();
        assert_eq!(status, WorkStatus::Other);
        assert!(!status.is_known());
    }

    #[test]
    fn open_table_is_flat() {
        for from in WorkStatus::KNOWN {
            for to in WorkStatus::KNOWN {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn nothing_transitions_into_other() {
        for from in WorkStatus::KNOWN {
            assert!(!TransitionMode::Open.allows(from, WorkStatus::Other));
            assert!(!TransitionMode::Progressive.allows(from, WorkStatus::Other));
        }
    }

    #[rstest]
    #[case(WorkStatus::NotAcknowledge, WorkStatus::Acknowledge, true)]
    #[case(WorkStatus::Acknowledge, WorkStatus::InProgress, true)]
    #[case(WorkStatus::InProgress, WorkStatus::Completed, true)]
    #[case(WorkStatus::Completed, WorkStatus::InProgress, true)]
    #[case(WorkStatus::Completed, WorkStatus::Completed, true)]
    #[case(WorkStatus::NotAcknowledge, WorkStatus::Completed, false)]
    #[case(WorkStatus::InProgress, WorkStatus::NotAcknowledge, false)]
    #[case(WorkStatus::Other, WorkStatus::NotAcknowledge, true)]
    fn progressive_table(#[case] from: WorkStatus, #[case] to: WorkStatus, #[case] allowed: bool) {
        assert_eq!(TransitionMode::Progressive.allows(from, to), allowed);
    }

    #[rstest]
    #[case(WorkStatus::NotAcknowledge, true)]
    #[case(WorkStatus::Acknowledge, true)]
    #[case(WorkStatus::InProgress, false)]
    #[case(WorkStatus::Completed, false)]
    #[case(WorkStatus::Other, true)]
    fn removability(#[case] status: WorkStatus, #[case] removable: bool) {
        assert_eq!(status.is_removable(), removable);
    }

    #[test]
    fn priority_accepts_capitalised_alias() {
        let p: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(p, Priority::High);
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"high\"");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(WorkStatus::InProgress.to_string(), "in-progress");
        assert_eq!(TaskField::Remarks.to_string(), "remarks");
        assert_eq!(EventKind::CommentAdded.to_string(), "comment_added");
        assert_eq!(AuditAction::AssigneesReplaced.to_string(), "assignees_replaced");
        assert_eq!(EntityType::Comment.to_string(), "comment");
        assert_eq!(TransitionMode::Progressive.to_string(), "progressive");
    }
}
