//! Workflow events handed to the notification collaborator.
//!
//! The core only emits events after a mutation has been committed. Delivery,
//! sounds and desktop alerts are the sink's business; a sink must not fail the
//! mutation that produced the event.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EventKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowEvent {
    pub task_id: String,
    pub kind: EventKind,
    pub actor_id: String,
}

impl WorkflowEvent {
    pub fn new(task_id: impl Into<String>, kind: EventKind, actor_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
            actor_id: actor_id.into(),
        }
    }
}

/// Receiver of workflow events.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &WorkflowEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _event: &WorkflowEvent) {}
}
