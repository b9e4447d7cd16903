//! Notification sinks.
//!
//! The workflow core only hands `WorkflowEvent`s to a [`NotificationSink`];
//! delivery is the sink's business. Sinks never fail the mutation that
//! produced the event.

use flow_core::events::{NotificationSink, WorkflowEvent};
use tokio::sync::mpsc;

/// Logs every event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &WorkflowEvent) {
        tracing::info!(
            task_id = %event.task_id,
            kind = %event.kind,
            actor_id = %event.actor_id,
            "workflow event"
        );
    }
}

/// Forwards events into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelSink {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, event: &WorkflowEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(task_id = %event.task_id, "event receiver dropped");
        }
    }
}
