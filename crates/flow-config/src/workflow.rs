//! Workflow rule configuration.

use flow_core::enums::TransitionMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Transition table applied to status changes (`open` or `progressive`).
    #[serde(default)]
    pub transitions: TransitionMode,
}
