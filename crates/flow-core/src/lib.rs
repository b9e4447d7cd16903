//! # flow-core
//!
//! Core types and rules for the Taskflow task assignment and status workflow.
//!
//! This crate is free of I/O. It provides:
//! - Entity structs (tasks, assignments, comments, users, audit entries)
//! - Status enums with transition tables
//! - The workflow error taxonomy
//! - Comment threading ([`comments::build_tree`])
//! - Assignment removability and replacement planning
//! - The status engine ([`status::plan_status_change`])
//! - The permission resolver ([`permissions::resolve_permissions`])
//! - Workflow events and the notification sink trait

pub mod assignments;
pub mod comments;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod events;
pub mod ids;
pub mod permissions;
pub mod responses;
pub mod status;
pub mod validation;
