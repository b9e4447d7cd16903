use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AssigneeCommands, CommentCommands, RemoteCommands, TaskCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// User directory.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Set the status the acting user owns on a task.
    Status {
        task: String,
        /// not-acknowledge, acknowledge, in-progress or completed
        status: String,
    },
    /// Task assignees.
    Assignee {
        #[command(subcommand)]
        action: AssigneeCommands,
    },
    /// Task comments.
    Comment {
        #[command(subcommand)]
        action: CommentCommands,
    },
    /// Show what the acting user may do on a task.
    Perms { task: String },
    /// Task with assignments, comment tree, permissions and status summary.
    View { task: String },
    /// Query the audit trail.
    Audit(AuditArgs),
    /// Work against the remote task backend.
    Remote {
        #[command(subcommand)]
        action: RemoteCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub task: Option<String>,
    /// task, assignment, comment or user
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries written by this user
    #[arg(long)]
    pub by: Option<String>,
}
