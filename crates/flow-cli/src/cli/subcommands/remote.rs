use clap::Subcommand;

/// Commands against the remote task backend.
#[derive(Clone, Debug, Subcommand)]
pub enum RemoteCommands {
    /// Fetch and resolve a task view.
    View { task: String },
    /// Set the acting user's status.
    Status { task: String, status: String },
    /// Replace the assignee set.
    Assign { task: String, users: Vec<String> },
    /// Add a comment or reply.
    Comment {
        task: String,
        body: String,
        #[arg(long)]
        reply_to: Option<String>,
    },
    /// Edit your own comment.
    EditComment {
        task: String,
        id: String,
        body: String,
    },
    /// Delete your own comment.
    DeleteComment { task: String, id: String },
}
