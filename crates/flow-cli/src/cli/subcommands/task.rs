use clap::Subcommand;

/// Task entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task owned by the acting user.
    Create {
        #[arg(long)]
        name: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        remarks: Option<String>,
        #[arg(long)]
        project: Option<String>,
        /// Assignee user id (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,
    },
    /// Update task fields (creator only).
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_remarks")]
        remarks: Option<String>,
        #[arg(long)]
        clear_remarks: bool,
        #[arg(long)]
        project: Option<String>,
    },
    /// List tasks.
    List {
        /// Only tasks assigned to the acting user
        #[arg(long)]
        mine: bool,
    },
    /// Get a task by ID.
    Get { id: String },
}
