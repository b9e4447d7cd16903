use clap::Subcommand;

/// Assignment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AssigneeCommands {
    /// Replace the full assignee set (creator only).
    Set { task: String, users: Vec<String> },
    /// List assignments in display order.
    List { task: String },
    /// Mark or unmark an assignee as point of contact (creator only).
    Poc {
        task: String,
        user: String,
        #[arg(long)]
        off: bool,
    },
}
