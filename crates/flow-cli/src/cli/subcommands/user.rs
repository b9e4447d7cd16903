use clap::Subcommand;

/// User directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Add a user or rename an existing one.
    Upsert {
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Get a user by ID.
    Get { id: String },
    /// List users.
    List,
}
