use clap::Subcommand;

/// Comment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CommentCommands {
    /// Add a comment or a reply.
    Add {
        task: String,
        body: String,
        #[arg(long)]
        reply_to: Option<String>,
    },
    /// Edit your own comment.
    Edit { id: String, body: String },
    /// Delete your own comment.
    Delete { id: String },
    /// Flat comment list in creation order.
    List { task: String },
    /// Threaded comments; orphaned replies are hidden.
    Tree { task: String },
}
