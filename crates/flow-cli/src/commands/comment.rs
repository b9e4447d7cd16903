use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CommentCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow comment`.
pub async fn handle(
    action: &CommentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CommentCommands::Add {
            task,
            body,
            reply_to,
        } => {
            let comment = ctx
                .service
                .add_comment(task, ctx.actor()?, body, reply_to.as_deref())
                .await?;
            output(&comment, flags.format)
        }
        CommentCommands::Edit { id, body } => {
            let comment = ctx.service.edit_comment(id, ctx.actor()?, body).await?;
            output(&comment, flags.format)
        }
        CommentCommands::Delete { id } => {
            ctx.service.delete_comment(id, ctx.actor()?).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
        CommentCommands::List { task } => {
            ctx.service.get_task(task).await?;
            output(&ctx.service.list_by_task(task).await?, flags.format)
        }
        CommentCommands::Tree { task } => {
            ctx.service.get_task(task).await?;
            output(&ctx.service.comment_tree(task).await?, flags.format)
        }
    }
}
