use std::collections::BTreeSet;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AssigneeCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow assignee`.
pub async fn handle(
    action: &AssigneeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssigneeCommands::Set { task, users } => {
            let requested: BTreeSet<String> = users.iter().cloned().collect();
            let diff = ctx
                .service
                .replace_assignees(task, &requested, ctx.actor()?)
                .await?;
            output(&diff, flags.format)
        }
        AssigneeCommands::List { task } => {
            ctx.service.get_task(task).await?;
            output(&ctx.service.list_for_task(task).await?, flags.format)
        }
        AssigneeCommands::Poc { task, user, off } => {
            let assignment = ctx
                .service
                .set_point_of_contact(task, ctx.actor()?, user, !off)
                .await?;
            output(&assignment, flags.format)
        }
    }
}
