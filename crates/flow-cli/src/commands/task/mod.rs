mod create;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow task`.
pub async fn handle(action: &TaskCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create {
            name,
            deadline,
            priority,
            remarks,
            project,
            assignees,
        } => {
            let params = create::Params {
                name: name.clone(),
                deadline: deadline.clone(),
                priority: priority.clone(),
                remarks: remarks.clone(),
                project: project.clone(),
                assignees: assignees.clone(),
            };
            create::run(params, ctx, flags).await
        }
        TaskCommands::Update {
            id,
            name,
            deadline,
            priority,
            remarks,
            clear_remarks,
            project,
        } => {
            let params = update::Params {
                id: id.clone(),
                name: name.clone(),
                deadline: deadline.clone(),
                priority: priority.clone(),
                remarks: remarks.clone(),
                clear_remarks: *clear_remarks,
                project: project.clone(),
            };
            update::run(params, ctx, flags).await
        }
        TaskCommands::List { mine } => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let tasks = if *mine {
                ctx.service.list_tasks_for_user(ctx.actor()?, limit).await?
            } else {
                ctx.service.list_tasks(limit).await?
            };
            output(&tasks, flags.format)
        }
        TaskCommands::Get { id } => output(&ctx.service.get_task(id).await?, flags.format),
    }
}
