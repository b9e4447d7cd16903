use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow perms`.
pub async fn permissions(task: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let perms = ctx.service.permissions(task, ctx.actor()?).await?;
    output(&perms, flags.format)
}

/// Handle `flow view`.
pub async fn task_view(task: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let view = ctx.service.task_view(task, ctx.actor()?).await?;
    output(&view, flags.format)
}
