use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_status;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow status`.
pub async fn run(task: &str, status: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = parse_status(status)?;
    let change = ctx.service.set_status(task, ctx.actor()?, status).await?;
    output(&change, flags.format)
}
