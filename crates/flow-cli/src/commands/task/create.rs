use std::collections::BTreeSet;

use flow_core::enums::Priority;
use flow_core::validation::NewTask;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub name: String,
    pub deadline: String,
    pub priority: String,
    pub remarks: Option<String>,
    pub project: Option<String>,
    pub assignees: Vec<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let new = NewTask {
        name: params.name,
        project_id: params.project,
        deadline: parse_date(&params.deadline, "deadline")?,
        priority: parse_enum::<Priority>(&params.priority, "priority")?,
        remarks: params.remarks,
    };
    let assignees: BTreeSet<String> = params.assignees.into_iter().collect();

    let task = ctx.service.create_task(actor, new, &assignees).await?;
    output(&task, flags.format)
}
