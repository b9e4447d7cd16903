use flow_core::enums::Priority;
use flow_db::updates::task::TaskUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: String,
    pub name: Option<String>,
    pub deadline: Option<String>,
    pub priority: Option<String>,
    pub remarks: Option<String>,
    pub clear_remarks: bool,
    pub project: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    validate_update_params(&params)?;
    let actor = ctx.actor()?;

    let mut builder = TaskUpdateBuilder::new();
    if let Some(name) = params.name.as_deref() {
        builder = builder.name(name);
    }
    if let Some(deadline) = params.deadline.as_deref() {
        builder = builder.deadline(parse_date(deadline, "deadline")?);
    }
    if let Some(priority) = params.priority.as_deref() {
        builder = builder.priority(parse_enum::<Priority>(priority, "priority")?);
    }
    if params.clear_remarks {
        builder = builder.remarks(None);
    } else if let Some(remarks) = params.remarks {
        builder = builder.remarks(Some(remarks));
    }
    if let Some(project) = params.project {
        builder = builder.project_id(Some(project).filter(|p| !p.is_empty()));
    }

    let task = ctx
        .service
        .update_task(&params.id, actor, builder.build())
        .await?;
    output(&task, flags.format)
}

fn validate_update_params(params: &Params) -> anyhow::Result<()> {
    if params.name.is_none()
        && params.deadline.is_none()
        && params.priority.is_none()
        && params.remarks.is_none()
        && !params.clear_remarks
        && params.project.is_none()
    {
        anyhow::bail!(
            "At least one of --name, --deadline, --priority, --remarks, --clear-remarks or --project must be provided"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Params, validate_update_params};

    fn params() -> Params {
        Params {
            id: String::from("tsk-1"),
            name: None,
            deadline: None,
            priority: None,
            remarks: None,
            clear_remarks: false,
            project: None,
        }
    }

    #[test]
    fn rejects_noop_update() {
        assert!(validate_update_params(&params()).is_err());
    }

    #[test]
    fn clearing_remarks_counts_as_a_change() {
        let params = Params {
            clear_remarks: true,
            ..params()
        };
        assert!(validate_update_params(&params).is_ok());
    }
}
