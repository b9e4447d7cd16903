use flow_core::enums::{AuditAction, EntityType};
use flow_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flow audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = build_filter(args, flags.limit)?;
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}

fn build_filter(args: &AuditArgs, limit: Option<u32>) -> anyhow::Result<AuditFilter> {
    Ok(AuditFilter {
        task_id: args.task.clone(),
        entity_type: args
            .entity_type
            .as_deref()
            .map(|raw| parse_enum::<EntityType>(raw, "entity type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|raw| parse_enum::<AuditAction>(raw, "action"))
            .transpose()?,
        actor_id: args.by.clone(),
        limit,
    })
}

#[cfg(test)]
mod tests {
    use flow_core::enums::{AuditAction, EntityType};

    use super::build_filter;
    use crate::cli::root_commands::AuditArgs;

    fn args() -> AuditArgs {
        AuditArgs {
            task: Some("tsk-1".into()),
            entity_type: None,
            entity_id: None,
            action: None,
            by: None,
        }
    }

    #[test]
    fn parses_enum_filters() {
        let args = AuditArgs {
            entity_type: Some("assignment".into()),
            action: Some("assignees-replaced".into()),
            ..args()
        };
        let filter = build_filter(&args, Some(5)).expect("filter should build");
        assert_eq!(filter.entity_type, Some(EntityType::Assignment));
        assert_eq!(filter.action, Some(AuditAction::AssigneesReplaced));
        assert_eq!(filter.limit, Some(5));
    }

    #[test]
    fn rejects_unknown_action() {
        let args = AuditArgs {
            action: Some("exploded".into()),
            ..args()
        };
        assert!(build_filter(&args, None).is_err());
    }
}
