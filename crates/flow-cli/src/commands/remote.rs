use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use flow_client::{BackendClient, ClientError};
use flow_config::FlowConfig;
use flow_db::notify::TracingSink;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RemoteCommands;
use crate::commands::shared::parse::parse_status;
use crate::context::require_actor;
use crate::output::output;

/// Handle `flow remote`.
///
/// Every write prints the view re-fetched from the backend after the write.
/// When only that re-fetch fails, the write is reported as applied and the
/// command still succeeds, so nobody re-runs it.
pub async fn handle(
    action: &RemoteCommands,
    config: &FlowConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let backend = config
        .require_backend()
        .context("remote commands need backend.base_url")?;
    let client = BackendClient::new(backend)
        .with_transitions(config.workflow.transitions)
        .with_sink(Arc::new(TracingSink));
    let actor = require_actor(config)?;

    let (task, applied) = match action {
        RemoteCommands::View { task } => {
            let snapshot = client.fetch_snapshot(task).await?;
            return output(&snapshot.view(actor), flags.format);
        }
        RemoteCommands::Status { task, status } => {
            let status = parse_status(status)?;
            let applied = client.set_status(task, actor, status).await?;
            (task, applied.snapshot)
        }
        RemoteCommands::Assign { task, users } => {
            let requested: BTreeSet<String> = users.iter().cloned().collect();
            let applied = client.replace_assignees(task, actor, &requested).await?;
            (task, applied.snapshot)
        }
        RemoteCommands::Comment {
            task,
            body,
            reply_to,
        } => {
            let applied = client
                .add_comment(task, actor, body, reply_to.as_deref())
                .await?;
            (task, applied.snapshot)
        }
        RemoteCommands::EditComment { task, id, body } => {
            (task, client.edit_comment(task, id, actor, body).await?.snapshot)
        }
        RemoteCommands::DeleteComment { task, id } => {
            (task, client.delete_comment(task, id, actor).await?.snapshot)
        }
    };

    match applied {
        Ok(snapshot) => {
            tracing::debug!(task_id = %task, "rendering remote task view");
            output(&snapshot.view(actor), flags.format)
        }
        Err(err) => output(&refresh_failed(task, &err), flags.format),
    }
}

fn refresh_failed(task_id: &str, err: &ClientError) -> serde_json::Value {
    serde_json::json!({
        "task_id": task_id,
        "applied": true,
        "refresh_error": err.to_string(),
    })
}
