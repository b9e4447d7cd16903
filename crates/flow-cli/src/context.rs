use std::sync::Arc;

use anyhow::Context;
use flow_config::FlowConfig;
use flow_db::notify::TracingSink;
use flow_db::service::FlowService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: FlowService,
    pub config: FlowConfig,
}

impl AppContext {
    pub async fn init(config: FlowConfig) -> anyhow::Result<Self> {
        let service = FlowService::from_config(&config)
            .await
            .with_context(|| format!("failed to open task store at {}", config.database.path))?
            .with_sink(Arc::new(TracingSink));
        tracing::debug!(path = %config.database.path, "task store ready");
        Ok(Self { service, config })
    }

    pub fn actor(&self) -> anyhow::Result<&str> {
        require_actor(&self.config)
    }
}

/// The acting user: `--actor`, else `general.actor` from config.
pub fn require_actor(config: &FlowConfig) -> anyhow::Result<&str> {
    config
        .general
        .actor()
        .context("no acting user: pass --actor or set general.actor in config")
}
