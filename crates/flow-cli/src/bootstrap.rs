use anyhow::Context;
use flow_config::FlowConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<FlowConfig> {
    let mut config = FlowConfig::load_with_dotenv().context("failed to load taskflow config")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut FlowConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    if let Some(actor) = &flags.actor {
        config.general.actor.clone_from(actor);
    }
}
