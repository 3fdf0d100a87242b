use anyhow::Context;
use tracing::info;
use uptime_core::engine::Engine;

pub fn run(engine: &Engine) -> anyhow::Result<()> {
    info!("recreating schedule table");
    engine
        .recreate()
        .context("failed to create schedule table")?;
    Ok(())
}
