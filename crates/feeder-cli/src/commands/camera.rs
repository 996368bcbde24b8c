use anyhow::{Context, Result};
use feeder_core::FeederApi;
use serde_json::json;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::write_output;

pub async fn cmd_camera(ctx: &CommandContext) -> Result<()> {
    ctx.client
        .toggle_camera()
        .await
        .context("Failed to toggle camera mode")?;

    let content = match ctx.format {
        OutputFormat::Json => format!("{}\n", json!({ "toggled": true })),
        OutputFormat::Text => "Camera mode toggled\n".to_string(),
    };
    write_output(ctx.output.as_ref(), &content)
}
