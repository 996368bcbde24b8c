//! Manual feed command.

use anyhow::{Context, Result};
use feeder_core::{FeedSize, FeederApi};
use serde_json::json;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::write_output;

pub async fn cmd_feed(ctx: &CommandContext, size: FeedSize) -> Result<()> {
    ctx.progress(&format!("Feeding ({})...", size));
    ctx.client
        .manual_feed(size)
        .await
        .context("Failed to trigger feed")?;
    tracing::info!("Manual feed triggered, size {}", size.code());

    let content = match ctx.format {
        OutputFormat::Json => {
            let value = json!({ "fed": true, "size": size.code(), "label": size.label() });
            format!("{}\n", value)
        }
        OutputFormat::Text => format!("Feeding complete ({})\n", size),
    };
    write_output(ctx.output.as_ref(), &content)
}
