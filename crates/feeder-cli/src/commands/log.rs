//! Feed history command.

use anyhow::{Context, Result};
use feeder_core::FeederApi;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_log_json, format_log_text, newest_first, write_output};

pub async fn cmd_log(ctx: &CommandContext, limit: Option<usize>) -> Result<()> {
    let entries = ctx
        .client
        .get_feed_logs()
        .await
        .context("Failed to load feed history")?;

    let mut entries = newest_first(entries);
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    let content = match ctx.format {
        OutputFormat::Json => format_log_json(&entries, &ctx.opts)?,
        OutputFormat::Text => format_log_text(&entries, &ctx.opts),
    };
    write_output(ctx.output.as_ref(), &content)
}
