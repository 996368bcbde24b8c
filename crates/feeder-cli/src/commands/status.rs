//! Status command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use feeder_core::{Error, FeederApi};

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{StatusReport, format_status_json, format_status_text, write_output};

pub async fn cmd_status(ctx: &CommandContext) -> Result<()> {
    let (reading, last_feed) = tokio::join!(ctx.client.get_reading(), ctx.client.get_last_feed());

    let last_feed = last_feed.context("Failed to read last feed")?;
    let reading = match reading {
        Ok(reading) => Ok(reading),
        // A missing or garbled sensor value still leaves a useful report.
        Err(e @ (Error::SensorUnavailable(_) | Error::MalformedResponse { .. })) => {
            Err(e.to_string())
        }
        Err(e) => return Err(e).context("Failed to read food level"),
    };

    let report = StatusReport::new(ctx.client.base_url(), reading, last_feed, Local::now());
    let content = match ctx.format {
        OutputFormat::Json => format_status_json(&report, &ctx.opts)?,
        OutputFormat::Text => format_status_text(&report, &ctx.opts),
    };

    write_output(ctx.output.as_ref(), &content)?;
    Ok(())
}
