//! Schedule management commands.

use anyhow::{Context, Result};
use feeder_core::feeder_types::format::{display_time, normalize_clock};
use feeder_core::{FeedSize, FeedType, FeederApi};

use super::CommandContext;
use crate::cli::{OutputFormat, ScheduleAction};
use crate::format::{format_schedule_json, format_schedule_text, write_output};

pub async fn cmd_schedule(ctx: &CommandContext, action: ScheduleAction) -> Result<()> {
    match action {
        ScheduleAction::List => {}
        ScheduleAction::Add {
            time,
            feed_type,
            size,
        } => add(ctx, &time, feed_type, size).await?,
        ScheduleAction::Remove { time } => remove(ctx, &time).await?,
    }

    // Every change is followed by a fresh listing.
    list(ctx).await
}

async fn list(ctx: &CommandContext) -> Result<()> {
    let entries = ctx
        .client
        .get_feed_times()
        .await
        .context("Failed to load feed times")?;

    let content = match ctx.format {
        OutputFormat::Json => format_schedule_json(&entries, &ctx.opts)?,
        OutputFormat::Text => format_schedule_text(&entries, &ctx.opts),
    };
    write_output(ctx.output.as_ref(), &content)
}

async fn add(ctx: &CommandContext, time: &str, feed_type: FeedType, size: FeedSize) -> Result<()> {
    let time = normalize_clock(time).with_context(|| format!("Invalid feed time '{}'", time))?;
    ctx.client
        .add_feed_time(&time, feed_type, size)
        .await
        .with_context(|| format!("Failed to add feed time {}", time))?;
    ctx.progress(&format!("Added feed time {}", display_time(&time)));
    Ok(())
}

async fn remove(ctx: &CommandContext, time: &str) -> Result<()> {
    let time = normalize_clock(time).with_context(|| format!("Invalid feed time '{}'", time))?;
    ctx.client
        .delete_feed_time(&time)
        .await
        .with_context(|| format!("Failed to remove feed time {}", time))?;
    ctx.progress(&format!("Removed feed time {}", display_time(&time)));
    Ok(())
}
