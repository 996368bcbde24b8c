//! Output formatting for the command-line interface.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use serde::Serialize;

use feeder_core::feeder_types::format::{last_feed_label, log_row, schedule_row};
use feeder_core::{FeedLogEntry, LastFeedEntry, Reading, ScheduledFeed};

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut json = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
        .context("Failed to serialize output")?;
        json.push('\n');
        Ok(json)
    }
}

/// Food level bucket used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodLevel {
    Full,
    Low,
    Empty,
}

impl FoodLevel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            50.. => FoodLevel::Full,
            20..=49 => FoodLevel::Low,
            _ => FoodLevel::Empty,
        }
    }
}

fn colored_percent(percent: u8, no_color: bool) -> String {
    let text = format!("{}%", percent);
    if no_color {
        return text;
    }
    match FoodLevel::from_percent(percent) {
        FoodLevel::Full => text.green().to_string(),
        FoodLevel::Low => text.yellow().to_string(),
        FoodLevel::Empty => text.red().bold().to_string(),
    }
}

/// Result of `feeder status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub url: String,
    pub remaining_percent: Option<u8>,
    /// Why there is no reading, when there is none.
    pub sensor_error: Option<String>,
    pub last_feed: Option<LastFeedEntry>,
    pub last_feed_label: String,
    pub checked_at: DateTime<Local>,
}

impl StatusReport {
    pub fn new(
        url: impl Into<String>,
        reading: std::result::Result<Reading, String>,
        last_feed: Option<LastFeedEntry>,
        checked_at: DateTime<Local>,
    ) -> Self {
        let (remaining_percent, sensor_error) = match reading {
            Ok(reading) => (Some(reading.percent), None),
            Err(e) => (None, Some(e)),
        };
        let last_feed_label = last_feed_label(last_feed.as_ref());
        Self {
            url: url.into(),
            remaining_percent,
            sensor_error,
            last_feed,
            last_feed_label,
            checked_at,
        }
    }
}

pub fn format_status_text(report: &StatusReport, opts: &FormatOptions) -> String {
    let remaining = match report.remaining_percent {
        Some(percent) => colored_percent(percent, opts.no_color),
        None if opts.no_color => "Unavailable".to_string(),
        None => "Unavailable".dimmed().to_string(),
    };
    let mut out = format!(
        "Food remaining: {}\nLast feed:      {}\n",
        remaining, report.last_feed_label
    );
    if let Some(reason) = &report.sensor_error {
        out.push_str(&format!("  ({})\n", reason));
    }
    out
}

pub fn format_status_json(report: &StatusReport, opts: &FormatOptions) -> Result<String> {
    opts.to_json(report)
}

#[derive(Serialize)]
struct ScheduleJsonRow<'a> {
    #[serde(flatten)]
    entry: &'a ScheduledFeed,
    display: String,
}

pub fn format_schedule_text(entries: &[ScheduledFeed], opts: &FormatOptions) -> String {
    if entries.is_empty() {
        return "No feed times scheduled\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let row = schedule_row(entry);
        if opts.no_color {
            out.push_str(&row);
        } else {
            out.push_str(&row.cyan().to_string());
        }
        out.push('\n');
    }
    out
}

pub fn format_schedule_json(entries: &[ScheduledFeed], opts: &FormatOptions) -> Result<String> {
    let rows: Vec<_> = entries
        .iter()
        .map(|entry| ScheduleJsonRow {
            entry,
            display: schedule_row(entry),
        })
        .collect();
    opts.to_json(&rows)
}

/// Feed history newest first. The device sends it oldest first.
pub fn newest_first(entries: Vec<FeedLogEntry>) -> Vec<FeedLogEntry> {
    let mut entries = entries;
    entries.reverse();
    entries
}

pub fn format_log_text(entries: &[FeedLogEntry], opts: &FormatOptions) -> String {
    if entries.is_empty() {
        return "No feeds recorded\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let row = log_row(entry);
        if opts.no_color {
            out.push_str(&row);
        } else {
            out.push_str(&row.dimmed().to_string());
        }
        out.push('\n');
    }
    out
}

pub fn format_log_json(entries: &[FeedLogEntry], opts: &FormatOptions) -> Result<String> {
    opts.to_json(&entries)
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
