//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use feeder_core::{FeedSize, FeedType};

use crate::config::URL_ENV;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "feeder")]
#[command(author, version, about = "Control panel for a networked pet feeder", long_about = None)]
pub struct Cli {
    /// Feeder base URL, or use FEEDER_URL env var
    #[arg(short, long, global = true, env = URL_ENV)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 'T', long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Reusable output arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn resolve_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive control panel (default)
    #[cfg(feature = "tui")]
    Tui,

    /// Show food remaining and the last feed
    Status,

    /// Dispense food now
    Feed {
        /// Portion: 1-5 or xsmall, small, average, large, xlarge
        #[arg(short, long, value_parser = parse_size)]
        size: Option<FeedSize>,
    },

    /// Manage scheduled feed times
    Schedule {
        #[command(subcommand)]
        action: Option<ScheduleAction>,
    },

    /// Show the feed history, newest first
    Log {
        /// Only show the N most recent feeds
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Toggle the camera processing mode
    Camera,

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ScheduleAction {
    /// List scheduled feed times (default)
    List,

    /// Add a feed time
    Add {
        /// 24-hour time, H:MM or HH:MM
        time: String,

        /// indefinite (daily) or onetime
        #[arg(short = 't', long = "type", default_value = "indefinite", value_parser = parse_type)]
        feed_type: FeedType,

        /// Portion: 1-5 or a size name
        #[arg(short, long, default_value = "3", value_parser = parse_size)]
        size: FeedSize,
    },

    /// Remove a feed time
    Remove {
        /// 24-hour time of the entry
        time: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Configuration keys settable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    Url,
    Timeout,
    DefaultPane,
    DefaultFeedSize,
}

fn parse_size(s: &str) -> Result<FeedSize, String> {
    s.parse().map_err(|e: feeder_core::feeder_types::ParseError| e.to_string())
}

fn parse_type(s: &str) -> Result<FeedType, String> {
    s.parse().map_err(|e: feeder_core::feeder_types::ParseError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["feeder"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_feed_size_by_name_or_code() {
        let cli = Cli::try_parse_from(["feeder", "feed", "--size", "xlarge"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Feed {
                size: Some(FeedSize::XLarge)
            })
        ));

        let cli = Cli::try_parse_from(["feeder", "feed", "-s", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Feed {
                size: Some(FeedSize::Small)
            })
        ));

        assert!(Cli::try_parse_from(["feeder", "feed", "--size", "6"]).is_err());
    }

    #[test]
    fn test_schedule_add_defaults() {
        let cli = Cli::try_parse_from(["feeder", "schedule", "add", "7:00"]).unwrap();
        match cli.command {
            Some(Commands::Schedule {
                action:
                    Some(ScheduleAction::Add {
                        time,
                        feed_type,
                        size,
                    }),
            }) => {
                assert_eq!(time, "7:00");
                assert_eq!(feed_type, FeedType::Indefinite);
                assert_eq!(size, FeedSize::Average);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_schedule_add_help_text() {
        let command = Cli::command();
        let add = command
            .find_subcommand("schedule")
            .and_then(|schedule| schedule.find_subcommand("add"))
            .unwrap();
        assert_eq!(add.get_about().unwrap().to_string(), "Add a feed time");
    }

    #[test]
    fn test_schedule_add_with_type() {
        let cli =
            Cli::try_parse_from(["feeder", "schedule", "add", "14:30", "--type", "onetime"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Schedule {
                action: Some(ScheduleAction::Add {
                    feed_type: FeedType::OneTime,
                    ..
                })
            })
        ));
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let cli = Cli::try_parse_from(["feeder", "status", "--json"]).unwrap();
        assert_eq!(cli.output.resolve_format(), OutputFormat::Json);

        let cli = Cli::try_parse_from(["feeder", "status"]).unwrap();
        assert_eq!(cli.output.resolve_format(), OutputFormat::Text);
    }

    #[test]
    fn test_global_url_after_subcommand() {
        let cli =
            Cli::try_parse_from(["feeder", "log", "--url", "http://feeder.local"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://feeder.local"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["feeder", "-v", "-q", "status"]).is_err());
    }
}
