//! Command-line interface for the pet feeder control panel.
//!
//! This crate provides the `feeder` binary. It drives a networked pet feeder
//! over its JSON HTTP API, either with one-shot commands for scripting or
//! through the interactive terminal control panel.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `feeder` / `feeder tui` | Interactive control panel |
//! | `feeder status` | Food remaining and last feed |
//! | `feeder feed [--size N]` | Dispense food now |
//! | `feeder schedule list` | List scheduled feed times |
//! | `feeder schedule add <TIME> [--type T] [--size N]` | Add a feed time |
//! | `feeder schedule remove <TIME>` | Remove a feed time |
//! | `feeder log [-n N]` | Feed history, newest first |
//! | `feeder camera` | Toggle the camera processing mode |
//! | `feeder config show\|get\|set\|unset\|path\|init` | Manage the config file |
//! | `feeder completions <SHELL>` | Generate shell completions |
//!
//! # Global options
//!
//! - `--url <URL>` - Feeder base URL (or `FEEDER_URL`)
//! - `--timeout <SECS>` - Request timeout
//! - `--format text|json`, `--json` - Output format
//! - `--output <FILE>` - Write output to a file
//! - `--verbose`, `--quiet`, `--no-color`
//!
//! # Configuration
//!
//! Settings live in `~/.config/pet-feeder/config.toml`:
//!
//! ```toml
//! url = "http://feeder.local:5000"
//! timeout = 10
//! default_pane = "status"
//! default_feed_size = "3"
//!
//! [timings]
//! transition_ms = 300
//! refresh_settle_ms = 1000
//! feed_settle_ms = 5000
//! ```
//!
//! A command-line flag wins over `FEEDER_URL`, which wins over the file.

pub mod config;
pub mod format;

#[cfg(feature = "tui")]
pub mod tui;
