//! Command implementations for the CLI.

mod camera;
mod config;
mod feed;
mod log;
mod schedule;
mod status;

use std::path::PathBuf;

use feeder_core::DeviceClient;

use crate::cli::OutputFormat;
use crate::format::FormatOptions;

pub use camera::cmd_camera;
pub use config::cmd_config;
pub use feed::cmd_feed;
pub use log::cmd_log;
pub use schedule::cmd_schedule;
pub use status::cmd_status;

/// Everything a device command needs.
pub struct CommandContext {
    pub client: DeviceClient,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub opts: FormatOptions,
    pub quiet: bool,
}

impl CommandContext {
    /// Progress messages go to stderr so they never mix with the output.
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
