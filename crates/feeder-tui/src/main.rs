use anyhow::Result;
use tracing_subscriber::EnvFilter;

use feeder_cli::config::{Config, URL_ENV, resolve_timeout, resolve_url};
use feeder_cli::tui::{self, TuiOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tui::init_file_logging(filter)?;

    let config = Config::load();
    let url = std::env::var(URL_ENV).ok();
    let options = TuiOptions {
        url: resolve_url(url.as_deref(), &config),
        timeout: resolve_timeout(None, &config),
        panel: config.panel_config(),
    };

    tui::run(options).await
}
