//! Config file command.

use anyhow::{Context, Result, bail};
use feeder_core::FeedSize;
use feeder_core::feeder_types::ParseError;

use crate::cli::{ConfigAction, ConfigKey, OutputFormat};
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, format: OutputFormat) -> Result<()> {
    let path = Config::path();

    match action {
        ConfigAction::Show => {
            let config = Config::load();
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&config)
                        .context("Failed to serialize config")?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    println!("# {}", path.display());
                    if !path.exists() {
                        println!("# (not created yet, showing defaults)");
                    }
                    print!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            }
        }
        ConfigAction::Get { key } => {
            let config = Config::load();
            match get(&config, key) {
                Some(value) => println!("{}", value),
                None => println!("(not set)"),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            set(&mut config, key, Some(value))?;
            config.save()?;
            println!("Saved to {}", path.display());
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load();
            set(&mut config, key, None)?;
            config.save()?;
            println!("Saved to {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {}\nUse --force to overwrite it.",
                    path.display()
                );
            }
            Config::starter().save()?;
            println!("Created {}", path.display());
        }
    }

    Ok(())
}

fn get(config: &Config, key: ConfigKey) -> Option<String> {
    match key {
        ConfigKey::Url => config.url.clone(),
        ConfigKey::Timeout => config.timeout.map(|t| t.to_string()),
        ConfigKey::DefaultPane => config.default_pane.clone(),
        ConfigKey::DefaultFeedSize => config.default_feed_size.clone(),
    }
}

fn set(config: &mut Config, key: ConfigKey, value: Option<String>) -> Result<()> {
    match key {
        ConfigKey::Url => config.url = value,
        ConfigKey::Timeout => {
            config.timeout = value
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("Timeout must be a whole number of seconds")?;
        }
        ConfigKey::DefaultPane => {
            if let Some(pane) = value.as_deref()
                && !matches!(pane, "status" | "schedule" | "log")
            {
                bail!("Unknown pane '{}' (expected status, schedule or log)", pane);
            }
            config.default_pane = value;
        }
        ConfigKey::DefaultFeedSize => {
            if let Some(size) = value.as_deref() {
                size.parse::<FeedSize>()
                    .map_err(|e: ParseError| anyhow::anyhow!(e))?;
            }
            config.default_feed_size = value;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        set(&mut config, ConfigKey::Timeout, Some("30".to_string())).unwrap();
        set(&mut config, ConfigKey::DefaultFeedSize, Some("large".to_string())).unwrap();
        assert_eq!(get(&config, ConfigKey::Timeout).as_deref(), Some("30"));
        assert_eq!(get(&config, ConfigKey::DefaultFeedSize).as_deref(), Some("large"));

        set(&mut config, ConfigKey::Timeout, None).unwrap();
        assert_eq!(get(&config, ConfigKey::Timeout), None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(set(&mut config, ConfigKey::Timeout, Some("soon".to_string())).is_err());
        assert!(set(&mut config, ConfigKey::DefaultPane, Some("camera".to_string())).is_err());
        assert!(set(&mut config, ConfigKey::DefaultFeedSize, Some("huge".to_string())).is_err());
        assert_eq!(config, Config::default());
    }
}
