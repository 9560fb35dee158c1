use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use newsdeck::app::{App, AppEvent};
use newsdeck::config::Config;
use newsdeck::theme::ThemeVariant;
use newsdeck::ui;
use newsdeck::util::validate_url;

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Terminal reader for a JSON news feed")]
struct Args {
    /// Config file (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed document URL, overriding the config file
    #[arg(long, value_name = "URL")]
    feed_url: Option<String>,

    /// Initial theme: dark or light
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Scheduled refresh interval in minutes (0 = manual only)
    #[arg(long, value_name = "N")]
    refresh_minutes: Option<u64>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.feed_url {
            config.feed_url = url;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(minutes) = self.refresh_minutes {
            config.refresh_interval_minutes = minutes;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Held until exit so buffered log records are flushed
    let _log_guard = newsdeck::logging::init(&get_config_dir()?);

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    args.apply(&mut config);

    if ThemeVariant::from_str_name(&config.theme).is_none() {
        anyhow::bail!("Unknown theme '{}': expected dark or light", config.theme);
    }
    validate_url(&config.feed_url)
        .with_context(|| format!("Invalid feed URL '{}'", config.feed_url))?;
    validate_url(&config.contact_endpoint)
        .with_context(|| format!("Invalid contact endpoint '{}'", config.contact_endpoint))?;

    tracing::info!(
        feed_url = %config.feed_url,
        page_size = config.page_size,
        refresh_minutes = config.refresh_interval_minutes,
        "Starting newsdeck"
    );

    let mut app = App::new(&config).context("Failed to create application")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
