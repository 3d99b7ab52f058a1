use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

mod analytics;
mod app;
mod backend;
mod chat;
mod shared;
mod ui;
mod widgets;

#[cfg(test)]
mod widgets_tests;

use backend::HttpBackend;
use shared::{Config, Language};

#[derive(Parser, Debug)]
#[command(name = "bi-assistant")]
#[command(about = "Terminal client for the business intelligence assistant", long_about = None)]
struct Cli {
    /// Base URL of the analytics backend
    #[arg(long, env = "BI_ASSISTANT_BACKEND_URL")]
    backend_url: Option<String>,
    /// Startup language: en, zh or yue
    #[arg(long)]
    language: Option<String>,
    /// Days of history shown on the dashboard
    #[arg(long)]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    shared::logging::init()?;

    let mut config = Config::load()?;
    if let Some(url) = cli.backend_url.as_deref() {
        config.set_backend_url(url);
    }
    if let Some(code) = cli.language.as_deref() {
        match Language::from_code(code) {
            Some(language) => config.language = language,
            None => tracing::warn!(code, "ignoring unsupported --language"),
        }
    }
    if let Some(days) = cli.days {
        config.set_window_days(days);
    }

    let backend = HttpBackend::new(&config.backend_url, config.request_timeout())?;
    tracing::info!(backend = backend.base_url(), language = %config.language, "starting");

    // Run the TUI
    let mut app = app::App::new(config, Arc::new(backend));
    app.run().await?;

    Ok(())
}
