use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BI_ASSISTANT_LOG";

/// Install the global tracing subscriber.
///
/// The terminal belongs to the UI, so by default logs go to a file under the XDG state
/// directory. `BI_ASSISTANT_LOG` may name `stderr`, `stdout` or a file path instead.
pub fn init() -> Result<()> {
    let target = std::env::var(LOG_ENV).ok();
    match target.as_deref() {
        Some("stderr") => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
        }
        Some("stdout") => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stdout)
                .init();
        }
        Some(path) => {
            let file = open_log_file(Path::new(path))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(file)
                .with_ansi(false)
                .init();
        }
        None => match default_log_path().map(|path| open_log_file(&path)) {
            Some(Ok(file)) => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(std::io::sink)
                    .init();
            }
        },
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn default_log_path() -> Option<PathBuf> {
    let state_dir = match std::env::var("XDG_STATE_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()?.join(".local").join("state"),
    };
    Some(state_dir.join("bi-assistant").join("bi-assistant.log"))
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}
