use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize logging.
///
/// `RUST_LOG` overrides the default `info` filter. When `enabled`, logs are
/// appended to `log_path` (the binary has no console); otherwise they go to
/// stdout.
///
/// # Errors
/// Returns error if the log file cannot be opened or a subscriber is already set
pub fn init(enabled: bool, log_path: &str, base_dir: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !enabled {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
        return Ok(());
    }

    let expanded_path = expand_log_path(log_path, base_dir)?;

    // Create parent directory if needed
    if let Some(parent) = expanded_path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&expanded_path)
        .context("failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;

    tracing::info!("telemetry initialized: {}", expanded_path.display());

    Ok(())
}

fn expand_log_path(path: &str, base_dir: &Path) -> Result<PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/") {
        let home = std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .context("home directory not set")?;
        return Ok(PathBuf::from(home).join(stripped));
    }

    let path = PathBuf::from(path);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_expand_log_path_with_tilde() {
        let home = env::var("USERPROFILE")
            .or_else(|_| env::var("HOME"))
            .expect("home not set");
        let result = expand_log_path("~/logs/klipboard.log", Path::new("/opt/klipboard")).unwrap();
        assert_eq!(result, PathBuf::from(home).join("logs/klipboard.log"));
    }

    #[test]
    fn test_expand_log_path_absolute() {
        let absolute = env::temp_dir().join("klipboard.log");
        let result =
            expand_log_path(&absolute.to_string_lossy(), Path::new("/opt/klipboard")).unwrap();
        assert_eq!(result, absolute);
    }

    #[test]
    fn test_expand_log_path_relative_to_base_dir() {
        let result = expand_log_path("logs/klipboard.log", Path::new("/opt/klipboard")).unwrap();
        assert_eq!(result, PathBuf::from("/opt/klipboard").join("logs/klipboard.log"));
    }

    #[test]
    #[ignore = "installs the global tracing subscriber"]
    fn test_init_with_telemetry_disabled() {
        assert!(init(false, "unused.log", &env::temp_dir()).is_ok());
    }
}
