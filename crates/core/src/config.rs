//! Application configuration.
//!
//! Settings are read from `<config_dir>/lotto/config.toml` and may be
//! overridden with `LOTTO_*` environment variables (`LOTTO_SEED=7`,
//! `LOTTO_LOG_LEVEL=debug`, ...). Missing keys fall back to defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the user's config directory holding our files.
pub const CONFIG_DIR: &str = "lotto";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LOTTO";

const DEFAULT_CONFIG: &str = r#"# Lotto picker configuration.

# Fixed seed for reproducible draws. Leave unset for random draws.
# seed = 42

# Directory receiving lotto.log.
log_dir = "logs"

# Fallback log filter when RUST_LOG is not set.
log_level = "info"

# How many UI ticks (250ms each) a warning stays on screen.
toast_ticks = 8

# Show the block-letter banner above the slots.
show_banner = true
"#;

/// Runtime settings for the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seed for the draw engine; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
    /// Fallback `tracing` filter directive.
    pub log_level: String,
    /// Lifetime of warning toasts, in UI ticks.
    pub toast_ticks: u32,
    /// Whether the block-letter banner is rendered.
    pub show_banner: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            toast_ticks: 8,
            show_banner: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` plus environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Path of the log file inside [`AppConfig::log_dir`].
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("lotto.log")
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default configuration file when none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the default configuration to `path` unless a file is already there.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        ensure_default_config_at(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.toast_ticks, 8);
        assert!(config.show_banner);
        Ok(())
    }

    #[test]
    fn reads_values_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "seed = 99\ntoast_ticks = 3\nshow_banner = false\n")?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.toast_ticks, 3);
        assert!(!config.show_banner);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_path(), PathBuf::from("logs").join("lotto.log"));
        Ok(())
    }

    #[test]
    fn existing_file_is_left_alone() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "seed = 1\n")?;
        ensure_default_config_at(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "seed = 1\n");
        Ok(())
    }
}
