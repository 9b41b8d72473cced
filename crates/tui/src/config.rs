use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use sessionlens_runtime_config::{CONFIG_FILE_NAME, ViewerConfig};

use crate::RunOptions;

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "SESSIONLENS_CONFIG_DIR";

// ── File I/O ────────────────────────────────────────────────────────────

/// Config directory: explicit override, then `$SESSIONLENS_CONFIG_DIR`,
/// then `~/.config/sessionlens`.
pub fn resolve_config_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("sessionlens"))
}

pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}

/// Load `sessionlens.toml` from `dir`. A missing or unreadable file yields defaults.
pub fn load_config(dir: &Path) -> ViewerConfig {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return ViewerConfig::default();
    }
    match read_config(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!("{err:#}; using defaults");
            ViewerConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<ViewerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save config to `<dir>/sessionlens.toml`.
pub fn save_config(dir: &Path, config: &ViewerConfig) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Command-line flags win over the file.
pub fn apply_overrides(config: &mut ViewerConfig, options: &RunOptions) {
    if let Some(ref url) = options.server {
        config.server.url = url.clone();
    }
    if let Some(ref key) = options.api_key {
        config.server.api_key = key.clone();
    }
    if options.newest_first {
        config.viewer.newest_first = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_config_dir(Some(Path::new("/tmp/elsewhere"))).expect("dir");
        assert_eq!(dir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_config(tmp.path()), ViewerConfig::default());
    }

    #[test]
    fn broken_file_yields_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "[server\nurl = ").expect("write");
        assert_eq!(load_config(tmp.path()), ViewerConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut config = ViewerConfig::default();
        config.viewer.poll_interval_secs = 0;
        config.viewport.overscan = 12;
        save_config(tmp.path(), &config).expect("save");
        assert_eq!(load_config(tmp.path()), config);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = ViewerConfig::default();
        let options = RunOptions {
            server: Some("https://sessions.example.com".into()),
            api_key: Some("k-123".into()),
            newest_first: true,
            ..RunOptions::default()
        };
        apply_overrides(&mut config, &options);
        assert_eq!(config.server.url, "https://sessions.example.com");
        assert_eq!(config.server.api_key, "k-123");
        assert!(config.viewer.newest_first);
    }
}
