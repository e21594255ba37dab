use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Environment variable selecting the task API base URL.
pub const API_URL_ENV: &str = "KANBAN_API_URL";
/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";

/// Get the default data directory: ~/.kanban
pub fn get_kanban_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".kanban"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.kanban/config.toml (highest)
    let data_dir = get_kanban_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if user_config.exists() {
        load_file(&user_config)?
    } else if local_config.exists() {
        load_file(local_config)?
    } else {
        AppConfig::default()
    };

    // Logging directory falls back to the data directory when not set
    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        let logs_dir = data_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());

    Ok(cfg)
}

pub fn load_file(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
    Ok(cfg)
}

pub fn apply_env_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(API_URL_ENV) {
        if !v.trim().is_empty() {
            cfg.api.base_url = v.trim().to_string();
        }
    }
    if let Some(v) = lookup(LOG_LEVEL_ENV) {
        if !v.trim().is_empty() {
            cfg.logging.level = v.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_replace_base_url_and_level() {
        let env: HashMap<&str, &str> = [
            (API_URL_ENV, " http://api.example:4100 "),
            (LOG_LEVEL_ENV, "debug"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api.base_url, "http://api.example:4100");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |_| Some("   ".to_string()));
        assert_eq!(cfg.api.base_url, "http://localhost:4000");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn load_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[board]\npage_size = \"many\"\n").unwrap();
        let err = load_file(&path).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
    }
}
