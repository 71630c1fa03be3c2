//! Global configuration: HTTP behavior knobs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration loaded from `~/.config/fetchkit/config.toml`. Missing
/// fields take their defaults, so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchkitConfig {
    /// User-Agent header sent on every request.
    pub user_agent: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum redirects to follow per request.
    pub max_redirects: u32,
}

impl Default for FetchkitConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("fetchkit/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 300,
            max_redirects: 10,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchkitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchkitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchkitConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchkitConfig::default();
        assert!(cfg.user_agent.starts_with("fetchkit/"));
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.request_timeout_secs, 300);
        assert_eq!(cfg.max_redirects, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FetchkitConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchkitConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.user_agent, cfg.user_agent);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
        assert_eq!(parsed.request_timeout_secs, cfg.request_timeout_secs);
        assert_eq!(parsed.max_redirects, cfg.max_redirects);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            user_agent = "research-bot/2.0"
            connect_timeout_secs = 5
            request_timeout_secs = 60
            max_redirects = 3
        "#;
        let cfg: FetchkitConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.user_agent, "research-bot/2.0");
        assert_eq!(cfg.connect_timeout_secs, 5);
        assert_eq!(cfg.request_timeout_secs, 60);
        assert_eq!(cfg.max_redirects, 3);
    }

    #[test]
    fn config_toml_partial_fills_defaults() {
        let toml = r#"request_timeout_secs = 45"#;
        let cfg: FetchkitConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.request_timeout_secs, 45);
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.user_agent.starts_with("fetchkit/"));
    }
}
