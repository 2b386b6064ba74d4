// src/config.rs
// Runtime settings: defaults, optional TOML file, env overrides.
// Resolution order mirrors the rest of the crate's config handling:
// explicit env path → conventional file location → built-in defaults,
// with single-key env vars taking precedence at the end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const ENV_CONFIG_PATH: &str = "APP_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the vacancy search API.
    #[serde(default = "default_base_url")]
    pub upstream_base_url: String,

    /// Per-request timeout towards the upstream API, seconds.
    #[serde(default = "default_timeout")]
    pub upstream_timeout_secs: u64,

    /// User-Agent the upstream API requires for identification.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where the region-name cache is persisted.
    #[serde(default = "default_area_cache_path")]
    pub area_cache_path: String,

    /// Listen address for the HTTP server.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_base_url() -> String {
    "https://api.hh.ru".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "SkillPulse/1.0 (youngest@example.com)".to_string()
}

fn default_area_cache_path() -> String {
    "areas_cache.json".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upstream_base_url: default_base_url(),
            upstream_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            area_cache_path: default_area_cache_path(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Settings {
    /// Load settings: $APP_CONFIG_PATH if set, else `config/app.toml`
    /// if present, else defaults. Env vars override file values.
    pub fn load() -> Result<Self> {
        let mut settings = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            Self::from_file(Path::new(&p))?
        } else {
            let conventional = PathBuf::from(DEFAULT_CONFIG_PATH);
            if conventional.exists() {
                Self::from_file(&conventional)?
            } else {
                Self::default()
            }
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("HH_API_URL") {
            self.upstream_base_url = v;
        }
        if let Ok(v) = std::env::var("HH_API_TIMEOUT") {
            if let Ok(secs) = v.parse() {
                self.upstream_timeout_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("AREA_CACHE_PATH") {
            self.area_cache_path = v;
        }
        if let Ok(v) = std::env::var("BIND_ADDR") {
            self.bind_addr = v;
        }
    }
}
