use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::util::{ensure_dir, home_dir, read_to_string};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashConfig {
    pub data: Option<DataConfig>,
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Local directory holding the generated JSON documents.
    pub dir: Option<String>,
    /// Remote base URL serving the same documents.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(alias = "timeZone")]
    #[serde(alias = "tz")]
    pub timezone: Option<String>,
}

pub const DEFAULT_BIND: &str = "127.0.0.1:18790";

/// Where the dashboard reads its three JSON documents from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Dir(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn from_spec(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.trim_end_matches('/').to_string())
        } else {
            DataSource::Dir(PathBuf::from(trimmed))
        }
    }

    /// A bad source fails the whole load (the views then show the load
    /// error), unlike a missing document which degrades quietly.
    pub fn validate(&self) -> Result<()> {
        match self {
            DataSource::Dir(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("data directory {} not found", dir.display());
                }
                Ok(())
            }
            DataSource::Url(base) => {
                reqwest::Url::parse(base).with_context(|| format!("parse data url {base}"))?;
                Ok(())
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Dir(dir) => dir.display().to_string(),
            DataSource::Url(base) => base.clone(),
        }
    }
}

pub fn load_config(state_dir_override: Option<PathBuf>) -> Result<(DashConfig, PathBuf)> {
    let state_dir = state_dir_override
        .or_else(state_dir_from_env)
        .unwrap_or(default_state_dir()?);
    ensure_dir(&state_dir)?;

    let config = if let Some(config_path) = config_path_from_env() {
        if config_path.exists() {
            parse_config_file(&config_path)?
        } else {
            DashConfig::default()
        }
    } else {
        let json5_path = state_dir.join("config.json5");
        let json_path = state_dir.join("config.json");
        if json5_path.exists() {
            parse_config_file(&json5_path)?
        } else if json_path.exists() {
            parse_config_file(&json_path)?
        } else {
            DashConfig::default()
        }
    };

    Ok((config, state_dir))
}

fn parse_config_file(path: &Path) -> Result<DashConfig> {
    let raw = read_to_string(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("json5") {
        json5::from_str::<DashConfig>(&raw).context("parse config.json5")
    } else {
        serde_json::from_str::<DashConfig>(&raw).context("parse config.json")
    }
}

fn state_dir_from_env() -> Option<PathBuf> {
    let raw = std::env::var("CLAWBOARD_STATE_DIR").ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn config_path_from_env() -> Option<PathBuf> {
    let raw = std::env::var("CLAWBOARD_CONFIG").ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub fn default_state_dir() -> Result<PathBuf> {
    let home = home_dir()?;
    Ok(home.join(".clawboard"))
}

pub fn resolve_data_source(cli_override: Option<&str>, config: &DashConfig) -> DataSource {
    if let Some(raw) = cli_override {
        return DataSource::from_spec(raw);
    }
    if let Ok(env) = std::env::var("CLAWBOARD_DATA") {
        if !env.trim().is_empty() {
            return DataSource::from_spec(&env);
        }
    }
    if let Some(data) = config.data.as_ref() {
        if let Some(url) = data.url.as_ref().filter(|u| !u.trim().is_empty()) {
            return DataSource::from_spec(url);
        }
        if let Some(dir) = data.dir.as_ref().filter(|d| !d.trim().is_empty()) {
            return DataSource::from_spec(dir);
        }
    }
    DataSource::Dir(PathBuf::from("data"))
}

pub fn resolve_bind(cli_override: Option<&str>, config: &DashConfig) -> String {
    if let Some(bind) = cli_override {
        return bind.to_string();
    }
    config
        .server
        .as_ref()
        .and_then(|s| s.bind.clone())
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND.to_string())
}

/// Display timezone for calendar math and date labels. Bad names fall back
/// to UTC with a warning rather than failing the whole dashboard.
pub fn resolve_timezone(config: &DashConfig) -> Tz {
    let Some(name) = config
        .display
        .as_ref()
        .and_then(|d| d.timezone.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return chrono_tz::UTC;
    };
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            eprintln!("[clawboard][config] unknown timezone {name:?}, using UTC");
            chrono_tz::UTC
        }
    }
}
