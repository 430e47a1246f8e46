//! Client settings: an optional RON file merged under command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use research_engine::{ApiSettings, DEFAULT_BASE_URL};
use research_logging::research_info;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "research_client";
const CONFIG_FILENAME: &str = "config.ron";
const LOG_FILENAME: &str = "research_client.log";

/// On-disk form. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub download_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            download_dir: None,
            log_file: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

/// Reads the config file and applies `overrides`.
///
/// An explicit `path` must exist. The default location is optional.
pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Settings> {
    let config = match path {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => ClientConfig::default(),
        },
    };
    resolve(config, overrides)
}

fn read_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = ron::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    research_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

pub(crate) fn resolve(config: ClientConfig, overrides: Overrides) -> anyhow::Result<Settings> {
    let base_url = overrides.base_url.unwrap_or(config.base_url);
    let mut api = ApiSettings::parse(&base_url)
        .map_err(|err| anyhow!("invalid base url {base_url:?}: {err}"))?;
    api.connect_timeout = Duration::from_secs(config.connect_timeout_secs);
    api.request_timeout = Duration::from_secs(config.request_timeout_secs);
    api.max_bytes = config.max_response_bytes;

    let download_dir = overrides
        .download_dir
        .or(config.download_dir)
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_file = overrides
        .log_file
        .or(config.log_file)
        .unwrap_or_else(|| PathBuf::from(LOG_FILENAME));

    Ok(Settings {
        api,
        download_dir,
        log_file,
    })
}
