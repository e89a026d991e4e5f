//! Application configuration.
//!
//! Values come from an optional `popcorn.ron` in the working directory and
//! are overridden by environment variables. The API key has no default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use popcorn_engine::OmdbSettings;
use popcorn_logging::LogDestination;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "popcorn.ron";
pub const DEFAULT_STORAGE_FILENAME: &str = "popcorn_storage.json";

pub const ENV_API_KEY: &str = "OMDB_API_KEY";
pub const ENV_BASE_URL: &str = "OMDB_BASE_URL";
pub const ENV_STORAGE: &str = "POPCORN_STORAGE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api_key: Option<String>,
    base_url: Option<String>,
    storage: Option<PathBuf>,
    log_file: Option<PathBuf>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub omdb: OmdbSettings,
    pub storage_path: PathBuf,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Loads `file` if it exists and applies overrides from `env`.
    pub fn load(file: &Path, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let from_file = match fs::read_to_string(file) {
            Ok(text) => ron::from_str::<ConfigFile>(&text)
                .with_context(|| format!("parsing {}", file.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", file.display()));
            }
        };

        let mut omdb = OmdbSettings::default();
        if let Some(base_url) = env(ENV_BASE_URL).or(from_file.base_url) {
            omdb.base_url = base_url;
        }
        if let Some(secs) = from_file.connect_timeout_secs {
            omdb.connect_timeout = Duration::from_secs(secs);
        }
        omdb.api_key = match env(ENV_API_KEY).or(from_file.api_key) {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => bail!(
                "no OMDb API key: set {ENV_API_KEY} or `api_key` in {}",
                file.display()
            ),
        };

        let storage_path = env(ENV_STORAGE)
            .map(PathBuf::from)
            .or(from_file.storage)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILENAME));
        let log_file = from_file
            .log_file
            .unwrap_or_else(|| PathBuf::from(popcorn_logging::DEFAULT_LOG_FILE));

        Ok(Self {
            omdb,
            storage_path,
            log_file,
        })
    }

    pub fn log_destination(&self) -> LogDestination {
        LogDestination::File(self.log_file.clone())
    }
}
