use std::path::PathBuf;

use thiserror::Error;

use crate::pool;
use crate::source::split_paths;

pub const FIXTURE_FILES: &str = "FIXTURE_FILES";
pub const FIXTURE_URLS: &str = "FIXTURE_URLS";
pub const DATA_DIR: &str = "DATA_DIR";
pub const LOG_FILE: &str = "LOG_FILE";
pub const FETCH_PARALLELISM: &str = "FETCH_PARALLELISM";
pub const HOME_STANDINGS: &str = "HOME_STANDINGS";
pub const AWAY_STANDINGS: &str = "AWAY_STANDINGS";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration value {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub parallelism: usize,
    fixture_files: Option<String>,
    fixture_urls: Option<String>,
    home_standings: Option<String>,
    away_standings: Option<String>,
}

/// `.env.local` wins over `.env`; real environment variables win over both.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_file = value(LOG_FILE)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(LOG_FILE))?;
        let data_dir = value(DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            data_dir,
            log_file,
            parallelism: pool::parallelism(value(FETCH_PARALLELISM).as_deref()),
            fixture_files: value(FIXTURE_FILES),
            fixture_urls: value(FIXTURE_URLS),
            home_standings: value(HOME_STANDINGS),
            away_standings: value(AWAY_STANDINGS),
        })
    }

    pub fn fixture_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        required_list(self.fixture_files.as_deref(), FIXTURE_FILES).map(split_paths)
    }

    pub fn fixture_urls(&self) -> Result<Vec<String>, ConfigError> {
        required_list(self.fixture_urls.as_deref(), FIXTURE_URLS)
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
    }

    /// Home and away standing files, at least one of which must be set.
    pub fn standing_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut out = Vec::new();
        if let Some(raw) = self.home_standings.as_deref() {
            out.extend(split_paths(raw));
        }
        if let Some(raw) = self.away_standings.as_deref() {
            out.extend(split_paths(raw));
        }
        if out.is_empty() {
            return Err(ConfigError::Missing(HOME_STANDINGS));
        }
        Ok(out)
    }
}

fn required_list<'a>(raw: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    raw.filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// `--data-dir=<path>` or `--data-dir <path>`.
pub fn data_dir_arg(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let args = args.into_iter().collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--data-dir=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--data-dir" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
