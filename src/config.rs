use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::HmdbError;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub input: Option<Utf8PathBuf>,
    #[serde(default)]
    pub chemont: Option<Utf8PathBuf>,
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,
    #[serde(default)]
    pub include_root_links: Option<bool>,
    #[serde(default)]
    pub progress_interval: Option<usize>,
}

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<Utf8PathBuf>,
    pub chemont: Option<Utf8PathBuf>,
    pub output: Option<Utf8PathBuf>,
    pub no_root_links: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub input: Utf8PathBuf,
    pub chemont: Option<Utf8PathBuf>,
    pub output: Option<Utf8PathBuf>,
    pub include_root_links: bool,
    pub progress_interval: usize,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, HmdbError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Config::default(),
        };
        Self::resolve_config(config, overrides)
    }

    pub fn load(path: &str) -> Result<Config, HmdbError> {
        let content =
            fs::read_to_string(path).map_err(|_| HmdbError::ConfigRead(path.into()))?;
        serde_json::from_str(&content).map_err(|err| HmdbError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, HmdbError> {
        let input = overrides
            .input
            .or(config.input)
            .ok_or_else(|| HmdbError::MissingInput("input".to_string()))?;
        let include_root_links = if overrides.no_root_links {
            false
        } else {
            config.include_root_links.unwrap_or(true)
        };

        Ok(ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            input,
            chemont: overrides.chemont.or(config.chemont),
            output: overrides.output.or(config.output),
            include_root_links,
            progress_interval: config
                .progress_interval
                .filter(|interval| *interval > 0)
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL),
        })
    }
}
