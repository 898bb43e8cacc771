use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

use super::ProviderSelection;

const DEFAULT_CONFIG_FILE: &str = include_str!("org-geocoder.default.toml");

/// Settings that may be left out of a config file.
///
/// Missing values are taken from a fallback, usually the embedded defaults.
pub trait Merge {
    fn merge(self, fallback: Self) -> Self;
}

impl<T: Merge> Merge for Option<T> {
    fn merge(self, fallback: Self) -> Self {
        match (self, fallback) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub datasets: Option<Datasets>,
    pub cache: Option<Cache>,
    pub geocoding: Option<Geocoding>,
    pub gateway: Option<Gateway>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

impl Merge for Config {
    fn merge(self, fallback: Self) -> Self {
        Self {
            datasets: self.datasets.merge(fallback.datasets),
            cache: self.cache.merge(fallback.cache),
            geocoding: self.geocoding.merge(fallback.geocoding),
            gateway: self.gateway.merge(fallback.gateway),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Datasets {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub names: Option<Vec<String>>,
}

impl Merge for Datasets {
    fn merge(self, fallback: Self) -> Self {
        Self {
            input_dir: self.input_dir.or(fallback.input_dir),
            output_dir: self.output_dir.or(fallback.output_dir),
            names: self.names.or(fallback.names),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Cache {
    pub file: Option<PathBuf>,
}

impl Merge for Cache {
    fn merge(self, fallback: Self) -> Self {
        Self {
            file: self.file.or(fallback.file),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Geocoding {
    pub provider: Option<ProviderSelection>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub delay: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Merge for Geocoding {
    fn merge(self, fallback: Self) -> Self {
        Self {
            provider: self.provider.or(fallback.provider),
            delay: self.delay.or(fallback.delay),
            timeout: self.timeout.or(fallback.timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Gateway {
    pub census: Option<Census>,
    pub geocodio: Option<Geocodio>,
}

impl Merge for Gateway {
    fn merge(self, fallback: Self) -> Self {
        Self {
            census: self.census.merge(fallback.census),
            geocodio: self.geocodio.merge(fallback.geocodio),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Census {
    pub api_url: Option<String>,
    pub benchmark: Option<String>,
}

impl Merge for Census {
    fn merge(self, fallback: Self) -> Self {
        Self {
            api_url: self.api_url.or(fallback.api_url),
            benchmark: self.benchmark.or(fallback.benchmark),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Geocodio {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub dotenv_file: Option<PathBuf>,
    pub key_files: Option<Vec<PathBuf>>,
}

impl Merge for Geocodio {
    fn merge(self, fallback: Self) -> Self {
        Self {
            api_url: self.api_url.or(fallback.api_url),
            api_key_env: self.api_key_env.or(fallback.api_key_env),
            dotenv_file: self.dotenv_file.or(fallback.dotenv_file),
            key_files: self.key_files.or(fallback.key_files),
        }
    }
}
