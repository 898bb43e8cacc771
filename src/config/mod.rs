use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::{cli::Args, credentials::KeySources};

mod raw;

use self::raw::Merge as _;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "org-geocoder.toml";

const GEOCODED_SUFFIX: &str = "_geocoded";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Geocodio provider selected but no API key found. Use --geocodio-key or {env_var}.")]
    MissingApiKey { env_var: String },
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderSelection {
    /// geocod.io if an API key is available, the Census geocoder otherwise.
    Auto,
    Census,
    Geocodio,
}

#[derive(Debug)]
pub struct Config {
    pub datasets: Datasets,
    pub cache: Cache,
    pub geocoding: Geocoding,
    pub gateway: Gateway,
}

#[derive(Debug)]
pub struct Datasets {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Datasets {
    /// `<input-dir>/<name>.csv` and `<output-dir>/<name>_geocoded.csv`
    /// for each dataset in the configured order.
    pub fn paths(&self) -> Vec<DatasetPaths> {
        self.names
            .iter()
            .map(|name| DatasetPaths {
                input: self.input_dir.join(format!("{name}.csv")),
                output: self.output_dir.join(format!("{name}{GEOCODED_SUFFIX}.csv")),
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct Cache {
    pub file: PathBuf,
}

#[derive(Debug)]
pub struct Geocoding {
    pub provider: ProviderSelection,
    pub delay: Duration,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct Gateway {
    pub census: Census,
    pub geocodio: Geocodio,
}

#[derive(Debug)]
pub struct Census {
    pub api_url: String,
    pub benchmark: String,
}

#[derive(Debug)]
pub struct Geocodio {
    pub api_url: String,
    /// Explicitly passed key that takes precedence over all `key_sources`.
    pub api_key: Option<String>,
    pub key_sources: KeySources,
}

/// The selected backend together with everything it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingGateway {
    Census { api_url: String, benchmark: String },
    Geocodio { api_url: String, api_key: String },
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let explicit = file_path.is_some();
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified, try {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => {
                log::info!("Load configuration from {}", file_path.display());
                toml::from_str::<raw::Config>(&cfg_string)?.merge(raw::Config::default())
            }
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                log::debug!("{} not found => load default configuration", file_path.display());
                raw::Config::default()
            }
            Err(err) => {
                return Err(anyhow!(
                    "Unable to read configuration file {}: {err}",
                    file_path.display()
                ));
            }
        };
        Self::try_from(raw_config)
    }

    /// Command line arguments override the loaded settings.
    pub fn apply_args(&mut self, args: &Args) {
        let Args {
            config: _,
            input_dir,
            output_dir,
            cache,
            sleep,
            timeout,
            provider,
            geocodio_key,
        } = args;
        if let Some(dir) = input_dir {
            self.datasets.input_dir = dir.clone();
        }
        if let Some(dir) = output_dir {
            self.datasets.output_dir = dir.clone();
        }
        if let Some(file) = cache {
            self.cache.file = file.clone();
        }
        if let Some(delay) = sleep {
            self.geocoding.delay = *delay;
        }
        if let Some(timeout) = timeout {
            self.geocoding.timeout = *timeout;
        }
        if let Some(provider) = provider {
            self.geocoding.provider = *provider;
        }
        if let Some(key) = geocodio_key {
            self.gateway.geocodio.api_key = Some(key.clone());
        }
    }

    /// Resolves the API key and picks the backend.
    pub fn geocoding_gateway(&self) -> Result<GeocodingGateway, Error> {
        let Geocodio {
            api_url,
            api_key,
            key_sources,
        } = &self.gateway.geocodio;
        let api_key = key_sources.resolve(api_key.as_deref());
        select_gateway(self.geocoding.provider, api_key, &self.gateway.census, api_url)
            .ok_or_else(|| Error::MissingApiKey {
                env_var: key_sources.env_var.clone(),
            })
    }
}

fn select_gateway(
    selection: ProviderSelection,
    api_key: Option<String>,
    census: &Census,
    geocodio_api_url: &str,
) -> Option<GeocodingGateway> {
    let use_geocodio = match selection {
        ProviderSelection::Census => false,
        ProviderSelection::Geocodio => true,
        ProviderSelection::Auto => api_key.is_some(),
    };
    if use_geocodio {
        let api_key = api_key?;
        Some(GeocodingGateway::Geocodio {
            api_url: geocodio_api_url.to_owned(),
            api_key,
        })
    } else {
        Some(GeocodingGateway::Census {
            api_url: census.api_url.clone(),
            benchmark: census.benchmark.clone(),
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| anyhow!("Missing '{name}' configuration"))
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            datasets,
            cache,
            geocoding,
            gateway,
        } = from;

        let raw::Datasets {
            input_dir,
            output_dir,
            names,
        } = required(datasets, "datasets")?;
        let datasets = Datasets {
            input_dir: required(input_dir, "datasets.input-dir")?,
            output_dir: required(output_dir, "datasets.output-dir")?,
            names: required(names, "datasets.names")?,
        };

        let raw::Cache { file } = required(cache, "cache")?;
        let cache = Cache {
            file: required(file, "cache.file")?,
        };

        let raw::Geocoding {
            provider,
            delay,
            timeout,
        } = required(geocoding, "geocoding")?;
        let geocoding = Geocoding {
            provider: required(provider, "geocoding.provider")?,
            delay: required(delay, "geocoding.delay")?,
            timeout: required(timeout, "geocoding.timeout")?,
        };

        let raw::Gateway { census, geocodio } = required(gateway, "gateway")?;

        let raw::Census { api_url, benchmark } = required(census, "gateway.census")?;
        let census = Census {
            api_url: required(api_url, "gateway.census.api-url")?,
            benchmark: required(benchmark, "gateway.census.benchmark")?,
        };

        let raw::Geocodio {
            api_url,
            api_key_env,
            dotenv_file,
            key_files,
        } = required(geocodio, "gateway.geocodio")?;
        let geocodio = Geocodio {
            api_url: required(api_url, "gateway.geocodio.api-url")?,
            api_key: None,
            key_sources: KeySources {
                env_var: required(api_key_env, "gateway.geocodio.api-key-env")?,
                dotenv_file: required(dotenv_file, "gateway.geocodio.dotenv-file")?,
                key_files: required(key_files, "gateway.geocodio.key-files")?,
            },
        };

        Ok(Self {
            datasets,
            cache,
            geocoding,
            gateway: Gateway { census, geocodio },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn default_config() -> Config {
        Config::try_from(raw::Config::default()).unwrap()
    }

    fn census() -> Census {
        Census {
            api_url: "http://census".into(),
            benchmark: "b".into(),
        }
    }

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg: Config = Config::try_load_from_file_or_default(file).unwrap();
        assert_eq!(cfg.geocoding.provider, ProviderSelection::Geocodio);
        assert_eq!(cfg.cache.file, Path::new("processed_data/geocode_cache.json"));
    }

    #[test]
    fn fail_on_missing_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.toml");
        assert!(Config::try_load_from_file_or_default(Some(&file)).is_err());
    }

    #[test]
    fn load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[datasets]\nnames = [\"orgs\"]\ninput-dir = \"in\"").unwrap();
        let cfg = Config::try_load_from_file_or_default(Some(file.path())).unwrap();
        let paths = cfg.datasets.paths();
        assert_eq!(
            paths,
            vec![DatasetPaths {
                input: PathBuf::from("in/orgs.csv"),
                output: PathBuf::from("processed_data/orgs_geocoded.csv"),
            }]
        );
    }

    #[test]
    fn reject_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[geocoding]\nprovider = \"nominatim\"").unwrap();
        assert!(Config::try_load_from_file_or_default(Some(file.path())).is_err());
    }

    #[test]
    fn default_dataset_paths() {
        let paths = default_config().datasets.paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].input, Path::new("raw_data/asian_org.csv"));
        assert_eq!(
            paths[1].output,
            Path::new("processed_data/latino_org_geocoded.csv")
        );
    }

    #[test]
    fn command_line_overrides_config() {
        let mut cfg = default_config();
        let args = Args::parse_from([
            "org-geocoder",
            "--provider",
            "census",
            "--sleep",
            "0",
            "--timeout",
            "2.5",
            "--cache",
            "c.json",
        ]);
        cfg.apply_args(&args);
        assert_eq!(cfg.geocoding.provider, ProviderSelection::Census);
        assert_eq!(cfg.geocoding.delay, Duration::ZERO);
        assert_eq!(cfg.geocoding.timeout, Duration::from_millis(2500));
        assert_eq!(cfg.cache.file, Path::new("c.json"));
        assert_eq!(cfg.datasets.input_dir, Path::new("raw_data"));
    }

    #[test]
    fn auto_selection() {
        assert_eq!(
            select_gateway(ProviderSelection::Auto, Some("k".into()), &census(), "http://g"),
            Some(GeocodingGateway::Geocodio {
                api_url: "http://g".into(),
                api_key: "k".into()
            })
        );
        assert_eq!(
            select_gateway(ProviderSelection::Auto, None, &census(), "http://g"),
            Some(GeocodingGateway::Census {
                api_url: "http://census".into(),
                benchmark: "b".into()
            })
        );
    }

    #[test]
    fn explicit_selection() {
        assert!(matches!(
            select_gateway(ProviderSelection::Census, Some("k".into()), &census(), "g"),
            Some(GeocodingGateway::Census { .. })
        ));
        assert!(select_gateway(ProviderSelection::Geocodio, None, &census(), "g").is_none());
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = default_config();
        cfg.gateway.geocodio.key_sources = KeySources {
            env_var: "ORG_GEOCODER_TEST_MISSING_KEY".into(),
            dotenv_file: dir.path().join(".env.local"),
            key_files: vec![dir.path().join("key.txt")],
        };
        let err = cfg.geocoding_gateway().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Geocodio provider selected but no API key found. \
             Use --geocodio-key or ORG_GEOCODER_TEST_MISSING_KEY."
        );
        cfg.gateway.geocodio.api_key = Some("secret".into());
        assert!(matches!(
            cfg.geocoding_gateway().unwrap(),
            GeocodingGateway::Geocodio { api_key, .. } if api_key == "secret"
        ));
    }
}
