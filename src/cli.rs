use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::config::ProviderSelection;

/// Geocode organization CSV files.
///
/// Values that are not given fall back to the configuration file
/// and finally to the built-in defaults.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Configuration file [default: org-geocoder.toml if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing the input CSV files
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory for the geocoded CSV files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path of the geocode cache (JSON)
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Delay after each new geocode query (seconds or e.g. "200ms")
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub sleep: Option<Duration>,

    /// HTTP timeout (seconds or e.g. "10s")
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Geocoding backend to use
    #[arg(long, value_enum)]
    pub provider: Option<ProviderSelection>,

    /// Geocodio API key (or set GEOCODIO_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub geocodio_key: Option<String>,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    match s.trim().parse::<f64>() {
        Ok(secs) => Duration::try_from_secs_f64(secs).map_err(|err| err.to_string()),
        Err(_) => duration_str::parse(s).map_err(|err| err.to_string()),
    }
}
