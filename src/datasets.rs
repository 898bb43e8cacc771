use anyhow::{Context as _, Result};
use ogc_core::{
    cache::GeocodeCache,
    entities::Table,
    gateways::{geocode::GeocodingGateway, progress::ProgressReporter},
    usecases::{self, DatasetStats},
};
use std::{path::Path, time::Duration};

use crate::{
    adapters::{csv, json},
    config::DatasetPaths,
    progress::ProgressBar,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    /// File name of the input table.
    pub name: String,
    pub stats: DatasetStats,
}

/// Geocodes one table and writes the result.
///
/// Tables without data rows produce an empty output file.
pub fn process_dataset<G, P>(
    paths: &DatasetPaths,
    cache: &mut GeocodeCache,
    gateway: &G,
    delay: Duration,
    progress: &mut P,
) -> Result<DatasetStats>
where
    G: GeocodingGateway,
    P: ProgressReporter,
{
    let DatasetPaths { input, output } = paths;
    let Table { header, records } = csv::read_table(input)
        .with_context(|| format!("Unable to read table {}", input.display()))?;
    log::info!(
        "Geocode {} rows of {} into {}",
        records.len(),
        input.display(),
        output.display()
    );
    let (header, geocoded, stats) = if records.is_empty() {
        (vec![], vec![], DatasetStats::default())
    } else {
        let (geocoded, stats) = usecases::geocode_records(&records, cache, gateway, delay, progress);
        (usecases::geocoded_header(&header), geocoded, stats)
    };
    csv::write_table(output, &header, &geocoded)
        .with_context(|| format!("Unable to write table {}", output.display()))?;
    log::debug!("Finished {}: {stats:?}", input.display());
    Ok(stats)
}

/// Processes all datasets in order with a shared cache.
///
/// The cache is saved once at the end, also if a dataset
/// could not be processed.
pub fn run<G>(
    datasets: &[DatasetPaths],
    cache_file: &Path,
    gateway: &G,
    delay: Duration,
) -> Result<Vec<DatasetSummary>>
where
    G: GeocodingGateway,
{
    let mut cache = json::load_cache(cache_file)
        .with_context(|| format!("Unable to load geocode cache {}", cache_file.display()))?;

    println!("Using provider: {}", gateway.provider());

    let mut summaries = vec![];
    let mut failure = None;
    for paths in datasets {
        let prefix = file_stem(&paths.input);
        let mut progress = ProgressBar::stdout(prefix);
        match process_dataset(paths, &mut cache, gateway, delay, &mut progress) {
            Ok(stats) => summaries.push(DatasetSummary {
                name: file_name(&paths.input),
                stats,
            }),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    json::persist_cache(cache_file, &cache)
        .with_context(|| format!("Unable to save geocode cache {}", cache_file.display()))?;

    for DatasetSummary { name, stats } in &summaries {
        println!("{name}: geocoded {}/{}", stats.located, stats.total);
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(summaries),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
