use super::{prelude::*, resolve_cached};
use std::{thread, time::Duration};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Number of processed rows.
    pub total: usize,
    /// Rows with both latitude and longitude.
    pub located: usize,
    /// Number of gateway requests (cache misses).
    pub lookups: usize,
    pub no_match: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl DatasetStats {
    fn count(&mut self, result: &GeocodeResult) {
        self.total += 1;
        if result.is_located() {
            self.located += 1;
        }
        match result.outcome() {
            Outcome::Resolved => {}
            Outcome::NoMatch => self.no_match += 1,
            Outcome::Error => self.errors += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// The header of a geocoded table.
///
/// Result columns that already exist in the input keep their position.
pub fn geocoded_header(input_header: &[String]) -> Vec<String> {
    let mut header = input_header.to_vec();
    for name in RESULT_FIELDS {
        if !header.iter().any(|h| h == name) {
            header.push(name.to_owned());
        }
    }
    header
}

/// Appends the result columns to a copy of the record.
pub fn merge_result(record: &Record, result: &GeocodeResult) -> Record {
    let mut merged = record.clone();
    for (name, value) in result.fields() {
        merged.set(name, value);
    }
    merged
}

/// Geocodes all records in their original order.
///
/// Each distinct query is sent to the gateway at most once per cache.
/// After every request the thread pauses for `delay`; cache hits
/// and empty queries are never delayed.
pub fn geocode_records<G, P>(
    records: &[Record],
    cache: &mut GeocodeCache,
    gateway: &G,
    delay: Duration,
    progress: &mut P,
) -> (Vec<Record>, DatasetStats)
where
    G: GeocodingGateway,
    P: ProgressReporter,
{
    geocode_records_with_pause(records, cache, gateway, progress, || {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    })
}

/// Like [`geocode_records`] but calls `pause` after every gateway request.
pub fn geocode_records_with_pause<G, P, F>(
    records: &[Record],
    cache: &mut GeocodeCache,
    gateway: &G,
    progress: &mut P,
    mut pause: F,
) -> (Vec<Record>, DatasetStats)
where
    G: GeocodingGateway,
    P: ProgressReporter,
    F: FnMut(),
{
    let total = records.len();
    let mut stats = DatasetStats::default();
    let mut geocoded = Vec::with_capacity(total);
    for (i, record) in records.iter().enumerate() {
        let query = crate::query::build_query(record);
        let (result, looked_up) = resolve_cached(cache, gateway, &query);
        if looked_up {
            stats.lookups += 1;
            pause();
        }
        stats.count(&result);
        geocoded.push(merge_result(record, &result));
        progress.report(i + 1, total);
    }
    (geocoded, stats)
}
