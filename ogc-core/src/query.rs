use crate::entities::{Record, COLUMN_ADDRESS, COLUMN_CITY, COLUMN_STATES};

fn field<'a>(record: &'a Record, column: &str) -> &'a str {
    record.get(column).unwrap_or_default().trim()
}

/// Derives the free-text query of a record.
///
/// The street address wins over `"{City}, {States}"`
/// which wins over the state alone.
/// An empty string is returned if none of them is available.
pub fn build_query(record: &Record) -> String {
    let address = field(record, COLUMN_ADDRESS).trim_matches(',');
    let city = field(record, COLUMN_CITY);
    let state = field(record, COLUMN_STATES);

    if !address.is_empty() {
        return address.to_owned();
    }
    match (city.is_empty(), state.is_empty()) {
        (false, false) => format!("{city}, {state}"),
        (true, false) => state.to_owned(),
        _ => String::new(),
    }
}
