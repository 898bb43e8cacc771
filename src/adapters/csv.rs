//! Reading and writing tables as CSV files with a header line.

use ogc_core::entities::{Record, Table};
use std::{fs, io, path::Path};

const UTF8_BOM: char = '\u{feff}';

pub fn read_table(path: &Path) -> Result<Table, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut header: Vec<String> = rdr.headers()?.iter().map(ToOwned::to_owned).collect();
    if let Some(first) = header.first_mut() {
        *first = first.trim_start_matches(UTF8_BOM).to_owned();
    }
    if let Some(column) = duplicate_column(&header) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Duplicate column '{column}' in {}", path.display()),
        )
        .into());
    }
    let mut records = vec![];
    for row in rdr.records() {
        let row = row?;
        let record = header
            .iter()
            .enumerate()
            .map(|(i, column)| (column.as_str(), row.get(i).unwrap_or_default()))
            .collect::<Record>();
        records.push(record);
    }
    Ok(Table { header, records })
}

fn duplicate_column(header: &[String]) -> Option<&str> {
    header
        .iter()
        .enumerate()
        .find(|(i, column)| header[..*i].contains(*column))
        .map(|(_, column)| column.as_str())
}

/// Writes the records in the column order of `header`.
///
/// An empty header results in an empty file.
pub fn write_table(path: &Path, header: &[String], records: &[Record]) -> Result<(), csv::Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    if header.is_empty() {
        fs::write(path, "")?;
        return Ok(());
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header)?;
    for record in records {
        wtr.write_record(
            header
                .iter()
                .map(|column| record.get(column).unwrap_or_default()),
        )?;
    }
    wtr.flush()?;
    Ok(())
}
