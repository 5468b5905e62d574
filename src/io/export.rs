//! CSV export for generated daily records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::generator::DailyRecord;

/// Column header for CSV export.
pub const HEADER: &str = "date,irradiance,humidity,wind_speed,ambient_temperature,\
                          tilt_angle,kwh,season,month,day";

/// Exports records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per day. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[DailyRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[DailyRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.date.clone(),
            format!("{:.2}", r.irradiance),
            format!("{:.2}", r.humidity),
            format!("{:.2}", r.wind_speed),
            format!("{:.2}", r.ambient_temperature),
            format!("{:.2}", r.tilt_angle),
            format!("{:.2}", r.kwh),
            r.season.to_string(),
            r.month.clone(),
            r.day.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders records as a CSV string.
///
/// # Errors
///
/// Returns an `io::Error` if serialization fails.
pub fn to_csv_string(records: &[DailyRecord]) -> io::Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(io::Error::other)
}
