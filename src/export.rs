use serde::Serialize;
use std::path::Path;

use crate::core::EnrichedRecord;
use crate::error::Result;

/// Flat CSV row; genres are joined into one cell, absent values stay empty
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u64,
    name: &'a str,
    genres: String,
    review_ratio: Option<f64>,
    completion_time_minutes: Option<f64>,
    play_time_minutes: u64,
    completion_ratio: Option<f64>,
}

impl<'a> From<&'a EnrichedRecord> for ExportRow<'a> {
    fn from(record: &'a EnrichedRecord) -> Self {
        Self {
            id: record.id,
            name: &record.name,
            genres: record.genres.join(", "),
            review_ratio: record.review_ratio,
            completion_time_minutes: record.completion_time_minutes,
            play_time_minutes: record.play_time_minutes,
            completion_ratio: record.completion_ratio,
        }
    }
}

/// Write all records to `path`, replacing any previous export
pub fn write_csv<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;

    for record in records {
        writer.serialize(ExportRow::from(record))?;
        count += 1;
    }

    // header only when nothing was serialized
    if count == 0 {
        writer.write_record([
            "id",
            "name",
            "genres",
            "review_ratio",
            "completion_time_minutes",
            "play_time_minutes",
            "completion_ratio",
        ])?;
    }

    writer.flush()?;
    Ok(count)
}
