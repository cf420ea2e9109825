/// Cloud cover CSV parsing.
///
/// Each row carries a `Date` (`MM-DD-YYYY-HH:MM`, no zone) and a
/// `CloudCover` percentage. The timestamp is read twice, once as UTC and
/// once as ambient local wall time; the percentage is bucketed with
/// `model::quantize_cloud`.
///
/// Bad values do not fail the parse. They produce `None` fields and the
/// sample renders at an undefined position. Only a structurally broken
/// file (or an empty one) is an error.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::model::{ChartError, CloudSample, quantize_cloud};
use crate::numeric::parse_int;
use crate::timeline::AmbientZone;

/// Format of the cover `Date` column (and of the composed sunrise/sunset
/// timestamps).
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H:%M";

/// Raw cover row. Missing columns read as `None` rather than failing.
#[derive(Debug, Deserialize)]
struct CoverRow {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "CloudCover", default)]
    cloud_cover: Option<String>,
}

/// Parses a zone-less timestamp as UTC.
pub fn parse_utc_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parses a zone-less timestamp as wall time in the ambient zone.
pub fn parse_local_timestamp(s: &str, zone: AmbientZone) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .and_then(|naive| zone.local_to_utc(naive))
}

/// Builds one sample from the two raw column values.
pub fn process_cover_row(date: &str, cloud_cover: &str, zone: AmbientZone) -> CloudSample {
    let cloud_percent = parse_int(cloud_cover);
    CloudSample {
        raw_timestamp: date.to_string(),
        cloud_percent,
        quantized_cloud: quantize_cloud(cloud_percent),
        utc_time: parse_utc_timestamp(date),
        local_time: parse_local_timestamp(date, zone),
    }
}

/// Parses a whole cover CSV (header row required).
///
/// Returns an error if the CSV is malformed or has no data rows: the
/// x-scale domain is taken from the samples, so an empty file cannot be
/// drawn.
pub fn parse_cover_csv(text: &str, zone: AmbientZone) -> Result<Vec<CloudSample>, ChartError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut samples = Vec::new();
    for row in reader.deserialize::<CoverRow>() {
        let row = row?;
        samples.push(process_cover_row(
            row.date.as_deref().unwrap_or(""),
            row.cloud_cover.as_deref().unwrap_or(""),
            zone,
        ));
    }

    if samples.is_empty() {
        return Err(ChartError::ParseError("cover CSV contained no rows".to_string()));
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
