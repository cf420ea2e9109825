/// Sunrise / sunset CSV parsing.
///
/// Rows carry `Date` (`MM-DD-YYYY`), `Sunrise` and `Sunset` (`HH:MM`,
/// UTC). The day keeps no time component; rise and set are composed as
/// `"<Date>-<HH:MM>"` and read with the cover timestamp format.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::ingest::cover::parse_utc_timestamp;
use crate::model::{ChartError, SunEvent};

pub const DAY_FORMAT: &str = "%m-%d-%Y";

#[derive(Debug, Deserialize)]
struct SunRow {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Sunrise", default)]
    sunrise: Option<String>,
    #[serde(rename = "Sunset", default)]
    sunset: Option<String>,
}

/// Builds one event from the raw column values.
pub fn process_sun_row(date: &str, sunrise: &str, sunset: &str) -> SunEvent {
    SunEvent {
        day: NaiveDate::parse_from_str(date, DAY_FORMAT).ok(),
        sunrise: parse_utc_timestamp(&format!("{}-{}", date, sunrise)),
        sunset: parse_utc_timestamp(&format!("{}-{}", date, sunset)),
    }
}

/// Parses a whole sunrise / sunset CSV. An empty table is not an error;
/// it simply draws empty bands.
pub fn parse_sun_csv(text: &str) -> Result<Vec<SunEvent>, ChartError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<SunRow>()
        .map(|row| {
            let row = row?;
            Ok(process_sun_row(
                row.date.as_deref().unwrap_or(""),
                row.sunrise.as_deref().unwrap_or(""),
                row.sunset.as_deref().unwrap_or(""),
            ))
        })
        .collect()
}
