/// Legacy fixed-width weather report.
///
/// The 2011 Portland report is a plain-text table whose lines start with a
/// 13-character station/date prefix, followed by space-padded columns.
/// Nothing in the chart pipeline reads it; it is only fetched and sampled
/// by the debug logger to check the file is still reachable and parseable.

use crate::ingest::fetch::Fetcher;
use crate::logging::{self, Source};
use crate::model::ChartError;

/// Characters dropped from the start of every line.
pub const PREFIX_WIDTH: usize = 13;

/// Row printed by the debug logger.
pub const SAMPLE_ROW_INDEX: usize = 395;

/// One parsed row as (column, value) pairs in header order. Short rows
/// simply omit the trailing columns.
pub type WeatherRow = Vec<(String, String)>;

/// Strips the fixed-width prefix from every line and collapses runs of
/// spaces to a single space.
pub fn clean_report(raw: &str) -> String {
    let stripped = raw
        .split('\n')
        .map(|line| line.chars().skip(PREFIX_WIDTH).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    let mut cleaned = String::with_capacity(stripped.len());
    let mut previous_space = false;
    for c in stripped.chars() {
        if c == ' ' {
            if !previous_space {
                cleaned.push(c);
            }
            previous_space = true;
        } else {
            cleaned.push(c);
            previous_space = false;
        }
    }
    cleaned
}

/// Parses space-delimited text with a header row.
///
/// A blank line is a row with one empty field, so row indices line up
/// with the line numbers of the report. A single trailing newline does
/// not start a row.
pub fn parse_space_delimited(text: &str) -> Result<Vec<WeatherRow>, ChartError> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    // The csv reader skips empty lines; an empty quoted field survives.
    let kept = body
        .split('\n')
        .map(|line| if line.is_empty() { "\"\"" } else { line })
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .flexible(true)
        .from_reader(kept.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: WeatherRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Fetches the report, cleans and parses it, and logs the sample row.
///
/// Returns the sample row, or `None` if the report has fewer rows.
pub fn log_sample_weather_data(
    fetcher: &dyn Fetcher,
    url: &str,
) -> Result<Option<WeatherRow>, ChartError> {
    let raw = fetcher.fetch_text(url)?;
    let rows = parse_space_delimited(&clean_report(&raw))?;

    logging::debug(Source::Weather, None, "space-delimited test data:");
    match rows.get(SAMPLE_ROW_INDEX) {
        Some(row) => {
            let rendered = row
                .iter()
                .map(|(column, value)| format!("{}={}", column, value))
                .collect::<Vec<_>>()
                .join(" ");
            logging::info(
                Source::Weather,
                None,
                &format!("row {} of {}: {}", SAMPLE_ROW_INDEX, rows.len(), rendered),
            );
            Ok(Some(row.clone()))
        }
        None => {
            logging::warn(
                Source::Weather,
                None,
                &format!("report has only {} rows, no row {}", rows.len(), SAMPLE_ROW_INDEX),
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedReport(String);

    impl Fetcher for CannedReport {
        fn fetch_text(&self, _url: &str) -> Result<String, ChartError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_clean_report_strips_prefix_and_spaces() {
        let raw = "0123456789ABCYEAR  MO   DA\n0123456789ABC2011  1    1";
        assert_eq!(clean_report(raw), "YEAR MO DA\n2011 1 1");
    }

    #[test]
    fn test_clean_report_short_lines_become_empty() {
        assert_eq!(clean_report("short\n"), "\n");
    }

    #[test]
    fn test_parse_space_delimited_rows() {
        let rows = parse_space_delimited("TEMP DEWP\n41.2 38.0\n40.1\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                ("TEMP".to_string(), "41.2".to_string()),
                ("DEWP".to_string(), "38.0".to_string())
            ]
        );
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_blank_lines_are_empty_rows() {
        let rows = parse_space_delimited("TEMP DEWP\n41.2 38.0\n\n40.1 37.5\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec![("TEMP".to_string(), String::new())]);
        assert_eq!(rows[2][0], ("TEMP".to_string(), "40.1".to_string()));
    }

    #[test]
    fn test_short_report_line_shifts_sample_row() {
        let mut report = String::from("0123456789ABCDAY TEMP\n");
        report.push_str("short\n");
        for day in 0..400 {
            report.push_str(&format!("0123456789ABC{}   {}.5\n", day, day));
        }
        let fetcher = CannedReport(report);
        let row = log_sample_weather_data(&fetcher, "https://example.org/weather.txt")
            .unwrap()
            .expect("row 395 should exist");
        assert_eq!(row[0], ("DAY".to_string(), "394".to_string()));
    }

    #[test]
    fn test_sample_row_is_returned() {
        let mut report = String::from("0123456789ABCDAY TEMP\n");
        for day in 0..400 {
            report.push_str(&format!("0123456789ABC{}   {}.5\n", day, day));
        }
        let fetcher = CannedReport(report);
        let row = log_sample_weather_data(&fetcher, "https://example.org/weather.txt")
            .unwrap()
            .expect("row 395 should exist");
        assert_eq!(row[0], ("DAY".to_string(), "395".to_string()));
        assert_eq!(row[1], ("TEMP".to_string(), "395.5".to_string()));
    }

    #[test]
    fn test_short_report_has_no_sample_row() {
        let fetcher = CannedReport("0123456789ABCA B\n0123456789ABC1 2\n".to_string());
        let row = log_sample_weather_data(&fetcher, "https://example.org/weather.txt").unwrap();
        assert!(row.is_none());
    }
}
