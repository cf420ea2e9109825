/// Core data types for the cloud cover / sunshine charts.
///
/// This module defines the shared domain model imported by all other
/// modules: the parsed CSV rows and the single error type. The only logic
/// here is the cloud-cover quantization, since it defines what a
/// `CloudSample` holds.

use chrono::{DateTime, NaiveDate, Utc};

use crate::numeric::js_round;

// ---------------------------------------------------------------------------
// Quantization constants
// ---------------------------------------------------------------------------

/// Number of grey buckets the cover readings are rounded into.
pub const CLOUD_CHUNKS: f64 = 4.0;

/// Divisor the bucket width is derived from. The readings are percentages
/// (0-100) but the bucket width is computed against 200, so 100% cover
/// lands in the "100" bucket and only readings >= 125 reach "150".
/// Kept as-is: the grey ramp downstream is tuned to these values.
pub const CLOUD_SCALE: f64 = 200.0;

/// Returns the bucketed cover value for a raw percentage.
///
/// `round(raw / (200 / 4)) * (200 / 4)`, rounding half toward positive
/// infinity. `None` in, `None` out.
pub fn quantize_cloud(raw: Option<i64>) -> Option<i64> {
    let raw = raw?;
    let bucket = CLOUD_SCALE / CLOUD_CHUNKS;
    Some((js_round(raw as f64 / bucket) * bucket) as i64)
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One timestamped cloud-cover reading from the cover CSV.
///
/// The same `Date` string is read twice: once as UTC (`utc_time`, used for
/// the vertical time-of-day position) and once as ambient local wall time
/// (`local_time`, used for the horizontal date position). Either may be
/// `None` when the string does not parse; such samples render at an
/// undefined position rather than being dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudSample {
    pub raw_timestamp: String,
    pub cloud_percent: Option<i64>,
    pub quantized_cloud: Option<i64>,
    pub utc_time: Option<DateTime<Utc>>,
    pub local_time: Option<DateTime<Utc>>,
}

/// One calendar day of sunrise / sunset times from the sun CSV.
///
/// `day` has no time component; it is placed on the x-axis at local
/// midnight of the ambient zone. `sunrise` and `sunset` are UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct SunEvent {
    pub day: Option<NaiveDate>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching, parsing or writing chart data.
///
/// Any of these is fatal to the city pipeline that raised it; the other
/// cities keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Non-2xx HTTP response from the data host.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    RequestError(String),
    /// The response body could not be decoded into rows.
    ParseError(String),
    /// Reading a local data file or writing an output file failed.
    IoError(String),
    /// The configuration file or environment is invalid.
    ConfigError(String),
    /// A city key that is not in the registry.
    UnknownCity(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::HttpError(code) => write!(f, "HTTP error: {}", code),
            ChartError::RequestError(msg) => write!(f, "Request failed: {}", msg),
            ChartError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ChartError::IoError(msg) => write!(f, "I/O error: {}", msg),
            ChartError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            ChartError::UnknownCity(key) => write!(f, "Unknown city: {}", key),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<reqwest::Error> for ChartError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ChartError::HttpError(status.as_u16()),
            None => ChartError::RequestError(err.to_string()),
        }
    }
}

impl From<csv::Error> for ChartError {
    fn from(err: csv::Error) -> Self {
        ChartError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ChartError {
    fn from(err: toml::de::Error) -> Self {
        ChartError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::IoError(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantization_stays_in_bucket_set() {
        for raw in 0..=100 {
            let q = quantize_cloud(Some(raw)).expect("valid raw should quantize");
            assert!(
                [0, 50, 100, 150].contains(&q),
                "raw {} quantized to {}, outside the bucket set",
                raw,
                q
            );
        }
    }

    #[test]
    fn test_quantization_is_monotonic() {
        let mut previous = i64::MIN;
        for raw in 0..=100 {
            let q = quantize_cloud(Some(raw)).unwrap();
            assert!(q >= previous, "quantization decreased at raw {}", raw);
            previous = q;
        }
    }

    #[test]
    fn test_quantization_bucket_edges() {
        // Half-way points round up, like Math.round.
        assert_eq!(quantize_cloud(Some(24)), Some(0));
        assert_eq!(quantize_cloud(Some(25)), Some(50));
        assert_eq!(quantize_cloud(Some(37)), Some(50));
        assert_eq!(quantize_cloud(Some(74)), Some(50));
        assert_eq!(quantize_cloud(Some(75)), Some(100));
        assert_eq!(quantize_cloud(Some(100)), Some(100));
        // Out-of-range readings are not clamped.
        assert_eq!(quantize_cloud(Some(125)), Some(150));
        assert_eq!(quantize_cloud(Some(-25)), Some(0));
    }

    #[test]
    fn test_quantization_of_invalid_reading() {
        assert_eq!(quantize_cloud(None), None);
    }

    #[test]
    fn test_error_display_matches_classification_patterns() {
        // logging::classify_fetch_failure keys off these prefixes.
        assert_eq!(ChartError::HttpError(404).to_string(), "HTTP error: 404");
        assert!(ChartError::ParseError("bad row".into()).to_string().starts_with("Parse error"));
    }
}
