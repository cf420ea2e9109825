/// Live checks against the gist-hosted data files
///
/// These tests verify:
/// 1. Every registered cover and sunrise/sunset URL answers and parses
/// 2. The legacy weather report still has a row 395
///
/// Prerequisites:
/// - Internet connectivity to reach gist.githubusercontent.com
///
/// Run with: cargo test --test live_sources -- --ignored
///
/// Note: These tests make real HTTP calls and may fail if the gists are
/// removed or the host is rate-limiting.

use std::time::Duration;

use sunshine_viz::cities::{CITY_REGISTRY, PORTLAND_WEATHER_URL};
use sunshine_viz::ingest::cover::parse_cover_csv;
use sunshine_viz::ingest::sun::parse_sun_csv;
use sunshine_viz::ingest::weather::log_sample_weather_data;
use sunshine_viz::ingest::{Fetcher, HttpFetcher};
use sunshine_viz::timeline::AmbientZone;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(30)).expect("failed to build HTTP client")
}

#[test]
#[ignore]
fn test_cover_files_parse() {
    let http = fetcher();
    for city in CITY_REGISTRY {
        let body = http
            .fetch_text(city.cover_url)
            .unwrap_or_else(|e| panic!("{} cover fetch failed: {}", city.key, e));
        let samples = parse_cover_csv(&body, AmbientZone::utc())
            .unwrap_or_else(|e| panic!("{} cover parse failed: {}", city.key, e));

        let valid = samples.iter().filter(|s| s.utc_time.is_some()).count();
        println!("{}: {} samples ({} with valid time)", city.key, samples.len(), valid);
        assert!(valid > 0, "{} has no valid timestamps", city.key);
    }
}

#[test]
#[ignore]
fn test_sun_files_parse() {
    let http = fetcher();
    for city in CITY_REGISTRY {
        let body = http
            .fetch_text(city.sun_url)
            .unwrap_or_else(|e| panic!("{} sun fetch failed: {}", city.key, e));
        let events = parse_sun_csv(&body)
            .unwrap_or_else(|e| panic!("{} sun parse failed: {}", city.key, e));

        let valid = events.iter().filter(|e| e.day.is_some()).count();
        println!("{}: {} sun events ({} with valid day)", city.key, events.len(), valid);
        assert!(valid > 0, "{} has no valid days", city.key);
    }
}

#[test]
#[ignore]
fn test_weather_report_sample_row() {
    let row = log_sample_weather_data(&fetcher(), PORTLAND_WEATHER_URL)
        .expect("weather report fetch or parse failed");
    assert!(row.is_some(), "weather report has no row 395");
}
