//! Render pipeline
//!
//! Runs every city chart on its own worker thread: cover stage, then sun
//! stage. A failing stage is logged and ends that city's work, leaving its
//! chart as it stood; the other cities carry on. The run is summarized in
//! a serializable report.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::cities::City;
use crate::config::ChartSettings;
use crate::ingest::Fetcher;
use crate::logging::{self, Source};
use crate::model::ChartError;
use crate::render::{Chart, XScale};
use crate::timeline::{AmbientZone, UtcScale};

// ============================================================================
// Render Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    pub timestamp: String,
    pub shared_x_scale: bool,
    pub results: Vec<CityRenderResult>,
    pub summary: RenderSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSummary {
    pub total: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRenderResult {
    pub city: String,
    pub status: RenderStatus,
    pub cover_samples: usize,
    pub sun_events: usize,
    pub failed_stage: Option<Stage>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RenderStatus {
    /// Both stages drew.
    Success,
    /// Cover marks drew, the sun stage failed.
    Partial,
    /// Nothing drew.
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stage {
    Cover,
    Sun,
    Worker,
}

impl CityRenderResult {
    fn new(city: &str) -> Self {
        CityRenderResult {
            city: city.to_string(),
            status: RenderStatus::Failed,
            cover_samples: 0,
            sun_events: 0,
            failed_stage: None,
            error_message: None,
        }
    }

    /// Something was drawn for this city.
    pub fn rendered(&self) -> bool {
        self.status != RenderStatus::Failed
    }
}

impl RenderSummary {
    pub fn from_results(results: &[CityRenderResult]) -> Self {
        let count = |status: RenderStatus| results.iter().filter(|r| r.status == status).count();
        RenderSummary {
            total: results.len(),
            successful: count(RenderStatus::Success),
            partial: count(RenderStatus::Partial),
            failed: count(RenderStatus::Failed),
        }
    }

    /// Every city completed both stages.
    pub fn all_succeeded(&self) -> bool {
        self.successful == self.total
    }
}

/// Charts in city order, paired with their report.
pub struct RenderOutcome {
    pub charts: Vec<Chart>,
    pub report: RenderReport,
}

impl RenderOutcome {
    /// Charts that drew anything.
    pub fn rendered_charts(&self) -> Vec<&Chart> {
        self.charts
            .iter()
            .zip(&self.report.results)
            .filter(|(_, result)| result.rendered())
            .map(|(chart, _)| chart)
            .collect()
    }
}

// ============================================================================
// Per-city pipeline
// ============================================================================

/// Runs the cover stage and, if it succeeded, the sun stage.
pub fn render_city(chart: &mut Chart, fetcher: &dyn Fetcher) -> CityRenderResult {
    let key = chart.city().key.clone();
    let mut result = CityRenderResult::new(&key);

    match chart.load_cover(fetcher) {
        Ok(count) => {
            result.cover_samples = count;
            logging::info(Source::Cover, Some(&key), &format!("{} cover samples drawn", count));
        }
        Err(e) => {
            logging::log_fetch_failure(Source::Cover, &key, "cover load", &e);
            result.failed_stage = Some(Stage::Cover);
            result.error_message = Some(e.to_string());
            return result;
        }
    }

    match chart.load_sun(fetcher) {
        Ok(count) => {
            result.sun_events = count;
            result.status = RenderStatus::Success;
            logging::info(Source::Sun, Some(&key), &format!("{} sun events drawn", count));
        }
        Err(e) => {
            logging::log_fetch_failure(Source::Sun, &key, "sunrise/sunset load", &e);
            result.status = RenderStatus::Partial;
            result.failed_stage = Some(Stage::Sun);
            result.error_message = Some(e.to_string());
        }
    }

    result
}

// ============================================================================
// Full Render Runner
// ============================================================================

/// Renders every city concurrently, one worker per city.
pub fn render_all(
    cities: &[City],
    settings: &ChartSettings,
    zone: AmbientZone,
    fetcher: &(dyn Fetcher + Sync),
) -> RenderOutcome {
    let shared = settings
        .shared_x_scale
        .then(|| XScale::shared(settings.width()));

    let charts: Vec<Chart> = cities
        .iter()
        .map(|city| {
            let x = match &shared {
                Some(scale) => XScale::Shared(scale.clone()),
                None => XScale::Own(UtcScale::horizontal(settings.width())),
            };
            Chart::new(city.clone(), settings.clone(), zone, x)
        })
        .collect();

    logging::info(
        Source::Render,
        None,
        &format!("rendering {} charts", charts.len()),
    );

    let finished: Vec<(Chart, CityRenderResult)> = thread::scope(|scope| {
        let workers: Vec<_> = charts
            .into_iter()
            .map(|mut chart| {
                let city = chart.city().clone();
                let handle = scope.spawn(move || {
                    let result = render_city(&mut chart, fetcher);
                    (chart, result)
                });
                (city, handle)
            })
            .collect();

        workers
            .into_iter()
            .map(|(city, handle)| match handle.join() {
                Ok(done) => done,
                Err(_) => {
                    logging::error(Source::Render, Some(&city.key), "render worker panicked");
                    let mut result = CityRenderResult::new(&city.key);
                    result.failed_stage = Some(Stage::Worker);
                    result.error_message = Some("render worker panicked".to_string());
                    let x = XScale::Own(UtcScale::horizontal(settings.width()));
                    (Chart::new(city, settings.clone(), zone, x), result)
                }
            })
            .collect()
    });

    let (charts, results): (Vec<Chart>, Vec<CityRenderResult>) = finished.into_iter().unzip();
    let summary = RenderSummary::from_results(&results);

    RenderOutcome {
        charts,
        report: RenderReport {
            timestamp: Utc::now().to_rfc3339(),
            shared_x_scale: settings.shared_x_scale,
            results,
            summary,
        },
    }
}

pub const REPORT_FILE: &str = "render_report.json";

/// Writes the report as pretty JSON to `<dir>/render_report.json`.
pub fn write_report(dir: &Path, report: &RenderReport) -> Result<PathBuf, ChartError> {
    let path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json).map_err(|e| ChartError::IoError(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}

pub fn print_summary(report: &RenderReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 RENDER SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    for result in &report.results {
        match result.status {
            RenderStatus::Success => println!(
                "  {:<10} ✓ OK ({} cover samples, {} sun events)",
                result.city, result.cover_samples, result.sun_events
            ),
            RenderStatus::Partial => println!(
                "  {:<10} ⚠ Partial (cover only): {}",
                result.city,
                result.error_message.as_deref().unwrap_or("Unknown")
            ),
            RenderStatus::Failed => println!(
                "  {:<10} ✗ FAILED: {}",
                result.city,
                result.error_message.as_deref().unwrap_or("Unknown")
            ),
        }
    }
    println!();
    println!(
        "Charts: {}/{} complete, {} partial, {} failed",
        report.summary.successful, report.summary.total, report.summary.partial, report.summary.failed
    );
    println!("═══════════════════════════════════════════════════════════");
}
