use std::process::ExitCode;

use sunshine_viz::cities::PORTLAND_WEATHER_URL;
use sunshine_viz::config::AppConfig;
use sunshine_viz::ingest::weather::log_sample_weather_data;
use sunshine_viz::ingest::{DirectoryFetcher, Fetcher, HttpFetcher};
use sunshine_viz::logging::{self, Source};
use sunshine_viz::model::ChartError;
use sunshine_viz::pipeline::{print_summary, render_all, write_report};
use sunshine_viz::render::Chart;
use sunshine_viz::render::page::write_documents;

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(config.log_level, config.log_file.as_deref(), false);

    let city_keys: Vec<String> = std::env::args().skip(1).collect();

    match run(&config, &city_keys) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            logging::error(Source::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Renders the selected cities and writes the documents. `Ok(false)` if
/// any city failed.
fn run(config: &AppConfig, city_keys: &[String]) -> Result<bool, ChartError> {
    let chart_settings = &config.file.chart;
    let zone = chart_settings.zone()?;
    let cities = config.selected_cities(city_keys)?;

    let fetcher: Box<dyn Fetcher + Sync> = match config.file.fetch.offline_dir {
        Some(ref dir) => {
            logging::info(Source::System, None, &format!("serving data from {}", dir));
            Box::new(DirectoryFetcher::new(dir))
        }
        None => Box::new(HttpFetcher::new(config.file.fetch.timeout())?),
    };

    if config.file.log_sample_weather {
        if let Err(e) = log_sample_weather_data(fetcher.as_ref(), PORTLAND_WEATHER_URL) {
            logging::log_fetch_failure(Source::Weather, "portland", "weather sample", &e);
        }
    }

    let outcome = render_all(&cities, chart_settings, zone, fetcher.as_ref());

    let all_charts: Vec<&Chart> = outcome.charts.iter().collect();
    let written = write_documents(&config.output_dir, &outcome.rendered_charts(), &all_charts)?;
    let report_path = write_report(&config.output_dir, &outcome.report)?;
    for path in written.iter().chain(std::iter::once(&report_path)) {
        logging::debug(Source::Render, None, &format!("wrote {}", path.display()));
    }

    let summary = &outcome.report.summary;
    logging::log_render_summary(summary.total, summary.successful, summary.partial, summary.failed);
    print_summary(&outcome.report);

    Ok(summary.all_succeeded())
}
