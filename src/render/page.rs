/// Output documents: one standalone SVG per chart and an HTML page that
/// holds every chart container under its title.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cities::City;
use crate::model::ChartError;
use crate::render::chart::Chart;
use crate::render::svg::escape;

pub const PAGE_FILE: &str = "index.html";

const STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 2em; }
h2 { font-weight: normal; }
.sunriseareapath { fill: #fdd835; fill-opacity: 0.35; stroke: none; }
.sunriseline { fill: none; stroke: #f9a825; stroke-width: 1.5px; }
";

/// Standalone SVG document for one chart.
pub fn chart_svg(chart: &Chart) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
        chart.to_element().to_markup()
    )
}

/// File name of a city's SVG document.
pub fn svg_file_name(city: &City) -> String {
    format!("{}.svg", city.key)
}

/// The page with one titled container per chart, in the order given.
pub fn page_html(charts: &[&Chart]) -> String {
    let mut body = String::new();
    for chart in charts {
        body.push_str(&format!(
            "<section class=\"city\">\n<h2>{}</h2>\n{}\n</section>\n",
            escape(&chart.city().title),
            chart.to_element().to_markup()
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Sunshine &amp; Cloud Cover</title>\n<style>\n{}</style>\n</head>\n\
         <body>\n{}</body>\n</html>\n",
        STYLESHEET, body
    )
}

fn write_file(path: &Path, content: &str) -> Result<(), ChartError> {
    fs::write(path, content)
        .map_err(|e| ChartError::IoError(format!("{}: {}", path.display(), e)))
}

/// Writes `<dir>/<city>.svg` for each chart in `svg_charts` and
/// `<dir>/index.html` holding every chart in `page_charts`. Returns the
/// paths written.
pub fn write_documents(
    dir: &Path,
    svg_charts: &[&Chart],
    page_charts: &[&Chart],
) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(dir)
        .map_err(|e| ChartError::IoError(format!("{}: {}", dir.display(), e)))?;

    let mut written = Vec::new();
    for chart in svg_charts {
        let path = dir.join(svg_file_name(chart.city()));
        write_file(&path, &chart_svg(chart))?;
        written.push(path);
    }

    let page = dir.join(PAGE_FILE);
    write_file(&page, &page_html(page_charts))?;
    written.push(page);

    Ok(written)
}
