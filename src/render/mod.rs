/// Chart rendering.
///
/// Submodules:
/// - `svg`: ordered element tree and its markup.
/// - `color`: grey ramp for the cover marks.
/// - `shape`: path data for bands and lines.
/// - `axis`: month and time-of-day axes.
/// - `chart`: one city chart and its two drawing stages.
/// - `page`: SVG and HTML documents.

pub mod axis;
pub mod chart;
pub mod color;
pub mod page;
pub mod shape;
pub mod svg;

pub use chart::{Chart, XScale};
pub use svg::Element;
