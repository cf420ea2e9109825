//! Cloud cover and sunrise/sunset band charts for Portland, Los Angeles
//! and New York.
//!
//! Each city chart is built by two sequential stages: the cover loader
//! (fetch, quantize, one rectangle per sample) and the sun band renderer
//! (two area bands and two boundary lines). The finished element trees
//! are written out as SVG documents and a single HTML page.

pub mod cities;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod numeric;
pub mod pipeline;
pub mod render;
pub mod timeline;
