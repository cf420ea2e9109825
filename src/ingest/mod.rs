/// Data acquisition for the charts.
///
/// Submodules:
/// - `fetch`: the `Fetcher` seam: HTTP for live runs, a directory of
///   saved files for offline replay.
/// - `cover`: cloud cover CSV rows into `CloudSample`s.
/// - `sun`: sunrise / sunset CSV rows into `SunEvent`s.
/// - `weather`: the legacy fixed-width weather report (debug only).

pub mod cover;
pub mod fetch;
pub mod sun;
pub mod weather;

pub use fetch::{DirectoryFetcher, Fetcher, HttpFetcher};
