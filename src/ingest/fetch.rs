/// Remote text retrieval.
///
/// The chart pipeline only needs "give me the body at this URL". Keeping
/// that behind a trait lets the binary choose between the live gist host
/// and a directory of previously downloaded files, and lets tests serve
/// canned CSV without a network.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::ChartError;

/// Something that can turn a URL into a response body.
pub trait Fetcher {
    fn fetch_text(&self, url: &str) -> Result<String, ChartError>;
}

// ============================================================================
// HTTP
// ============================================================================

/// Blocking HTTP fetcher for the gist-hosted data files.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ChartError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, ChartError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/csv, text/plain")
            .send()?;

        if !response.status().is_success() {
            return Err(ChartError::HttpError(response.status().as_u16()));
        }

        Ok(response.text()?)
    }
}

// ============================================================================
// Offline replay
// ============================================================================

/// Serves URLs from a local directory, keyed by the URL's last path
/// segment (`.../portland2011cloudcover.csv` ->
/// `<root>/portland2011cloudcover.csv`).
///
/// Use this when the gist host is unreachable or to pin a data snapshot.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryFetcher { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path a URL is served from.
    pub fn path_for(&self, url: &str) -> Result<PathBuf, ChartError> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let name = without_query
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| ChartError::IoError(format!("no file name in URL {}", url)))?;
        Ok(self.root.join(name))
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, ChartError> {
        let path = self.path_for(url)?;
        fs::read_to_string(&path)
            .map_err(|e| ChartError::IoError(format!("{}: {}", path.display(), e)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_fetcher_maps_last_segment() {
        let fetcher = DirectoryFetcher::new("/data/2011");
        let path = fetcher
            .path_for("https://gist.githubusercontent.com/u/abc/raw/def/la2011cloudcover.csv")
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/2011/la2011cloudcover.csv"));
    }

    #[test]
    fn test_directory_fetcher_ignores_query_string() {
        let fetcher = DirectoryFetcher::new("cache");
        let path = fetcher.path_for("https://example.org/ny.csv?raw=1").unwrap();
        assert_eq!(path, PathBuf::from("cache/ny.csv"));
    }

    #[test]
    fn test_directory_fetcher_rejects_url_without_file_name() {
        let fetcher = DirectoryFetcher::new("cache");
        assert!(fetcher.path_for("https://example.org/").is_err());
    }

    #[test]
    fn test_directory_fetcher_reads_file() {
        let dir = std::env::temp_dir().join(format!("sunshine_fetch_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cover.csv"), "Date,CloudCover\n").unwrap();

        let fetcher = DirectoryFetcher::new(&dir);
        let body = fetcher.fetch_text("https://example.org/raw/cover.csv").unwrap();
        assert_eq!(body, "Date,CloudCover\n");

        let missing = fetcher.fetch_text("https://example.org/raw/absent.csv");
        assert!(matches!(missing, Err(ChartError::IoError(_))));

        fs::remove_dir_all(&dir).ok();
    }
}
