/// City registry for the sunshine / cloud-cover charts.
///
/// Defines the canonical list of charted cities along with their data
/// URLs, display titles and container ids. This is the single source of
/// truth for city keys; all other modules should reference cities from
/// here rather than hardcoding URLs. Entries can be overridden or extended
/// from the `[[cities]]` table of the config file.

use serde::{Deserialize, Serialize};

use crate::model::ChartError;

// ---------------------------------------------------------------------------
// Legacy report
// ---------------------------------------------------------------------------

/// Fixed-width 2011 Portland weather report, used only by the sample-data
/// debug logger.
pub const PORTLAND_WEATHER_URL: &str = "https://gist.githubusercontent.com/jaronheard/700042270c68fece9043a4d406a74bfb/raw/bf52c81394c6ba32dda085ecf383775ce84d666d/portland2011weather.txt";

// ---------------------------------------------------------------------------
// City metadata
// ---------------------------------------------------------------------------

/// Static registry entry.
pub struct CityEntry {
    /// Short key used in logs, output file names and config overrides.
    pub key: &'static str,
    /// CSV with `Date` (`MM-DD-YYYY-HH:MM`) and `CloudCover` columns.
    pub cover_url: &'static str,
    /// CSV with `Date` (`MM-DD-YYYY`), `Sunrise` and `Sunset` columns.
    pub sun_url: &'static str,
    /// Heading shown above the chart.
    pub title: &'static str,
    /// Id of the `<svg>` container the chart is drawn into.
    pub container_id: &'static str,
}

/// All charted cities, in render order.
///
/// Data: 2011 hourly cloud cover and daily sunrise/sunset tables,
/// published as GitHub gists.
pub static CITY_REGISTRY: &[CityEntry] = &[
    CityEntry {
        key: "portland",
        cover_url: "https://gist.githubusercontent.com/jaronheard/99be6944675abdeb7b02e15f3430114c/raw/2d169f545a4d95762a500cd8b17418273eafa051/portland2011cloudcover.csv",
        sun_url: "https://gist.githubusercontent.com/jaronheard/0f7ed3b23e56d01fba20c2d4934ce645/raw/2783170b18313f6d9d2cd0fe750bfdbdfd1c56ea/portland2011sunrisesunset.csv",
        title: "🌤️ Portland Sunshine & Cloud Cover",
        container_id: "pdxViz",
    },
    CityEntry {
        key: "la",
        cover_url: "https://gist.githubusercontent.com/jaronheard/11178a52980eaa8d3f8066617cb34921/raw/0ad3046c3f480a709a02c0caccc7295a9c9f4dd8/la2011cloudcover.csv",
        sun_url: "https://gist.githubusercontent.com/jaronheard/b44a19296d197b2c9f78a8fc28a14629/raw/29ec51fbbe0c17962e258365c5585f86a770c4cb/la2011sunrisesunset.csv",
        title: "🌤️ Los Angeles Sunshine & Cloud Cover",
        container_id: "laViz",
    },
    CityEntry {
        key: "ny",
        cover_url: "https://gist.githubusercontent.com/jaronheard/9f3b768b63a94b29ebfccce5b13c74fe/raw/63041e04b341c5c826ef6d4e924bcfb3fd89dc06/ny2011cloudcover.csv",
        sun_url: "https://gist.githubusercontent.com/jaronheard/c9a7dc7666b88310802c1817f58d8c12/raw/9674f8af27eb1c9755b35631a2ad0af01e0f13ea/ny2011sunrisesunset.csv",
        title: "🌤️ New York Sunshine & Cloud Cover",
        container_id: "nyViz",
    },
];

/// Owned city description, as used by the pipeline and config overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub key: String,
    pub cover_url: String,
    pub sun_url: String,
    pub title: String,
    pub container_id: String,
}

impl From<&CityEntry> for City {
    fn from(entry: &CityEntry) -> Self {
        City {
            key: entry.key.to_string(),
            cover_url: entry.cover_url.to_string(),
            sun_url: entry.sun_url.to_string(),
            title: entry.title.to_string(),
            container_id: entry.container_id.to_string(),
        }
    }
}

/// Returns the registry as owned `City` values, in render order.
pub fn default_cities() -> Vec<City> {
    CITY_REGISTRY.iter().map(City::from).collect()
}

/// Applies config overrides on top of `base`: entries with a known key
/// replace that city in place, new keys are appended in the order given.
pub fn merge_cities(base: Vec<City>, overrides: &[City]) -> Vec<City> {
    let mut merged = base;
    for city in overrides {
        match merged.iter_mut().find(|c| c.key == city.key) {
            Some(existing) => *existing = city.clone(),
            None => merged.push(city.clone()),
        }
    }
    merged
}

/// Picks the cities named by `keys` out of `available`, in the order
/// requested. No keys selects every available city.
pub fn select_cities(available: Vec<City>, keys: &[String]) -> Result<Vec<City>, ChartError> {
    if keys.is_empty() {
        return Ok(available);
    }
    keys.iter()
        .map(|key| {
            available
                .iter()
                .find(|c| &c.key == key)
                .cloned()
                .ok_or_else(|| {
                    let known: Vec<&str> = available.iter().map(|c| c.key.as_str()).collect();
                    ChartError::UnknownCity(format!("{} (known: {})", key, known.join(", ")))
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
