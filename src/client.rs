//! USGS earthquake feed client.
//!
//! Provides blocking HTTP access to the USGS GeoJSON summary feeds.
//! Uses reqwest with rustls for TLS.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakeviewError;
use crate::models::FeatureCollection;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakeview/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
pub const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Minimum-magnitude tier of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLevel {
    All,
    Mag1,
    Mag25,
    Mag45,
    Significant,
}

impl FeedLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mag1 => "1.0",
            Self::Mag25 => "2.5",
            Self::Mag45 => "4.5",
            Self::Significant => "significant",
        }
    }
}

/// Time window of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedWindow {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedWindow {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// A USGS summary feed, written `<level>_<window>` (e.g. `all_day`, `2.5_week`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSpec {
    pub level: FeedLevel,
    pub window: FeedWindow,
}

impl Default for FeedSpec {
    fn default() -> Self {
        Self {
            level: FeedLevel::All,
            window: FeedWindow::Day,
        }
    }
}

impl fmt::Display for FeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.level.as_str(), self.window.as_str())
    }
}

impl std::str::FromStr for FeedSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let (level, window) = lower
            .rsplit_once('_')
            .ok_or_else(|| format!("unknown feed type: {s} (expected <level>_<window>)"))?;

        let level = match level {
            "all" => FeedLevel::All,
            "1.0" => FeedLevel::Mag1,
            "2.5" => FeedLevel::Mag25,
            "4.5" => FeedLevel::Mag45,
            "significant" => FeedLevel::Significant,
            _ => return Err(format!("unknown feed level: {level}")),
        };
        let window = match window {
            "hour" => FeedWindow::Hour,
            "day" => FeedWindow::Day,
            "week" => FeedWindow::Week,
            "month" => FeedWindow::Month,
            _ => return Err(format!("unknown feed window: {window}")),
        };

        Ok(Self { level, window })
    }
}

/// Anything that can produce one snapshot of the event feed.
///
/// The loader only ever calls `fetch` once per load.
pub trait FeedSource: Send + Sync {
    /// Fetch and structurally validate the feed.
    ///
    /// # Errors
    ///
    /// Returns a fetch failure if the feed cannot be retrieved or decoded.
    fn fetch(&self) -> Result<FeatureCollection, QuakeviewError>;
}

/// Client for a USGS summary feed.
pub struct UsgsClient {
    client: Client,
    base_url: String,
    feed: FeedSpec,
}

impl UsgsClient {
    /// Create a client for `feed` served from `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(feed: FeedSpec, base_url: Option<&str>) -> Result<Self, QuakeviewError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(USGS_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            feed,
        })
    }

    /// Full URL of the configured feed.
    #[must_use]
    pub fn feed_url(&self) -> String {
        format!(
            "{}/earthquakes/feed/v1.0/summary/{}.geojson",
            self.base_url, self.feed
        )
    }
}

impl FeedSource for UsgsClient {
    #[instrument(skip(self), fields(feed = %self.feed))]
    fn fetch(&self) -> Result<FeatureCollection, QuakeviewError> {
        let url = self.feed_url();
        debug!("fetching feed from {}", url);

        let response = self.client.get(&url).send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakeviewError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let feed: FeatureCollection = response.json()?;
        feed.validate()?;

        debug!("fetched {} features", feed.features.len());
        Ok(feed)
    }
}

/// In-memory feed for tests: a canned GeoJSON body or a canned failure.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub enum StaticFeed {
    Body(&'static str),
    Unavailable,
}

#[cfg(test)]
impl FeedSource for StaticFeed {
    fn fetch(&self) -> Result<FeatureCollection, QuakeviewError> {
        match self {
            Self::Body(json) => {
                let feed: FeatureCollection = serde_json::from_str(json)?;
                feed.validate()?;
                Ok(feed)
            }
            Self::Unavailable => Err(QuakeviewError::Api {
                status: 503,
                message: "service unavailable".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_spec_parse() {
        let spec: FeedSpec = "2.5_week".parse().expect("failed to parse");
        assert_eq!(spec.level, FeedLevel::Mag25);
        assert_eq!(spec.window, FeedWindow::Week);

        let spec: FeedSpec = "Significant_Month".parse().expect("failed to parse");
        assert_eq!(spec.to_string(), "significant_month");

        assert!("all".parse::<FeedSpec>().is_err());
        assert!("3.0_day".parse::<FeedSpec>().is_err());
        assert!("all_year".parse::<FeedSpec>().is_err());
    }

    #[test]
    fn test_default_feed_url() {
        let client = UsgsClient::new(FeedSpec::default(), None).expect("client");
        assert_eq!(
            client.feed_url(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let spec: FeedSpec = "4.5_hour".parse().expect("failed to parse");
        let client = UsgsClient::new(spec, Some("http://localhost:9000/")).expect("client");
        assert_eq!(
            client.feed_url(),
            "http://localhost:9000/earthquakes/feed/v1.0/summary/4.5_hour.geojson"
        );
    }

    #[test]
    fn test_unreachable_endpoint_is_fetch_failure() {
        let client = UsgsClient::new(FeedSpec::default(), Some("http://127.0.0.1:9")).expect("client");
        let err = client.fetch().expect_err("nothing listens on the discard port");
        assert!(err.is_fetch_failure());
    }
}
