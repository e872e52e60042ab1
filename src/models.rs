//! Data models for the USGS GeoJSON feed and the in-memory event list.
//!
//! The wire structures only keep the fields the dashboard reads; everything
//! else in the USGS payload is ignored by serde.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::QuakeviewError;
use crate::impact::ImpactZone;

/// Place shown when the feed omits one.
pub const UNKNOWN_PLACE: &str = "Unknown location";

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Earthquake events
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), QuakeviewError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakeviewError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    pub title: String,
}

/// A single earthquake as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Unique event ID
    pub id: String,

    pub geometry: Geometry,

    pub properties: Properties,
}

impl Feature {
    /// Validate the event structure.
    pub fn validate(&self) -> Result<(), QuakeviewError> {
        if self.id.is_empty() {
            return Err(QuakeviewError::Validation("empty event ID".into()));
        }
        if self.geometry.coordinates.len() < 2 {
            return Err(QuakeviewError::Validation(format!(
                "event {}: expected at least 2 coordinates, got {}",
                self.id,
                self.geometry.coordinates.len()
            )));
        }
        Ok(())
    }

    /// Epicenter from the `[longitude, latitude, depth]` coordinate triple.
    #[must_use]
    pub fn epicenter(&self) -> LatLon {
        let coords = &self.geometry.coordinates;
        LatLon::new(
            coords.get(1).copied().unwrap_or(0.0),
            coords.first().copied().unwrap_or(0.0),
        )
    }

    /// Depth in kilometers (positive down).
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.geometry.coordinates.get(2).copied().unwrap_or(0.0)
    }

    /// Event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// The subset of USGS event properties the dashboard uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    pub mag: Option<f64>,

    pub place: Option<String>,

    /// Event time (ms since epoch)
    #[serde(default)]
    pub time: Option<i64>,

    /// Event page URL
    #[serde(default)]
    pub url: Option<String>,
}

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar distance in degrees, ignoring projection distortion.
    #[must_use]
    pub fn degree_distance(self, other: Self) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

/// An earthquake in the dashboard's event list.
///
/// Built once per fetch by the loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub place: String,
    pub magnitude: f64,
    pub epicenter: LatLon,
    pub depth_km: f64,
    pub time: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub impact_zone: ImpactZone,
}

impl Event {
    /// Build an event from a validated feature and its magnitude.
    #[must_use]
    pub fn from_feature(feature: &Feature, magnitude: f64, impact_zone: ImpactZone) -> Self {
        Self {
            id: feature.id.clone(),
            place: feature
                .properties
                .place
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            magnitude,
            epicenter: feature.epicenter(),
            depth_km: feature.depth_km(),
            time: feature.time(),
            url: feature.properties.url.clone(),
            impact_zone,
        }
    }
}

#[cfg(test)]
impl Event {
    /// Minimal event at `(lat, lon)` with an empty impact zone.
    pub fn fixture(id: &str, magnitude: f64, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            place: format!("Near {id}"),
            magnitude,
            epicenter: LatLon::new(lat, lon),
            depth_km: 10.0,
            time: None,
            url: None,
            impact_zone: ImpactZone::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_feed() {
        let json = include_str!("../tools/sample_all_day.json");
        let feed: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.features.len(), 4);
        assert_eq!(
            feed.metadata.as_ref().map(|m| m.title.as_str()),
            Some("USGS All Earthquakes, Past Day")
        );

        let first = &feed.features[0];
        first.validate().expect("invalid feature");
        let epicenter = first.epicenter();
        assert!((epicenter.lat - 35.6895).abs() < 1e-9);
        assert!((epicenter.lon - 139.6917).abs() < 1e-9);
        assert!(first.time().is_some());
    }

    #[test]
    fn test_rejects_wrong_collection_type() {
        let feed: FeatureCollection =
            serde_json::from_str(r#"{"type":"Feature","features":[]}"#).unwrap();
        assert!(feed.validate().is_err());
    }

    #[test]
    fn test_feature_without_coordinates_is_invalid() {
        let feature: Feature = serde_json::from_str(
            r#"{"id":"x1","geometry":{"coordinates":[12.0]},"properties":{"mag":2.0}}"#,
        )
        .unwrap();
        assert!(matches!(
            feature.validate(),
            Err(QuakeviewError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_place_falls_back() {
        let feature: Feature = serde_json::from_str(
            r#"{"id":"x2","geometry":{"coordinates":[1.0,2.0,3.0]},"properties":{"mag":2.0,"place":null}}"#,
        )
        .unwrap();
        let event = Event::from_feature(&feature, 2.0, ImpactZone::default());
        assert_eq!(event.place, UNKNOWN_PLACE);
        assert_eq!(event.epicenter, LatLon::new(2.0, 1.0));
        assert!((event.depth_km - 3.0).abs() < f64::EPSILON);
    }
}
