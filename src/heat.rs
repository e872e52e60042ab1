//! Heat layer derived from the whole event list.

use serde::Serialize;

use crate::models::{Event, LatLon};

/// Magnitude that maps to full intensity.
const FULL_INTENSITY_MAGNITUDE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub position: LatLon,
    /// Weight in `[0, 1]`.
    pub intensity: f64,
}

/// Presentation parameters handed to the renderer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatStyle {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u8,
    /// Stops as `(position, css color)`.
    pub gradient: Vec<(f64, &'static str)>,
}

impl Default for HeatStyle {
    fn default() -> Self {
        Self {
            radius: 25,
            blur: 15,
            max_zoom: 10,
            gradient: vec![(0.4, "blue"), (0.65, "lime"), (1.0, "red")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub style: HeatStyle,
}

impl HeatLayer {
    /// One point per event, weighted by magnitude.
    #[must_use]
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            points: events
                .iter()
                .map(|e| HeatPoint {
                    position: e.epicenter,
                    intensity: intensity(e.magnitude),
                })
                .collect(),
            style: HeatStyle::default(),
        }
    }
}

/// Linear magnitude scaling, clamped so negative and huge values stay in range.
#[must_use]
pub fn intensity(magnitude: f64) -> f64 {
    (magnitude / FULL_INTENSITY_MAGNITUDE).clamp(0.0, 1.0)
}
