//! Rendering-engine-agnostic map surface.
//!
//! The dashboard never draws anything itself. It issues commands through
//! [`MapSurface`]; a renderer (Leaflet in the browser, the terminal printer,
//! a test recorder) decides what they look like.

use serde::Serialize;

use crate::heat::HeatLayer;
use crate::models::{Event, LatLon};
use crate::severity::{MarkerIcon, SeverityBand};

/// Zoom level used when focusing a selected event.
pub const FOCUS_ZOOM: u8 = 9;

/// Duration of the fly-to animation when focusing an event.
pub const FOCUS_DURATION_SECS: f64 = 1.5;

/// Initial camera: the continental US.
pub const WORLD_VIEW: CameraTarget = CameraTarget {
    center: LatLon::new(37.09, -95.71),
    zoom: 4,
    duration_secs: 0.0,
};

/// Commands a map renderer must accept.
pub trait MapSurface {
    /// Replace every marker. Clicking a marker selects `Marker::id`.
    fn set_markers(&mut self, markers: Vec<Marker>);

    /// Show `polygon`, or remove the current one with `None`.
    fn set_polygon(&mut self, polygon: Option<PolygonOverlay>);

    /// Animate the camera.
    fn pan_to(&mut self, target: CameraTarget);

    /// Attach a heat layer, or detach the current one with `None`.
    fn set_heat_layer(&mut self, layer: Option<HeatLayer>);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub position: LatLon,
    pub icon: MarkerIcon,
    pub popup: String,
}

impl Marker {
    #[must_use]
    pub fn for_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            position: event.epicenter,
            icon: MarkerIcon::for_magnitude(event.magnitude),
            popup: format!("{}\nMag: {}", event.place, event.magnitude),
        }
    }
}

/// Stroke and fill attributes for an impact zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub weight: u8,
    pub dash_array: &'static str,
}

impl PolygonStyle {
    #[must_use]
    pub fn for_band(band: SeverityBand) -> Self {
        Self {
            color: band.color(),
            fill_color: band.color(),
            fill_opacity: 0.4,
            weight: 2,
            dash_array: "5, 10",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonOverlay {
    pub event_id: String,
    pub ring: Vec<LatLon>,
    pub style: PolygonStyle,
    pub popup_title: &'static str,
    pub popup_body: &'static str,
}

impl PolygonOverlay {
    /// Overlay for the event's cached impact zone.
    #[must_use]
    pub fn for_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            ring: event.impact_zone.points().to_vec(),
            style: PolygonStyle::for_band(SeverityBand::from_magnitude(event.magnitude)),
            popup_title: "⚠️ IMPACT ZONE",
            popup_body: "Avoid this area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    pub center: LatLon,
    pub zoom: u8,
    pub duration_secs: f64,
}

impl CameraTarget {
    /// Fly to an epicenter at street-level zoom.
    #[must_use]
    pub const fn focus(center: LatLon) -> Self {
        Self {
            center,
            zoom: FOCUS_ZOOM,
            duration_secs: FOCUS_DURATION_SECS,
        }
    }
}

/// A surface that just remembers what it was told to show.
///
/// Serialized as-is for the browser, which redraws from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub markers: Vec<Marker>,
    pub polygon: Option<PolygonOverlay>,
    pub camera: CameraTarget,
    pub heat: Option<HeatLayer>,
}

impl Default for MapScene {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            polygon: None,
            camera: WORLD_VIEW,
            heat: None,
        }
    }
}

impl MapSurface for MapScene {
    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    fn set_polygon(&mut self, polygon: Option<PolygonOverlay>) {
        self.polygon = polygon;
    }

    fn pan_to(&mut self, target: CameraTarget) {
        self.camera = target;
    }

    fn set_heat_layer(&mut self, layer: Option<HeatLayer>) {
        debug_assert!(
            layer.is_none() || self.heat.is_none(),
            "heat layer attached twice"
        );
        self.heat = layer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::generate_impact_zone;
    use crate::rng::SequenceRandom;

    #[test]
    fn test_overlay_uses_cached_zone_and_band_color() {
        let mut event = Event::fixture("us1", 5.4, 35.0, 139.0);
        event.impact_zone =
            generate_impact_zone(event.epicenter, event.magnitude, &mut SequenceRandom::constant(0.3));

        let overlay = PolygonOverlay::for_event(&event);
        assert_eq!(overlay.ring, event.impact_zone.points());
        assert_eq!(overlay.style.color, "#dc2626");
        assert_eq!(overlay.style.dash_array, "5, 10");
        assert!((overlay.style.fill_opacity - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_marker_for_event() {
        let marker = Marker::for_event(&Event::fixture("ci9", 1.5, 33.5, -116.5));
        assert_eq!(marker.id, "ci9");
        assert_eq!(marker.icon.color, "#ca8a04");
        assert!(marker.popup.ends_with("Mag: 1.5"));
    }

    #[test]
    fn test_scene_records_commands() {
        let mut scene = MapScene::default();
        assert_eq!(scene.camera, WORLD_VIEW);

        let target = CameraTarget::focus(LatLon::new(1.0, 2.0));
        scene.pan_to(target);
        assert_eq!(scene.camera.zoom, FOCUS_ZOOM);
        assert!((scene.camera.duration_secs - 1.5).abs() < f64::EPSILON);

        scene.set_heat_layer(Some(HeatLayer::from_events(&[])));
        assert!(scene.heat.is_some());
        scene.set_heat_layer(None);
        assert!(scene.heat.is_none());
    }
}
