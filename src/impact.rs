//! Impact-zone polygons.
//!
//! A jagged ring around the epicenter whose size scales with magnitude. It is
//! purely cosmetic: no attenuation model, no geodesic math. Each event gets
//! its zone once, at load time, and keeps it for its whole lifetime so the
//! shape never changes between renders.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::models::LatLon;
use crate::rng::RandomSource;

/// Number of vertices in every impact zone.
pub const IMPACT_ZONE_VERTICES: usize = 12;

/// Base radius in degrees per unit of magnitude (M5 ≈ 0.2°).
pub const DEGREES_PER_MAGNITUDE: f64 = 0.04;

/// Smallest per-vertex radius multiplier.
pub const MIN_VARIANCE: f64 = 0.7;

/// Largest per-vertex radius multiplier.
pub const MAX_VARIANCE: f64 = 1.3;

/// Ordered ring of vertices; closure is left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImpactZone {
    points: Vec<LatLon>,
}

impl ImpactZone {
    #[must_use]
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest vertex distance from `center`, in degrees.
    #[must_use]
    pub fn max_radius(&self, center: LatLon) -> f64 {
        self.points
            .iter()
            .map(|p| p.degree_distance(center))
            .fold(0.0, f64::max)
    }
}

/// Base radius for a magnitude, in degrees. Non-positive magnitudes collapse to 0.
#[must_use]
pub fn base_radius(magnitude: f64) -> f64 {
    magnitude.max(0.0) * DEGREES_PER_MAGNITUDE
}

/// Generate an irregular ring around `epicenter`.
///
/// Vertex `i` sits at angle `i/N · 2π` with radius `base · variance`, the
/// variance drawn independently per vertex from `[0.7, 1.3)`. Not idempotent:
/// two calls with a live source give different shapes.
pub fn generate_impact_zone<R: RandomSource + ?Sized>(
    epicenter: LatLon,
    magnitude: f64,
    rng: &mut R,
) -> ImpactZone {
    let base = base_radius(magnitude);

    #[allow(clippy::cast_precision_loss)]
    let points = (0..IMPACT_ZONE_VERTICES)
        .map(|i| {
            let angle = (i as f64 / IMPACT_ZONE_VERTICES as f64) * TAU;
            let variance = MIN_VARIANCE + rng.next_unit() * (MAX_VARIANCE - MIN_VARIANCE);
            let r = base * variance;
            LatLon::new(
                epicenter.lat + r * angle.cos(),
                epicenter.lon + r * angle.sin(),
            )
        })
        .collect();

    ImpactZone { points }
}
