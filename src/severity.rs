//! Magnitude classification and marker icons.
//!
//! Four fixed severity bands drive every color in the dashboard: list dots,
//! map markers, impact-zone polygons and terminal output.

use serde::Serialize;

/// Severity band derived from magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    /// mag < 1.0
    Minor,
    /// 1.0 <= mag < 3.0
    Moderate,
    /// 3.0 <= mag < 5.0
    Severe,
    /// mag >= 5.0
    Critical,
}

impl SeverityBand {
    /// Classify a magnitude. Total: NaN lands in `Minor`.
    #[must_use]
    pub fn from_magnitude(mag: f64) -> Self {
        match mag {
            m if m >= 5.0 => Self::Critical,
            m if m >= 3.0 => Self::Severe,
            m if m >= 1.0 => Self::Moderate,
            _ => Self::Minor,
        }
    }

    /// Display color (CSS hex).
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Critical => "#dc2626",
            Self::Severe => "#ea580c",
            Self::Moderate => "#ca8a04",
            Self::Minor => "#2563eb",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Severe => "SEVERE",
            Self::Moderate => "MODERATE",
            Self::Minor => "MINOR",
        }
    }

    /// Closest ANSI foreground color for terminal output.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Critical => "\x1b[91m",
            Self::Severe => "\x1b[38;5;208m",
            Self::Moderate => "\x1b[93m",
            Self::Minor => "\x1b[94m",
        }
    }
}

/// Marker glyph size in pixels (square).
const ICON_SIZE_PX: u16 = 14;

/// Visual descriptor for a map marker.
///
/// Renderers draw a filled circle of `color` with a white border; anchors are
/// pixel offsets from the glyph's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub color: &'static str,
    pub size: [u16; 2],
    pub anchor: [u16; 2],
    pub popup_anchor: [i16; 2],
    pub border: &'static str,
    pub shadow: &'static str,
}

impl MarkerIcon {
    #[must_use]
    pub fn for_magnitude(mag: f64) -> Self {
        Self {
            color: SeverityBand::from_magnitude(mag).color(),
            size: [ICON_SIZE_PX, ICON_SIZE_PX],
            anchor: [ICON_SIZE_PX / 2, ICON_SIZE_PX / 2],
            popup_anchor: [0, -10],
            border: "2px solid white",
            shadow: "0 0 4px rgba(0,0,0,0.5)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(SeverityBand::from_magnitude(0.999), SeverityBand::Minor);
        assert_eq!(SeverityBand::from_magnitude(1.0), SeverityBand::Moderate);
        assert_eq!(SeverityBand::from_magnitude(2.999), SeverityBand::Moderate);
        assert_eq!(SeverityBand::from_magnitude(3.0), SeverityBand::Severe);
        assert_eq!(SeverityBand::from_magnitude(4.999), SeverityBand::Severe);
        assert_eq!(SeverityBand::from_magnitude(5.0), SeverityBand::Critical);
        assert_eq!(SeverityBand::from_magnitude(9.5), SeverityBand::Critical);
    }

    #[test]
    fn test_band_is_monotonic() {
        let mut prev = SeverityBand::from_magnitude(-2.0);
        let mut m = -2.0;
        while m <= 10.0 {
            let band = SeverityBand::from_magnitude(m);
            assert!(band >= prev, "severity dropped at magnitude {m}");
            prev = band;
            m += 0.01;
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(SeverityBand::from_magnitude(f64::NAN), SeverityBand::Minor);
        assert_eq!(SeverityBand::from_magnitude(-1.0), SeverityBand::Minor);
        assert_eq!(
            SeverityBand::from_magnitude(f64::INFINITY),
            SeverityBand::Critical
        );
    }

    #[test]
    fn test_icon_uses_band_color() {
        let icon = MarkerIcon::for_magnitude(5.2);
        assert_eq!(icon.color, "#dc2626");
        assert_eq!(icon.size, [14, 14]);
        assert_eq!(icon.anchor, [7, 7]);
        assert_eq!(icon.popup_anchor, [0, -10]);
        assert_eq!(MarkerIcon::for_magnitude(0.3).color, "#2563eb");
    }
}
