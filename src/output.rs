//! Terminal rendering of the list pane, the detail pane and map commands.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats for the
//! list; the detail pane and map commands are human-only.

use std::io::{self, Write};

use serde::Serialize;

use crate::heat::HeatLayer;
use crate::map::{CameraTarget, MapSurface, Marker, PolygonOverlay};
use crate::models::{Event, LatLon};
use crate::posts::MockPost;
use crate::severity::SeverityBand;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const OFFICIAL: &str = "\x1b[96m";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Flattened event for machine-readable output.
#[derive(Debug, Serialize)]
struct OutputEvent<'a> {
    id: &'a str,
    place: &'a str,
    magnitude: f64,
    severity: SeverityBand,
    color: &'static str,
    latitude: f64,
    longitude: f64,
    depth_km: f64,
    time: Option<String>,
    url: Option<&'a str>,
    impact_zone: &'a [LatLon],
}

impl<'a> From<&'a Event> for OutputEvent<'a> {
    fn from(e: &'a Event) -> Self {
        let band = SeverityBand::from_magnitude(e.magnitude);
        Self {
            id: &e.id,
            place: &e.place,
            magnitude: e.magnitude,
            severity: band,
            color: band.color(),
            latitude: e.epicenter.lat,
            longitude: e.epicenter.lon,
            depth_km: e.depth_km,
            time: e.time.map(|t| t.to_rfc3339()),
            url: e.url.as_deref(),
            impact_zone: e.impact_zone.points(),
        }
    }
}

fn format_time(event: &Event) -> String {
    event
        .time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// Write the list pane: one numbered, color-coded line per event.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, events: &[Event]) -> io::Result<()> {
    if events.is_empty() {
        return writeln!(writer, "{DIM}No earthquakes to show.{RESET}");
    }
    writeln!(writer, "{BOLD}Live Incidents ({}){RESET}", events.len())?;
    for (idx, event) in events.iter().enumerate() {
        let band = SeverityBand::from_magnitude(event.magnitude);
        let color = band.ansi();
        let label = band.label();
        writeln!(
            writer,
            "{DIM}{n:>3}{RESET} {color}●{RESET} {color}{BOLD}M{mag:.1}{RESET} │ \
             {color}{label:8}{RESET} │ \
             {DIM}{depth:>5.0}km{RESET} │ \
             {time} UTC │ \
             {place}",
            n = idx + 1,
            mag = event.magnitude,
            depth = event.depth_km,
            time = format_time(event),
            place = event.place,
        )?;
    }
    Ok(())
}

/// Write events as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, events: &[Event]) -> io::Result<()> {
    let output: Vec<OutputEvent<'_>> = events.iter().map(OutputEvent::from).collect();
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write events as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, events: &[Event]) -> io::Result<()> {
    for event in events {
        let json = serde_json::to_string(&OutputEvent::from(event))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write events in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events<W: Write>(writer: &mut W, events: &[Event], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, events),
        Format::Json => write_json(writer, events),
        Format::Ndjson => write_ndjson(writer, events),
    }
}

/// Write the detail pane: event header followed by the social feed.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_detail<W: Write>(writer: &mut W, event: &Event, posts: &[MockPost]) -> io::Result<()> {
    let band = SeverityBand::from_magnitude(event.magnitude);
    let color = band.ansi();
    writeln!(writer, "{DIM}← back (b){RESET}")?;
    writeln!(writer, "{BOLD}{}{RESET}", event.place)?;
    writeln!(
        writer,
        "{color}{BOLD}M{:.1}{RESET} {color}{}{RESET} {DIM}│ {:.0}km deep │ {} UTC │ {}{RESET}",
        event.magnitude,
        band.label(),
        event.depth_km,
        format_time(event),
        event.id,
    )?;
    if let Some(url) = &event.url {
        writeln!(writer, "{DIM}{url}{RESET}")?;
    }
    if !event.impact_zone.is_empty() {
        writeln!(
            writer,
            "Impact zone: {} vertices, up to {:.2}° from the epicenter",
            event.impact_zone.len(),
            event.impact_zone.max_radius(event.epicenter)
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "{BOLD}Live Social Updates{RESET}")?;
    for post in posts {
        let handle_color = if post.official { OFFICIAL } else { BOLD };
        writeln!(
            writer,
            "  {handle_color}{}{RESET} {DIM}{}{RESET}",
            post.handle, post.posted_ago
        )?;
        writeln!(writer, "  {}", post.body)?;
    }
    Ok(())
}

/// Prints map commands as they arrive, for front ends without a real map.
pub struct TerminalMap<W: Write> {
    writer: W,
}

impl<W: Write> TerminalMap<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.writer, "{DIM}[map]{RESET} {line}") {
            tracing::warn!("failed to write map command: {}", e);
        }
    }
}

impl<W: Write> MapSurface for TerminalMap<W> {
    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.emit(format_args!("{} markers placed", markers.len()));
    }

    fn set_polygon(&mut self, polygon: Option<PolygonOverlay>) {
        match polygon {
            Some(p) => self.emit(format_args!(
                "{} {} vertices, {} ({})",
                p.popup_title,
                p.ring.len(),
                p.style.color,
                p.popup_body
            )),
            None => self.emit(format_args!("impact zone cleared")),
        }
    }

    fn pan_to(&mut self, target: CameraTarget) {
        self.emit(format_args!(
            "flying to {:.3}, {:.3} (zoom {}, {}s)",
            target.center.lat, target.center.lon, target.zoom, target.duration_secs
        ));
    }

    fn set_heat_layer(&mut self, layer: Option<HeatLayer>) {
        match layer {
            Some(l) => self.emit(format_args!("heat layer on ({} points)", l.points.len())),
            None => self.emit(format_args!("heat layer off")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::generate_impact_zone;
    use crate::posts::generate_posts;
    use crate::rng::SequenceRandom;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_human_list() {
        let events = [
            Event::fixture("a", 5.2, 1.0, 2.0),
            Event::fixture("b", 1.4, 3.0, 4.0),
        ];
        let out = render(|w| write_human(w, &events));
        assert!(out.contains("Live Incidents (2)"));
        assert!(out.contains("CRITICAL"));
        assert!(out.contains("Near b"));
        assert!(render(|w| write_human(w, &[])).contains("No earthquakes"));
    }

    #[test]
    fn test_ndjson_lines() {
        let events = [
            Event::fixture("a", 3.1, 1.0, 2.0),
            Event::fixture("b", 0.9, 3.0, 4.0),
        ];
        let out = render(|w| write_ndjson(w, &events));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["severity"], "severe");
        assert_eq!(first["color"], "#ea580c");
        assert_eq!(first["latitude"], 1.0);
    }

    #[test]
    fn test_detail_pane() {
        let event = Event::fixture("x", 5.0, 35.0, 139.0);
        let posts = generate_posts("Tokyo, Japan", 5.0, &mut SequenceRandom::constant(0.0));
        let out = render(|w| write_detail(w, &event, &posts));
        assert!(out.contains("Live Social Updates"));
        assert!(out.contains("@GeoMonitor"));
        assert!(out.contains("#Earthquake"));
    }

    #[test]
    fn test_detail_reports_zone_only_when_present() {
        let mut event = Event::fixture("x", 5.0, 0.0, 0.0);
        let out = render(|w| write_detail(w, &event, &[]));
        assert!(!out.contains("Impact zone"));

        event.impact_zone =
            generate_impact_zone(event.epicenter, event.magnitude, &mut SequenceRandom::constant(0.0));
        let out = render(|w| write_detail(w, &event, &[]));
        assert!(out.contains("Impact zone: 12 vertices, up to 0.14°"));
    }

    #[test]
    fn test_terminal_map_commands() {
        let mut buf = Vec::new();
        {
            let mut map = TerminalMap::new(&mut buf);
            map.pan_to(CameraTarget::focus(LatLon::new(35.0, 139.0)));
            map.set_polygon(None);
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("flying to 35.000, 139.000 (zoom 9, 1.5s)"));
        assert!(out.contains("impact zone cleared"));
    }
}
