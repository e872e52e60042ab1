//! Turns one feed snapshot into the dashboard's event list.
//!
//! A load is a single best-effort attempt. Fetch failures are logged and
//! reported as an empty list so every front end leaves its loading state.

use tracing::{debug, error, info, warn};

use crate::client::FeedSource;
use crate::impact::generate_impact_zone;
use crate::models::{Event, FeatureCollection};
use crate::rng::RandomSource;

/// Events at or below this magnitude are dropped by default.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 1.0;

/// Fetch once, filter, and attach impact zones.
///
/// Never fails: on a fetch failure the result is empty.
pub fn load_events<S, R>(source: &S, min_magnitude: f64, rng: &mut R) -> Vec<Event>
where
    S: FeedSource + ?Sized,
    R: RandomSource + ?Sized,
{
    match source.fetch() {
        Ok(feed) => {
            let events = events_from_feed(&feed, min_magnitude, rng);
            let title = feed.metadata.as_ref().map_or("untitled feed", |m| m.title.as_str());
            info!(
                kept = events.len(),
                total = feed.features.len(),
                "loaded {}",
                title
            );
            events
        }
        Err(e) => {
            error!(
                error = %e,
                fetch_failure = e.is_fetch_failure(),
                "failed to load earthquake feed"
            );
            Vec::new()
        }
    }
}

/// Keep features with a magnitude strictly above `min_magnitude`.
///
/// Each survivor gets its impact zone here, exactly once.
pub fn events_from_feed<R>(feed: &FeatureCollection, min_magnitude: f64, rng: &mut R) -> Vec<Event>
where
    R: RandomSource + ?Sized,
{
    feed.features
        .iter()
        .filter_map(|feature| {
            if let Err(e) = feature.validate() {
                warn!("skipping feature: {}", e);
                return None;
            }
            let Some(mag) = feature.properties.mag else {
                debug!(id = %feature.id, "skipping feature without magnitude");
                return None;
            };
            if mag <= min_magnitude {
                return None;
            }
            let zone = generate_impact_zone(feature.epicenter(), mag, rng);
            Some(Event::from_feature(feature, mag, zone))
        })
        .collect()
}
