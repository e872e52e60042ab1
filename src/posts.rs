//! Mock social feed for the detail pane.
//!
//! Nothing here talks to a real network. Posts are rebuilt from the place and
//! magnitude every time a detail pane renders; only the hashtag is random.

use serde::Serialize;

use crate::rng::RandomSource;

/// Hashtags the citizen post picks from.
pub const HASHTAGS: [&str; 4] = ["#Earthquake", "#Emergency", "#SOS", "#Safety"];

/// A synthetic post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockPost {
    pub handle: &'static str,
    pub body: String,
    /// Relative timestamp as displayed, e.g. "5m ago".
    pub posted_ago: &'static str,
    pub official: bool,
}

/// Text before the first comma: "Tokyo" for "Tokyo, Japan".
fn short_place(place: &str) -> &str {
    place.split(',').next().unwrap_or(place).trim()
}

/// Build the fixed four-post feed for an event.
pub fn generate_posts<R: RandomSource + ?Sized>(
    place: &str,
    magnitude: f64,
    rng: &mut R,
) -> Vec<MockPost> {
    let tag = HASHTAGS[rng.next_index(HASHTAGS.len())];
    let short = short_place(place);

    vec![
        MockPost {
            handle: "@LocalNewsAlerts",
            body: format!(
                "BREAKING: Magnitude {magnitude} earthquake detected near {place}. \
                 Residents advised to stay outdoors."
            ),
            posted_ago: "2m ago",
            official: true,
        },
        MockPost {
            handle: "@CitizenJoe",
            body: format!(
                "Whoa! Just felt huge shaking in {short}! Felt like a {magnitude} at least. \
                 Everyone okay? {tag}"
            ),
            posted_ago: "5m ago",
            official: false,
        },
        MockPost {
            handle: "@SafeCity",
            body: format!(
                "Reports of structural vibrations in the {place} sector after the M{magnitude} \
                 quake. Avoid glass buildings."
            ),
            posted_ago: "10m ago",
            official: false,
        },
        MockPost {
            handle: "@GeoMonitor",
            body: format!(
                "Seismic activity confirms mag {magnitude} event near {short}. Aftershocks possible."
            ),
            posted_ago: "12m ago",
            official: true,
        },
    ]
}
