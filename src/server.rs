//! Web dashboard.
//!
//! Serves a single Leaflet page plus a small JSON API:
//! - `POST /api/load` fetches the feed the first time and returns the list
//!   view together with the heat layer
//! - `GET /api/view` replays the cached list through a [`Dashboard`] and
//!   returns the resulting list pane, detail pane and [`MapScene`]
//!
//! Selection lives in the browser and travels as a query parameter, so the
//! server only shares the loaded snapshot between viewers. The heat layer
//! only changes with the list; the page keeps the copy it got from the load
//! and toggles it locally.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::client::FeedSource;
use crate::dashboard::Dashboard;
use crate::heat::HeatLayer;
use crate::loader::load_events;
use crate::map::MapScene;
use crate::models::Event;
use crate::posts::{MockPost, generate_posts};
use crate::rng::make_rng;
use crate::severity::SeverityBand;
use crate::state::{Action, Phase};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub min_magnitude: f64,
    pub seed: Option<u64>,
}

/// One feed load, shared by every viewer.
#[derive(Debug)]
struct Snapshot {
    events: Arc<[Event]>,
    heat: HeatLayer,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn FeedSource>,
    /// Written by the first load that yields events, then never replaced.
    snapshot: Arc<RwLock<Option<Snapshot>>>,
    config: ServerConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn FeedSource>, config: ServerConfig) -> Self {
        Self {
            source,
            snapshot: Arc::new(RwLock::new(None)),
            config,
        }
    }
}

/// Query parameters for `/api/view`.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub selected: Option<String>,
}

/// One row of the list pane.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub place: String,
    pub magnitude: f64,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailPane {
    pub event: Event,
    pub posts: Vec<MockPost>,
}

/// Everything the page needs to redraw itself, heat layer aside.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub phase: Phase,
    pub events: Vec<ListEntry>,
    pub detail: Option<DetailPane>,
    pub scene: MapScene,
}

/// Initial view plus the heat layer for the loaded list.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    #[serde(flatten)]
    pub view: ViewResponse,
    pub heat: HeatLayer,
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/load", post(load_handler))
        .route("/api/view", get(view_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig, source: Arc<dyn FeedSource>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState::new(source, config));

    tracing::info!("🌍 quakeview dashboard starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch once on the blocking pool and derive the heat layer.
async fn fetch_snapshot(state: &AppState) -> Snapshot {
    let source = Arc::clone(&state.source);
    let min_magnitude = state.config.min_magnitude;
    let seed = state.config.seed;

    let events = tokio::task::spawn_blocking(move || {
        load_events(source.as_ref(), min_magnitude, &mut make_rng(seed))
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!("feed load task failed: {}", e);
        Vec::new()
    });

    let events: Arc<[Event]> = events.into();
    let heat = HeatLayer::from_events(&events);
    Snapshot { events, heat }
}

/// Rebuild the view for `query` from the cached list.
///
/// The scene never carries a heat layer. Posts are regenerated on every
/// call, unlike impact zones.
fn build_view(snapshot: Option<&Snapshot>, query: ViewQuery, seed: Option<u64>) -> ViewResponse {
    let mut dashboard = Dashboard::new(MapScene::default(), false);
    if let Some(snapshot) = snapshot {
        dashboard.dispatch(Action::Loaded(Arc::clone(&snapshot.events)));
        if let Some(id) = query.selected {
            dashboard.dispatch(Action::Select(id));
        }
    }

    let state = dashboard.state();
    let list = state
        .events()
        .iter()
        .map(|e| ListEntry {
            id: e.id.clone(),
            place: e.place.clone(),
            magnitude: e.magnitude,
            color: SeverityBand::from_magnitude(e.magnitude).color(),
        })
        .collect();
    let detail = state.selected_event().map(|event| DetailPane {
        posts: generate_posts(&event.place, event.magnitude, &mut make_rng(seed)),
        event: event.clone(),
    });

    ViewResponse {
        phase: state.phase(),
        events: list,
        detail,
        scene: dashboard.map().clone(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Main page handler - serves the HTML UI.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Load the shared snapshot unless a non-empty one is already cached.
///
/// An empty list (which is also what a failed fetch yields) is retried by
/// the next load; anything else stays for the life of the server so impact
/// zones never change under a viewer.
async fn load_handler(State(state): State<AppState>) -> Json<LoadResponse> {
    let mut guard = state.snapshot.write().await;
    if guard.as_ref().is_none_or(|s| s.events.is_empty()) {
        *guard = Some(fetch_snapshot(&state).await);
    } else {
        tracing::debug!("serving cached feed snapshot");
    }
    let snapshot = guard.downgrade();

    let heat = snapshot
        .as_ref()
        .map_or_else(|| HeatLayer::from_events(&[]), |s| s.heat.clone());
    Json(LoadResponse {
        view: build_view(snapshot.as_ref(), ViewQuery::default(), state.config.seed),
        heat,
    })
}

/// Current view for a selection.
async fn view_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ViewResponse> {
    let snapshot = state.snapshot.read().await;
    Json(build_view(snapshot.as_ref(), query, state.config.seed))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

// ============================================================================
// HTML Template (embedded for single-binary deployment)
// ============================================================================

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>quakeview | Live Global Monitor</title>

    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>

    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Inter', sans-serif; background: #0f0f12; color: #fafafa; }
        .app-header { padding: 0.875rem 1.5rem; border-bottom: 1px solid #27272a; display: flex; justify-content: space-between; align-items: center; }
        .app-header h1 { font-size: 1.125rem; font-weight: 600; }
        .dashboard { display: flex; height: calc(100vh - 56px); }
        .side-pane { width: 360px; overflow-y: auto; border-right: 1px solid #27272a; padding: 1rem; }
        .side-pane h2 { font-size: 1rem; margin-bottom: 0.75rem; }
        .map-wrapper { flex: 1; }
        #map { height: 100%; width: 100%; }
        .list-item { display: flex; gap: 0.75rem; align-items: center; padding: 0.625rem; border-radius: 8px; cursor: pointer; }
        .list-item:hover { background: #27272a; }
        .status-dot { width: 10px; height: 10px; border-radius: 50%; flex-shrink: 0; }
        .badge { font-size: 0.75rem; color: #a1a1aa; }
        .back-btn { background: none; border: 1px solid #3f3f46; color: #fafafa; border-radius: 6px; padding: 0.25rem 0.75rem; cursor: pointer; margin-bottom: 0.75rem; }
        .feed-label { font-size: 0.75rem; text-transform: uppercase; color: #a1a1aa; margin: 1rem 0 0.5rem; }
        .post-card { background: #1c1c1f; border: 1px solid #27272a; border-radius: 8px; padding: 0.75rem; margin-bottom: 0.5rem; }
        .post-header { display: flex; justify-content: space-between; font-size: 0.8125rem; margin-bottom: 0.25rem; }
        .username.official { color: #38bdf8; font-weight: 600; }
        .timestamp { color: #71717a; }
        .post-body { font-size: 0.875rem; }
        .muted { color: #a1a1aa; padding: 1rem; }
        label { font-size: 0.8125rem; color: #a1a1aa; }
    </style>
</head>
<body>
    <header class="app-header">
        <h1>quakeview | Live Global Monitor</h1>
        <label><input type="checkbox" id="heat-toggle"> Heat layer</label>
    </header>
    <div class="dashboard">
        <div class="side-pane" id="side-pane"><div class="muted">Loading USGS data...</div></div>
        <div class="map-wrapper"><div id="map"></div></div>
    </div>

    <script>
        const map = L.map('map').setView([37.09, -95.71], 4);
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', { attribution: '&copy; OpenStreetMap' }).addTo(map);

        const markerLayer = L.layerGroup().addTo(map);
        let polygon = null;
        let heatData = null;
        let heatLayer = null;
        let lastCamera = null;

        const esc = (s) => String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
        const ll = (p) => [p.lat, p.lon];

        function icon(d) {
            return L.divIcon({
                className: 'custom-marker',
                html: `<div style="background-color:${d.color};width:${d.size[0]}px;height:${d.size[1]}px;border-radius:50%;border:${d.border};box-shadow:${d.shadow};"></div>`,
                iconSize: d.size,
                iconAnchor: d.anchor,
                popupAnchor: d.popup_anchor
            });
        }

        function drawScene(scene) {
            markerLayer.clearLayers();
            for (const m of scene.markers) {
                L.marker(ll(m.position), { icon: icon(m.icon) })
                    .bindPopup(esc(m.popup).replace('\n', '<br/>'))
                    .on('click', () => view(m.id))
                    .addTo(markerLayer);
            }

            if (polygon) { map.removeLayer(polygon); polygon = null; }
            if (scene.polygon) {
                const p = scene.polygon;
                polygon = L.polygon(p.ring.map(ll), {
                    color: p.style.color,
                    fillColor: p.style.fill_color,
                    fillOpacity: p.style.fill_opacity,
                    weight: p.style.weight,
                    dashArray: p.style.dash_array
                }).bindPopup(`<div style="text-align:center;color:#b91c1c"><strong>${esc(p.popup_title)}</strong><br/>${esc(p.popup_body)}</div>`).addTo(map);
            }

            const cam = JSON.stringify(scene.camera);
            if (scene.camera.duration_secs > 0 && cam !== lastCamera) {
                map.flyTo(ll(scene.camera.center), scene.camera.zoom, { duration: scene.camera.duration_secs });
            }
            lastCamera = cam;
        }

        // Built from the copy sent with the load; views never resend it.
        function applyHeat() {
            if (heatLayer) { map.removeLayer(heatLayer); heatLayer = null; }
            if (!heatData || !L.heatLayer || !document.getElementById('heat-toggle').checked) return;
            const s = heatData.style;
            heatLayer = L.heatLayer(heatData.points.map(h => [h.position.lat, h.position.lon, h.intensity]), {
                radius: s.radius, blur: s.blur, maxZoom: s.max_zoom,
                gradient: Object.fromEntries(s.gradient)
            }).addTo(map);
        }

        function drawPane(v) {
            const pane = document.getElementById('side-pane');
            if (v.detail) {
                const e = v.detail.event;
                pane.innerHTML = `
                    <button class="back-btn" onclick="view(null)">&larr; Back</button>
                    <h2>${esc(e.place)}</h2>
                    <div class="badge">Mag ${e.magnitude.toFixed(1)} &middot; ${e.depth_km.toFixed(0)} km deep</div>
                    <div class="feed-label">Live Social Updates</div>
                    ${v.detail.posts.map(p => `
                        <div class="post-card">
                            <div class="post-header">
                                <span class="username ${p.official ? 'official' : ''}">${esc(p.handle)}</span>
                                <span class="timestamp">${esc(p.posted_ago)}</span>
                            </div>
                            <div class="post-body">${esc(p.body)}</div>
                        </div>`).join('')}`;
                return;
            }
            if (v.events.length === 0) {
                pane.innerHTML = '<h2>Live Incidents (0)</h2><div class="muted">No earthquakes to show.</div>';
                return;
            }
            pane.innerHTML = `<h2>Live Incidents (${v.events.length})</h2>` + v.events.map(e => `
                <div class="list-item" data-id="${esc(e.id)}">
                    <div class="status-dot" style="background-color:${e.color}"></div>
                    <div><div>${esc(e.place)}</div><span class="badge">Mag ${e.magnitude.toFixed(1)}</span></div>
                </div>`).join('');
            pane.querySelectorAll('.list-item').forEach(el => el.addEventListener('click', () => view(el.dataset.id)));
        }

        function render(v) {
            drawPane(v);
            drawScene(v.scene);
        }

        async function view(id) {
            const params = new URLSearchParams();
            if (id) params.set('selected', id);
            const res = await fetch('/api/view?' + params);
            render(await res.json());
        }

        document.getElementById('heat-toggle').addEventListener('change', applyHeat);

        fetch('/api/load', { method: 'POST' })
            .then(r => r.json())
            .then(v => { heatData = v.heat; render(v); applyHeat(); })
            .catch(err => {
                console.error('failed to load events', err);
                render({ phase: 'list', events: [], detail: null, scene: { markers: [], polygon: null, heat: null, camera: { duration_secs: 0 } } });
            });
    </script>
</body>
</html>
"##;
