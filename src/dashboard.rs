//! Drives a [`MapSurface`] from [`ViewState`] transitions.
//!
//! The reducer decides *what* the state is; the dashboard works out which map
//! commands that change implies and issues only those. The heat layer is the
//! one overlay with a lifecycle: it is detached before every recompute and on
//! teardown, so a surface never holds two at once.

use std::sync::Arc;

use tracing::debug;

use crate::heat::HeatLayer;
use crate::map::{CameraTarget, MapSurface, Marker, PolygonOverlay};
use crate::models::Event;
use crate::state::{Action, Phase, ViewState, reduce};

pub struct Dashboard<M: MapSurface> {
    state: ViewState,
    map: M,
    heat_attached: bool,
}

impl<M: MapSurface> Dashboard<M> {
    /// Start in `Loading` with the heat layer preference given.
    pub fn new(map: M, heat: bool) -> Self {
        Self {
            state: ViewState::new(heat),
            map,
            heat_attached: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Apply an action and push the resulting changes to the map.
    pub fn dispatch(&mut self, action: Action) {
        let next = reduce(&self.state, action);
        let prev = std::mem::replace(&mut self.state, next);
        self.sync(&prev);
    }

    fn sync(&mut self, prev: &ViewState) {
        let list_changed = match (prev.shared_events(), self.state.shared_events()) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };

        if list_changed {
            let markers = self.state.events().iter().map(Marker::for_event).collect();
            self.map.set_markers(markers);
        }

        if list_changed || prev.heat_enabled() != self.state.heat_enabled() {
            self.detach_heat();
            if self.state.heat_enabled() && self.state.phase() != Phase::Loading {
                self.attach_heat();
            }
        }

        let prev_id = prev.selected_event().map(|e| e.id.as_str());
        let next = self.state.selected_event();
        let selection_changed = list_changed || prev_id != next.map(|e| e.id.as_str());
        if selection_changed {
            match next {
                Some(event) => {
                    debug!(id = %event.id, "focusing event");
                    self.map.pan_to(CameraTarget::focus(event.epicenter));
                    self.map.set_polygon(Some(PolygonOverlay::for_event(event)));
                }
                None if prev_id.is_some() => self.map.set_polygon(None),
                None => {}
            }
        }
    }

    fn attach_heat(&mut self) {
        let layer = HeatLayer::from_events(self.state.events());
        self.map.set_heat_layer(Some(layer));
        self.heat_attached = true;
    }

    fn detach_heat(&mut self) {
        if self.heat_attached {
            self.map.set_heat_layer(None);
            self.heat_attached = false;
        }
    }

    /// Release map overlays. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.detach_heat();
    }

    /// Currently selected event, if any.
    pub fn selected(&self) -> Option<&Event> {
        self.state.selected_event()
    }
}

impl<M: MapSurface> Drop for Dashboard<M> {
    fn drop(&mut self) {
        self.teardown();
    }
}
