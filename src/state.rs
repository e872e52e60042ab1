//! View state and its reducer.
//!
//! The whole dashboard state is one immutable [`ViewState`]. Front ends never
//! mutate it; they feed [`Action`]s through [`reduce`] and keep the result.
//!
//! ```text
//! Loading ──Loaded──▶ List ──Select──▶ Detail
//!                      ▲                 │
//!                      └──────Back───────┘
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::models::Event;

/// User and loader inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A load finished; an empty list covers the failure case.
    ///
    /// The list is adopted as-is, so a cached list is never copied.
    Loaded(Arc<[Event]>),
    /// Select an event by id.
    Select(String),
    /// Leave the detail pane.
    Back,
    /// Show or hide the heat layer.
    ToggleHeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    List,
    Detail,
}

/// Dashboard state. The event list is shared, never copied, between states.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading {
        heat: bool,
    },
    List {
        events: Arc<[Event]>,
        heat: bool,
    },
    /// `selected` always indexes into `events`.
    Detail {
        events: Arc<[Event]>,
        selected: usize,
        heat: bool,
    },
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Loading { heat: false }
    }
}

impl ViewState {
    #[must_use]
    pub fn new(heat: bool) -> Self {
        Self::Loading { heat }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Loading { .. } => Phase::Loading,
            Self::List { .. } => Phase::List,
            Self::Detail { .. } => Phase::Detail,
        }
    }

    /// Current events; empty while loading.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        match self.shared_events() {
            Some(events) => &events[..],
            None => &[],
        }
    }

    pub(crate) fn shared_events(&self) -> Option<&Arc<[Event]>> {
        match self {
            Self::Loading { .. } => None,
            Self::List { events, .. } | Self::Detail { events, .. } => Some(events),
        }
    }

    #[must_use]
    pub fn selected_event(&self) -> Option<&Event> {
        match self {
            Self::Detail {
                events, selected, ..
            } => events.get(*selected),
            _ => None,
        }
    }

    #[must_use]
    pub fn heat_enabled(&self) -> bool {
        match self {
            Self::Loading { heat } | Self::List { heat, .. } | Self::Detail { heat, .. } => *heat,
        }
    }

    fn with_heat(&self, heat: bool) -> Self {
        match self.clone() {
            Self::Loading { .. } => Self::Loading { heat },
            Self::List { events, .. } => Self::List { events, heat },
            Self::Detail {
                events, selected, ..
            } => Self::Detail {
                events,
                selected,
                heat,
            },
        }
    }
}

/// Pure transition function.
///
/// Inputs that make no sense in the current state (selecting an unknown id,
/// `Back` outside the detail pane, selecting while loading) leave it unchanged.
#[must_use]
pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let heat = state.heat_enabled();
    match action {
        Action::Loaded(events) => ViewState::List { events, heat },
        Action::Select(id) => match state.shared_events() {
            Some(events) => match events.iter().position(|e| e.id == id) {
                Some(selected) => ViewState::Detail {
                    events: Arc::clone(events),
                    selected,
                    heat,
                },
                None => state.clone(),
            },
            None => state.clone(),
        },
        Action::Back => match state {
            ViewState::Detail { events, .. } => ViewState::List {
                events: Arc::clone(events),
                heat,
            },
            _ => state.clone(),
        },
        Action::ToggleHeat => state.with_heat(!heat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> ViewState {
        reduce(
            &ViewState::default(),
            Action::Loaded(
                vec![
                    Event::fixture("A", 2.0, 10.0, 20.0),
                    Event::fixture("B", 5.5, -10.0, -20.0),
                ]
                .into(),
            ),
        )
    }

    fn ids(state: &ViewState) -> Vec<&str> {
        state.events().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_starts_loading() {
        let state = ViewState::default();
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.events().is_empty());
        assert!(state.selected_event().is_none());
    }

    #[test]
    fn test_load_failure_still_leaves_loading() {
        let state = reduce(&ViewState::default(), Action::Loaded(Vec::new().into()));
        assert_eq!(state.phase(), Phase::List);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_select_then_back() {
        let list = loaded();
        assert_eq!(list.phase(), Phase::List);

        let detail = reduce(&list, Action::Select("A".into()));
        assert_eq!(detail.phase(), Phase::Detail);
        assert_eq!(detail.selected_event().map(|e| e.id.as_str()), Some("A"));

        let back = reduce(&detail, Action::Back);
        assert_eq!(back.phase(), Phase::List);
        assert!(back.selected_event().is_none());
        assert_eq!(ids(&back), ["A", "B"]);
        assert_eq!(back, list);
    }

    #[test]
    fn test_select_switches_between_events() {
        let a = reduce(&loaded(), Action::Select("A".into()));
        let b = reduce(&a, Action::Select("B".into()));
        assert_eq!(b.selected_event().map(|e| e.id.as_str()), Some("B"));
    }

    #[test]
    fn test_list_is_shared_not_copied() {
        let list = loaded();
        let detail = reduce(&list, Action::Select("B".into()));
        let (Some(before), Some(after)) = (list.shared_events(), detail.shared_events()) else {
            panic!("expected loaded states");
        };
        assert!(Arc::ptr_eq(before, after));
    }

    #[test]
    fn test_loaded_list_is_adopted_without_copy() {
        let cached: Arc<[Event]> = vec![Event::fixture("A", 2.0, 0.0, 0.0)].into();
        let state = reduce(&ViewState::default(), Action::Loaded(Arc::clone(&cached)));
        let Some(held) = state.shared_events() else {
            panic!("expected a loaded state");
        };
        assert!(Arc::ptr_eq(held, &cached));
    }

    #[test]
    fn test_ignored_inputs() {
        let loading = ViewState::default();
        assert_eq!(reduce(&loading, Action::Select("A".into())), loading);
        assert_eq!(reduce(&loading, Action::Back), loading);

        let list = loaded();
        assert_eq!(reduce(&list, Action::Select("missing".into())), list);
        assert_eq!(reduce(&list, Action::Back), list);
    }

    #[test]
    fn test_reload_discards_selection() {
        let detail = reduce(&loaded(), Action::Select("A".into()));
        let reloaded = reduce(
            &detail,
            Action::Loaded(vec![Event::fixture("C", 3.0, 0.0, 0.0)].into()),
        );
        assert_eq!(reloaded.phase(), Phase::List);
        assert_eq!(ids(&reloaded), ["C"]);
    }

    #[test]
    fn test_heat_flag_survives_transitions() {
        let state = reduce(&ViewState::default(), Action::ToggleHeat);
        assert!(state.heat_enabled());
        let state = reduce(&state, Action::Loaded(vec![Event::fixture("A", 2.0, 0.0, 0.0)].into()));
        let state = reduce(&state, Action::Select("A".into()));
        assert!(state.heat_enabled());
        let state = reduce(&state, Action::ToggleHeat);
        assert!(!state.heat_enabled());
        assert_eq!(state.phase(), Phase::Detail);
    }
}
