// Application state management
//
// This module contains the main AppState struct and re-exports
// configuration types from the config submodule.

pub mod config;
pub mod event;

// Re-export config types for convenience
pub use config::{EngineConfig, GraphSettings};

use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use tracing::debug;

use crate::engine::layout::Viewport;
use crate::engine::scene::{ActiveSelection, Node};
use crate::engine::Engine;
use crate::snapshot::GraphSnapshot;
use config::{FRAME_INTERVAL, IDLE_POLL_INTERVAL};

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Visualization engine holding the scene and its visuals
    pub engine: Engine,

    /// Condition ids the user has checked
    pub selection: ActiveSelection,

    /// Index into the condition list under the cursor
    pub selected_condition: Option<usize>,

    /// List state for the condition checklist (enables scrolling)
    pub condition_list_state: ListState,

    /// Canvas display toggles (animations, labels)
    pub graph_settings: GraphSettings,

    /// Version string of the loaded protocol set
    pub config_version: Option<String>,
}

impl AppState {
    /// Create the state and paint the snapshot once
    pub fn new(snapshot: &GraphSnapshot, engine_config: &EngineConfig) -> Self {
        let mut engine = Engine::new(engine_config, Viewport::default());
        engine.initialize(snapshot);

        let graph_settings = GraphSettings {
            animations_enabled: engine_config.animate,
            ..GraphSettings::default()
        };

        let mut state = Self {
            running: true,
            engine,
            selection: ActiveSelection::new(),
            selected_condition: None,
            condition_list_state: ListState::default(),
            graph_settings,
            config_version: snapshot.config_version().map(str::to_string),
        };

        if state.condition_count() > 0 {
            state.set_cursor(Some(0));
        }
        state
    }

    /// Advance any running transition (called every loop iteration)
    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    pub fn on_tick_at(&mut self, now: Instant) -> bool {
        self.engine.advance(now)
    }

    /// How long the event loop may block waiting for input
    pub fn poll_interval(&self, now: Instant) -> Duration {
        match self.engine.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(FRAME_INTERVAL),
            None => IDLE_POLL_INTERVAL,
        }
    }

    /// Forward the canvas drawable size to the engine
    ///
    /// Returns true when the size changed and the scene was re-laid out.
    pub fn sync_viewport(&mut self, width: f64, height: f64) -> bool {
        self.engine.resize(Viewport::new(width, height)).is_some()
    }

    pub fn condition_count(&self) -> usize {
        self.engine.store().nodes().len()
    }

    /// Node under the cursor
    pub fn cursor_node(&self) -> Option<&Node> {
        self.selected_condition
            .and_then(|index| self.engine.store().nodes().get(index))
    }

    /// Check or uncheck a condition and re-highlight
    pub fn toggle_condition(&mut self, id: &str, now: Instant) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
        debug!(condition = id, selected = self.selection.len(), "Toggled condition");
        self.engine.highlight(&self.selection, now);
    }

    /// Toggle the condition under the cursor
    pub fn toggle_condition_at_cursor(&mut self, now: Instant) {
        if let Some(id) = self.cursor_node().map(|node| node.id.clone()) {
            self.toggle_condition(&id, now);
        }
    }

    /// Uncheck everything and return to the idle layout
    pub fn clear_selection(&mut self, now: Instant) {
        self.selection.clear();
        self.engine.highlight(&self.selection, now);
    }

    /// Move the condition cursor up (decrease index)
    pub fn select_previous_condition(&mut self) {
        let count = self.condition_count();
        if count == 0 {
            self.set_cursor(None);
            return;
        }

        match self.selected_condition {
            None => self.set_cursor(Some(count - 1)),
            Some(idx) if idx > 0 => self.set_cursor(Some(idx - 1)),
            Some(_) => {}
        }
    }

    /// Move the condition cursor down (increase index)
    pub fn select_next_condition(&mut self) {
        let count = self.condition_count();
        if count == 0 {
            self.set_cursor(None);
            return;
        }

        match self.selected_condition {
            None => self.set_cursor(Some(0)),
            Some(idx) if idx + 1 < count => self.set_cursor(Some(idx + 1)),
            Some(_) => {}
        }
    }

    pub fn toggle_animations(&mut self) {
        self.graph_settings.animations_enabled = !self.graph_settings.animations_enabled;
        self.engine
            .set_animations_enabled(self.graph_settings.animations_enabled);
    }

    pub fn toggle_labels(&mut self) {
        self.graph_settings.labels_enabled = !self.graph_settings.labels_enabled;
    }

    fn set_cursor(&mut self, index: Option<usize>) {
        self.selected_condition = index;
        self.condition_list_state.select(index);
    }
}
