// Engine module - Hypergraph visualization engine
//
// Ties the scene store, layout solver, renderer and animation coordinator
// together behind three entry points: `initialize` (first paint),
// `highlight` (selection change, animated) and `resize` (re-layout, snapped).
// The host calls `advance` once per frame to play transitions forward.

pub mod animation;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod scene;

use std::time::Instant;

use tracing::{debug, info};

use crate::app::config::EngineConfig;
use crate::snapshot::GraphSnapshot;

use animation::{ease_out_cubic, AnimationCoordinator};
use layout::Viewport;
use render::{HullVisual, NodeVisual, RenderReport, Renderer};
use scene::{ActiveSelection, SceneStore};

#[derive(Debug, Clone)]
pub struct Engine {
    store: SceneStore,
    renderer: Renderer,
    coordinator: AnimationCoordinator,
    viewport: Viewport,
    animate: bool,
}

impl Engine {
    pub fn new(config: &EngineConfig, viewport: Viewport) -> Self {
        Self {
            store: SceneStore::default(),
            renderer: Renderer::new(config.padding),
            coordinator: AnimationCoordinator::new(config.transition, config.samples),
            viewport,
            animate: config.animate,
        }
    }

    /// Load a snapshot and paint it without animation
    pub fn initialize(&mut self, snapshot: &GraphSnapshot) -> RenderReport {
        self.coordinator.cancel();
        self.store = SceneStore::from_snapshot(snapshot);
        self.renderer.clear();
        layout::apply(&mut self.store, self.viewport);
        let report = self.renderer.render(&self.store, false);
        info!(
            nodes = self.store.nodes().len(),
            hulls = self.store.hulls().len(),
            "Engine initialized"
        );
        report
    }

    /// Apply a new selection: highlight, re-layout and render
    ///
    /// A transition still in flight is first frozen at its current frame
    /// and cancelled; the new transition starts from there.
    pub fn highlight(&mut self, selection: &ActiveSelection, now: Instant) -> RenderReport {
        if let Some(progress) = self.coordinator.progress(now) {
            self.renderer.interpolate(ease_out_cubic(progress));
        }
        if self.coordinator.cancel() {
            debug!(generation = self.coordinator.generation(), "Cancelled in-flight transition");
        }

        self.store.apply_active_selection(selection);
        layout::apply(&mut self.store, self.viewport);
        let report = self.renderer.render(&self.store, self.animate);
        if self.animate {
            let generation = self.coordinator.begin(now);
            debug!(generation, selected = selection.len(), "Highlight transition started");
        }
        report
    }

    /// Re-layout for a new drawable area, without animation
    ///
    /// Returns None when the size did not change.
    pub fn resize(&mut self, viewport: Viewport) -> Option<RenderReport> {
        if viewport == self.viewport {
            return None;
        }
        if self.coordinator.cancel() {
            debug!("Resize cancelled in-flight transition");
        }
        debug!(width = viewport.width, height = viewport.height, "Viewport resized");

        self.viewport = viewport;
        layout::apply(&mut self.store, viewport);
        let report = self.renderer.render(&self.store, false);
        self.renderer.settle();
        Some(report)
    }

    /// Play the running transition forward to `now`
    ///
    /// Returns true when anything visible changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(progress) = self.coordinator.progress(now) else {
            return false;
        };
        self.renderer.interpolate(ease_out_cubic(progress));

        if self.coordinator.poll(now).is_some() {
            self.renderer.resample_hulls();
        }
        if self.coordinator.finish(now) {
            self.renderer.settle();
            debug!("Transition settled");
        }
        true
    }

    pub fn is_animating(&self) -> bool {
        self.coordinator.is_animating()
    }

    /// When the host should next call `advance`
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coordinator.next_deadline()
    }

    /// Toggle animated highlights; switching off settles any transition
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animate = enabled;
        if !enabled && self.coordinator.cancel() {
            self.renderer.settle();
        }
    }

    pub fn animations_enabled(&self) -> bool {
        self.animate
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn node_visuals(&self) -> &[NodeVisual] {
        self.renderer.nodes()
    }

    pub fn hull_visuals(&self) -> &[HullVisual] {
        self.renderer.hulls()
    }
}
