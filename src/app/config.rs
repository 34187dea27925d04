// Application configuration types
//
// This module contains configuration constants and structs for:
// - Transition timing and hull resampling
// - Event loop polling cadence
// - Canvas node and hull sizing
// - Runtime display toggles

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Duration of an animated highlight transition
pub const TRANSITION_DURATION: Duration = Duration::from_millis(500);

/// Hull path recomputes spread over one transition
pub const HULL_SAMPLE_COUNT: usize = 20;

/// Event poll timeout while a transition is running (~60 fps)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Event poll timeout while idle
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Drawn radius of a node glyph, in canvas units
pub const NODE_RADIUS: f64 = 1.5;

/// Gap between a node's edge and the hull boundary, in canvas units
pub const HULL_CLEARANCE: f64 = 2.0;

/// Longest label drawn next to a node, in terminal columns
pub const MAX_LABEL_WIDTH: usize = 24;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Display toggles for the hypergraph canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSettings {
    /// Animate highlight transitions (toggle with 'a' key)
    pub animations_enabled: bool,

    /// Show condition labels next to nodes (toggle with 't' key)
    pub labels_enabled: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            labels_enabled: true,
        }
    }
}

/// Parameters handed to the visualization engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Length of an animated transition
    pub transition: Duration,

    /// Hull resamples per transition
    pub samples: usize,

    /// Distance from a member node's center to its hull boundary
    pub padding: f64,

    /// Whether `highlight` animates (initialize and resize never do)
    pub animate: bool,
}

impl EngineConfig {
    /// Padding for a given clearance beyond the node glyph
    pub fn padding_for_clearance(clearance: f64) -> f64 {
        NODE_RADIUS + clearance.max(0.0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition: TRANSITION_DURATION,
            samples: HULL_SAMPLE_COUNT,
            padding: Self::padding_for_clearance(HULL_CLEARANCE),
            animate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.transition, Duration::from_millis(500));
        assert_eq!(config.samples, 20);
        assert_eq!(config.padding, 3.5);
        assert!(config.animate);

        let settings = GraphSettings::default();
        assert!(settings.animations_enabled);
        assert!(settings.labels_enabled);
    }

    #[test]
    fn test_negative_clearance_is_clamped() {
        assert_eq!(EngineConfig::padding_for_clearance(-4.0), NODE_RADIUS);
    }
}
