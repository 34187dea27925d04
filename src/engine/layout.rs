// Ring layout solver
//
// Places condition nodes on concentric rings around the viewport center.
// With no selection every node sits on one idle ring; with a selection the
// nodes are split into three groups (hull members, standalone active,
// inactive), each spread evenly around its own ring.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::geometry::Point;
use super::scene::SceneStore;

/// Idle ring radius as a fraction of the smaller viewport dimension
pub const IDLE_RING_RATIO: f64 = 0.32;

/// Ring for active nodes that belong to an active hull (innermost)
pub const HULL_MEMBER_RING_RATIO: f64 = 0.20;

/// Ring for active nodes outside every active hull
pub const STANDALONE_RING_RATIO: f64 = 0.27;

/// Ring for inactive nodes while a selection exists (outermost)
pub const INACTIVE_RING_RATIO: f64 = 0.38;

/// Drawable area in layout units (x to the right, y downwards)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Smaller of the two dimensions, never negative
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height).max(0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

/// Which arrangement the solver uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Empty selection: all nodes on one ring
    Idle,
    /// Non-empty selection: three concentric groups
    Selection,
}

/// Ring a node is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ring {
    Idle,
    HullMember,
    Standalone,
    Inactive,
}

impl Ring {
    pub fn radius_ratio(self) -> f64 {
        match self {
            Self::Idle => IDLE_RING_RATIO,
            Self::HullMember => HULL_MEMBER_RING_RATIO,
            Self::Standalone => STANDALONE_RING_RATIO,
            Self::Inactive => INACTIVE_RING_RATIO,
        }
    }
}

/// Angle of the `index`-th of `count` nodes on a ring; index 0 sits at 12 o'clock
pub fn ring_angle(index: usize, count: usize) -> f64 {
    TAU * index as f64 / count.max(1) as f64 - FRAC_PI_2
}

/// Position of the `index`-th of `count` nodes on a ring of `radius`
pub fn ring_position(center: Point, radius: f64, index: usize, count: usize) -> Point {
    let angle = ring_angle(index, count);
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Classify every node into its ring for the store's current state
pub fn assign_rings(store: &SceneStore) -> (LayoutMode, Vec<Ring>) {
    if store.selection().is_empty() {
        return (LayoutMode::Idle, vec![Ring::Idle; store.nodes().len()]);
    }

    let rings = store
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if !node.active {
                Ring::Inactive
            } else if store.in_active_hull(index) {
                Ring::HullMember
            } else {
                Ring::Standalone
            }
        })
        .collect();
    (LayoutMode::Selection, rings)
}

/// Compute target positions for every node, in store order
///
/// Total over any input: an empty store yields no positions and a
/// zero-sized viewport collapses every ring onto the center.
pub fn solve(store: &SceneStore, viewport: Viewport) -> Vec<Point> {
    let (_, rings) = assign_rings(store);
    let center = viewport.center();
    let scale = viewport.min_dimension();

    let mut counts = [0usize; 4];
    for ring in &rings {
        counts[slot(*ring)] += 1;
    }

    let mut seen = [0usize; 4];
    rings
        .iter()
        .map(|ring| {
            let slot = slot(*ring);
            let count = counts[slot];
            let index = seen[slot];
            seen[slot] += 1;

            let radius = if *ring == Ring::HullMember && count == 1 {
                0.0
            } else {
                ring.radius_ratio() * scale
            };
            ring_position(center, radius, index, count)
        })
        .collect()
}

/// Solve and write the positions back into the store
pub fn apply(store: &mut SceneStore, viewport: Viewport) -> LayoutMode {
    let (mode, _) = assign_rings(store);
    let positions = solve(store, viewport);
    store.set_positions(&positions);
    mode
}

fn slot(ring: Ring) -> usize {
    match ring {
        Ring::Idle => 0,
        Ring::HullMember => 1,
        Ring::Standalone => 2,
        Ring::Inactive => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::tests::snapshot;
    use crate::engine::scene::ActiveSelection;
    use proptest::prelude::*;

    fn select(store: &mut SceneStore, ids: &[&str]) {
        let selection: ActiveSelection = ids.iter().map(|s| s.to_string()).collect();
        store.apply_active_selection(&selection);
    }

    fn radius_of(p: Point, viewport: Viewport) -> f64 {
        p.distance(viewport.center())
    }

    #[test]
    fn test_empty_store_is_noop() {
        let mut store = SceneStore::from_snapshot(&snapshot(&[], &[]));
        assert!(solve(&store, Viewport::default()).is_empty());
        assert_eq!(apply(&mut store, Viewport::default()), LayoutMode::Idle);
    }

    #[test]
    fn test_first_node_sits_at_twelve_oclock() {
        let store = SceneStore::from_snapshot(&snapshot(&["a", "b", "c", "d"], &[]));
        let viewport = Viewport::new(200.0, 100.0);
        let positions = solve(&store, viewport);

        let radius = IDLE_RING_RATIO * 100.0;
        assert!((positions[0].x - 100.0).abs() < 1e-9);
        assert!((positions[0].y - (50.0 - radius)).abs() < 1e-9);
        // Quarter turn clockwise on screen for the second of four nodes
        assert!((positions[1].x - (100.0 + radius)).abs() < 1e-9);
        assert!((positions[1].y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_partitions_into_three_rings() {
        let mut store = SceneStore::from_snapshot(&snapshot(
            &["a", "b", "c", "d", "e"],
            &[("ab", "a b", "#ff0000"), ("cd", "c d", "#00ff00")],
        ));
        select(&mut store, &["a", "b", "c"]);
        let viewport = Viewport::new(100.0, 100.0);
        let positions = solve(&store, viewport);

        let (mode, rings) = assign_rings(&store);
        assert_eq!(mode, LayoutMode::Selection);
        assert_eq!(
            rings,
            vec![Ring::HullMember, Ring::HullMember, Ring::Standalone, Ring::Inactive, Ring::Inactive]
        );
        assert!((radius_of(positions[0], viewport) - 20.0).abs() < 1e-9);
        assert!((radius_of(positions[1], viewport) - 20.0).abs() < 1e-9);
        assert!((radius_of(positions[2], viewport) - 27.0).abs() < 1e-9);
        assert!((radius_of(positions[3], viewport) - 38.0).abs() < 1e-9);
        assert!((radius_of(positions[4], viewport) - 38.0).abs() < 1e-9);

        // Groups are spread independently: each group's first member is at 12 o'clock
        for index in [0, 2, 3] {
            assert!((positions[index].x - 50.0).abs() < 1e-9, "node {index}");
            assert!(positions[index].y < 50.0);
        }
    }

    #[test]
    fn test_single_hull_member_sits_at_center() {
        let mut store = SceneStore::from_snapshot(&snapshot(
            &["solo", "other"],
            &[("only", "solo", "#ffffff")],
        ));
        select(&mut store, &["solo"]);
        let viewport = Viewport::new(80.0, 60.0);
        let positions = solve(&store, viewport);
        assert_eq!(positions[0], viewport.center());
        assert!((radius_of(positions[1], viewport) - INACTIVE_RING_RATIO * 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_of_unknown_ids_still_uses_selection_mode() {
        let mut store = SceneStore::from_snapshot(&snapshot(&["a", "b"], &[]));
        select(&mut store, &["missing"]);
        let viewport = Viewport::default();
        let positions = solve(&store, viewport);
        for p in positions {
            assert!((radius_of(p, viewport) - INACTIVE_RING_RATIO * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_nodes_active_without_hulls() {
        let mut store = SceneStore::from_snapshot(&snapshot(&["a", "b", "c"], &[]));
        select(&mut store, &["a", "b", "c"]);
        let viewport = Viewport::default();
        assert_eq!(apply(&mut store, viewport), LayoutMode::Selection);
        for node in store.nodes() {
            assert!((radius_of(node.position, viewport) - STANDALONE_RING_RATIO * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_viewport_collapses_to_center() {
        let store = SceneStore::from_snapshot(&snapshot(&["a", "b"], &[]));
        let positions = solve(&store, Viewport::new(0.0, 0.0));
        assert!(positions.iter().all(|p| *p == Point::new(0.0, 0.0)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Idle layout: node i at angle 2*pi*i/n - pi/2 on radius 0.32 * min(w, h)
        #[test]
        fn prop_idle_ring_is_regular(
            n in 1usize..40,
            width in 10.0f64..2000.0,
            height in 10.0f64..2000.0,
        ) {
            let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
            let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let store = SceneStore::from_snapshot(&snapshot(&id_refs, &[]));
            let viewport = Viewport::new(width, height);
            let positions = solve(&store, viewport);
            let radius = IDLE_RING_RATIO * width.min(height);
            let center = viewport.center();

            prop_assert_eq!(positions.len(), n);
            for (i, p) in positions.iter().enumerate() {
                let expected = TAU * i as f64 / n as f64 - FRAC_PI_2;
                prop_assert!((p.distance(center) - radius).abs() < 1e-6);
                prop_assert!((p.x - (center.x + radius * expected.cos())).abs() < 1e-6);
                prop_assert!((p.y - (center.y + radius * expected.sin())).abs() < 1e-6);
            }
        }
    }
}
