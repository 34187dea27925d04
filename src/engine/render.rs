// Incremental renderer
//
// Keeps one visual record per node and per visible hull, keyed by id.
// Each render reconciles the previous records with the scene: new ids are
// constructed, missing ids are dropped, and surviving records are updated
// in place so their identity (and any transition they are playing) carries
// over.

use std::collections::HashMap;

use ratatui::style::Color;

use super::geometry::{compute_hull_path, HullPath, Point};
use super::scene::SceneStore;

/// Anything stored in a `Layer` is looked up by a string key
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Outcome of reconciling one layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    /// Sorted by id
    pub exited: Vec<String>,
}

/// Ordered, identity-keyed collection of visual records
#[derive(Debug, Clone)]
pub struct Layer<T> {
    entries: Vec<T>,
}

impl<T> Default for Layer<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Keyed> Layer<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.key() == key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Diff the layer against `items` (key, source) in display order
    ///
    /// `enter` builds a record for an unseen key, `update` patches a
    /// surviving record in place. Records whose key is absent are dropped.
    /// A key repeated in `items` is only used the first time.
    pub fn reconcile<'a, S, I, E, U>(&mut self, items: I, mut enter: E, mut update: U) -> Reconciliation
    where
        I: IntoIterator<Item = (&'a str, S)>,
        E: FnMut(&str, S) -> T,
        U: FnMut(&mut T, S),
    {
        let mut previous: HashMap<String, T> = self
            .entries
            .drain(..)
            .map(|entry| (entry.key().to_string(), entry))
            .collect();
        let mut report = Reconciliation::default();

        for (key, source) in items {
            if self.entries.iter().any(|e| e.key() == key) {
                continue;
            }
            match previous.remove(key) {
                Some(mut entry) => {
                    update(&mut entry, source);
                    report.updated.push(key.to_string());
                    self.entries.push(entry);
                }
                None => {
                    self.entries.push(enter(key, source));
                    report.entered.push(key.to_string());
                }
            }
        }

        report.exited = previous.into_keys().collect();
        report.exited.sort();
        report
    }
}

/// Drawn state of one condition node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub id: String,
    /// Position as currently drawn
    pub position: Point,
    /// Transition start
    pub from: Point,
    /// Transition target (layout output)
    pub to: Point,
    pub color: Color,
    pub active: bool,
    /// Construction serial; unchanged for as long as the record survives
    pub serial: u64,
}

impl Keyed for NodeVisual {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Drawn state of one visible hull
#[derive(Debug, Clone, PartialEq)]
pub struct HullVisual {
    pub id: String,
    pub path: HullPath,
    pub color: Color,
    /// Ids of the resolved member nodes
    pub members: Vec<String>,
    pub serial: u64,
}

impl Keyed for HullVisual {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Result of one `render` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub nodes: Reconciliation,
    pub hulls: Reconciliation,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    nodes: Layer<NodeVisual>,
    hulls: Layer<HullVisual>,
    next_serial: u64,
    /// Clearance between a member node's center and its hull boundary
    padding: f64,
}

impl Renderer {
    pub fn new(padding: f64) -> Self {
        Self {
            nodes: Layer::default(),
            hulls: Layer::default(),
            next_serial: 0,
            padding,
        }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn nodes(&self) -> &[NodeVisual] {
        self.nodes.as_slice()
    }

    pub fn hulls(&self) -> &[HullVisual] {
        self.hulls.as_slice()
    }

    pub fn node(&self, id: &str) -> Option<&NodeVisual> {
        self.nodes.get(id)
    }

    pub fn hull(&self, id: &str) -> Option<&HullVisual> {
        self.hulls.get(id)
    }

    /// Drop every record (next render constructs everything afresh)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.hulls.clear();
    }

    /// Bring the visuals in line with the scene
    ///
    /// With `animate` the nodes keep their drawn position and start moving
    /// towards the new target; without it they snap. Hull paths are built
    /// from the drawn node positions either way.
    pub fn render(&mut self, store: &SceneStore, animate: bool) -> RenderReport {
        let next_serial = &mut self.next_serial;

        let nodes = self.nodes.reconcile(
            store.nodes().iter().map(|n| (n.id.as_str(), n)),
            |id, node| {
                *next_serial += 1;
                NodeVisual {
                    id: id.to_string(),
                    position: node.position,
                    from: node.position,
                    to: node.position,
                    color: node.color,
                    active: node.active,
                    serial: *next_serial,
                }
            },
            |visual, node| {
                visual.from = visual.position;
                visual.to = node.position;
                visual.color = node.color;
                visual.active = node.active;
                if !animate {
                    visual.position = node.position;
                    visual.from = node.position;
                }
            },
        );

        let positions: HashMap<&str, Point> = self
            .nodes
            .iter()
            .map(|v| (v.id.as_str(), v.position))
            .collect();
        let padding = self.padding;

        let visible = store.hulls().iter().filter(|h| store.is_hull_visible(h)).map(|hull| {
            let members: Vec<String> = hull
                .resolved_members()
                .iter()
                .map(|&i| store.nodes()[i].id.clone())
                .collect();
            (hull.id.as_str(), (hull.color, members))
        });

        let hulls = self.hulls.reconcile(
            visible,
            |id, (color, members)| {
                *next_serial += 1;
                HullVisual {
                    id: id.to_string(),
                    path: path_for(&members, &positions, padding),
                    color,
                    members,
                    serial: *next_serial,
                }
            },
            |visual, (color, members)| {
                visual.path = path_for(&members, &positions, padding);
                visual.color = color;
                visual.members = members;
            },
        );

        RenderReport { nodes, hulls }
    }

    /// Move every node to `eased` of the way along its transition
    pub fn interpolate(&mut self, eased: f64) {
        for visual in self.nodes.entries.iter_mut() {
            visual.position = visual.from.lerp(visual.to, eased);
        }
    }

    /// Recompute every hull path from the drawn node positions
    pub fn resample_hulls(&mut self) {
        let positions: HashMap<&str, Point> = self
            .nodes
            .iter()
            .map(|v| (v.id.as_str(), v.position))
            .collect();
        for hull in self.hulls.entries.iter_mut() {
            hull.path = path_for(&hull.members, &positions, self.padding);
        }
    }

    /// Snap every node onto its target and rebuild the hull paths
    pub fn settle(&mut self) {
        for visual in self.nodes.entries.iter_mut() {
            visual.position = visual.to;
            visual.from = visual.to;
        }
        self.resample_hulls();
    }

    /// Whether any node is still away from its target
    pub fn in_motion(&self) -> bool {
        self.nodes.iter().any(|v| v.position != v.to)
    }
}

fn path_for(members: &[String], positions: &HashMap<&str, Point>, padding: f64) -> HullPath {
    let points: Vec<Point> = members
        .iter()
        .filter_map(|id| positions.get(id.as_str()).copied())
        .collect();
    compute_hull_path(&points, padding)
}
