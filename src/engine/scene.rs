// Scene store and highlight state machine
//
// Canonical node and hull records for the loaded snapshot. Activity and
// colors are a pure function of the latest active selection: every call to
// `apply_active_selection` recomputes them from scratch.

use std::collections::{BTreeSet, HashMap};

use ratatui::style::Color;
use tracing::{debug, warn};

use super::geometry::Point;
use crate::snapshot::GraphSnapshot;
use crate::theme::{self, NODE_ACTIVE, NODE_INACTIVE};

/// Externally supplied set of selected condition ids
pub type ActiveSelection = BTreeSet<String>;

/// Read-only display metadata for a condition node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMeta {
    /// Node kind reported by the backend (e.g. "condition")
    pub kind: String,
    /// Number of protocols that include this condition
    pub pack_count: usize,
    /// Ids of the protocols that include this condition
    pub packs: Vec<String>,
}

/// Read-only display metadata for a protocol hull
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullMeta {
    pub name: String,
    pub version: String,
    pub is_interaction: bool,
    /// Conclusion of the protocol, empty when the snapshot has none
    pub outcome: String,
}

/// A condition node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Target position written by the layout solver
    pub position: Point,
    pub active: bool,
    /// Display color derived from the covering active hulls
    pub color: Color,
    pub meta: NodeMeta,
}

/// A protocol hull spanning one or more nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    pub id: String,
    /// Member ids as declared by the snapshot
    pub members: Vec<String>,
    /// Indices of members that resolved to existing nodes (declaration order)
    resolved: Vec<usize>,
    pub color: Color,
    pub active: bool,
    pub meta: HullMeta,
}

impl Hull {
    /// Indices into the store's node list of the members that exist
    pub fn resolved_members(&self) -> &[usize] {
        &self.resolved
    }

    /// Member count used for color precedence
    pub fn member_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn contains_node(&self, node_index: usize) -> bool {
        self.resolved.contains(&node_index)
    }
}

/// Identity-keyed collection of nodes and hulls
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    nodes: Vec<Node>,
    hulls: Vec<Hull>,
    node_index: HashMap<String, usize>,
    selection: ActiveSelection,
}

impl SceneStore {
    /// Build the store from a snapshot
    ///
    /// Duplicate node or hull ids keep their first occurrence. Hull members
    /// that do not name an existing node are kept in `members` but left out
    /// of the hull's geometry.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut nodes = Vec::with_capacity(snapshot.nodes.len());
        let mut node_index = HashMap::with_capacity(snapshot.nodes.len());

        for entry in &snapshot.nodes {
            if node_index.contains_key(&entry.id) {
                warn!(node = %entry.id, "Duplicate node id in snapshot, keeping first");
                continue;
            }
            node_index.insert(entry.id.clone(), nodes.len());
            nodes.push(Node {
                id: entry.id.clone(),
                position: Point::default(),
                active: false,
                color: NODE_INACTIVE,
                meta: NodeMeta {
                    kind: entry.kind.clone().unwrap_or_else(|| "condition".to_string()),
                    pack_count: entry.pack_count,
                    packs: entry.packs.clone(),
                },
            });
        }

        let mut hulls: Vec<Hull> = Vec::with_capacity(snapshot.hulls.len());
        for (position, entry) in snapshot.hulls.iter().enumerate() {
            if hulls.iter().any(|h| h.id == entry.id) {
                warn!(hull = %entry.id, "Duplicate hull id in snapshot, keeping first");
                continue;
            }

            let mut resolved = Vec::with_capacity(entry.conditions.len());
            for member in &entry.conditions {
                match node_index.get(member) {
                    Some(&index) if !resolved.contains(&index) => resolved.push(index),
                    Some(_) => {}
                    None => {
                        debug!(hull = %entry.id, member = %member, "Dropping unresolved hull member");
                    }
                }
            }

            let color = entry
                .color
                .as_deref()
                .and_then(theme::parse_hex_color)
                .unwrap_or_else(|| theme::hull_color(position));

            hulls.push(Hull {
                id: entry.id.clone(),
                members: entry.conditions.clone(),
                resolved,
                color,
                active: false,
                meta: HullMeta {
                    name: entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                    version: entry.version.clone().unwrap_or_default(),
                    is_interaction: entry.is_interaction,
                    outcome: entry.outcome.clone().unwrap_or_default(),
                },
            });
        }

        Self {
            nodes,
            hulls,
            node_index,
            selection: ActiveSelection::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn hulls(&self) -> &[Hull] {
        &self.hulls
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn hull(&self, id: &str) -> Option<&Hull> {
        self.hulls.iter().find(|h| h.id == id)
    }

    /// Selection most recently applied
    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    /// Hulls currently flagged active, in snapshot order
    pub fn active_hulls(&self) -> impl Iterator<Item = &Hull> {
        self.hulls.iter().filter(|h| h.active)
    }

    /// Whether a hull should be drawn: active and every resolved member active
    pub fn is_hull_visible(&self, hull: &Hull) -> bool {
        hull.active && hull.resolved.iter().all(|&i| self.nodes[i].active)
    }

    /// Recompute activity and colors from `selection`
    ///
    /// 1. node.active := selection contains node.id
    /// 2. hull.active := at least one resolved member and all of them active
    /// 3. an active node takes the color of the covering active hull with the
    ///    most members (first in snapshot order on ties); uncovered active
    ///    nodes and inactive nodes get the neutral colors
    pub fn apply_active_selection(&mut self, selection: &ActiveSelection) {
        self.selection = selection.clone();

        for node in &mut self.nodes {
            node.active = selection.contains(&node.id);
        }

        let nodes = &self.nodes;
        for hull in &mut self.hulls {
            hull.active = !hull.resolved.is_empty() && hull.resolved.iter().all(|&i| nodes[i].active);
        }

        for index in 0..self.nodes.len() {
            let color = if self.nodes[index].active {
                self.dominant_hull(index)
                    .map(|hull| hull.color)
                    .unwrap_or(NODE_ACTIVE)
            } else {
                NODE_INACTIVE
            };
            self.nodes[index].color = color;
        }

        debug!(
            selected = selection.len(),
            active_hulls = self.hulls.iter().filter(|h| h.active).count(),
            "Applied active selection"
        );
    }

    /// Largest active hull covering the node; the earliest wins ties
    fn dominant_hull(&self, node_index: usize) -> Option<&Hull> {
        let mut best: Option<&Hull> = None;
        for hull in self.hulls.iter().filter(|h| h.active && h.contains_node(node_index)) {
            match best {
                Some(current) if current.member_count() >= hull.member_count() => {}
                _ => best = Some(hull),
            }
        }
        best
    }

    /// Whether the node at `node_index` belongs to at least one active hull
    pub fn in_active_hull(&self, node_index: usize) -> bool {
        self.hulls
            .iter()
            .any(|h| h.active && h.contains_node(node_index))
    }

    /// Overwrite node target positions (layout solver output, node order)
    pub fn set_positions(&mut self, positions: &[Point]) {
        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = *position;
        }
    }
}
