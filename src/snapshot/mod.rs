// Snapshot module - Graph snapshot format and loader
//
// A snapshot is the JSON graph export consumed once at startup: condition
// nodes, protocol hulls listing the conditions they span, and optional
// metadata. Activity flags present in the export are ignored; activity is
// always derived from the selection at runtime.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::theme;

/// Failure to obtain a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON")]
    Parse(#[from] serde_json::Error),
}

/// One condition node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pack_count: usize,
    #[serde(default)]
    pub packs: Vec<String>,
}

impl SnapshotNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// One protocol hull
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHull {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub condition_count: usize,
    #[serde(default)]
    pub is_interaction: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// What the protocol concludes once all its conditions hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl SnapshotHull {
    pub fn new(id: &str, conditions: &[&str], color: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            condition_count: conditions.len(),
            is_interaction: conditions.len() > 1,
            color: color.map(str::to_string),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub config_version: String,
    #[serde(default)]
    pub total_conditions: usize,
    #[serde(default)]
    pub total_packs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_conditions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_pack_ids: Option<Vec<String>>,
}

/// Complete graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub hulls: Vec<SnapshotHull>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SnapshotMetadata>,
}

/// A protocol rule: the premises (conditions) it requires and what it concludes
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperedge {
    pub edge_id: String,
    pub premises: BTreeSet<String>,
    pub expected_outcome: String,
    pub note: String,
}

impl Hyperedge {
    pub fn new(edge_id: &str, premises: &[&str], expected_outcome: &str, note: &str) -> Self {
        Self {
            edge_id: edge_id.to_string(),
            premises: premises.iter().map(|p| p.to_string()).collect(),
            expected_outcome: expected_outcome.to_string(),
            note: note.to_string(),
        }
    }
}

impl GraphSnapshot {
    /// Build a snapshot from protocol hyperedges
    ///
    /// Nodes are the sorted union of all premises, each listing the
    /// protocols that include it. Hulls are sorted by id and colored from
    /// the hull palette by that sorted position.
    pub fn from_hyperedges(edges: &[Hyperedge], config_version: &str) -> Self {
        let mut sorted: Vec<&Hyperedge> = edges.iter().collect();
        sorted.sort_by(|a, b| a.edge_id.cmp(&b.edge_id));

        let mut packs_by_condition: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for edge in edges {
            for premise in &edge.premises {
                packs_by_condition
                    .entry(premise.as_str())
                    .or_default()
                    .push(edge.edge_id.clone());
            }
        }

        let nodes = packs_by_condition
            .into_iter()
            .map(|(condition, packs)| SnapshotNode {
                id: condition.to_string(),
                kind: Some("condition".to_string()),
                active: false,
                pack_count: packs.len(),
                packs,
            })
            .collect::<Vec<_>>();

        let hulls = sorted
            .iter()
            .enumerate()
            .map(|(index, edge)| SnapshotHull {
                id: edge.edge_id.clone(),
                name: Some(if edge.note.is_empty() {
                    edge.edge_id.clone()
                } else {
                    edge.note.clone()
                }),
                conditions: edge.premises.iter().cloned().collect(),
                condition_count: edge.premises.len(),
                is_interaction: edge.premises.len() > 1,
                active: false,
                color: Some(theme::hull_color_hex(index)),
                version: Some(config_version.to_string()),
                outcome: Some(edge.expected_outcome.clone()).filter(|o| !o.is_empty()),
            })
            .collect::<Vec<_>>();

        let metadata = SnapshotMetadata {
            config_version: config_version.to_string(),
            total_conditions: nodes.len(),
            total_packs: hulls.len(),
            active_conditions: None,
            activated_pack_ids: None,
        };

        Self {
            nodes,
            hulls,
            metadata: Some(metadata),
        }
    }

    /// Config version from the metadata, if any
    pub fn config_version(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|m| m.config_version.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Parse a snapshot from JSON text
pub fn parse_snapshot(json: &str) -> Result<GraphSnapshot, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a snapshot file
pub fn load_snapshot(path: &Path) -> Result<GraphSnapshot, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_snapshot(&raw)?;
    info!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        hulls = snapshot.hulls.len(),
        "Loaded graph snapshot"
    );
    Ok(snapshot)
}

/// Built-in obstetric protocol set
pub fn demo_hyperedges() -> Vec<Hyperedge> {
    vec![
        Hyperedge::new(
            "hg_obligate_immediate_delivery_severe_pe_34",
            &["Dx.Preeclampsia", "DxAttr.Preeclampsia.Severe", "Ctx.GA_>=34w"],
            "Obligated(Action.ImmediateDelivery)",
            "Severe preeclampsia at >=34w obligates immediate delivery.",
        ),
        Hyperedge::new(
            "hg_obligate_expedited_delivery_placental_abruption",
            &["Dx.PlacentalAbruption"],
            "Obligated(Action.ExpeditedDelivery)",
            "Placental abruption obligates expedited delivery.",
        ),
        Hyperedge::new(
            "hg_allow_expedited_delivery_hypertensive_28",
            &["Dx.HypertensiveDisorder", "Ctx.GA_>=28w"],
            "Allowed(Action.ExpeditedDelivery)",
            "Hypertensive disorder at >=28w permits expedited delivery.",
        ),
        Hyperedge::new(
            "hg_allow_expectant_nonsevere_early_window",
            &["Dx.Preeclampsia", "Ctx.GA_>=28w", "Ctx.MaternalAge_<35y"],
            "Allowed(Action.ExpectantManagement)",
            "Non-severe early window may allow expectant management.",
        ),
    ]
}

/// Snapshot of the built-in protocol set
pub fn demo_snapshot() -> GraphSnapshot {
    GraphSnapshot::from_hyperedges(&demo_hyperedges(), "demo")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_export() {
        let json = r##"{
            "nodes": [
                {"id": "Dx.A", "type": "condition", "active": true, "pack_count": 1, "packs": ["p1"]},
                {"id": "Ctx.B"}
            ],
            "hulls": [
                {"id": "p1", "name": "Pack one", "conditions": ["Dx.A", "Ctx.B"],
                 "condition_count": 2, "is_interaction": true, "active": false,
                 "color": "#60a5fa", "version": "1.2", "extra": 42}
            ],
            "metadata": {"config_version": "v7", "total_conditions": 2, "total_packs": 1}
        }"##;
        let snapshot = parse_snapshot(json).unwrap();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[0].kind.as_deref(), Some("condition"));
        assert_eq!(snapshot.nodes[0].packs, vec!["p1".to_string()]);
        assert_eq!(snapshot.nodes[1], SnapshotNode::new("Ctx.B"));
        assert_eq!(snapshot.hulls[0].conditions.len(), 2);
        assert_eq!(snapshot.hulls[0].color.as_deref(), Some("#60a5fa"));
        assert_eq!(snapshot.hulls[0].outcome, None);
        assert_eq!(snapshot.config_version(), Some("v7"));
    }

    #[test]
    fn test_parse_minimal_and_empty() {
        let snapshot = parse_snapshot(r#"{"hulls": [{"id": "h"}]}"#).unwrap();
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.hulls[0].conditions.is_empty());
        assert_eq!(snapshot.config_version(), None);

        assert_eq!(parse_snapshot("{}").unwrap(), GraphSnapshot::default());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_snapshot("not json"), Err(SnapshotError::Parse(_))));
        assert!(matches!(
            parse_snapshot(r#"{"nodes": [{"type": "condition"}]}"#),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = Path::new("/nonexistent/protograph/snapshot.json");
        let err = load_snapshot(path).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/protograph/snapshot.json"));
    }

    #[test]
    fn test_load_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("protograph-snapshot-{}.json", std::process::id()));
        let demo = demo_snapshot();
        fs::write(&path, serde_json::to_string(&demo).unwrap()).unwrap();
        let loaded = load_snapshot(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), demo);
    }

    #[test]
    fn test_from_hyperedges_builds_sorted_union() {
        let snapshot = demo_snapshot();
        let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Ctx.GA_>=28w",
                "Ctx.GA_>=34w",
                "Ctx.MaternalAge_<35y",
                "Dx.HypertensiveDisorder",
                "Dx.PlacentalAbruption",
                "Dx.Preeclampsia",
                "DxAttr.Preeclampsia.Severe",
            ]
        );

        let preeclampsia = &snapshot.nodes[5];
        assert_eq!(preeclampsia.pack_count, 2);
        assert_eq!(
            preeclampsia.packs,
            vec![
                "hg_obligate_immediate_delivery_severe_pe_34".to_string(),
                "hg_allow_expectant_nonsevere_early_window".to_string(),
            ]
        );

        let hull_ids: Vec<&str> = snapshot.hulls.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(
            hull_ids,
            vec![
                "hg_allow_expectant_nonsevere_early_window",
                "hg_allow_expedited_delivery_hypertensive_28",
                "hg_obligate_expedited_delivery_placental_abruption",
                "hg_obligate_immediate_delivery_severe_pe_34",
            ]
        );
        assert_eq!(snapshot.hulls[0].color.as_deref(), Some("#60a5fa"));
        assert_eq!(snapshot.hulls[3].color.as_deref(), Some("#facc15"));
        assert!(!snapshot.hulls[2].is_interaction);
        assert_eq!(snapshot.hulls[0].condition_count, 3);
        assert_eq!(
            snapshot.hulls[2].outcome.as_deref(),
            Some("Obligated(Action.ExpeditedDelivery)")
        );

        let metadata = snapshot.metadata.unwrap();
        assert_eq!(metadata.total_conditions, 7);
        assert_eq!(metadata.total_packs, 4);
        assert_eq!(metadata.config_version, "demo");
    }

    #[test]
    fn test_from_hyperedges_empty() {
        let snapshot = GraphSnapshot::from_hyperedges(&[], "v0");
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.hulls.is_empty());
        assert_eq!(snapshot.config_version(), Some("v0"));
    }
}
