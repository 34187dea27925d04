// Inspector rendering module
//
// Renders the detail panel for the condition under the cursor and the list
// of protocols whose hulls are currently active.

use crate::app::AppState;
use crate::theme::{ACCENT, ENABLED, MUTED, TEXT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

// ============================================================================
// Inspector View Model
// ============================================================================

/// Membership of the inspected condition in one protocol
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolEntry {
    pub id: String,
    pub name: String,
    pub color: Color,
    pub active: bool,
    pub is_interaction: bool,
    /// What the protocol concludes (may be empty)
    pub outcome: String,
}

/// Everything the inspector panel shows, extracted from AppState
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    /// Condition id under the cursor, if any
    pub condition: Option<String>,
    pub kind: String,
    pub checked: bool,
    pub color: Color,
    /// Protocols that list the inspected condition, in snapshot order
    pub memberships: Vec<ProtocolEntry>,
    /// Every protocol whose hull is active, in snapshot order
    pub active_protocols: Vec<ProtocolEntry>,
}

impl Default for InspectorView {
    fn default() -> Self {
        Self {
            condition: None,
            kind: String::new(),
            checked: false,
            color: MUTED,
            memberships: Vec::new(),
            active_protocols: Vec::new(),
        }
    }
}

/// Build the inspector view model from AppState
pub fn build_inspector_view(app: &AppState) -> InspectorView {
    let store = app.engine.store();
    let entry = |hull: &crate::engine::scene::Hull| ProtocolEntry {
        id: hull.id.clone(),
        name: hull.meta.name.clone(),
        color: hull.color,
        active: hull.active,
        is_interaction: hull.meta.is_interaction,
        outcome: hull.meta.outcome.clone(),
    };

    let mut view = InspectorView {
        active_protocols: store.active_hulls().map(entry).collect(),
        ..Default::default()
    };

    if let Some(index) = app.selected_condition {
        if let Some(node) = store.nodes().get(index) {
            view.condition = Some(node.id.clone());
            view.kind = node.meta.kind.clone();
            view.checked = app.selection.contains(&node.id);
            view.color = node.color;
            view.memberships = store
                .hulls()
                .iter()
                .filter(|hull| hull.contains_node(index))
                .map(entry)
                .collect();
        }
    }

    view
}

/// One row per protocol, plus its outcome underneath once the protocol is active
fn protocol_lines(entry: &ProtocolEntry) -> Vec<Line<'static>> {
    let marker = if entry.active { "■" } else { "□" };
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(marker, Style::default().fg(entry.color)),
        Span::raw(" "),
        Span::styled(
            entry.name.clone(),
            if entry.active {
                Style::default().fg(entry.color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT)
            },
        ),
    ];
    if !entry.is_interaction {
        spans.push(Span::styled(" [single]", Style::default().fg(MUTED)));
    }

    let mut lines = vec![Line::from(spans)];
    if entry.active && !entry.outcome.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("    → ", Style::default().fg(MUTED)),
            Span::styled(entry.outcome.clone(), Style::default().fg(ENABLED)),
        ]));
    }
    lines
}

pub fn render_inspector(f: &mut Frame, area: Rect, app: &AppState) {
    let view = build_inspector_view(app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(0)])
        .split(area);

    // Condition detail
    let mut detail = vec![Line::from("")];
    match &view.condition {
        Some(id) => {
            let state = if view.checked { "Selected" } else { "Not selected" };
            detail.push(Line::from(vec![
                Span::raw("  CONDITION: "),
                Span::styled(
                    id.clone(),
                    Style::default().fg(view.color).add_modifier(Modifier::BOLD),
                ),
            ]));
            detail.push(Line::from(vec![
                Span::raw("  TYPE: "),
                Span::styled(view.kind.clone(), Style::default().fg(TEXT)),
                Span::raw("  |  STATE: "),
                Span::styled(
                    state,
                    Style::default().fg(if view.checked { ENABLED } else { MUTED }),
                ),
            ]));
            detail.push(Line::from(vec![
                Span::raw("  PROTOCOLS: "),
                Span::styled(
                    format!(
                        "{} ({} active)",
                        view.memberships.len(),
                        view.memberships.iter().filter(|m| m.active).count()
                    ),
                    Style::default().fg(ACCENT),
                ),
            ]));
            detail.push(Line::from(""));
            detail.extend(view.memberships.iter().flat_map(protocol_lines));
        }
        None => detail.push(Line::from(vec![Span::styled(
            "  (no condition under cursor)",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )])),
    }

    let detail_paragraph = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(vec![
                    Span::styled(
                        "━ Inspector ",
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("━━━━━━", Style::default().fg(ACCENT)),
                ])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_widget(detail_paragraph, chunks[0]);

    // Active protocols
    let mut active_lines = vec![Line::from("")];
    if view.active_protocols.is_empty() {
        active_lines.push(Line::from(vec![Span::styled(
            "  (no protocol fully matched)",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )]));
    } else {
        active_lines.extend(view.active_protocols.iter().flat_map(protocol_lines));
    }

    let active_paragraph = Paragraph::new(active_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(vec![Span::styled(
                    format!(" Active Protocols ({}) ", view.active_protocols.len()),
                    Style::default().fg(ENABLED).add_modifier(Modifier::BOLD),
                )])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_widget(active_paragraph, chunks[1]);
}
