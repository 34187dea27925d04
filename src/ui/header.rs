// Header rendering module
//
// Renders the top header with the application title and global counts for
// the loaded protocol set.

use crate::app::AppState;
use crate::theme::{ACCENT, ENABLED, MUTED, TEXT};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Global counts shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderStats {
    pub config_version: String,
    pub conditions: usize,
    pub protocols: usize,
    pub active_protocols: usize,
}

pub fn header_stats(app: &AppState) -> HeaderStats {
    let store = app.engine.store();
    HeaderStats {
        config_version: app
            .config_version
            .clone()
            .unwrap_or_else(|| "unversioned".to_string()),
        conditions: store.nodes().len(),
        protocols: store.hulls().len(),
        active_protocols: store.active_hulls().count(),
    }
}

pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let stats = header_stats(app);

    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "  ◇ PROTOGRAPH ",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Clinical protocols as a hypergraph",
                Style::default().fg(MUTED),
            ),
        ]),
        Line::from(vec![
            Span::styled("  [Ruleset: ", Style::default().fg(MUTED)),
            Span::styled(stats.config_version, Style::default().fg(TEXT)),
            Span::styled("] [Conditions: ", Style::default().fg(MUTED)),
            Span::styled(stats.conditions.to_string(), Style::default().fg(TEXT)),
            Span::styled("] [Protocols: ", Style::default().fg(MUTED)),
            Span::styled(stats.protocols.to_string(), Style::default().fg(TEXT)),
            Span::styled("] [Active: ", Style::default().fg(MUTED)),
            Span::styled(
                stats.active_protocols.to_string(),
                Style::default().fg(ENABLED).add_modifier(Modifier::BOLD),
            ),
            Span::styled("]", Style::default().fg(MUTED)),
        ]),
    ];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT)),
        )
        .alignment(Alignment::Left);

    f.render_widget(header, area);
}
