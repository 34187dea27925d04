// UI rendering module
//
// This module contains all UI rendering components for protograph.
// The main draw() function orchestrates rendering of all UI panels.

mod conditions;
mod graph_canvas;
mod header;
mod inspector;
mod status_bar;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use conditions::render_conditions;
use graph_canvas::render_graph_canvas;
use header::render_header;
use inspector::render_inspector;
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_header(f, chunks[0], app);

    // Body: hypergraph canvas + right panels
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(62), // Canvas
            Constraint::Percentage(38), // Right panels
        ])
        .split(chunks[1]);

    render_graph_canvas(f, body_chunks[0], app);

    // Right side: condition checklist + inspector
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Conditions
            Constraint::Percentage(55), // Inspector
        ])
        .split(body_chunks[1]);

    render_conditions(f, right_chunks[0], app);
    render_inspector(f, right_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineConfig;
    use crate::snapshot::demo_snapshot;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_full_frame() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = AppState::new(&demo_snapshot(), &EngineConfig::default());
        app.toggle_condition("Dx.PlacentalAbruption", Instant::now());

        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("PROTOGRAPH"));
        assert!(text.contains("Protocol Hypergraph"));
        assert!(text.contains("Conditions (1/7)"));
        assert!(text.contains("Active Protocols (1)"));
    }

    #[test]
    fn test_draw_syncs_viewport_with_canvas() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = AppState::new(&demo_snapshot(), &EngineConfig::default());

        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let first = app.engine.viewport();
        assert!(first.width > 0.0 && first.height > 0.0);

        terminal.backend_mut().resize(140, 50);
        terminal.resize(ratatui::layout::Rect::new(0, 0, 140, 50)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let second = app.engine.viewport();
        assert!(second.width > first.width);
        assert!(second.height > first.height);
        assert!(!app.engine.is_animating());
    }

    #[test]
    fn test_draw_empty_snapshot() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = AppState::new(&Default::default(), &EngineConfig::default());
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Conditions (0/0)"));
    }
}
