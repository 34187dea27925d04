// protograph - clinical protocol sets as an interactive hypergraph
// Conditions are nodes, protocols are hulls around the conditions they require.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use protograph::app::{self, event::handle_key_event, AppState, EngineConfig};
use protograph::snapshot::{self, GraphSnapshot};
use protograph::ui;
use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph snapshot (JSON); the built-in demo protocol set is used when omitted
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Apply highlight changes instantly
    #[arg(long)]
    no_animations: bool,

    /// Length of an animated transition in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    duration_ms: u64,

    /// Hull resamples per transition
    #[arg(long, value_name = "N", default_value_t = app::config::HULL_SAMPLE_COUNT)]
    samples: usize,

    /// Hull clearance beyond the node glyph, in canvas units
    #[arg(long, value_name = "UNITS", default_value_t = app::config::HULL_CLEARANCE)]
    padding: f64,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            transition: Duration::from_millis(self.duration_ms),
            samples: self.samples,
            padding: EngineConfig::padding_for_clearance(self.padding),
            animate: !self.no_animations,
        }
    }

    fn load_snapshot(&self) -> Result<GraphSnapshot> {
        match &self.snapshot {
            Some(path) => snapshot::load_snapshot(path)
                .with_context(|| format!("could not load snapshot {}", path.display())),
            None => Ok(snapshot::demo_snapshot()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load before touching the terminal so errors print normally
    let snapshot = args.load_snapshot()?;
    let mut app = AppState::new(&snapshot, &args.engine_config());

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        // Resize events need no handling: the canvas re-reads its size on draw
        if event::poll(app.poll_interval(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key.code);
            }
        }
    }
}
