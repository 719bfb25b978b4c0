//! Live terminal preview of a scene.
//!
//! Every entity is mounted with its own frame clock; the UI polls the clocks
//! on each redraw, so nothing here drives the animation itself.

mod app;
mod ui;

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::scene::Scene;

pub use app::PreviewApp;

/// Redraw interval; fast enough for 30 fps sheets.
const POLL_INTERVAL: Duration = Duration::from_millis(33);

pub fn run(scene_path: &Path, config: &Config) -> Result<()> {
    let scene = Scene::load(scene_path)
        .with_context(|| format!("Failed to load scene: {}", scene_path.display()))?;
    let title = scene
        .title
        .clone()
        .unwrap_or_else(|| scene_path.display().to_string());

    if !std::io::stdout().is_terminal() {
        bail!("Preview needs an interactive terminal");
    }
    let mut terminal = match ratatui::try_init() {
        Ok(terminal) => terminal,
        Err(e) => {
            // Raw mode may already be on when a later setup step fails
            ratatui::restore();
            return Err(e).context("Failed to initialize terminal");
        }
    };

    let mut app = PreviewApp::new(title, scene.mount(config));
    info!(entities = app.len(), "preview:start");

    let result = event_loop(&mut terminal, &mut app);

    // Unmount every view (cancelling its timer) before handing the terminal back
    drop(app);
    ratatui::restore();
    info!("preview:exit");
    result
}

fn event_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut PreviewApp) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
                KeyCode::Char('s') => app.cycle_status(),
                KeyCode::Char('b') => app.break_selected(),
                KeyCode::Char('h') => app.toggle_html(),
                _ => {}
            }
        }
    }
}
