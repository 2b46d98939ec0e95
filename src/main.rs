mod config;
mod controller;
mod engine;
mod logging;
mod model;
mod net;
mod view;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use config::Config;
use controller::PlayerController;
use engine::StreamEngine;
use model::{PlayerEvent, TrackList, UiState};
use net::TcpProbe;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== tunestream starting ===");

    let config = Config::load_or_default(Path::new(config::CONFIG_FILE))?;
    let tracks = TrackList::new(config.titles(), config.urls())
        .context("Invalid track list configuration")?;
    tracing::info!(tracks = tracks.len(), "Track list loaded");

    let (notice_tx, notice_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();

    let stream_engine =
        StreamEngine::new(notice_tx).context("Failed to initialize the media engine")?;

    let controller = PlayerController::new(
        tracks.clone(),
        Arc::new(stream_engine),
        Arc::new(TcpProbe::default()),
        event_tx,
    );
    controller.spawn_notification_listener(notice_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller.clone(), event_rx, &tracks).await;

    // Tear the core down before the terminal so no late tick can land.
    controller.dispose().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("tunestream shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: PlayerController,
    mut events: UnboundedReceiver<PlayerEvent>,
    tracks: &TrackList,
) -> io::Result<()> {
    let mut ui = UiState::default();

    loop {
        // Fold pending core events into the render state.
        while let Ok(event) = events.try_recv() {
            ui.apply_event(event);
        }
        ui.clear_old_notice();

        terminal.draw(|f| {
            AppView::render(f, &ui, tracks);
        })?;

        // Short poll keeps progress updates smooth while waiting for keys.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key, &mut ui).await;
            }
        }

        if ui.should_quit {
            break;
        }
    }

    Ok(())
}
