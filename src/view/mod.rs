//! View module - TUI rendering
//!
//! Pure rendering over the `UiState` the event loop maintains; nothing in
//! here talks to the controller.

mod progress;
mod tracks;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::model::{TrackList, UiState};

const HELP_LINE: &str =
    " ↑/↓ select | Enter play | Space pause | ←/→ seek | +/- volume | s stop | q quit";

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui: &UiState, tracks: &TrackList) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        tracks::render_track_list(frame, chunks[0], ui, tracks);
        progress::render_progress_bar(frame, chunks[1], ui, tracks);

        let footer = match &ui.notice {
            Some(notice) => Paragraph::new(Line::from(format!(" {}", notice)))
                .style(Style::default().fg(Color::Red)),
            None => Paragraph::new(Line::from(HELP_LINE))
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(footer, chunks[2]);
    }
}
