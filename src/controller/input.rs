//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::model::UiState;

use super::PlayerController;

impl PlayerController {
    pub async fn handle_key_event(&self, key: KeyEvent, ui: &mut UiState) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                ui.should_quit = true;
            }
            KeyCode::Up => {
                ui.selected = ui.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if !self.tracks.is_empty() {
                    ui.selected = (ui.selected + 1).min(self.tracks.len() - 1);
                }
            }
            // Play the highlighted track
            KeyCode::Enter => {
                self.load_and_play(ui.selected).await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                self.toggle_play_pause().await;
            }
            // Seek 5 seconds either way
            KeyCode::Left => {
                self.seek_to(ui.position_ms as i64 - 5_000).await;
            }
            KeyCode::Right => {
                self.seek_to(ui.position_ms as i64 + 5_000).await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.stop().await;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.volume_up();
            }
            KeyCode::Char('-') => {
                self.volume_down();
            }
            // Dismiss a notice early
            KeyCode::Esc => {
                ui.notice = None;
                ui.notice_timestamp = None;
            }
            _ => {}
        }
        Ok(())
    }
}
