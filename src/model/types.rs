//! Core type definitions for the application

use std::time::Instant;

use anyhow::{bail, Result};

/// A single streamable track. Tracks have no identity beyond their position
/// in the list; the index is the addressing key everywhere.
#[derive(Clone, Debug)]
pub struct Track {
    pub title: String,
    pub url: String,
}

/// The fixed, ordered track list supplied once at startup.
#[derive(Clone, Debug)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    /// Build the list from two index-aligned sequences.
    pub fn new(titles: Vec<String>, urls: Vec<String>) -> Result<Self> {
        if titles.len() != urls.len() {
            bail!(
                "track list mismatch: {} titles but {} urls",
                titles.len(),
                urls.len()
            );
        }

        let tracks = titles
            .into_iter()
            .zip(urls)
            .map(|(title, url)| Track { title, url })
            .collect();

        Ok(Self { tracks })
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

/// Playback session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Preparing,
    Playing,
    Paused,
}

/// What went wrong, from the user's point of view. All variants are
/// non-fatal: the session resets to idle and nothing is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("track is not playable")]
    InvalidTrack,
    #[error("no network connection")]
    NetworkUnavailable,
    #[error("playback failed")]
    PlaybackFailed,
}

/// Events emitted by the playback core for the presentation surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    StateChanged {
        state: PlayerState,
        track_index: Option<usize>,
    },
    DurationKnown {
        duration_ms: u64,
    },
    ProgressTick {
        position_ms: u64,
        elapsed: String,
    },
    PlaybackError {
        kind: ErrorKind,
        message: String,
    },
    VolumeChanged {
        percent: u8,
    },
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub selected: usize,
    pub state: PlayerState,
    pub playing_index: Option<usize>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub elapsed: String,
    pub volume: u8,
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: 0,
            state: PlayerState::Idle,
            playing_index: None,
            position_ms: 0,
            duration_ms: 0,
            elapsed: "0:00".to_string(),
            volume: 100,
            notice: None,
            notice_timestamp: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
        self.notice_timestamp = Some(Instant::now());
    }

    /// Drop notices older than 5 seconds so the list stays readable.
    pub fn clear_old_notice(&mut self) {
        if let Some(ts) = self.notice_timestamp {
            if ts.elapsed().as_secs() >= 5 {
                self.notice = None;
                self.notice_timestamp = None;
            }
        }
    }

    /// Fold one core event into the render state.
    pub fn apply_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::StateChanged { state, track_index } => {
                self.state = state;
                self.playing_index = track_index;
                if state == PlayerState::Idle {
                    self.position_ms = 0;
                    self.duration_ms = 0;
                    self.elapsed = "0:00".to_string();
                }
            }
            PlayerEvent::DurationKnown { duration_ms } => {
                self.duration_ms = duration_ms;
            }
            PlayerEvent::ProgressTick {
                position_ms,
                elapsed,
            } => {
                self.position_ms = position_ms;
                self.elapsed = elapsed;
            }
            PlayerEvent::PlaybackError { message, .. } => {
                self.set_notice(message);
            }
            PlayerEvent::VolumeChanged { percent } => {
                self.volume = percent;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_list_rejects_length_mismatch() {
        let titles = vec!["One".to_string(), "Two".to_string()];
        let urls = vec!["http://example.com/one.mp3".to_string()];
        assert!(TrackList::new(titles, urls).is_err());
    }

    #[test]
    fn track_list_pairs_by_index() {
        let titles = vec!["One".to_string(), "Two".to_string()];
        let urls = vec![
            "http://example.com/one.mp3".to_string(),
            "http://example.com/two.mp3".to_string(),
        ];
        let list = TrackList::new(titles, urls).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().title, "Two");
        assert_eq!(list.get(1).unwrap().url, "http://example.com/two.mp3");
        assert!(list.get(2).is_none());
    }

    #[test]
    fn idle_state_resets_progress_fields() {
        let mut ui = UiState::default();
        ui.apply_event(PlayerEvent::DurationKnown { duration_ms: 90_000 });
        ui.apply_event(PlayerEvent::ProgressTick {
            position_ms: 45_000,
            elapsed: "0:45".to_string(),
        });
        assert_eq!(ui.duration_ms, 90_000);
        assert_eq!(ui.position_ms, 45_000);

        ui.apply_event(PlayerEvent::StateChanged {
            state: PlayerState::Idle,
            track_index: None,
        });
        assert_eq!(ui.position_ms, 0);
        assert_eq!(ui.duration_ms, 0);
        assert_eq!(ui.elapsed, "0:00");
    }

    #[test]
    fn volume_survives_a_return_to_idle() {
        let mut ui = UiState::default();
        assert_eq!(ui.volume, 100);

        ui.apply_event(PlayerEvent::VolumeChanged { percent: 35 });
        assert_eq!(ui.volume, 35);

        ui.apply_event(PlayerEvent::StateChanged {
            state: PlayerState::Idle,
            track_index: None,
        });
        assert_eq!(ui.volume, 35);
    }
}
