//! Playback control methods

use std::sync::atomic::Ordering;

use crate::model::{ErrorKind, PlayerEvent, PlayerState, format_playback_time};

use super::PlayerController;

const VOLUME_STEP_PERCENT: u8 = 5;

impl PlayerController {
    /// Load the track at `index` and start playing it once prepared.
    ///
    /// Any prior session is discarded first. Fails softly (notification,
    /// state stays idle) on a bad index, a blank url, or missing
    /// connectivity; otherwise enters `Preparing` and returns without
    /// waiting for the engine.
    pub async fn load_and_play(&self, index: usize) {
        let mut session = self.session.lock().await;

        if !session.is_idle() {
            self.reset_session(&mut session);
            self.emit(PlayerEvent::StateChanged {
                state: PlayerState::Idle,
                track_index: None,
            });
        }

        let track = match self.tracks.get(index) {
            Some(track) if !track.url.trim().is_empty() => track.clone(),
            _ => {
                tracing::warn!(index, "Track is not playable");
                self.emit(PlayerEvent::PlaybackError {
                    kind: ErrorKind::InvalidTrack,
                    message: format!("Track {} is not playable", index + 1),
                });
                return;
            }
        };

        let status = self.connectivity.status();
        if !status.is_usable() {
            tracing::warn!(?status, "No usable network connection");
            self.emit(PlayerEvent::PlaybackError {
                kind: ErrorKind::NetworkUnavailable,
                message: "No network connection".to_string(),
            });
            return;
        }

        let epoch = self.next_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        session.epoch = epoch;
        session.track_index = Some(index);
        session.state = PlayerState::Preparing;

        tracing::info!(index, epoch, title = %track.title, "Preparing track");
        self.emit(PlayerEvent::StateChanged {
            state: PlayerState::Preparing,
            track_index: Some(index),
        });

        self.engine.prepare(epoch, track.url);
    }

    /// Flip between playing and paused. Does nothing in any other state.
    pub async fn toggle_play_pause(&self) {
        let mut session = self.session.lock().await;

        match session.state {
            PlayerState::Playing => {
                session.state = PlayerState::Paused;
                self.engine.pause();
                self.ticker.stop();
                tracing::debug!(track = ?session.track_index, "Paused");
                self.emit(PlayerEvent::StateChanged {
                    state: PlayerState::Paused,
                    track_index: session.track_index,
                });
            }
            PlayerState::Paused => {
                session.state = PlayerState::Playing;
                self.engine.play();
                self.ticker.start(self.clone());
                tracing::debug!(track = ?session.track_index, "Resumed");
                self.emit(PlayerEvent::StateChanged {
                    state: PlayerState::Playing,
                    track_index: session.track_index,
                });
            }
            _ => {}
        }
    }

    /// Seek to `target_ms`, clamped into the track. Only meaningful while
    /// playing or paused; the position updates optimistically instead of
    /// waiting for the engine to confirm.
    pub async fn seek_to(&self, target_ms: i64) {
        let mut session = self.session.lock().await;

        if !session.is_audible() {
            return;
        }

        let clamped = session.clamp_seek(target_ms);
        session.position_ms = clamped;
        self.engine.seek(clamped);

        tracing::debug!(target_ms, clamped, "Seek");
        // The ticker is stopped while paused, so push the new position out.
        self.emit(PlayerEvent::ProgressTick {
            position_ms: clamped,
            elapsed: format_playback_time(clamped / 1000),
        });
    }

    /// Raise the volume one step, capped at 100%.
    pub fn volume_up(&self) {
        let current = self.volume_percent.load(Ordering::SeqCst);
        self.apply_volume((current + VOLUME_STEP_PERCENT).min(100));
    }

    /// Lower the volume one step, floored at 0%.
    pub fn volume_down(&self) {
        let current = self.volume_percent.load(Ordering::SeqCst);
        self.apply_volume(current.saturating_sub(VOLUME_STEP_PERCENT));
    }

    /// Volume is independent of the session: it is applied whether or not
    /// anything is loaded and carries over to the next track.
    fn apply_volume(&self, percent: u8) {
        self.volume_percent.store(percent, Ordering::SeqCst);
        self.engine.set_volume(f32::from(percent) / 100.0);
        tracing::debug!(percent, "Volume changed");
        self.emit(PlayerEvent::VolumeChanged { percent });
    }
}
