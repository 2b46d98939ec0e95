//! Engine notification listener
//!
//! All ready/error/completed notifications from the media engine funnel
//! through `apply_notification`, the single state-transition function. A
//! notification whose epoch no longer matches the live session is a
//! leftover from a superseded load and is discarded here.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::engine::{EngineNotification, NotificationKind};
use crate::model::{ErrorKind, PlayerEvent, PlayerState};

use super::PlayerController;

impl PlayerController {
    /// Drain the engine notification channel onto the controller.
    pub fn spawn_notification_listener(&self, mut rx: UnboundedReceiver<EngineNotification>) {
        let controller = self.clone();
        tracing::info!("Starting engine notification listener");

        tokio::spawn(async move {
            while let Some(note) = rx.recv().await {
                if controller.is_disposed() {
                    tracing::debug!("Engine notification listener shutting down");
                    break;
                }
                controller.apply_notification(note).await;
            }
        });
    }

    pub(crate) async fn apply_notification(&self, note: EngineNotification) {
        if self.is_disposed() {
            return;
        }

        let mut session = self.session.lock().await;

        if session.is_idle() || note.epoch != session.epoch {
            tracing::debug!(
                note_epoch = note.epoch,
                session_epoch = session.epoch,
                "Discarding stale engine notification"
            );
            return;
        }

        match note.kind {
            NotificationKind::Ready { duration_ms } => {
                if session.state != PlayerState::Preparing {
                    tracing::debug!(state = ?session.state, "Ready outside preparing, ignored");
                    return;
                }

                session.duration_ms = duration_ms;
                session.position_ms = 0;
                session.state = PlayerState::Playing;
                self.engine.play();

                tracing::info!(
                    track = ?session.track_index,
                    duration_ms,
                    "Track ready, playback started"
                );
                self.emit(PlayerEvent::DurationKnown { duration_ms });
                self.emit(PlayerEvent::StateChanged {
                    state: PlayerState::Playing,
                    track_index: session.track_index,
                });
                self.ticker.start(self.clone());
            }
            NotificationKind::Error { message } => {
                tracing::warn!(track = ?session.track_index, error = %message, "Playback failed");
                self.reset_session(&mut session);
                self.emit(PlayerEvent::PlaybackError {
                    kind: ErrorKind::PlaybackFailed,
                    message: "Error playing track".to_string(),
                });
                self.emit(PlayerEvent::StateChanged {
                    state: PlayerState::Idle,
                    track_index: None,
                });
            }
            NotificationKind::Completed => {
                tracing::info!(track = ?session.track_index, "Track finished");
                self.reset_session(&mut session);
                self.emit(PlayerEvent::StateChanged {
                    state: PlayerState::Idle,
                    track_index: None,
                });
            }
        }
    }
}
