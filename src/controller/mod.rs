//! Controller module - The playback core
//!
//! This module owns the single playback session and coordinates the media
//! engine, the connectivity gate and the progress ticker. It is organized
//! into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Load/toggle/seek operations
//! - `engine_events`: Engine notification listener and state transitions
//! - `ticker`: Periodic progress sampling while playing

mod input;
mod playback;
mod engine_events;
mod ticker;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::engine::MediaEngine;
use crate::model::{PlaybackSession, PlayerEvent, PlayerState, TrackList};
use crate::net::ConnectivityProbe;

use ticker::ProgressTicker;

const DEFAULT_VOLUME_PERCENT: u8 = 100;

#[derive(Clone)]
pub struct PlayerController {
    session: Arc<Mutex<PlaybackSession>>,
    engine: Arc<dyn MediaEngine>,
    connectivity: Arc<dyn ConnectivityProbe>,
    tracks: TrackList,
    events: UnboundedSender<PlayerEvent>,
    ticker: Arc<ProgressTicker>,
    disposed: Arc<AtomicBool>,
    next_epoch: Arc<AtomicU64>,
    volume_percent: Arc<AtomicU8>,
}

impl PlayerController {
    pub fn new(
        tracks: TrackList,
        engine: Arc<dyn MediaEngine>,
        connectivity: Arc<dyn ConnectivityProbe>,
        events: UnboundedSender<PlayerEvent>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(PlaybackSession::default())),
            engine,
            connectivity,
            tracks,
            events,
            ticker: Arc::new(ProgressTicker::new()),
            disposed: Arc::new(AtomicBool::new(false)),
            next_epoch: Arc::new(AtomicU64::new(0)),
            volume_percent: Arc::new(AtomicU8::new(DEFAULT_VOLUME_PERCENT)),
        }
    }

    /// Stop playback and release the engine resource. Safe from any state;
    /// a second call in a row does nothing.
    pub async fn stop(&self) {
        let mut session = self.session.lock().await;
        if session.is_idle() {
            return;
        }

        tracing::info!(track = ?session.track_index, "Stopping playback");
        self.reset_session(&mut session);
        self.emit(PlayerEvent::StateChanged {
            state: PlayerState::Idle,
            track_index: None,
        });
    }

    /// Tear the controller down for good. Cancels the ticker and all
    /// interest in pending engine notifications; nothing is emitted after
    /// this returns.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!("Disposing playback controller");
        self.ticker.stop();

        let mut session = self.session.lock().await;
        session.reset();
        self.engine.reset();
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Shared teardown path: ticker first so no tick observes the dying
    /// session, then the engine, then the session fields.
    fn reset_session(&self, session: &mut PlaybackSession) {
        self.ticker.stop();
        self.engine.reset();
        session.reset();
    }

    fn emit(&self, event: PlayerEvent) {
        if !self.is_disposed() {
            let _ = self.events.send(event);
        }
    }
}
