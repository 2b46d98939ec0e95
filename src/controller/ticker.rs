//! Progress ticker
//!
//! An owned, cancellable task that samples the engine position once a
//! second while the session is playing and pushes a progress tick to the
//! presentation surface. Started and stopped exactly at the transitions
//! into and out of `Playing`, and aborted on dispose; a tick that was
//! already scheduled when the session left `Playing` re-checks before
//! emitting and falls through silently.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::model::{PlayerEvent, PlayerState, format_playback_time};

use super::PlayerController;

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub(super) struct ProgressTicker {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Start ticking. Replaces any previous task. The first tick fires one
    /// period after start, not immediately.
    pub fn start(&self, controller: PlayerController) {
        let mut slot = self.handle.lock().unwrap();
        if let Some(old) = slot.take() {
            old.abort();
        }

        // Fix the first deadline now, not at the task's first poll.
        let first_tick = Instant::now() + TICK_PERIOD;
        *slot = Some(tokio::spawn(async move {
            let mut interval = interval_at(first_tick, TICK_PERIOD);
            loop {
                interval.tick().await;
                if !controller.tick().await {
                    break;
                }
            }
        }));
    }

    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl PlayerController {
    /// One progress sample. Returns false when ticking should end.
    pub(crate) async fn tick(&self) -> bool {
        if self.is_disposed() {
            return false;
        }

        let mut session = self.session.lock().await;
        if session.state != PlayerState::Playing {
            return false;
        }

        let position_ms = self.engine.position_ms();
        session.position_ms = position_ms;

        self.emit(PlayerEvent::ProgressTick {
            position_ms,
            elapsed: format_playback_time(position_ms / 1000),
        });
        true
    }
}
