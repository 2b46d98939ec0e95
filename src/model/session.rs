//! The single mutable playback session
//!
//! Exactly one session exists at a time. A new load resets any prior one
//! before touching the engine, and every engine notification carries the
//! epoch of the session it belongs to so leftovers from a superseded load
//! can be discarded.

use super::PlayerState;

#[derive(Clone, Debug, Default)]
pub struct PlaybackSession {
    pub state: PlayerState,
    pub track_index: Option<usize>,
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Generation counter identifying this session for stale-notification
    /// filtering. Bumped on every accepted load.
    pub epoch: u64,
}

impl PlaybackSession {
    /// Back to idle. Position and duration are only meaningful while
    /// playing or paused, so they go too. The epoch stays: a notification
    /// arriving for it is rejected by the idle check instead.
    pub fn reset(&mut self) {
        self.state = PlayerState::Idle;
        self.track_index = None;
        self.position_ms = 0;
        self.duration_ms = 0;
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlayerState::Idle
    }

    /// Seek and pause/resume only make sense with an audible session.
    pub fn is_audible(&self) -> bool {
        matches!(self.state, PlayerState::Playing | PlayerState::Paused)
    }

    /// Clamp a requested seek target into `[0, duration_ms]`. Negative
    /// requests come straight from the surface and map to 0.
    pub fn clamp_seek(&self, target_ms: i64) -> u64 {
        (target_ms.max(0) as u64).min(self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything_but_epoch() {
        let mut session = PlaybackSession {
            state: PlayerState::Playing,
            track_index: Some(3),
            position_ms: 12_000,
            duration_ms: 180_000,
            epoch: 7,
        };
        session.reset();
        assert!(session.is_idle());
        assert_eq!(session.track_index, None);
        assert_eq!(session.position_ms, 0);
        assert_eq!(session.duration_ms, 0);
        assert_eq!(session.epoch, 7);
    }

    #[test]
    fn seek_clamps_to_track_bounds() {
        let session = PlaybackSession {
            duration_ms: 10_000,
            ..Default::default()
        };
        assert_eq!(session.clamp_seek(-5), 0);
        assert_eq!(session.clamp_seek(0), 0);
        assert_eq!(session.clamp_seek(4_321), 4_321);
        assert_eq!(session.clamp_seek(15_000), 10_000);
    }

    #[test]
    fn seek_with_unknown_duration_pins_to_zero() {
        let session = PlaybackSession::default();
        assert_eq!(session.clamp_seek(5_000), 0);
    }
}
