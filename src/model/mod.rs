//! Model module - Core state and data types
//!
//! This module contains the data structures the playback core and the UI
//! operate on. It is organized into submodules by responsibility:
//!
//! - `types`: Track list, player states, events, error taxonomy, UI state
//! - `session`: The single mutable playback session
//! - `time`: Elapsed/total time formatting

mod types;
mod session;
mod time;

// Re-export all public types for convenient access
pub use types::{
    Track, TrackList, PlayerState, PlayerEvent, ErrorKind, UiState,
};

pub use session::PlaybackSession;

pub use time::format_playback_time;
