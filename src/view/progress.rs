//! Progress bar rendering

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
};

use crate::model::{PlayerState, TrackList, UiState, format_playback_time};

pub fn render_progress_bar(frame: &mut Frame, area: Rect, ui: &UiState, tracks: &TrackList) {
    let title = match ui.playing_index.and_then(|i| tracks.get(i)) {
        Some(track) => {
            let icon = match ui.state {
                PlayerState::Playing => "▶",
                PlayerState::Paused => "⏸",
                PlayerState::Preparing => "…",
                PlayerState::Idle => " ",
            };
            format!(" {} {} ", icon, track.title)
        }
        None => " No track playing ".to_string(),
    };

    let time_str = format!(
        "{} / {}",
        ui.elapsed,
        format_playback_time(ui.duration_ms / 1000)
    );

    let ratio = if ui.duration_ms > 0 {
        (ui.position_ms as f64 / ui.duration_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let volume_text = format!(" Vol: {}% ", ui.volume);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(volume_text).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
