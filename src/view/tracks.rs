//! Track list rendering

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::model::{PlayerState, TrackList, UiState};

pub fn render_track_list(frame: &mut Frame, area: Rect, ui: &UiState, tracks: &TrackList) {
    let items: Vec<ListItem> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if ui.playing_index == Some(i) {
                match ui.state {
                    PlayerState::Playing => "▶",
                    PlayerState::Paused => "⏸",
                    PlayerState::Preparing => "…",
                    PlayerState::Idle => " ",
                }
            } else {
                " "
            };

            let style = if ui.playing_index == Some(i) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            ListItem::new(format!(" {} {}", marker, track.title)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    list_state.select(Some(ui.selected));

    frame.render_stateful_widget(list, area, &mut list_state);
}
