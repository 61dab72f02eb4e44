//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It
//! holds no playback state of its own; everything is drawn from the
//! controller's snapshot.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::catalog::Track;
use crate::config::UiSettings;
use crate::player::{Phase, PlaybackState};
use crate::timeline;

fn controls_text(seek_step_percent: f64, volume_step: u8) -> String {
    [
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{seek_step_percent}%"),
        format!("[-/+] volume -/+{volume_step}"),
        "[g/G] top/bottom".to_string(),
        "[r] reload catalog".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn phase_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Loading => "Loading",
        Phase::Playing => "Playing",
        Phase::Paused => "Paused",
        Phase::Errored => "Errored",
    }
}

/// Build the status line: phase, now-playing track and clock, volume, and
/// the last reported error if any.
fn status_text(
    tracks: &[Track],
    state: &PlaybackState,
    volume: u8,
    status: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(" {}", phase_text(state.phase)));

    if let Some(track) = state.current_index.and_then(|i| tracks.get(i)) {
        let elapsed = timeline::format_clock(state.elapsed);
        let total = state
            .duration
            .map_or_else(|| "-:--".to_string(), timeline::format_clock);
        parts.push(format!("Song: {} [{} / {}]", track.name, elapsed, total));
    }

    parts.push(format!("Volume: {volume}"));

    if let Some(msg) = status {
        parts.push(msg.to_string());
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    tracks: &[Track],
    state: &PlaybackState,
    cursor: usize,
    volume: u8,
    status: Option<&str>,
    ui_settings: &UiSettings,
    seek_step_percent: f64,
    volume_step: u8,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" juke ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(tracks, state, volume, status))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Playlist. The active (playing) item gets a marker; the cursor row is
    // highlighted by the list state.
    {
        let total = tracks.len();
        let list_height = chunks[2].height as usize;
        let cursor = cursor.min(total.saturating_sub(1));

        // Only build items for the visible window, centered on the cursor.
        let (start, end, cursor_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, cursor)
        } else {
            let half = list_height / 2;
            let mut start = cursor.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, cursor - start)
        };

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let index = start + offset;
                if state.current_index == Some(index) {
                    let marker = if state.is_playing() { "♪" } else { "•" };
                    ListItem::new(format!("{marker} {}", track.name))
                        .style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(format!("  {}", track.name))
                }
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" tracks ({total}) ")),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ratatui::widgets::ListState::default();
        if total > 0 {
            list_state.select(Some(cursor_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    // Progress gauge. Skipped (empty) while the duration is unknown.
    let percent = timeline::progress_percent(state.elapsed, state.duration).unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(timeline::format_clock(state.elapsed));
    frame.render_widget(gauge, chunks[3]);

    // Footer
    let footer = Paragraph::new(controls_text(seek_step_percent, volume_step))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
