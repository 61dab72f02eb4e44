use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::catalog::RemoteCatalog;
use crate::config;
use crate::engine::{AudioEngine, EngineEvent};
use crate::player::{Controller, Notice};
use crate::timeline;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Playlist cursor, independent of which track is playing.
    pub cursor: usize,
    /// Current 0-100 volume as shown in the status box.
    pub volume: u8,
    /// Last reported error or info line for the status box.
    pub status: Option<String>,
}

impl EventLoopState {
    pub fn new(volume: u8) -> Self {
        Self {
            cursor: 0,
            volume,
            status: None,
        }
    }
}

/// Main terminal event loop: pumps engine events and notices into the
/// controller, handles input and redraws. Returns `Ok(())` on quit.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    catalog: &RemoteCatalog,
    controller: &mut Controller<E>,
    engine_events: &Receiver<EngineEvent>,
    notices: &Receiver<Notice>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Feed pending engine events into the state machine, one to
        // completion before the next.
        while let Ok(ev) = engine_events.try_recv() {
            controller.handle_engine_event(ev);
        }

        // Surface error reports. Plain state changes need no handling here:
        // every iteration redraws from the controller snapshot anyway.
        while let Ok(notice) = notices.try_recv() {
            if let Notice::PlaybackError { track, message } = notice {
                state.status = Some(format!("Playback error: \"{track}\": {message}"));
            }
        }

        // A reload can shrink the catalog underneath the cursor.
        if state.cursor >= controller.tracks().len() {
            state.cursor = controller.tracks().len().saturating_sub(1);
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                controller.tracks(),
                controller.state(),
                state.cursor,
                state.volume,
                state.status.as_deref(),
                &settings.ui,
                settings.controls.seek_step_percent,
                settings.controls.volume_step,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, catalog, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key_event<E: AudioEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    catalog: &RemoteCatalog,
    controller: &mut Controller<E>,
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            let len = controller.tracks().len();
            if len > 0 {
                state.cursor = (state.cursor + 1) % len;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let len = controller.tracks().len();
            if len > 0 {
                state.cursor = if state.cursor == 0 {
                    len - 1
                } else {
                    state.cursor - 1
                };
            }
        }
        KeyCode::Char('g') => state.cursor = 0,
        KeyCode::Char('G') => state.cursor = controller.tracks().len().saturating_sub(1),
        KeyCode::Enter => controller.select_track(state.cursor),
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.toggle_play_pause(),
        KeyCode::Char('l') => controller.play_next(),
        KeyCode::Char('h') => controller.play_previous(),
        KeyCode::Char('L') => seek_by(controller, settings.controls.seek_step_percent),
        KeyCode::Char('H') => seek_by(controller, -settings.controls.seek_step_percent),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.volume = state
                .volume
                .saturating_add(settings.controls.volume_step)
                .min(100);
            controller.set_volume(state.volume);
        }
        KeyCode::Char('-') => {
            state.volume = state.volume.saturating_sub(settings.controls.volume_step);
            controller.set_volume(state.volume);
        }
        KeyCode::Char('r') => match catalog.fetch_tracks() {
            Ok(tracks) => {
                let count = tracks.len();
                controller.set_catalog(tracks);
                state.status = Some(format!("Catalog reloaded: {count} tracks"));
            }
            Err(e) => {
                // Keep the current catalog; a transient fetch failure must
                // not tear down ongoing playback.
                state.status = Some(e.to_string());
            }
        },
        _ => {}
    }

    false
}

/// Relative seek, expressed through the controller's absolute percent seek.
/// Does nothing until the track's duration is known.
fn seek_by<E: AudioEngine>(controller: &mut Controller<E>, delta_percent: f64) {
    let snapshot = controller.state();
    let Some(current) = timeline::progress_percent(snapshot.elapsed, snapshot.duration) else {
        return;
    };
    controller.seek((current + delta_percent).clamp(0.0, 100.0));
}
