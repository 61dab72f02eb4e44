use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::catalog::RemoteCatalog;
use crate::config::EndOfPlaylistSetting;
use crate::engine::RodioEngine;
use crate::player::{AdvancePolicy, Controller, Notice};

mod event_loop;

/// Startup never fails on configuration: a broken or invalid config degrades
/// to defaults with a note on stderr (the terminal is not ours yet).
fn load_settings() -> crate::config::Settings {
    settings_or_defaults(crate::config::Settings::load())
}

fn settings_or_defaults(
    loaded: Result<crate::config::Settings, ::config::ConfigError>,
) -> crate::config::Settings {
    let settings = match loaded {
        Ok(s) => s,
        Err(e) => {
            eprintln!("juke: could not read config ({e}); starting with defaults");
            return crate::config::Settings::default();
        }
    };
    match settings.validate() {
        Ok(()) => settings,
        Err(msg) => {
            eprintln!("juke: config rejected ({msg}); starting with defaults");
            crate::config::Settings::default()
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings();

    // One fetch at startup; afterwards the catalog only reloads on explicit
    // request. A failure leaves the playlist empty and is shown in the
    // status box rather than aborting.
    let catalog = RemoteCatalog::new(&settings.server);
    let (tracks, mut startup_status) = match catalog.fetch_tracks() {
        Ok(tracks) => (tracks, None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    let (engine, engine_events) = RodioEngine::start();
    let (notice_tx, notice_rx) = mpsc::channel::<Notice>();

    let advance = match settings.playback.end_of_playlist {
        EndOfPlaylistSetting::RepeatAll => AdvancePolicy::RepeatAll,
        EndOfPlaylistSetting::StopAtEnd => AdvancePolicy::StopAtEnd,
    };
    let mut controller = Controller::new(engine, tracks, advance, notice_tx);
    controller.set_volume(settings.playback.volume);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut state = event_loop::EventLoopState::new(settings.playback.volume);
        state.status = startup_status.take();

        event_loop::run(
            &mut terminal,
            &settings,
            &catalog,
            &mut controller,
            &engine_events,
            &notice_rx,
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
