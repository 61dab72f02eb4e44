use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use crate::catalog::Track;
use crate::engine::{AudioEngine, EngineError, EngineEvent, EngineEventKind, StreamId};

use super::model::{AdvancePolicy, Notice, Phase};
use super::reconcile::position_of;
use super::Controller;

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Load(String),
    Play,
    Pause,
    Stop,
    SeekTo(f64),
    SetVolume(f32),
}

/// Command log shared between a test and the engine the controller owns.
#[derive(Default, Clone)]
struct CommandLog(Rc<RefCell<Vec<Cmd>>>);

impl CommandLog {
    fn take(&self) -> Vec<Cmd> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// Records commands and hands out monotonically increasing stream ids
/// (1, 2, 3, ...), so tests can address streams directly.
#[derive(Default)]
struct FakeEngine {
    log: CommandLog,
    next_id: u64,
    fail_load: bool,
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, url: &str) -> Result<StreamId, EngineError> {
        self.log.0.borrow_mut().push(Cmd::Load(url.to_string()));
        if self.fail_load {
            return Err(EngineError::Unavailable("no output device".to_string()));
        }
        self.next_id += 1;
        Ok(StreamId(self.next_id))
    }

    fn play(&mut self) {
        self.log.0.borrow_mut().push(Cmd::Play);
    }

    fn pause(&mut self) {
        self.log.0.borrow_mut().push(Cmd::Pause);
    }

    fn stop(&mut self) {
        self.log.0.borrow_mut().push(Cmd::Stop);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.log.0.borrow_mut().push(Cmd::SeekTo(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.0.borrow_mut().push(Cmd::SetVolume(volume));
    }
}

fn track(name: &str) -> Track {
    Track {
        name: name.to_string(),
        url: format!("https://cdn.test/{name}.mp3"),
    }
}

fn catalog(names: &[&str]) -> Vec<Track> {
    names.iter().map(|n| track(n)).collect()
}

fn controller(
    names: &[&str],
) -> (Controller<FakeEngine>, CommandLog, Receiver<Notice>) {
    controller_with(names, AdvancePolicy::RepeatAll, false)
}

fn controller_with(
    names: &[&str],
    advance: AdvancePolicy,
    fail_load: bool,
) -> (Controller<FakeEngine>, CommandLog, Receiver<Notice>) {
    let log = CommandLog::default();
    let engine = FakeEngine {
        log: log.clone(),
        next_id: 0,
        fail_load,
    };
    let (tx, rx) = mpsc::channel();
    (Controller::new(engine, catalog(names), advance, tx), log, rx)
}

fn event(stream: u64, kind: EngineEventKind) -> EngineEvent {
    EngineEvent {
        stream: StreamId(stream),
        kind,
    }
}

fn errors(rx: &Receiver<Notice>) -> Vec<(String, String)> {
    rx.try_iter()
        .filter_map(|n| match n {
            Notice::PlaybackError { track, message } => Some((track, message)),
            Notice::StateChanged => None,
        })
        .collect()
}

#[test]
fn select_track_confirms_playing_on_first_engine_event() {
    let (mut c, log, _rx) = controller(&["a", "b", "c"]);

    c.select_track(1);
    assert_eq!(c.state().phase, Phase::Loading);
    assert_eq!(c.state().current_index, Some(1));
    assert_eq!(
        log.take(),
        vec![Cmd::Load("https://cdn.test/b.mp3".to_string()), Cmd::Play]
    );

    c.handle_engine_event(event(1, EngineEventKind::Progress(0.0)));
    assert_eq!(c.state().phase, Phase::Playing);
    assert_eq!(c.state().current_index, Some(1));
}

#[test]
fn select_track_out_of_range_is_a_noop() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.select_track(2);
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.state().current_index, None);
    assert!(log.take().is_empty());
}

#[test]
fn select_track_releases_old_stream_before_acquiring_new() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.select_track(0);
    log.take();
    c.select_track(1);

    assert_eq!(
        log.take(),
        vec![
            Cmd::Stop,
            Cmd::Load("https://cdn.test/b.mp3".to_string()),
            Cmd::Play
        ]
    );
}

#[test]
fn toggle_from_idle_starts_first_track() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.toggle_play_pause();
    assert_eq!(c.state().current_index, Some(0));
    assert_eq!(c.state().phase, Phase::Loading);
    assert_eq!(
        log.take(),
        vec![Cmd::Load("https://cdn.test/a.mp3".to_string()), Cmd::Play]
    );
}

#[test]
fn toggle_from_idle_with_empty_catalog_is_a_noop() {
    let (mut c, log, _rx) = controller(&[]);

    c.toggle_play_pause();
    assert_eq!(c.state().phase, Phase::Idle);
    assert!(log.take().is_empty());
}

#[test]
fn toggle_twice_from_playing_pauses_then_resumes() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Progress(0.0)));
    log.take();

    c.toggle_play_pause();
    assert_eq!(c.state().phase, Phase::Paused);
    c.toggle_play_pause();
    assert_eq!(c.state().phase, Phase::Playing);

    // Exactly one pause and one play, in that order.
    assert_eq!(log.take(), vec![Cmd::Pause, Cmd::Play]);
}

#[test]
fn play_next_wraps_from_last_to_first() {
    let (mut c, _log, _rx) = controller(&["a", "b", "c"]);

    c.select_track(2);
    c.play_next();
    assert_eq!(c.state().current_index, Some(0));
}

#[test]
fn play_previous_wraps_from_first_to_last() {
    let (mut c, _log, _rx) = controller(&["a", "b", "c"]);

    c.select_track(0);
    c.play_previous();
    assert_eq!(c.state().current_index, Some(2));
}

#[test]
fn navigation_is_a_noop_on_empty_catalog() {
    let (mut c, log, _rx) = controller(&[]);

    c.play_next();
    c.play_previous();
    assert_eq!(c.state().phase, Phase::Idle);
    assert!(log.take().is_empty());
}

#[test]
fn navigation_from_idle_picks_an_end() {
    let (mut c, _log, _rx) = controller(&["a", "b", "c"]);

    c.play_next();
    assert_eq!(c.state().current_index, Some(0));

    let (mut c, _log, _rx) = controller(&["a", "b", "c"]);
    c.play_previous();
    assert_eq!(c.state().current_index, Some(2));
}

#[test]
fn wraparound_on_single_track_catalog_reloads_the_track() {
    let (mut c, log, _rx) = controller(&["only"]);

    c.select_track(0);
    log.take();
    c.play_next();

    // Same index, but a fresh stop/load/play cycle.
    assert_eq!(
        log.take(),
        vec![
            Cmd::Stop,
            Cmd::Load("https://cdn.test/only.mp3".to_string()),
            Cmd::Play
        ]
    );
}

#[test]
fn superseded_stream_events_are_dropped() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.select_track(0); // stream 1
    c.select_track(1); // stream 2 supersedes it
    c.handle_engine_event(event(2, EngineEventKind::Progress(0.0)));
    log.take();

    // Delayed events from the first stream arrive after the second selection.
    c.handle_engine_event(event(1, EngineEventKind::Ended));
    c.handle_engine_event(event(1, EngineEventKind::Errored("too late".to_string())));
    c.handle_engine_event(event(1, EngineEventKind::Progress(42.0)));

    // State stays governed by track 1 (stream 2); no commands were issued.
    assert_eq!(c.state().current_index, Some(1));
    assert_eq!(c.state().phase, Phase::Playing);
    assert_eq!(c.state().elapsed, 0.0);
    assert!(log.take().is_empty());
}

#[test]
fn ended_auto_advances_to_the_next_track() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Progress(0.0)));
    log.take();

    c.handle_engine_event(event(1, EngineEventKind::Ended));
    assert_eq!(c.state().current_index, Some(1));
    assert_eq!(c.state().phase, Phase::Loading);
    assert_eq!(
        log.take(),
        vec![Cmd::Load("https://cdn.test/b.mp3".to_string()), Cmd::Play]
    );
}

#[test]
fn ended_on_last_track_wraps_to_first_by_default() {
    let (mut c, _log, _rx) = controller(&["a", "b"]);

    c.select_track(1);
    c.handle_engine_event(event(1, EngineEventKind::Ended));
    assert_eq!(c.state().current_index, Some(0));
    assert_eq!(c.state().phase, Phase::Loading);
}

#[test]
fn ended_on_last_track_stops_under_stop_at_end_policy() {
    let (mut c, log, _rx) = controller_with(&["a", "b"], AdvancePolicy::StopAtEnd, false);

    c.select_track(1);
    log.take();
    c.handle_engine_event(event(1, EngineEventKind::Ended));

    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.state().current_index, None);
    assert_eq!(log.take(), vec![Cmd::Stop]);
}

#[test]
fn ended_mid_playlist_still_advances_under_stop_at_end_policy() {
    let (mut c, _log, _rx) = controller_with(&["a", "b"], AdvancePolicy::StopAtEnd, false);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Ended));
    assert_eq!(c.state().current_index, Some(1));
}

#[test]
fn runtime_error_stops_without_advancing() {
    let (mut c, log, rx) = controller(&["a", "b"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Progress(5.0)));
    log.take();
    drop(errors(&rx));

    c.handle_engine_event(event(1, EngineEventKind::Errored("expired URL".to_string())));

    assert_eq!(c.state().phase, Phase::Errored);
    assert_eq!(c.state().current_index, Some(0));
    // No auto-advance: no load was issued for track b.
    assert!(log.take().is_empty());
    assert_eq!(
        errors(&rx),
        vec![("a".to_string(), "expired URL".to_string())]
    );
}

#[test]
fn synchronous_load_failure_reports_the_track_by_name() {
    let (mut c, _log, rx) = controller_with(&["broken"], AdvancePolicy::RepeatAll, true);

    c.select_track(0);
    assert_eq!(c.state().phase, Phase::Errored);

    let reported = errors(&rx);
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].0, "broken");
    assert!(reported[0].1.contains("no output device"));
}

#[test]
fn player_recovers_from_errored_by_selecting_another_track() {
    let (mut c, _log, _rx) = controller(&["a", "b"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Errored("corrupt".to_string())));
    assert_eq!(c.state().phase, Phase::Errored);

    c.select_track(1);
    c.handle_engine_event(event(2, EngineEventKind::Progress(0.0)));
    assert_eq!(c.state().phase, Phase::Playing);
    assert_eq!(c.state().current_index, Some(1));
}

#[test]
fn toggle_from_errored_resumes_the_existing_stream() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Errored("hiccup".to_string())));
    log.take();

    c.toggle_play_pause();
    assert_eq!(c.state().phase, Phase::Playing);
    assert_eq!(log.take(), vec![Cmd::Play]);
}

#[test]
fn seek_is_ignored_until_duration_is_known() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.select_track(0);
    log.take();

    c.seek(50.0);
    assert!(log.take().is_empty());

    c.handle_engine_event(event(1, EngineEventKind::DurationKnown(120.0)));
    c.seek(50.0);
    assert_eq!(log.take(), vec![Cmd::SeekTo(60.0)]);
    assert_eq!(c.state().elapsed, 60.0);
}

#[test]
fn seek_is_ignored_while_idle() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.seek(50.0);
    assert!(log.take().is_empty());
}

#[test]
fn progress_is_clamped_to_known_duration() {
    let (mut c, _log, _rx) = controller(&["a"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::DurationKnown(100.0)));
    c.handle_engine_event(event(1, EngineEventKind::Progress(130.0)));
    assert_eq!(c.state().elapsed, 100.0);
}

#[test]
fn set_volume_maps_percent_and_clamps() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.set_volume(50);
    c.set_volume(200);
    assert_eq!(log.take(), vec![Cmd::SetVolume(0.5), Cmd::SetVolume(1.0)]);
}

#[test]
fn reconcile_follows_the_track_to_its_new_position() {
    let (mut c, log, _rx) = controller(&["a", "b", "c"]);

    c.select_track(2);
    c.handle_engine_event(event(1, EngineEventKind::Progress(10.0)));
    log.take();

    // Reload moved "c" to the front (an upload inserted tracks).
    c.set_catalog(catalog(&["c", "a", "b", "new"]));

    assert_eq!(c.state().current_index, Some(0));
    assert_eq!(c.state().phase, Phase::Playing);
    // Playback was not interrupted.
    assert!(log.take().is_empty());

    // Events from the still-active stream keep flowing into state.
    c.handle_engine_event(event(1, EngineEventKind::Progress(11.0)));
    assert_eq!(c.state().elapsed, 11.0);
}

#[test]
fn reconcile_goes_idle_when_the_track_vanished() {
    let (mut c, log, _rx) = controller(&["a", "b"]);

    c.select_track(1);
    c.handle_engine_event(event(1, EngineEventKind::Progress(3.0)));
    log.take();

    c.set_catalog(catalog(&["a", "other"]));

    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.state().current_index, None);
    // The engine stream was released, not left pointing at a ghost.
    assert_eq!(log.take(), vec![Cmd::Stop]);

    // Late events from the released stream no longer apply.
    c.handle_engine_event(event(1, EngineEventKind::Progress(4.0)));
    assert_eq!(c.state().elapsed, 0.0);
}

#[test]
fn reconcile_while_idle_just_swaps_the_catalog() {
    let (mut c, log, _rx) = controller(&["a"]);

    c.set_catalog(catalog(&["x", "y"]));
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.tracks().len(), 2);
    assert!(log.take().is_empty());
}

#[test]
fn every_transition_fires_a_state_change_notice() {
    let (mut c, _log, rx) = controller(&["a", "b"]);

    c.select_track(0);
    c.handle_engine_event(event(1, EngineEventKind::Progress(0.0)));
    c.toggle_play_pause();

    let changes = rx
        .try_iter()
        .filter(|n| *n == Notice::StateChanged)
        .count();
    assert_eq!(changes, 3);
}

#[test]
fn position_of_matches_by_url_identity() {
    let tracks = catalog(&["a", "b", "c"]);
    assert_eq!(position_of("https://cdn.test/b.mp3", &tracks), Some(1));
    assert_eq!(position_of("https://cdn.test/z.mp3", &tracks), None);
    assert_eq!(position_of("https://cdn.test/b.mp3", &[]), None);
}
