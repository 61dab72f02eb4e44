use std::sync::mpsc::Sender;

use crate::catalog::Track;
use crate::engine::{AudioEngine, EngineEvent, EngineEventKind, StreamId};
use crate::timeline;

use super::model::{AdvancePolicy, Notice, Phase, PlaybackState};
use super::reconcile::position_of;

/// The playback state machine.
///
/// Owns the catalog snapshot, the current [`PlaybackState`] and the one live
/// engine stream. All transitions happen here, in reaction to user commands
/// or engine events, one event to completion at a time.
pub struct Controller<E: AudioEngine> {
    engine: E,
    tracks: Vec<Track>,
    state: PlaybackState,
    /// The stream whose events are allowed to mutate state.
    active: Option<StreamId>,
    /// Persisted across loads; new streams start at this volume.
    volume: f32,
    advance: AdvancePolicy,
    notices: Sender<Notice>,
}

impl<E: AudioEngine> Controller<E> {
    pub fn new(
        engine: E,
        tracks: Vec<Track>,
        advance: AdvancePolicy,
        notices: Sender<Notice>,
    ) -> Self {
        Self {
            engine,
            tracks,
            state: PlaybackState::default(),
            active: None,
            volume: 1.0,
            advance,
            notices,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Select and start the track at `index`. Out-of-range indices are a
    /// no-op.
    ///
    /// The prior stream is released before the new one is acquired, on every
    /// path. Combined with the [`StreamId`] guard in
    /// [`handle_engine_event`](Self::handle_engine_event) this keeps exactly
    /// one stream alive and keeps stale events away from the new state.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }

        self.release_stream();

        let url = self.tracks[index].url.clone();
        self.state.current_index = Some(index);
        self.state.elapsed = 0.0;
        self.state.duration = None;

        match self.engine.load(&url) {
            Ok(stream) => {
                self.active = Some(stream);
                self.engine.play();
                self.state.phase = Phase::Loading;
            }
            Err(err) => {
                self.state.phase = Phase::Errored;
                self.report_error(index, &err.to_string());
            }
        }
        self.notify();
    }

    /// Toggle between playing and paused.
    ///
    /// From idle this starts the first track (no-op on an empty catalog).
    /// From errored it resumes the existing stream, or retries the current
    /// track when the load itself had failed and no stream exists.
    pub fn toggle_play_pause(&mut self) {
        match self.state.phase {
            Phase::Idle => {
                if !self.tracks.is_empty() {
                    self.select_track(0);
                }
            }
            Phase::Playing | Phase::Loading => {
                self.engine.pause();
                self.state.phase = Phase::Paused;
                self.notify();
            }
            Phase::Paused | Phase::Errored => {
                if self.active.is_some() {
                    self.engine.play();
                    self.state.phase = Phase::Playing;
                    self.notify();
                } else if let Some(index) = self.state.current_index {
                    self.select_track(index);
                }
            }
        }
    }

    /// Advance to the next track, wrapping past the end. Always reloads,
    /// even when wrap-around lands on the same index.
    pub fn play_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let next = match self.state.current_index {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => 0,
        };
        self.select_track(next);
    }

    /// Go back one track, wrapping from the first to the last.
    pub fn play_previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let previous = match self.state.current_index {
            Some(i) if i > 0 => i - 1,
            _ => self.tracks.len() - 1,
        };
        self.select_track(previous);
    }

    /// Seek to `percent` of the current track. Ignored while no stream is
    /// held or the duration is still unknown.
    pub fn seek(&mut self, percent: f64) {
        if self.active.is_none() {
            return;
        }
        let Some(seconds) = timeline::seek_seconds(percent, self.state.duration) else {
            return;
        };

        self.engine.seek_to(seconds);
        self.state.elapsed = seconds;
        self.notify();
    }

    /// Set the volume from a `0..=100` control value. Applies to the current
    /// stream and persists for streams acquired later.
    pub fn set_volume(&mut self, percent: u8) {
        self.volume = f32::from(percent.min(100)) / 100.0;
        self.engine.set_volume(self.volume);
        self.notify();
    }

    /// Replace the catalog snapshot, re-deriving the current index by track
    /// identity. A track that vanished forces the player back to idle rather
    /// than silently pointing at whatever now sits at its old position.
    pub fn set_catalog(&mut self, tracks: Vec<Track>) {
        let current_url = self
            .state
            .current_index
            .and_then(|i| self.tracks.get(i))
            .map(|t| t.url.clone());

        self.tracks = tracks;

        if let Some(url) = current_url {
            match position_of(&url, &self.tracks) {
                Some(position) => self.state.current_index = Some(position),
                None => self.to_idle(),
            }
        }
        self.notify();
    }

    /// Feed one engine event into the state machine.
    ///
    /// Events from any stream other than the active one are dropped: they
    /// belong to a superseded selection.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.active != Some(event.stream) {
            return;
        }

        match event.kind {
            EngineEventKind::Progress(seconds) => {
                if self.state.phase == Phase::Loading {
                    self.state.phase = Phase::Playing;
                }
                self.state.elapsed = timeline::clamp_elapsed(seconds, self.state.duration);
                self.notify();
            }
            EngineEventKind::DurationKnown(seconds) => {
                if self.state.phase == Phase::Loading {
                    self.state.phase = Phase::Playing;
                }
                self.state.duration = Some(seconds);
                self.state.elapsed = timeline::clamp_elapsed(self.state.elapsed, self.state.duration);
                self.notify();
            }
            EngineEventKind::Ended => {
                let at_last = self
                    .state
                    .current_index
                    .is_none_or(|i| i + 1 >= self.tracks.len());
                if at_last && self.advance == AdvancePolicy::StopAtEnd {
                    self.to_idle();
                    self.notify();
                } else {
                    self.play_next();
                }
            }
            EngineEventKind::Errored(message) => {
                // Deliberately no auto-advance: one corrupt or expired file
                // must not cascade-fail through the whole playlist.
                self.state.phase = Phase::Errored;
                if let Some(index) = self.state.current_index {
                    self.report_error(index, &message);
                }
                self.notify();
            }
        }
    }

    fn to_idle(&mut self) {
        self.release_stream();
        self.state = PlaybackState::default();
    }

    fn release_stream(&mut self) {
        if self.active.take().is_some() {
            self.engine.stop();
        }
    }

    fn notify(&self) {
        let _ = self.notices.send(Notice::StateChanged);
    }

    fn report_error(&self, index: usize, message: &str) {
        let track = self
            .tracks
            .get(index)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        let _ = self.notices.send(Notice::PlaybackError {
            track,
            message: message.to_string(),
        });
    }
}
