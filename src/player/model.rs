//! Player model types: phases, the state snapshot and emitted notices.

/// Lifecycle phase of the playback controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// No track selected, no stream held.
    #[default]
    Idle,
    /// A track was selected and the engine load was issued; playback has not
    /// been confirmed yet. There is no timeout: a load that never confirms
    /// stays here until the user selects something else.
    Loading,
    Playing,
    Paused,
    /// Terminal for the current track; recoverable by selecting any track.
    Errored,
}

/// Read-only snapshot of the player, handed to the UI for rendering.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PlaybackState {
    /// Position in the current catalog snapshot, `None` when idle.
    pub current_index: Option<usize>,
    pub phase: Phase,
    /// Elapsed seconds, clamped against `duration` once it is known.
    pub elapsed: f64,
    /// Total seconds, `None` until the engine reports it.
    pub duration: Option<f64>,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}

/// What happens when the last track of the playlist ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AdvancePolicy {
    /// Wrap around to the first track (the default playlist behavior).
    #[default]
    RepeatAll,
    /// Release the stream and go back to idle.
    StopAtEnd,
}

/// Signals the controller emits for the UI layer. The controller never
/// decides presentation; it only reports.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Fired after every state transition.
    StateChanged,
    /// A track failed to load or errored mid-play.
    PlaybackError { track: String, message: String },
}
