//! Engine-facing small types: stream identity, events and errors.

use std::fmt;

/// Identifier of one live engine stream.
///
/// Every event carries the stream it originated from, and the controller
/// drops events whose stream is not the active one, so a superseded stream
/// can never mutate state. Identifiers are never reused, which keeps that
/// guard sound even when rapid navigation revisits the same track index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StreamId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// Current playback position in seconds.
    Progress(f64),
    /// Total duration in seconds, once the stream has been probed.
    DurationKnown(f64),
    /// The stream played to completion.
    Ended,
    /// The stream failed to load or errored mid-play.
    Errored(String),
}

/// One event emitted by the engine, tagged with its originating stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub stream: StreamId,
    pub kind: EngineEventKind,
}

/// Synchronous engine failure: the engine rejected a command outright.
#[derive(Debug)]
pub enum EngineError {
    Unavailable(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Unavailable(msg) => write!(f, "audio engine unavailable: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Commands understood by a playback engine.
///
/// `load` implicitly supersedes the current stream. Load/play completion is
/// confirmed asynchronously: the first `Progress` or `DurationKnown` event
/// for the returned [`StreamId`] confirms that playback started.
pub trait AudioEngine {
    /// Acquire a new stream for `url`, superseding the current one.
    fn load(&mut self, url: &str) -> Result<StreamId, EngineError>;
    /// Start or resume the current stream.
    fn play(&mut self);
    /// Pause the current stream.
    fn pause(&mut self);
    /// Stop and release the current stream.
    fn stop(&mut self);
    /// Jump to an absolute position in seconds.
    fn seek_to(&mut self, seconds: f64);
    /// Set the output volume (`0.0..=1.0`). Persists across `load`s.
    fn set_volume(&mut self, volume: f32);
}
