//! Playback controller: the playlist position and play/pause state machine.
//!
//! The controller is the only owner of mutable playback state and of the
//! live engine stream; the UI renders from its [`PlaybackState`] snapshot
//! and reacts to [`Notice`]s.

mod controller;
mod model;
mod reconcile;

pub use controller::*;
pub use model::*;

#[cfg(test)]
mod tests;
