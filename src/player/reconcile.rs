//! Re-derives the current index after a catalog reload.
//!
//! Uploads insert new tracks and the server does not promise stable
//! ordering, so the playing track is matched by identity (URL), never by
//! its old numeric position.

use crate::catalog::Track;

pub(super) fn position_of(url: &str, tracks: &[Track]) -> Option<usize> {
    tracks.iter().position(|t| t.url == url)
}
