use serde::Deserialize;

/// One playable audio item as advertised by the catalog server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    /// Display name shown in the playlist.
    pub name: String,
    /// Stream URL. Doubles as the track's identity across catalog reloads;
    /// positions are not stable, URLs are.
    pub url: String,
}
