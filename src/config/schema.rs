use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/juke/config.toml` or
/// `~/.config/juke/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the catalog server.
    pub url: String,
    /// Path of the track-list endpoint, joined onto `url`.
    pub list_path: String,
    /// Connect timeout for catalog requests (seconds).
    pub connect_timeout_secs: u64,
    /// Read timeout for catalog requests (seconds).
    pub read_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            list_path: "/music-list".to_string(),
            connect_timeout_secs: 5,
            read_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Startup volume (0-100).
    pub volume: u8,
    /// What happens when the last track of the playlist ends.
    pub end_of_playlist: EndOfPlaylistSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            end_of_playlist: EndOfPlaylistSetting::RepeatAll,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndOfPlaylistSetting {
    #[serde(alias = "repeat_all", alias = "repeat", alias = "loop")]
    RepeatAll,
    #[serde(alias = "stop_at_end", alias = "stop")]
    StopAtEnd,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seek distance for one `H` / `L` press, as a percentage of the track.
    pub seek_step_percent: f64,
    /// Volume change for one `-` / `+` press (0-100 scale).
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_percent: 5.0,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ juke ~ ".to_string(),
        }
    }
}
