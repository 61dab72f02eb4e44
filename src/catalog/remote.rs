use std::fmt;
use std::time::Duration;

use crate::config::ServerSettings;

use super::model::Track;

/// Why a catalog fetch produced no track list.
#[derive(Debug)]
pub enum CatalogError {
    /// The HTTP request failed or the server answered with an error status.
    Http(String),
    /// The response body was not the expected JSON array of tracks.
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Http(msg) => write!(f, "catalog request failed: {msg}"),
            CatalogError::Parse(msg) => write!(f, "catalog response invalid: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Catalog service backed by `ureq`.
pub struct RemoteCatalog {
    agent: ureq::Agent,
    list_url: String,
}

impl RemoteCatalog {
    pub fn new(server: &ServerSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(server.connect_timeout_secs))
            .timeout_read(Duration::from_secs(server.read_timeout_secs))
            .build();

        Self {
            agent,
            list_url: list_url(&server.url, &server.list_path),
        }
    }

    /// Fetch the current catalog snapshot, preserving server order.
    pub fn fetch_tracks(&self) -> Result<Vec<Track>, CatalogError> {
        let response = self
            .agent
            .get(&self.list_url)
            .call()
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let body = response
            .into_string()
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        parse_track_list(&body)
    }
}

/// Join the server base URL and list path without doubling slashes.
pub(super) fn list_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}

/// Parse the server's JSON array of `{ name, url }` objects.
pub(super) fn parse_track_list(body: &str) -> Result<Vec<Track>, CatalogError> {
    serde_json::from_str::<Vec<Track>>(body).map_err(|e| CatalogError::Parse(e.to_string()))
}
