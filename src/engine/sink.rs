//! Fetching track bytes and building `rodio` sinks from them.
//!
//! Remote tracks are read fully into memory so seeking can re-decode from
//! the retained bytes without another network round trip.

use std::fs;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

pub(super) fn is_remote_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fetch the raw bytes behind `url`. Anything that is not an http(s) URL is
/// treated as a local path.
pub(super) fn fetch_bytes(agent: &ureq::Agent, url: &str) -> Result<Arc<[u8]>, String> {
    if is_remote_url(url) {
        let response = agent.get(url).call().map_err(|e| e.to_string())?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| e.to_string())?;
        Ok(bytes.into())
    } else {
        fs::read(url)
            .map(Arc::from)
            .map_err(|e| format!("{url}: {e}"))
    }
}

/// Decode `bytes` into a paused `Sink` positioned at `start_at`, returning
/// the probed total duration when the decoder knows it.
///
/// `skip_duration` is the seeking primitive; `Duration::ZERO` is fine.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), String> {
    let source = Decoder::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}
