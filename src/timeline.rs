//! Time and progress mapping between engine-reported seconds and the UI.
//!
//! Every function here is pure; the controller and the UI share them so
//! clock strings and slider percentages always agree.

/// Format a second count as `M:SS`.
///
/// Unknown values (NaN, infinities, negatives) render as `"0:00"`. Seconds
/// are zero-padded to two digits; minutes are unbounded and unpadded.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Map an elapsed/duration pair to a `0..=100` percentage.
///
/// Returns `None` while the duration is unknown or not positive, guarding the
/// division; callers skip the slider update in that case.
pub fn progress_percent(current: f64, duration: Option<f64>) -> Option<f64> {
    let duration = duration?;
    if !duration.is_finite() || duration <= 0.0 {
        return None;
    }

    Some((current / duration * 100.0).clamp(0.0, 100.0))
}

/// Inverse of [`progress_percent`]: absolute seconds for a slider percentage.
///
/// Seek input is ignored (`None`) until the duration is known.
pub fn seek_seconds(percent: f64, duration: Option<f64>) -> Option<f64> {
    let duration = duration?;
    if !duration.is_finite() || duration <= 0.0 {
        return None;
    }

    Some(percent.clamp(0.0, 100.0) / 100.0 * duration)
}

/// Clamp an engine-reported position against the known duration for display.
/// Engine values are trusted but a position past the end never leaks to the UI.
pub fn clamp_elapsed(current: f64, duration: Option<f64>) -> f64 {
    let current = if current.is_finite() && current > 0.0 {
        current
    } else {
        0.0
    };

    match duration {
        Some(d) if d.is_finite() && d > 0.0 => current.min(d),
        _ => current,
    }
}
