use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime};

pub fn now_iso() -> String {
    let now: DateTime<Utc> = SystemTime::now().into();
    now.to_rfc3339()
}

/// Formats an elapsed duration as `H:MM:SS.ffffff`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}
