//! Human-readable formatting of durations, timestamps and file sizes.

use chrono::{DateTime, Utc};

/// Format the interval between submission and the latest update.
///
/// Produces `"3d 4 hr 10 min"`-style strings; intervals under one minute
/// render as `"under 1 minute"`. Negative intervals (clock skew between
/// server fields) are treated as zero.
#[must_use]
pub fn format_response_time(submitted_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> String {
    let total_minutes = (updated_at - submitted_at).num_minutes().max(0);
    if total_minutes < 1 {
        return "under 1 minute".to_string();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours} hr"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} min"));
    }
    parts.join(" ")
}

/// Format a submission timestamp the way list rows display it.
#[must_use]
pub fn format_submitted_at(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y, %H:%M").to_string()
}

/// Format a byte count for attachment rows.
#[must_use]
pub fn format_file_size(bytes: i64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;

    let bytes = bytes.max(0) as f64;
    if bytes >= MIB {
        format!("{:.1} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{:.0} KB", bytes / KIB)
    } else {
        format!("{bytes:.0} B")
    }
}
