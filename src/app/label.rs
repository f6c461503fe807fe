use chrono::{DateTime, Datelike, Local};
use percent_encoding::percent_decode_str;

use super::history::PlaybackRecord;

// Percent-decode, keep the final path segment, strip the trailing extension.
// None means the url has no usable name and its record is dropped.
pub(crate) fn extract_name(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let segment = decoded.rsplit('/').next().unwrap_or("");
    // Only strip when at least one character follows the last dot, so a
    // trailing bare dot stays part of the name.
    let name = match segment.rfind('.') {
        Some(idx) if idx + 1 < segment.len() => &segment[..idx],
        _ => segment,
    };

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

pub(crate) fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

pub(crate) fn format_progress(record: &PlaybackRecord) -> String {
    if record.is_watched {
        "watched".to_string()
    } else if record.duration > 0.0 {
        format!(
            "{} / {}",
            format_clock(record.time),
            format_clock(record.duration)
        )
    } else {
        format_clock(record.time)
    }
}

pub(crate) fn format_last_played(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| relative_day_display(date.with_timezone(&Local), Local::now()))
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn relative_day_display(date: DateTime<Local>, now: DateTime<Local>) -> String {
    let clock = date.format("%H:%M");
    let day = date.date_naive();
    let today = now.date_naive();
    if day == today {
        format!("Today {clock}")
    } else if Some(day) == today.pred_opt() {
        format!("Yesterday {clock}")
    } else {
        format!("{}-{} {clock}", date.month(), date.day())
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
