use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::kv::KvStore;

use super::label::extract_name;

pub(crate) const HISTORY_CAPACITY: usize = 5;
pub(crate) const WATCHED_WINDOW_SECS: f64 = 30.0;
pub(crate) const SAMPLE_INTERVAL_SECS: u64 = 5;

pub(crate) const HISTORY_KEY: &str = "video_playback_history";

// One record per distinct video url: last position, length, last-update
// time and the derived watched flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PlaybackRecord {
    pub(crate) url: String,
    pub(crate) time: f64,
    pub(crate) duration: f64,
    pub(crate) date: String,
    pub(crate) is_watched: bool,
}

// Every call does a full load/mutate/persist cycle against the key-value
// store; no in-memory copy can go stale between calls.
pub(crate) struct PlaybackHistory<S: KvStore> {
    store: S,
}

impl<S: KvStore> PlaybackHistory<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    // Timer-style callers cannot handle errors, so persistence failures are
    // reported as warnings and never propagated.
    pub(crate) fn record_progress(&self, url: &str, current_time: f64, duration: f64) {
        if url.is_empty() || !current_time.is_finite() || current_time < 0.0 {
            return;
        }

        let duration = normalize_duration(duration);
        let mut records = self.load();
        let now = Utc::now().to_rfc3339();
        let is_watched = watched(current_time, duration);

        if let Some(existing) = records.iter_mut().find(|record| record.url == url) {
            existing.time = current_time;
            existing.duration = duration;
            existing.date = now;
            existing.is_watched = is_watched;
        } else {
            records.insert(
                0,
                PlaybackRecord {
                    url: url.to_string(),
                    time: current_time,
                    duration,
                    date: now,
                    is_watched,
                },
            );
        }

        while records.len() > HISTORY_CAPACITY {
            records.pop();
        }
        records.retain(|record| extract_name(&record.url).is_some());

        self.save(&records);
    }

    // Newest activity first. Writes the filtered/sorted collection back, so
    // a corrupted or oversized payload repairs itself on the first read.
    pub(crate) fn list(&self) -> Vec<PlaybackRecord> {
        let mut records = self.load();
        records.retain(|record| extract_name(&record.url).is_some());
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(HISTORY_CAPACITY);
        self.save(&records);
        records
    }

    pub(crate) fn clear(&self) -> anyhow::Result<()> {
        self.store.remove(HISTORY_KEY)
    }

    fn load(&self) -> Vec<PlaybackRecord> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                eprintln!("Warning: failed to read playback history: {err}");
                return Vec::new();
            }
        };
        decode_history(&raw)
    }

    fn save(&self, records: &[PlaybackRecord]) {
        let encoded = match serde_json::to_string(records) {
            Ok(encoded) => encoded,
            Err(err) => {
                eprintln!("Warning: failed to encode playback history: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(HISTORY_KEY, &encoded) {
            eprintln!("Warning: failed to persist playback history: {err}");
        }
    }
}

pub(crate) fn watched(current_time: f64, duration: f64) -> bool {
    duration > 0.0 && current_time >= duration - WATCHED_WINDOW_SECS
}

fn normalize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

// Samples are taken only when the whole-second position lands on the
// 5-second grid; final flushes bypass this.
pub(crate) fn should_sample(current_time: f64) -> bool {
    current_time.is_finite()
        && current_time >= 0.0
        && (current_time.floor() as u64) % SAMPLE_INTERVAL_SECS == 0
}

// A payload that is not a JSON array yields an empty history; malformed
// entries are skipped and duplicate urls keep their first occurrence.
pub(crate) fn decode_history(raw: &str) -> Vec<PlaybackRecord> {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    let mut records: Vec<PlaybackRecord> = Vec::new();
    for item in items {
        let Some(record) = parse_record(item) else {
            continue;
        };
        if records.iter().any(|existing| existing.url == record.url) {
            continue;
        }
        records.push(record);
    }
    records
}

fn parse_record(value: &Value) -> Option<PlaybackRecord> {
    let url = value.get("url")?.as_str()?;
    let time = value.get("time")?.as_f64()?;
    let date = value.get("date")?.as_str()?;
    if url.is_empty() || date.is_empty() || !time.is_finite() || time < 0.0 {
        return None;
    }

    let duration = value
        .get("duration")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let is_watched = value
        .get("is_watched")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(PlaybackRecord {
        url: url.to_string(),
        time,
        duration: normalize_duration(duration),
        date: date.to_string(),
        is_watched,
    })
}
