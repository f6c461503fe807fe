mod history;
mod label;
mod player;
mod tui;


use anyhow::{Result, bail};

use crate::cli::{Cli, Command};
use crate::kv::SqliteStore;
use crate::paths::store_file_path;

use self::history::{PlaybackHistory, SAMPLE_INTERVAL_SECS, should_sample};
use self::label::{extract_name, format_clock, format_last_played, format_progress, truncate};

pub fn run(cli: Cli) -> Result<()> {
    let history = open_history()?;

    match cli.command {
        Some(Command::Record {
            url,
            time,
            duration,
            flush,
        }) => run_record(&history, &url, time, duration, flush)?,
        Some(Command::List) => run_list(&history),
        Some(Command::Resume { index }) => run_resume(&history, index)?,
        Some(Command::Clear) => run_clear(&history)?,
        Some(Command::Tui) | None => tui::run_tui(&history)?,
    }

    Ok(())
}

fn run_record(
    history: &PlaybackHistory<SqliteStore>,
    url: &str,
    time: f64,
    duration: Option<f64>,
    flush: bool,
) -> Result<()> {
    if url.trim().is_empty() {
        bail!("url must not be empty");
    }
    if !time.is_finite() || time < 0.0 {
        bail!("time must be a non-negative number of seconds");
    }

    if !flush && !should_sample(time) {
        println!(
            "Skipped off-grid sample at {time:.1}s (recorded every {SAMPLE_INTERVAL_SECS}s, use --flush to force)."
        );
        return Ok(());
    }

    history.record_progress(url, time, duration.unwrap_or(0.0));
    match extract_name(url) {
        Some(name) => println!("Recorded: {} at {}", truncate(&name, 60), format_clock(time)),
        None => println!("Dropped: no display name could be derived from the url."),
    }
    Ok(())
}

fn run_list(history: &PlaybackHistory<SqliteStore>) {
    let records = history.list();
    if records.is_empty() {
        println!("No playback history yet. Run `vidtrack record <url> <time>` first.");
        return;
    }

    println!(
        "{:<4} {:<44} {:<20} {:<20}",
        "#", "NAME", "PROGRESS", "LAST PLAYED"
    );
    for (idx, record) in records.iter().enumerate() {
        let name = extract_name(&record.url).unwrap_or_default();
        println!(
            "{:<4} {:<44} {:<20} {:<20}",
            idx + 1,
            truncate(&name, 44),
            format_progress(record),
            format_last_played(&record.date)
        );
    }
}

fn run_resume(history: &PlaybackHistory<SqliteStore>, index: Option<usize>) -> Result<()> {
    let records = history.list();
    if records.is_empty() {
        println!("No playback history yet. Run `vidtrack record <url> <time>` first.");
        return Ok(());
    }

    let index = index.unwrap_or(1);
    let Some(record) = index.checked_sub(1).and_then(|idx| records.get(idx)) else {
        bail!(
            "no history entry at position {index} (history has {} entries)",
            records.len()
        );
    };

    let name = extract_name(&record.url).unwrap_or_default();
    println!(
        "Resuming: {} at {}",
        truncate(&name, 60),
        format_clock(player::start_position(record))
    );
    match player::play_record(record) {
        Ok(true) => println!("Playback finished."),
        Ok(false) => println!("Player exited with an error."),
        Err(err) => println!("Player launch failed: {err}"),
    }
    Ok(())
}

fn run_clear(history: &PlaybackHistory<SqliteStore>) -> Result<()> {
    history.clear()?;
    println!("Playback history cleared.");
    Ok(())
}

fn open_history() -> Result<PlaybackHistory<SqliteStore>> {
    let store_path = store_file_path()?;
    let store = SqliteStore::open(&store_path)?;
    store.migrate()?;
    Ok(PlaybackHistory::new(store))
}
