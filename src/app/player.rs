use std::env;
use std::path::PathBuf;
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::{Context, Result};

use super::history::PlaybackRecord;

#[cfg(unix)]
struct ScopedSigaction {
    signum: libc::c_int,
    old_action: libc::sigaction,
}

#[cfg(unix)]
impl ScopedSigaction {
    fn ignore(signum: libc::c_int) -> Result<Self> {
        unsafe {
            let mut new_action: libc::sigaction = std::mem::zeroed();
            new_action.sa_sigaction = libc::SIG_IGN;
            libc::sigemptyset(&mut new_action.sa_mask);
            new_action.sa_flags = 0;

            let mut old_action: libc::sigaction = std::mem::zeroed();
            if libc::sigaction(signum, &new_action, &mut old_action) != 0 {
                return Err(anyhow::anyhow!(
                    "failed to update signal action for {signum}"
                ));
            }

            Ok(Self { signum, old_action })
        }
    }
}

#[cfg(unix)]
impl Drop for ScopedSigaction {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::sigaction(self.signum, &self.old_action, std::ptr::null_mut());
        }
    }
}

// Ctrl-C while the player runs should stop the player, not the tracker.
#[cfg(unix)]
fn with_sigint_ignored<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    let _sigint_guard = ScopedSigaction::ignore(libc::SIGINT)?;
    f()
}

#[cfg(not(unix))]
fn with_sigint_ignored<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    f()
}

pub(crate) fn resolve_player_bin() -> PathBuf {
    env::var("VIDTRACK_PLAYER")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("mpv"))
}

// Watched records restart from the beginning; everything else resumes at
// the last recorded position.
pub(crate) fn start_position(record: &PlaybackRecord) -> f64 {
    if record.is_watched { 0.0 } else { record.time }
}

pub(crate) fn format_start_arg(start_secs: f64) -> String {
    format!("--start={}", start_secs.max(0.0).floor() as u64)
}

pub(crate) fn play_record(record: &PlaybackRecord) -> Result<bool> {
    let player_bin = resolve_player_bin();
    let start_arg = format_start_arg(start_position(record));

    let status = with_sigint_ignored(|| {
        ProcessCommand::new(&player_bin)
            .arg(start_arg)
            .arg(&record.url)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to launch {}", player_bin.display()))
    })?;

    Ok(status.success())
}
