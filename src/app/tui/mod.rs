mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::kv::KvStore;

use super::history::{PlaybackHistory, PlaybackRecord};
use super::label::{extract_name, truncate};
use super::player;

use self::render::draw_tui;
use self::session::ScreenGuard;

#[derive(Debug, Clone)]
pub(super) struct PendingClear {
    pub(super) count: usize,
}

pub(crate) fn run_tui<S: KvStore>(history: &PlaybackHistory<S>) -> Result<()> {
    let mut screen = ScreenGuard::acquire()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut items = history.list();
    let mut table_state = TableState::default();
    table_state.select((!items.is_empty()).then_some(0));
    let mut pending_clear = None::<PendingClear>;
    let mut status = if items.is_empty() {
        status_info("No playback history yet. Feed samples with `vidtrack record`.")
    } else {
        status_info("Ready.")
    };

    loop {
        terminal.draw(|frame| {
            draw_tui(
                frame,
                &items,
                &mut table_state,
                &status,
                pending_clear.as_ref(),
            )
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if pending_clear.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    pending_clear = None;
                    match history.clear() {
                        Ok(()) => {
                            status = status_info("Playback history cleared.");
                            refresh_items(history, &mut items, &mut table_state, None);
                        }
                        Err(err) => status = status_error(&format!("Clear failed: {err}")),
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    pending_clear = None;
                    status = status_info("Clear canceled.");
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = table_state.selected()
                    && !items.is_empty()
                {
                    let next = (selected + 1).min(items.len().saturating_sub(1));
                    table_state.select(Some(next));
                }
            }
            KeyCode::Char('r') => {
                let preferred_url = table_state
                    .selected()
                    .and_then(|idx| items.get(idx))
                    .map(|record| record.url.clone());
                refresh_items(history, &mut items, &mut table_state, preferred_url.as_deref());
                status = status_info("History refreshed.");
            }
            KeyCode::Char('c') => {
                if items.is_empty() {
                    status = status_info("Nothing to clear.");
                    continue;
                }
                pending_clear = Some(PendingClear { count: items.len() });
                status = status_info("Confirm clear: y/Enter to clear, n/Esc to cancel.");
            }
            KeyCode::Enter => {
                let Some(selected) = table_state.selected() else {
                    continue;
                };
                let Some(record) = items.get(selected).cloned() else {
                    continue;
                };
                let name = extract_name(&record.url).unwrap_or_default();

                let result = screen.while_released(|| player::play_record(&record))?;
                terminal.clear()?;

                status = match result {
                    Ok(true) => status_info(&format!("Finished playing {}", truncate(&name, 50))),
                    Ok(false) => status_error(&format!(
                        "Player exited with an error for {}",
                        truncate(&name, 50)
                    )),
                    Err(err) => status_error(&format!("Player launch failed: {err}")),
                };

                refresh_items(history, &mut items, &mut table_state, Some(&record.url));
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    screen.release()?;
    Ok(())
}

fn refresh_items<S: KvStore>(
    history: &PlaybackHistory<S>,
    items: &mut Vec<PlaybackRecord>,
    table_state: &mut TableState,
    preferred_url: Option<&str>,
) {
    *items = history.list();
    if items.is_empty() {
        table_state.select(None);
        return;
    }

    if let Some(url) = preferred_url
        && let Some(idx) = items.iter().position(|record| record.url == url)
    {
        table_state.select(Some(idx));
        return;
    }

    match table_state.selected() {
        Some(selected) => table_state.select(Some(selected.min(items.len() - 1))),
        None => table_state.select(Some(0)),
    }
}

fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
