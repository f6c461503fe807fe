use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Table, TableState,
    Wrap,
};

use super::super::history::PlaybackRecord;
use super::super::label::{extract_name, format_last_played, format_progress, truncate};
use super::PendingClear;

pub(super) fn draw_tui(
    frame: &mut Frame,
    items: &[PlaybackRecord],
    table_state: &mut TableState,
    status: &str,
    pending_clear: Option<&PendingClear>,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected_idx = table_state.selected().map(|i| i + 1).unwrap_or(0);
    let selected_text = if selected_idx == 0 {
        "-".to_string()
    } else {
        selected_idx.to_string()
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "VIDTRACK",
            Style::default()
                .fg(Color::Rgb(120, 210, 170))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{} of 5 slots", items.len()),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("selected {selected_text}"),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Recently Watched"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);
    let details_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(body_chunks[1]);

    let rows: Vec<Row> = items
        .iter()
        .map(|record| {
            let name = extract_name(&record.url).unwrap_or_default();
            Row::new(vec![
                Cell::from(truncate(&name, 44)),
                Cell::from(format_progress(record)),
                Cell::from(format_last_played(&record.date)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(52),
            Constraint::Length(20),
            Constraint::Length(18),
        ],
    )
    .header(
        Row::new(vec!["Name", "Progress", "Last Played"]).style(
            Style::default()
                .fg(Color::Rgb(120, 210, 170))
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(panel_block("History"))
    .row_highlight_style(
        Style::default()
            .bg(Color::Rgb(120, 210, 170))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], table_state);

    let (selection_text, gauge) = match table_state.selected().and_then(|idx| items.get(idx)) {
        Some(record) => {
            let name = extract_name(&record.url).unwrap_or_default();
            let watched_text = if record.is_watched { "yes" } else { "no" };
            let selection_text = format!(
                "Name\n{}\n\nUrl\n{}\n\nProgress\n{}\n\nWatched\n{}\n\nLast Played\n{}",
                truncate(&name, 42),
                truncate(&record.url, 42),
                format_progress(record),
                watched_text,
                format_last_played(&record.date),
            );
            (selection_text, progress_gauge(record))
        }
        None => (
            "No playback history yet.\n\nFeed samples with `vidtrack record <url> <time>`."
                .to_string(),
            None,
        ),
    };
    let selection = Paragraph::new(selection_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Selected"))
        .alignment(Alignment::Left);
    frame.render_widget(selection, details_chunks[0]);
    if let Some((ratio, label)) = gauge {
        let progress = Gauge::default()
            .block(panel_block("Position"))
            .gauge_style(
                Style::default()
                    .fg(Color::Rgb(140, 220, 185))
                    .bg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .label(label)
            .ratio(ratio);
        frame.render_widget(progress, details_chunks[1]);
    }

    let controls = Paragraph::new(Line::from(Span::styled(
        "↑/↓ move   Enter resume   r refresh   c clear all   q quit",
        Style::default().fg(Color::Rgb(185, 195, 210)),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    if let Some(confirm) = pending_clear {
        let popup_text = format!(
            "Clear the whole playback history?\n\n{} entr{} will be removed.\n\n[y / Enter] Clear   [n / Esc] Cancel",
            confirm.count,
            if confirm.count == 1 { "y" } else { "ies" }
        );

        // The dialog text is fixed, so a fixed footprint clamped to the
        // frame is enough.
        let area = frame.area();
        let width = 56.min(area.width.saturating_sub(2)).max(1);
        let height = 11.min(area.height.saturating_sub(2)).max(1);
        let popup_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        let shadow = Rect::new(
            (popup_area.x + 1).min(area.right().saturating_sub(1)),
            (popup_area.y + 1).min(area.bottom().saturating_sub(1)),
            popup_area.width.saturating_sub(1),
            popup_area.height.saturating_sub(1),
        );
        if shadow.width > 0 && shadow.height > 0 {
            let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(12, 18, 15)));
            frame.render_widget(shadow_block, shadow);
        }

        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(popup_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(modal_block("Confirm Clear"));
        frame.render_widget(popup, popup_area);
    }
}

fn progress_gauge(record: &PlaybackRecord) -> Option<(f64, String)> {
    if record.is_watched {
        return Some((1.0, "watched".to_string()));
    }
    if record.duration <= 0.0 {
        return None;
    }
    let ratio = (record.time / record.duration).clamp(0.0, 1.0);
    Some((ratio, format_progress(record)))
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 225, 190))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

// Status lines carry their own severity prefix; anything that is not an
// error renders in the accent tone.
fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 140, 115))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(165, 225, 195))
    }
}
