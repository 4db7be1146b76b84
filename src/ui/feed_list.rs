//! Feed list screen rendering
//!
//! Renders the date range controls, the latest notice and the list of APOD
//! entries with a one-line excerpt of each explanation.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Notice};
use crate::range::{RangeRejection, DATE_FORMAT};

/// Lines used per entry in the list
const LINES_PER_ENTRY: usize = 2;

/// Renders the feed list view
pub fn render_feed_list(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with date range and notice
            Constraint::Min(3),    // Entry list
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

/// Formats one date field, showing the edit buffer while it is active
fn date_field(app: &App, mode: InputMode, value: Option<chrono::NaiveDate>) -> Span<'static> {
    if app.input_mode == mode {
        return Span::styled(
            format!("[{}_]", app.input_buffer),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        );
    }
    match value {
        Some(date) => Span::styled(
            format!("[{}]", date.format(DATE_FORMAT)),
            Style::default().fg(Color::White),
        ),
        None => Span::styled("[not selected]", Style::default().fg(Color::DarkGray)),
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.feed_loading {
        Span::styled("Loading space images...", Style::default().fg(Color::Yellow))
    } else {
        match app.last_refresh {
            Some(at) => Span::styled(
                format!("Updated {}", at.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
            None => Span::raw(""),
        }
    };

    let mut range_line = vec![
        Span::raw("Start "),
        date_field(app, InputMode::EditingStart, app.selection.start),
        Span::raw("  End "),
        date_field(app, InputMode::EditingEnd, app.selection.end),
    ];
    match app.selection.validate() {
        Ok(range) => range_line.push(Span::styled(
            format!("  f: search between dates ({} days)", range.days()),
            Style::default().fg(Color::Cyan),
        )),
        Err(RangeRejection::Inverted { .. }) => range_line.push(Span::styled(
            "  start is after end",
            Style::default().fg(Color::Red),
        )),
        Err(RangeRejection::Incomplete) => {}
    }

    let notice_line = match &app.notice {
        Some(Notice::Info(msg)) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan))),
        Some(Notice::Error(msg)) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };

    let lines = vec![Line::from(status), Line::from(range_line), notice_line];

    let block = Block::default()
        .title(" Astronomy Picture of the Day ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Truncates text to `max` characters, adding an ellipsis when cut
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut.trim_end())
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Images ({}) ", app.entries.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.entries.is_empty() {
        let message = if app.feed_loading {
            "Loading..."
        } else {
            "No images to show. Press r for a random batch."
        };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let excerpt_width = area.width.saturating_sub(8) as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(app.entries.len() * LINES_PER_ENTRY);

    for (index, entry) in app.entries.iter().enumerate() {
        let is_selected = index == app.selected_index;
        let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space

        let title_style = if is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::styled(
                entry.date.format(DATE_FORMAT).to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled(entry.title.clone(), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", excerpt(&entry.explanation, excerpt_width)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the selected entry inside the visible area
    let visible = area.height.saturating_sub(2) as usize;
    let selected_bottom = (app.selected_index + 1) * LINES_PER_ENTRY;
    let offset = selected_bottom.saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        " ↑↓ select  Enter open  r random  s/e dates  f search  c clear  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}
