//! Entry detail screen rendering
//!
//! Shows the full explanation of one APOD entry, its image links and, once
//! requested, the Wikipedia summary for its title.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, EnrichmentState, NOT_FOUND_MESSAGE};
use crate::data::FeedEntry;
use crate::range::DATE_FORMAT;

/// Renders the detail view for the entry at `index`
///
/// Clamps `app.detail_scroll_offset` to the wrapped height of the content.
pub fn render(frame: &mut Frame, app: &mut App, index: usize) {
    let area = frame.area();

    let Some(entry) = app.entries.get(index).cloned() else {
        let paragraph = Paragraph::new("Entry no longer available. Press Esc to go back.")
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Entry content
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_content(frame, app, &entry, chunks[0]);
    render_help(frame, chunks[1]);
}

fn render_content(frame: &mut Frame, app: &mut App, entry: &FeedEntry, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date       ", label),
            Span::styled(
                entry.date.format(DATE_FORMAT).to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Image      ", label),
            Span::styled(entry.best_url().to_string(), Style::default().fg(Color::Blue)),
        ]),
    ];
    if let Some(copyright) = &entry.copyright {
        lines.push(Line::from(vec![
            Span::styled("Credit     ", label),
            Span::raw(format!("\u{a9} {}", copyright)),
        ]));
    }

    lines.push(Line::from(""));
    for paragraph in entry.explanation.split("\n\n") {
        lines.push(Line::from(paragraph.trim().to_string()));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Wikipedia",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(enrichment_lines(app.visible_enrichment()));

    let block = Block::default()
        .title(format!(" {} ", entry.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });

    // Scroll is measured in wrapped rows, not logical lines
    let content_height = paragraph.line_count(inner_area.width);
    let max_scroll = u16::try_from(content_height.saturating_sub(inner_area.height as usize))
        .unwrap_or(u16::MAX);
    if app.detail_scroll_offset > max_scroll {
        app.detail_scroll_offset = max_scroll;
    }

    let paragraph = paragraph.scroll((app.detail_scroll_offset, 0));
    frame.render_widget(paragraph, inner_area);
}

fn enrichment_lines(state: Option<&EnrichmentState>) -> Vec<Line<'static>> {
    match state {
        None | Some(EnrichmentState::Idle) => vec![Line::from(Span::styled(
            "Press w to look up this topic on Wikipedia",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(EnrichmentState::Loading { .. }) => vec![Line::from(Span::styled(
            "Loading Wikipedia information...",
            Style::default().fg(Color::Yellow),
        ))],
        Some(EnrichmentState::NotFound { .. }) => vec![Line::from(Span::styled(
            NOT_FOUND_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))],
        Some(EnrichmentState::Found { result, .. }) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    result.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(result.extract.clone()),
            ];
            if let Some(url) = &result.article_url {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Full article: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(url.clone(), Style::default().fg(Color::Blue)),
                ]));
            }
            lines
        }
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        " ↑↓ scroll  g top  w Wikipedia  Esc back  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::data::{sample_entry, EnrichmentResult, MediaType};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &mut App, index: usize) -> String {
        render_sized(app, index, 100, 30)
    }

    fn render_sized(app: &mut App, index: usize, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app, index)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn detail_app() -> App {
        let mut app = App::new();
        let mut entry = sample_entry("2025-08-02", "Orion Nebula", MediaType::Image);
        entry.hd_url = Some("https://apod.nasa.gov/apod/image/orion_hd.jpg".to_string());
        entry.copyright = Some("Jane Doe".to_string());
        app.entries = vec![entry];
        app.state = AppState::EntryDetail(0);
        app
    }

    #[test]
    fn test_render_entry_fields() {
        let content = render_to_string(&mut detail_app(), 0);
        assert!(content.contains("Orion Nebula"));
        assert!(content.contains("2025-08-02"));
        assert!(content.contains("orion_hd.jpg"), "HD url should be preferred");
        assert!(content.contains("Jane Doe"));
        assert!(content.contains("Explanation for Orion Nebula"));
        assert!(content.contains("Press w"));
    }

    #[test]
    fn test_render_enrichment_found() {
        let mut app = detail_app();
        app.enrichment = EnrichmentState::Found {
            title: "Orion Nebula".to_string(),
            result: EnrichmentResult {
                title: "Orion Nebula".to_string(),
                extract: "A diffuse nebula in the Milky Way.".to_string(),
                article_url: Some("https://en.wikipedia.org/wiki/Orion_Nebula".to_string()),
            },
        };
        let content = render_to_string(&mut app, 0);
        assert!(content.contains("A diffuse nebula"));
        assert!(content.contains("Full article:"));
    }

    #[test]
    fn test_render_enrichment_loading_and_not_found() {
        let mut app = detail_app();
        app.enrichment = EnrichmentState::Loading {
            title: "Orion Nebula".to_string(),
        };
        assert!(render_to_string(&mut app, 0).contains("Loading Wikipedia information"));

        app.enrichment = EnrichmentState::NotFound {
            title: "Orion Nebula".to_string(),
        };
        assert!(render_to_string(&mut app, 0).contains("No Wikipedia information found"));
    }

    #[test]
    fn test_render_hides_enrichment_for_other_title() {
        let mut app = detail_app();
        app.enrichment = EnrichmentState::NotFound {
            title: "Andromeda Galaxy".to_string(),
        };
        let content = render_to_string(&mut app, 0);
        assert!(!content.contains("No Wikipedia information found"));
        assert!(content.contains("Press w"));
    }

    #[test]
    fn test_render_missing_entry() {
        let mut app = detail_app();
        assert!(render_to_string(&mut app, 5).contains("no longer available"));
    }

    fn found_orion() -> EnrichmentState {
        EnrichmentState::Found {
            title: "Orion Nebula".to_string(),
            result: EnrichmentResult {
                title: "Orion Nebula".to_string(),
                extract: "A diffuse nebula in the Milky Way.".to_string(),
                article_url: Some("https://en.wikipedia.org/wiki/Orion_Nebula".to_string()),
            },
        }
    }

    #[test]
    fn test_long_explanation_scrolls_to_article_link() {
        let mut app = detail_app();
        app.entries[0].explanation = "word ".repeat(400);
        app.enrichment = found_orion();

        let top = render_sized(&mut app, 0, 60, 20);
        assert!(!top.contains("Full article"), "Link should start below the fold");

        for _ in 0..500 {
            app.scroll_down();
        }
        let bottom = render_sized(&mut app, 0, 60, 20);

        assert!(bottom.contains("Full article"), "Link should be reachable at max scroll");
        assert!(app.detail_scroll_offset < 500, "Offset should be clamped to the content");
    }

    #[test]
    fn test_scroll_up_responds_after_clamp() {
        let mut app = detail_app();
        app.entries[0].explanation = "word ".repeat(400);
        for _ in 0..500 {
            app.scroll_down();
        }
        render_sized(&mut app, 0, 60, 20);
        let clamped = app.detail_scroll_offset;

        app.scroll_up();

        assert_eq!(app.detail_scroll_offset, clamped - 1);
    }

    #[test]
    fn test_short_content_does_not_scroll() {
        let mut app = detail_app();
        app.detail_scroll_offset = 10;
        render_to_string(&mut app, 0);
        assert_eq!(app.detail_scroll_offset, 0);
    }
}
