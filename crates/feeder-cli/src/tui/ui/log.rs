use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

use super::theme::AppTheme;
use crate::tui::app::App;

pub(super) fn draw_log(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let log = app.panel.log().snapshot();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if !log.loaded {
        let text = log.error.as_deref().unwrap_or("Loading feed history...");
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.text_muted)),
            layout[0],
        );
        return;
    }

    if log.rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No feeds recorded yet.").style(Style::default().fg(theme.text_muted)),
            layout[0],
        );
    } else {
        let items: Vec<ListItem> = log
            .rows
            .iter()
            .skip(app.log_scroll)
            .map(|row| ListItem::new(row.clone()).style(Style::default().fg(theme.text_primary)))
            .collect();
        frame.render_widget(List::new(items), layout[0]);
    }

    let footer = match &log.error {
        Some(error) => Span::styled(format!("Stale: {}", error), Style::default().fg(theme.warning)),
        None => Span::styled(
            format!("{} feeds, newest first", log.rows.len()),
            Style::default().fg(theme.text_muted),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), layout[1]);
}
