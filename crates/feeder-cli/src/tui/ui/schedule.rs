//! Schedule pane: the list of feed times.

use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::theme::AppTheme;
use crate::tui::app::App;

pub(super) fn draw_schedule(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let schedule = app.panel.schedule().snapshot();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if !schedule.loaded {
        let text = schedule.error.as_deref().unwrap_or("Loading feed times...");
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.text_muted)),
            layout[0],
        );
        return;
    }

    if schedule.rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No feed times scheduled. Press 'a' to add one.")
                .style(Style::default().fg(theme.text_muted)),
            layout[0],
        );
    } else {
        let items: Vec<ListItem> = schedule
            .rows
            .iter()
            .map(|row| {
                if row.removing {
                    ListItem::new(format!("{}  (removing...)", row.text))
                        .style(theme.dimmed_style())
                } else {
                    ListItem::new(row.text.clone()).style(Style::default().fg(theme.text_primary))
                }
            })
            .collect();

        let list = List::new(items)
            .highlight_style(theme.selected_style())
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(app.schedule_selected.min(schedule.rows.len() - 1)));
        frame.render_stateful_widget(list, layout[0], &mut state);
    }

    // Keep showing the rows after a failed reload, with the reason below.
    if let Some(error) = &schedule.error {
        frame.render_widget(
            Paragraph::new(format!("Stale: {}", error)).style(Style::default().fg(theme.warning)),
            layout[1],
        );
    }
}
