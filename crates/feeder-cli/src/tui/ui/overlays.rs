//! Overlay rendering: help, add-entry form, confirmation and error popup.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::{FormField, FormState, PendingAction};
use crate::tui::errors::format_error_with_guidance;

/// Rectangle of `width` x `height` centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn popup_block<'a>(title: &'a str, color: Color) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(Style::default().fg(color))
}

fn section(title: &str, theme: &AppTheme) -> Line<'static> {
    Line::from(Span::styled(
        format!("--- {} ---", title),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn shortcut_line<'a>(key: &str, desc: &str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{:>10}  ", key),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.text_secondary)),
    ])
}

/// Draw help overlay with keyboard shortcuts.
pub(super) fn draw_help_overlay(frame: &mut Frame, theme: &AppTheme) {
    let area = centered(frame.area(), 48, 22);
    frame.render_widget(Clear, area);

    let lines = vec![
        section("Navigation", theme),
        shortcut_line("Tab / l", "Next pane", theme),
        shortcut_line("S-Tab / h", "Previous pane", theme),
        shortcut_line("1-3", "Jump to pane", theme),
        shortcut_line("j / k", "Select / scroll", theme),
        shortcut_line("r", "Refresh current pane", theme),
        Line::from(""),
        section("Status", theme),
        shortcut_line("f", "Feed now", theme),
        shortcut_line("+ / -", "Feed size", theme),
        Line::from(""),
        section("Schedule", theme),
        shortcut_line("a", "Add feed time", theme),
        shortcut_line("d", "Remove selected", theme),
        Line::from(""),
        shortcut_line("?", "Toggle help", theme),
        shortcut_line("Esc", "Dismiss", theme),
        shortcut_line("q", "Quit", theme),
    ];

    let help = Paragraph::new(lines).block(popup_block(" Help ", theme.primary));
    frame.render_widget(help, area);
}

/// Draw the add-entry form.
pub(super) fn draw_add_form(frame: &mut Frame, form: &FormState, theme: &AppTheme) {
    let area = centered(frame.area(), 44, 10);
    frame.render_widget(Clear, area);

    let field = |name: &str, value: String, focused: bool| {
        let value_style = if focused {
            theme.selected_style()
        } else {
            Style::default().fg(theme.text_primary)
        };
        Line::from(vec![
            Span::styled(format!("{:>6}: ", name), Style::default().fg(theme.text_secondary)),
            Span::styled(value, value_style),
        ])
    };

    let time = if form.field == FormField::Time {
        format!("{}_", form.time)
    } else if form.time.is_empty() {
        "HH:MM".to_string()
    } else {
        form.time.clone()
    };

    let lines = vec![
        field("Time", time, form.field == FormField::Time),
        field(
            "Type",
            format!("< {} >", form.feed_type.label()),
            form.field == FormField::Type,
        ),
        field(
            "Size",
            format!("< {} >", form.size.label()),
            form.field == FormField::Size,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field  </>: change",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(Span::styled(
            "Enter: save  Esc: cancel",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let popup = Paragraph::new(lines).block(popup_block(" Add feed time ", theme.primary));
    frame.render_widget(popup, area);
}

/// Draw the y/n confirmation dialog.
pub(super) fn draw_confirmation_dialog(
    frame: &mut Frame,
    pending: &PendingAction,
    theme: &AppTheme,
) {
    let PendingAction::RemoveFeedTime { label, .. } = pending;

    let area = centered(frame.area(), 50, 7);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Remove this feed time?",
            Style::default().fg(theme.text_primary),
        )),
        Line::from(Span::styled(
            label.clone(),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::styled(" remove   ", Style::default().fg(theme.text_muted)),
            Span::styled("n", Style::default().fg(theme.danger).add_modifier(Modifier::BOLD)),
            Span::styled(" keep", Style::default().fg(theme.text_muted)),
        ]),
    ];

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(popup_block(" Confirm ", theme.warning));
    frame.render_widget(dialog, area);
}

/// Draw the blocking error popup.
pub(super) fn draw_error_popup(frame: &mut Frame, error: &str, theme: &AppTheme) {
    let (short_message, suggestion) = format_error_with_guidance(error);

    let frame_area = frame.area();
    let area = centered(frame_area, (frame_area.width * 3 / 4).min(60), 12);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            short_message.clone(),
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(suggestion) = suggestion {
        lines.push(Line::from(Span::styled(
            suggestion,
            Style::default().fg(theme.warning),
        )));
        lines.push(Line::from(""));
    }

    if short_message != error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.text_muted),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(theme.text_muted)),
        Span::styled(
            "Esc",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to dismiss", Style::default().fg(theme.text_muted)),
    ]));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(popup_block(" Error ", theme.danger));
    frame.render_widget(popup, area);
}
