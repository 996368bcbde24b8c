//! Status pane: food gauge, last feed, feed-size slider and feed trigger.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use feeder_core::FeedSize;

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

pub(super) fn draw_status(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let status = app.panel.status().snapshot();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Last feed
            Constraint::Length(2), // Slider
            Constraint::Length(3), // Trigger
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let gauge_style = if status.gauge.dimmed() || status.gauge.stale {
        theme.dimmed_style()
    } else {
        let percent = status.gauge.percent.unwrap_or(0);
        Style::default().fg(theme.food_color(percent))
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Food remaining ")
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(theme.border_inactive_style()),
        )
        .gauge_style(gauge_style)
        .percent(u16::from(status.gauge.fill.min(100)))
        .label(status.gauge.label());
    frame.render_widget(gauge, layout[0]);

    let last_feed_style = if status.last_feed_stale {
        theme.dimmed_style()
    } else {
        Style::default().fg(theme.text_primary)
    };
    let last_feed = Paragraph::new(Line::from(vec![
        Span::styled("Last feed: ", Style::default().fg(theme.text_secondary)),
        Span::styled(status.last_feed.clone(), last_feed_style),
    ]));
    frame.render_widget(last_feed, layout[1]);

    frame.render_widget(Paragraph::new(slider_line(status.feed_size, theme)), layout[2]);

    let trigger_style = if status.trigger.enabled {
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        theme.dimmed_style()
    };
    let trigger = Paragraph::new(format!("[f] {}", status.trigger.label))
        .style(trigger_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(if status.trigger.enabled {
                    theme.border_active_style()
                } else {
                    theme.border_inactive_style()
                }),
        );
    frame.render_widget(trigger, layout[3]);
}

/// `Size: - [■■■□□] + Average`
fn slider_line(size: FeedSize, theme: &AppTheme) -> Line<'static> {
    let mut spans = vec![
        Span::styled("Size: ", Style::default().fg(theme.text_secondary)),
        Span::styled("- [", Style::default().fg(theme.text_muted)),
    ];
    for step in FeedSize::ALL {
        let (symbol, color) = if step <= size {
            ("■", theme.primary)
        } else {
            ("□", theme.text_muted)
        };
        spans.push(Span::styled(symbol, Style::default().fg(color)));
    }
    spans.push(Span::styled("] + ", Style::default().fg(theme.text_muted)));
    spans.push(Span::styled(
        size.label(),
        Style::default()
            .fg(theme.text_primary)
            .add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}
