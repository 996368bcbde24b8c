//! Main UI layout and rendering for the TUI.
//!
//! Every frame is drawn from snapshots of the panel state. The layout
//! consists of:
//!
//! - **Header**: title and feeder URL
//! - **Tab bar**: one tab per pane; the highlight moves as soon as a switch starts
//! - **Main content**: the displayed pane, dimmed while it animates
//! - **Status bar**: activity, messages or key hints, and the clock

pub mod theme;

mod log;
mod overlays;
mod schedule;
mod status;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use feeder_core::{LOG_PANE, SCHEDULE_PANE, STATUS_PANE, UiSnapshot, Visibility};

use super::app::App;
use theme::{AppTheme, BORDER_TYPE};

/// Draw the complete TUI interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = AppTheme::dark();
    let ui = app.panel.panes().snapshot();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app, &theme);
    draw_tab_bar(frame, main_layout[1], &ui, &theme);
    draw_content(frame, main_layout[2], app, &ui, &theme);
    draw_status_bar(frame, main_layout[3], app, &theme);

    if let Some(form) = &app.form {
        overlays::draw_add_form(frame, form, &theme);
    }
    if app.show_help {
        overlays::draw_help_overlay(frame, &theme);
    }
    if let Some(pending) = &app.pending {
        overlays::draw_confirmation_dialog(frame, pending, &theme);
    }
    if let Some(error) = &app.error_popup {
        overlays::draw_error_popup(frame, error, &theme);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let spans = vec![
        Span::styled(" Pet Feeder ", theme.title_style()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(
            format!(" {} ", app.device_url),
            Style::default().fg(theme.text_secondary),
        ),
    ];
    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, ui: &UiSnapshot, theme: &AppTheme) {
    let titles: Vec<Line> = ui
        .panes
        .iter()
        .enumerate()
        .map(|(i, pane)| {
            let label = format!(" {} {} ", i + 1, pane.title);
            if pane.nav_active {
                Line::from(Span::styled(
                    label,
                    theme.title_style().add_modifier(Modifier::UNDERLINED),
                ))
            } else {
                Line::from(Span::styled(label, Style::default().fg(theme.text_muted)))
            }
        })
        .collect();

    let selected = ui.panes.iter().position(|p| p.nav_active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BORDER_TYPE)
                .border_style(theme.border_inactive_style()),
        )
        .highlight_style(Style::default().fg(theme.primary))
        .divider(Span::styled(" | ", Style::default().fg(theme.text_muted)))
        .select(selected);

    frame.render_widget(tabs, area);
}

fn draw_content(frame: &mut Frame, area: Rect, app: &App, ui: &UiSnapshot, theme: &AppTheme) {
    let Some(pane) = ui.displayed() else {
        let waiting = Paragraph::new(format!("{} Connecting...", app.spinner_char()))
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center);
        frame.render_widget(waiting, area);
        return;
    };

    // Content that is fading out or not yet revealed is drawn dimmed.
    let dimmed = pane.visibility != Visibility::Active;
    let border_style = if dimmed {
        theme.border_inactive_style()
    } else {
        theme.border_active_style()
    };
    let mut title = format!(" {} ", pane.title);
    if pane.loading {
        title = format!(" {} {} ", pane.title, app.spinner_char());
    }
    let block = Block::default()
        .title(Span::styled(title, theme.title_style()))
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match pane.id.as_str() {
        STATUS_PANE => status::draw_status(frame, inner, app, theme),
        SCHEDULE_PANE => schedule::draw_schedule(frame, inner, app, theme),
        LOG_PANE => log::draw_log(frame, inner, app, theme),
        _ => {}
    }

    if dimmed {
        frame.buffer_mut().set_style(inner, Style::default().add_modifier(Modifier::DIM));
    }
}

/// Context-sensitive key hints for the selected pane.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("?", "help"), ("Tab", "pane")];

    match app.selected_pane().as_ref().map(|p| p.as_str()) {
        Some(STATUS_PANE) => {
            hints.push(("f", "feed"));
            hints.push(("+/-", "size"));
            hints.push(("r", "refresh"));
        }
        Some(SCHEDULE_PANE) => {
            hints.push(("a", "add"));
            hints.push(("d", "remove"));
            hints.push(("j/k", "select"));
            hints.push(("r", "reload"));
        }
        Some(LOG_PANE) => {
            hints.push(("j/k", "scroll"));
            hints.push(("r", "reload"));
        }
        _ => {}
    }

    hints.push(("q", "quit"));
    hints
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let time_str = Local::now().format("%H:%M:%S").to_string();

    let left_spans = if let Some(msg) = app.current_status_message() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.text_secondary),
        )]
    } else if app.is_busy() {
        vec![
            Span::styled(
                format!(" {} ", app.spinner_char()),
                Style::default().fg(theme.primary),
            ),
            Span::styled("Working...", Style::default().fg(theme.text_secondary)),
        ]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(theme.text_muted),
            ));
        }
        spans
    };

    let status_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), status_layout[0]);
    let right = Paragraph::new(time_str)
        .style(Style::default().fg(theme.text_muted))
        .alignment(Alignment::Right);
    frame.render_widget(right, status_layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::backend::TestBackend;

    use feeder_core::{ChannelNotifier, FeederPanel, MockFeeder, PanelConfig, RecordingDelay};

    fn app() -> App {
        let (notifier, notices) = ChannelNotifier::new(16);
        let panel = FeederPanel::with_delay(
            Arc::new(MockFeeder::new().with_reading(42)),
            Arc::new(notifier),
            Arc::new(RecordingDelay::instant()),
            PanelConfig::default(),
        );
        App::new(panel, notices, "http://feeder".to_string())
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[tokio::test]
    async fn test_status_pane_renders_reading() {
        let app = app();
        app.panel.start().await.unwrap();
        let screen = render(&app);
        assert!(screen.contains("Pet Feeder"));
        assert!(screen.contains("42%"));
        assert!(screen.contains("Feed"));
    }

    #[tokio::test]
    async fn test_error_popup_is_drawn() {
        let mut app = app();
        app.panel.start().await.unwrap();
        app.error_popup = Some("Feed failed: Server error 500".to_string());
        let screen = render(&app);
        assert!(screen.contains("Feeder rejected the request"));
    }

    #[tokio::test]
    async fn test_hints_follow_selected_pane() {
        let app = app();
        app.panel.start().await.unwrap();
        assert!(context_hints(&app).contains(&("f", "feed")));

        app.panel.activate(&SCHEDULE_PANE.into()).await.unwrap();
        let hints = context_hints(&app);
        assert!(hints.contains(&("a", "add")));
        assert!(!hints.contains(&("f", "feed")));
    }

    #[test]
    fn test_renders_before_start() {
        let screen = render(&app());
        assert!(screen.contains("Connecting"));
    }
}
