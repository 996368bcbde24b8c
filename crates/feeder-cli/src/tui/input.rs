//! Keyboard input handling for the TUI.
//!
//! This module translates key presses into high-level actions and applies
//! those actions to the application state. Anything that talks to the feeder
//! runs on a spawned task so the event loop keeps drawing.
//!
//! # Key Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `q` | Quit |
//! | `Tab` / `l` | Next pane |
//! | `BackTab` / `h` | Previous pane |
//! | `1`-`3` | Jump to pane |
//! | `r` | Refresh current pane |
//! | `f` | Feed (Status) |
//! | `+` / `-` | Feed size slider (Status) |
//! | `a` | Add feed time (Schedule) |
//! | `d` | Remove selected feed time (Schedule) |
//! | `↓` / `j` | Select next |
//! | `↑` / `k` | Select previous |
//! | `?` | Toggle help |
//! | `Esc` | Dismiss |

use crossterm::event::KeyCode;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::app::{App, InputMode, PendingAction};
use feeder_core::{ActionOutcome, PaneId, SCHEDULE_PANE};

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPane,
    PreviousPane,
    /// Jump to the pane at this index.
    JumpToPane(usize),
    Refresh,
    Feed,
    IncreaseSize,
    DecreaseSize,
    AddFeedTime,
    RemoveFeedTime,
    SelectNext,
    SelectPrevious,
    ToggleHelp,
    /// Close the error popup or the help overlay.
    Dismiss,
    Confirm,
    Cancel,
    TextInput(char),
    TextBackspace,
    TextSubmit,
    TextCancel,
    NextField,
    PreviousField,
    /// Step the focused choice field forward (`true`) or back.
    CycleValue(bool),
    /// No action (unrecognized key).
    None,
}

/// Map a key code to an action for the current input mode.
pub fn handle_key(key: KeyCode, mode: InputMode) -> Action {
    match mode {
        InputMode::Error => match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Action::Dismiss,
            _ => Action::None,
        },
        InputMode::Confirm => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Action::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
            _ => Action::None,
        },
        InputMode::Form => match key {
            KeyCode::Enter => Action::TextSubmit,
            KeyCode::Esc => Action::TextCancel,
            KeyCode::Backspace => Action::TextBackspace,
            KeyCode::Tab | KeyCode::Down => Action::NextField,
            KeyCode::BackTab | KeyCode::Up => Action::PreviousField,
            KeyCode::Right => Action::CycleValue(true),
            KeyCode::Left => Action::CycleValue(false),
            KeyCode::Char(c) => Action::TextInput(c),
            _ => Action::None,
        },
        InputMode::Normal => match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab | KeyCode::Char('l') => Action::NextPane,
            KeyCode::BackTab | KeyCode::Char('h') => Action::PreviousPane,
            KeyCode::Char(c @ '1'..='3') => Action::JumpToPane(c as usize - '1' as usize),
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('f') => Action::Feed,
            KeyCode::Char('+') | KeyCode::Char('=') => Action::IncreaseSize,
            KeyCode::Char('-') | KeyCode::Char('_') => Action::DecreaseSize,
            KeyCode::Char('a') => Action::AddFeedTime,
            KeyCode::Char('d') | KeyCode::Delete => Action::RemoveFeedTime,
            KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
            KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Esc => Action::Dismiss,
            _ => Action::None,
        },
    }
}

/// Apply an action to the application state.
///
/// Returns the handle of the background task when the action started one.
pub fn apply_action(app: &mut App, action: Action) -> Option<JoinHandle<()>> {
    match action {
        Action::Quit => {
            app.should_quit = true;
            None
        }
        Action::NextPane | Action::PreviousPane => {
            let offset = if action == Action::NextPane { 1 } else { -1 };
            let target = app.panel.panes().snapshot().neighbor(offset)?;
            Some(activate(app, target))
        }
        Action::JumpToPane(index) => {
            let target = app.panel.panes().pane_ids().into_iter().nth(index)?;
            Some(activate(app, target))
        }
        Action::Refresh => {
            let panel = app.panel.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = panel.refresh_active().await {
                    warn!("Refresh failed: {}", e);
                }
            }))
        }
        Action::Feed => {
            if !app.on_status_pane() {
                app.push_status_message("Feed from the Status pane".to_string());
                return None;
            }
            let panel = app.panel.clone();
            Some(tokio::spawn(async move {
                match panel.feed().await {
                    Ok(ActionOutcome::Ignored) => debug!("Feed already in progress"),
                    Ok(ActionOutcome::Completed) => {}
                    // The status view has already notified the user.
                    Err(e) => debug!("Feed failed: {}", e),
                }
            }))
        }
        Action::IncreaseSize | Action::DecreaseSize => {
            if app.on_status_pane() {
                let step = if action == Action::IncreaseSize { 1 } else { -1 };
                app.panel.status().step_feed_size(step);
            }
            None
        }
        Action::AddFeedTime => {
            if app.is_pane_selected(SCHEDULE_PANE) {
                app.open_form();
            }
            None
        }
        Action::RemoveFeedTime => {
            if !app.is_pane_selected(SCHEDULE_PANE) {
                return None;
            }
            let row = app.selected_feed_time()?;
            if row.removing {
                return None;
            }
            app.pending = Some(PendingAction::RemoveFeedTime {
                time: row.time,
                label: row.text,
            });
            None
        }
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::ToggleHelp => {
            app.show_help = !app.show_help;
            None
        }
        Action::Dismiss => {
            if app.error_popup.is_some() {
                app.error_popup = None;
            } else {
                app.show_help = false;
            }
            None
        }
        Action::Confirm => {
            let PendingAction::RemoveFeedTime { time, .. } = app.pending.take()?;
            let schedule = app.panel.schedule().clone();
            Some(tokio::spawn(async move {
                if let Err(e) = schedule.remove_feed_time(&time).await {
                    debug!("Removing {} failed: {}", time, e);
                }
            }))
        }
        Action::Cancel => {
            app.pending = None;
            None
        }
        Action::TextInput(c) => {
            if let Some(form) = app.form.as_mut() {
                form.input(c);
            }
            None
        }
        Action::TextBackspace => {
            if let Some(form) = app.form.as_mut() {
                form.backspace();
            }
            None
        }
        Action::NextField | Action::PreviousField => {
            if let Some(form) = app.form.as_mut() {
                form.field = if action == Action::NextField {
                    form.field.next()
                } else {
                    form.field.previous()
                };
            }
            None
        }
        Action::CycleValue(forward) => {
            if let Some(form) = app.form.as_mut() {
                form.cycle(forward);
            }
            None
        }
        Action::TextSubmit => {
            let form = app.form.take()?.to_form();
            let schedule = app.panel.schedule().clone();
            Some(tokio::spawn(async move {
                // Validation and server errors arrive as notices.
                if let Err(e) = schedule.add_feed_time(form).await {
                    debug!("Adding feed time failed: {}", e);
                }
            }))
        }
        Action::TextCancel => {
            app.form = None;
            None
        }
        Action::None => None,
    }
}

fn activate(app: &App, target: PaneId) -> JoinHandle<()> {
    let panel = app.panel.clone();
    tokio::spawn(async move {
        if let Err(e) = panel.activate(&target).await {
            debug!("Pane switch to {} rejected: {}", target, e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use feeder_core::{
        ChannelNotifier, FeedSize, FeedType, FeederPanel, LOG_PANE, MockFeeder, MockOp,
        PanelConfig, RecordingDelay, STATUS_PANE, ScheduledFeed,
    };

    fn app_with(api: Arc<MockFeeder>) -> App {
        let (notifier, notices) = ChannelNotifier::new(16);
        let panel = FeederPanel::with_delay(
            api,
            Arc::new(notifier),
            Arc::new(RecordingDelay::instant()),
            PanelConfig::default(),
        );
        App::new(panel, notices, "http://feeder".to_string())
    }

    async fn run(app: &mut App, action: Action) {
        if let Some(handle) = apply_action(app, action) {
            handle.await.unwrap();
        }
        app.drain_notices();
    }

    #[test]
    fn test_normal_mode_keys() {
        let mode = InputMode::Normal;
        assert_eq!(handle_key(KeyCode::Char('q'), mode), Action::Quit);
        assert_eq!(handle_key(KeyCode::Tab, mode), Action::NextPane);
        assert_eq!(handle_key(KeyCode::Char('h'), mode), Action::PreviousPane);
        assert_eq!(handle_key(KeyCode::Char('1'), mode), Action::JumpToPane(0));
        assert_eq!(handle_key(KeyCode::Char('3'), mode), Action::JumpToPane(2));
        assert_eq!(handle_key(KeyCode::Char('4'), mode), Action::None);
        assert_eq!(handle_key(KeyCode::Char('+'), mode), Action::IncreaseSize);
        assert_eq!(handle_key(KeyCode::Char('d'), mode), Action::RemoveFeedTime);
        assert_eq!(handle_key(KeyCode::Esc, mode), Action::Dismiss);
    }

    #[test]
    fn test_modal_modes_restrict_keys() {
        assert_eq!(handle_key(KeyCode::Char('q'), InputMode::Error), Action::None);
        assert_eq!(handle_key(KeyCode::Enter, InputMode::Error), Action::Dismiss);
        assert_eq!(handle_key(KeyCode::Char('y'), InputMode::Confirm), Action::Confirm);
        assert_eq!(handle_key(KeyCode::Esc, InputMode::Confirm), Action::Cancel);
        assert_eq!(handle_key(KeyCode::Char('q'), InputMode::Form), Action::TextInput('q'));
        assert_eq!(handle_key(KeyCode::Tab, InputMode::Form), Action::NextField);
    }

    #[tokio::test]
    async fn test_jump_and_cycle_panes() {
        let api = Arc::new(MockFeeder::new());
        let mut app = app_with(api.clone());
        app.panel.start().await.unwrap();

        run(&mut app, Action::JumpToPane(2)).await;
        assert!(app.is_pane_selected(LOG_PANE));
        assert_eq!(api.count(MockOp::GetFeedLogs), 1);

        run(&mut app, Action::NextPane).await;
        assert!(app.is_pane_selected(STATUS_PANE));

        run(&mut app, Action::PreviousPane).await;
        assert!(app.is_pane_selected(LOG_PANE));
    }

    #[tokio::test]
    async fn test_feed_only_from_status_pane() {
        let api = Arc::new(MockFeeder::new());
        let mut app = app_with(api.clone());
        app.panel.start().await.unwrap();

        run(&mut app, Action::IncreaseSize).await;
        run(&mut app, Action::Feed).await;
        assert_eq!(api.count(MockOp::ManualFeed), 1);
        assert_eq!(app.current_status_message(), Some("Feeding complete"));

        run(&mut app, Action::JumpToPane(1)).await;
        run(&mut app, Action::Feed).await;
        assert_eq!(api.count(MockOp::ManualFeed), 1);
        assert_eq!(app.panel.status().snapshot().feed_size, FeedSize::Large);
    }

    #[tokio::test]
    async fn test_add_form_submit() {
        let api = Arc::new(MockFeeder::new());
        let mut app = app_with(api.clone());
        app.panel.start().await.unwrap();
        run(&mut app, Action::JumpToPane(1)).await;

        run(&mut app, Action::AddFeedTime).await;
        assert_eq!(app.input_mode(), InputMode::Form);
        for c in "14:30".chars() {
            run(&mut app, Action::TextInput(c)).await;
        }
        run(&mut app, Action::NextField).await;
        run(&mut app, Action::CycleValue(true)).await;
        run(&mut app, Action::TextSubmit).await;

        assert!(app.form.is_none());
        assert_eq!(
            api.feed_times(),
            vec![ScheduledFeed::new("14:30", FeedType::OneTime, FeedSize::Average)]
        );
        assert_eq!(
            app.panel.schedule().snapshot().rows[0].text,
            "2:30 PM | One-Time | Average"
        );
    }

    #[tokio::test]
    async fn test_invalid_form_shows_error_and_is_kept() {
        let api = Arc::new(MockFeeder::new());
        let mut app = app_with(api.clone());
        app.panel.start().await.unwrap();
        run(&mut app, Action::JumpToPane(1)).await;

        run(&mut app, Action::AddFeedTime).await;
        for c in "99:99".chars() {
            run(&mut app, Action::TextInput(c)).await;
        }
        run(&mut app, Action::TextSubmit).await;

        assert_eq!(app.input_mode(), InputMode::Error);
        assert_eq!(api.count(MockOp::AddFeedTime), 0);

        run(&mut app, Action::Dismiss).await;
        run(&mut app, Action::AddFeedTime).await;
        assert_eq!(app.form.as_ref().unwrap().time, "99:99");
    }

    #[tokio::test]
    async fn test_remove_needs_confirmation() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![ScheduledFeed::new(
            "07:00",
            FeedType::Indefinite,
            FeedSize::Small,
        )]));
        let mut app = app_with(api.clone());
        app.panel.start().await.unwrap();
        run(&mut app, Action::JumpToPane(1)).await;

        run(&mut app, Action::RemoveFeedTime).await;
        assert_eq!(app.input_mode(), InputMode::Confirm);
        run(&mut app, Action::Cancel).await;
        assert_eq!(api.count(MockOp::DeleteFeedTime), 0);

        run(&mut app, Action::RemoveFeedTime).await;
        run(&mut app, Action::Confirm).await;
        assert!(api.feed_times().is_empty());
        assert!(app.panel.schedule().snapshot().rows.is_empty());
        assert_eq!(app.current_status_message(), Some("Removed feed time 7:00 AM"));
    }

    #[tokio::test]
    async fn test_dismiss_closes_error_before_help() {
        let mut app = app_with(Arc::new(MockFeeder::new()));
        app.show_help = true;
        app.error_popup = Some("boom".to_string());

        run(&mut app, Action::Dismiss).await;
        assert!(app.error_popup.is_none());
        assert!(app.show_help);

        run(&mut app, Action::Dismiss).await;
        assert!(!app.show_help);
    }
}
