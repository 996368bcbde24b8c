//! Application state for the TUI.
//!
//! The panel state itself lives in [`FeederPanel`]; this module only holds
//! what belongs to the terminal front end: overlays, the add-entry form,
//! list selection and transient messages.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use feeder_core::{
    FeedSize, FeedType, FeederPanel, LOG_PANE, Notice, PaneId, SCHEDULE_PANE, STATUS_PANE,
    ScheduleForm, ScheduleRow,
};

/// How long an info message stays in the status bar.
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of queued status messages.
const MAX_STATUS_MESSAGES: usize = 5;

/// Field of the add-entry form that has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Time,
    Type,
    Size,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Time => Self::Type,
            Self::Type => Self::Size,
            Self::Size => Self::Time,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Time => Self::Size,
            Self::Type => Self::Time,
            Self::Size => Self::Type,
        }
    }
}

/// The add-entry form while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub time: String,
    pub feed_type: FeedType,
    pub size: FeedSize,
    pub field: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            time: String::new(),
            feed_type: FeedType::Indefinite,
            size: FeedSize::default(),
            field: FormField::Time,
        }
    }
}

impl FormState {
    /// Reopen a form the schedule view kept after a failed submit.
    pub fn from_form(form: &ScheduleForm) -> Self {
        Self {
            time: form.time.clone(),
            feed_type: form.feed_type.parse().unwrap_or(FeedType::Indefinite),
            size: form.size.parse().unwrap_or_default(),
            field: FormField::Time,
        }
    }

    pub fn to_form(&self) -> ScheduleForm {
        ScheduleForm::new(
            self.time.trim(),
            self.feed_type.code().to_string(),
            self.size.code().to_string(),
        )
    }

    /// Type a character into the focused field.
    pub fn input(&mut self, c: char) {
        match self.field {
            FormField::Time => {
                if (c.is_ascii_digit() || c == ':') && self.time.len() < 5 {
                    self.time.push(c);
                }
            }
            FormField::Type => {
                if let Ok(feed_type) = c.to_string().parse() {
                    self.feed_type = feed_type;
                } else if c == ' ' {
                    self.cycle(true);
                }
            }
            FormField::Size => {
                if let Ok(size) = c.to_string().parse() {
                    self.size = size;
                } else if c == ' ' {
                    self.cycle(true);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.field == FormField::Time {
            self.time.pop();
        }
    }

    /// Step the value of a choice field.
    pub fn cycle(&mut self, forward: bool) {
        match self.field {
            FormField::Time => {}
            FormField::Type => {
                self.feed_type = match self.feed_type {
                    FeedType::Indefinite => FeedType::OneTime,
                    FeedType::OneTime => FeedType::Indefinite,
                };
            }
            FormField::Size => {
                self.size = if forward {
                    self.size.larger()
                } else {
                    self.size.smaller()
                };
            }
        }
    }
}

/// Action waiting for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    RemoveFeedTime { time: String, label: String },
}

/// Decides how keys are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Confirm,
    /// An error popup blocks everything until dismissed.
    Error,
}

/// Main application state for the TUI.
pub struct App {
    pub panel: FeederPanel,
    notices: mpsc::Receiver<Notice>,
    /// Feeder base URL, shown in the header.
    pub device_url: String,
    pub should_quit: bool,
    pub show_help: bool,
    /// Blocking error notification.
    pub error_popup: Option<String>,
    status_messages: Vec<(String, Instant)>,
    pub form: Option<FormState>,
    pub pending: Option<PendingAction>,
    pub schedule_selected: usize,
    pub log_scroll: usize,
    spinner_frame: usize,
}

impl App {
    pub fn new(panel: FeederPanel, notices: mpsc::Receiver<Notice>, device_url: String) -> Self {
        Self {
            panel,
            notices,
            device_url,
            should_quit: false,
            show_help: false,
            error_popup: None,
            status_messages: Vec::new(),
            form: None,
            pending: None,
            schedule_selected: 0,
            log_scroll: 0,
            spinner_frame: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn input_mode(&self) -> InputMode {
        if self.error_popup.is_some() {
            InputMode::Error
        } else if self.pending.is_some() {
            InputMode::Confirm
        } else if self.form.is_some() {
            InputMode::Form
        } else {
            InputMode::Normal
        }
    }

    /// Pane whose tab is highlighted.
    pub fn selected_pane(&self) -> Option<PaneId> {
        self.panel
            .panes()
            .snapshot()
            .selected()
            .map(|pane| pane.id.clone())
    }

    pub fn is_pane_selected(&self, pane: &str) -> bool {
        self.selected_pane().is_some_and(|id| id.as_str() == pane)
    }

    /// Schedule row under the cursor, clamped to the current list.
    pub fn selected_feed_time(&self) -> Option<ScheduleRow> {
        let rows = self.panel.schedule().snapshot().rows;
        let index = self.schedule_selected.min(rows.len().checked_sub(1)?);
        rows.into_iter().nth(index)
    }

    pub fn select_next(&mut self) {
        match self.selected_pane().as_ref().map(PaneId::as_str) {
            Some(SCHEDULE_PANE) => {
                let len = self.panel.schedule().snapshot().rows.len();
                if len > 0 {
                    self.schedule_selected = (self.schedule_selected + 1).min(len - 1);
                }
            }
            Some(LOG_PANE) => {
                let len = self.panel.log().snapshot().rows.len();
                if self.log_scroll + 1 < len {
                    self.log_scroll += 1;
                }
            }
            _ => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.selected_pane().as_ref().map(PaneId::as_str) {
            Some(SCHEDULE_PANE) => self.schedule_selected = self.schedule_selected.saturating_sub(1),
            Some(LOG_PANE) => self.log_scroll = self.log_scroll.saturating_sub(1),
            _ => {}
        }
    }

    /// Open the add-entry form, restoring a form that failed validation.
    pub fn open_form(&mut self) {
        let kept = self.panel.schedule().snapshot().form;
        self.form = Some(if kept == ScheduleForm::default() {
            FormState::default()
        } else {
            FormState::from_form(&kept)
        });
    }

    /// Route a notice: errors block, everything else goes to the status bar.
    pub fn handle_notice(&mut self, notice: Notice) {
        if notice.is_error() {
            tracing::debug!("Error notice: {}", notice.message);
            self.error_popup = Some(notice.message);
        } else {
            self.push_status_message(notice.message);
        }
    }

    /// Drain pending notices without blocking.
    pub fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.handle_notice(notice);
        }
    }

    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        while self.status_messages.len() > MAX_STATUS_MESSAGES {
            self.status_messages.remove(0);
        }
    }

    /// Remove expired status messages.
    pub fn clean_expired_messages(&mut self) {
        self.status_messages
            .retain(|(_, created)| created.elapsed() < STATUS_MESSAGE_TIMEOUT);
    }

    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn spinner_char(&self) -> &'static str {
        const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER[self.spinner_frame]
    }

    /// True while any background work the user should know about is running.
    pub fn is_busy(&self) -> bool {
        let status = self.panel.status();
        status.is_feeding()
            || status.is_refreshing()
            || self.panel.panes().is_transitioning()
            || self.panel.panes().snapshot().panes.iter().any(|p| p.loading)
    }

    pub fn on_status_pane(&self) -> bool {
        self.is_pane_selected(STATUS_PANE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use feeder_core::{
        ChannelNotifier, MockFeeder, PanelConfig, RecordingDelay, ScheduledFeed,
    };

    fn app_with(api: MockFeeder) -> App {
        let (notifier, notices) = ChannelNotifier::new(16);
        let panel = FeederPanel::with_delay(
            Arc::new(api),
            Arc::new(notifier),
            Arc::new(RecordingDelay::instant()),
            PanelConfig::default(),
        );
        App::new(panel, notices, "http://feeder".to_string())
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Time.next(), FormField::Type);
        assert_eq!(FormField::Size.next(), FormField::Time);
        assert_eq!(FormField::Time.previous(), FormField::Size);
    }

    #[test]
    fn test_form_input_routes_by_field() {
        let mut form = FormState::default();
        for c in "14:30x9".chars() {
            form.input(c);
        }
        assert_eq!(form.time, "14:30");

        form.field = FormField::Type;
        form.input('1');
        assert_eq!(form.feed_type, FeedType::OneTime);

        form.field = FormField::Size;
        form.input('5');
        assert_eq!(form.size, FeedSize::XLarge);
        form.cycle(true);
        assert_eq!(form.size, FeedSize::XLarge);
        form.cycle(false);
        assert_eq!(form.size, FeedSize::Large);
    }

    #[test]
    fn test_form_to_schedule_form() {
        let form = FormState {
            time: "7:05".to_string(),
            feed_type: FeedType::OneTime,
            size: FeedSize::Small,
            field: FormField::Size,
        };
        assert_eq!(form.to_form(), ScheduleForm::new("7:05", "1", "2"));
        assert_eq!(FormState::from_form(&form.to_form()).size, FeedSize::Small);
    }

    #[tokio::test]
    async fn test_input_mode_priority() {
        let mut app = app_with(MockFeeder::new());
        assert_eq!(app.input_mode(), InputMode::Normal);

        app.open_form();
        assert_eq!(app.input_mode(), InputMode::Form);

        app.pending = Some(PendingAction::RemoveFeedTime {
            time: "07:00".to_string(),
            label: "7:00 AM".to_string(),
        });
        assert_eq!(app.input_mode(), InputMode::Confirm);

        app.handle_notice(Notice::error("Feed failed"));
        assert_eq!(app.input_mode(), InputMode::Error);
    }

    #[tokio::test]
    async fn test_notices_are_routed() {
        let mut app = app_with(MockFeeder::new());
        app.handle_notice(Notice::info("Feeding complete"));
        assert_eq!(app.current_status_message(), Some("Feeding complete"));
        assert!(app.error_popup.is_none());
    }

    #[tokio::test]
    async fn test_schedule_selection_is_clamped() {
        let api = MockFeeder::new().with_feed_times(vec![
            ScheduledFeed::new("07:00", FeedType::Indefinite, FeedSize::Small),
            ScheduledFeed::new("18:00", FeedType::Indefinite, FeedSize::Large),
        ]);
        let mut app = app_with(api);
        app.panel.start().await.unwrap();
        app.panel.activate(&SCHEDULE_PANE.into()).await.unwrap();

        app.select_next();
        app.select_next();
        assert_eq!(app.schedule_selected, 1);
        assert_eq!(app.selected_feed_time().unwrap().time, "18:00");

        app.select_previous();
        app.select_previous();
        assert_eq!(app.schedule_selected, 0);
    }

    #[test]
    fn test_status_messages_capped() {
        let mut app = app_with(MockFeeder::new());
        for i in 0..8 {
            app.push_status_message(format!("message {}", i));
        }
        assert_eq!(app.current_status_message(), Some("message 7"));
        assert_eq!(app.status_messages.len(), MAX_STATUS_MESSAGES);
    }
}
