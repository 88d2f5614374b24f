use anyhow::Result;
use chrono::{DateTime, Local, NaiveTime, Utc};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cards::{ListKind, Word, WordGateway, WordStore};
use crate::config::{AppConfig, SchedulePolicy, Storage, Theme};
use crate::events::Action;
use crate::notify::scheduler::record_delivery;
use crate::notify::{
    DeliveredNotification, NotificationScheduler, Notifier, NotifyError, ScheduleOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddWord,
    AddDefinition,
    SetTime,
    Help,
    Settings,
    Confirm(ConfirmAction),
    Alert(String),
}

impl InputMode {
    /// Modes where letter keys type text instead of triggering bindings.
    pub fn is_text_entry(&self) -> bool {
        matches!(
            self,
            InputMode::AddWord | InputMode::AddDefinition | InputMode::SetTime
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearAll,
}

/// Which field of the add-word dialog has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Word,
    Definition,
}

impl AddField {
    pub fn toggle(self) -> Self {
        match self {
            AddField::Word => AddField::Definition,
            AddField::Definition => AddField::Word,
        }
    }
}

/// Which setting is currently selected in the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSelection {
    #[default]
    SchedulePolicy,
    SortPolicy,
    Notifications,
    Theme,
}

impl SettingsSelection {
    pub fn next(self) -> Self {
        match self {
            SettingsSelection::SchedulePolicy => SettingsSelection::SortPolicy,
            SettingsSelection::SortPolicy => SettingsSelection::Notifications,
            SettingsSelection::Notifications => SettingsSelection::Theme,
            SettingsSelection::Theme => SettingsSelection::SchedulePolicy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsSelection::SchedulePolicy => SettingsSelection::Theme,
            SettingsSelection::SortPolicy => SettingsSelection::SchedulePolicy,
            SettingsSelection::Notifications => SettingsSelection::SortPolicy,
            SettingsSelection::Theme => SettingsSelection::Notifications,
        }
    }
}

pub struct App {
    // State
    pub running: bool,
    pub view: ListKind,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub word_input: String,
    pub definition_input: String,
    pub add_field: AddField,

    // Words
    pub words: WordStore,
    pub selected: usize,
    pub list_offset: usize,

    // Settings
    pub config: AppConfig,
    gateway: WordGateway<Box<dyn Storage>>,

    // Notifications
    scheduler: NotificationScheduler<Box<dyn Notifier>>,
    deliveries: Option<mpsc::Receiver<DeliveredNotification>>,
    pub notification_time: Option<DateTime<Utc>>,
    pub last_notification: Option<DeliveredNotification>,

    // View state
    pub status_message: Option<String>,
    pub settings_selection: SettingsSelection,
    pub card_list_area: Rect,
}

impl App {
    /// Build the app from its collaborators. `deliveries` is the receiving
    /// end of the notifier's delivery channel, if it has one.
    pub fn with_parts(
        storage: Box<dyn Storage>,
        notifier: Box<dyn Notifier>,
        deliveries: Option<mpsc::Receiver<DeliveredNotification>>,
    ) -> Self {
        let config = AppConfig::load(&storage).unwrap_or_else(|e| {
            error!(error = %e, "failed to load config, using defaults");
            AppConfig::default()
        });

        let gateway = WordGateway::new(storage);
        let snapshot = gateway.load();
        let words = WordStore::from_parts(
            snapshot.unlearned,
            snapshot.learned,
            snapshot.notified,
            config.sort_policy,
        );

        let mut notifier = notifier;
        notifier.set_enabled(config.notifications_enabled);
        let mut scheduler = NotificationScheduler::new(notifier, config.schedule_policy);
        if let Err(e) = scheduler.init() {
            warn!(error = %e, "failed to register notification channel");
        }

        let mut app = Self {
            running: true,
            view: ListKind::Unlearned,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            word_input: String::new(),
            definition_input: String::new(),
            add_field: AddField::default(),

            words,
            selected: 0,
            list_offset: 0,

            config,
            gateway,

            scheduler,
            deliveries,
            notification_time: snapshot.notification_time,
            last_notification: None,

            status_message: None,
            settings_selection: SettingsSelection::default(),
            card_list_area: Rect::default(),
        };

        info!(
            unlearned = app.words.unlearned().len(),
            learned = app.words.learned().len(),
            "app started"
        );
        app.reschedule(false);
        app
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match self.input_mode.clone() {
            InputMode::Normal => self.handle_normal_action(action)?,
            InputMode::AddWord => self.handle_add_word_action(action),
            InputMode::AddDefinition => self.handle_add_definition_action(action),
            InputMode::SetTime => self.handle_set_time_action(action),
            InputMode::Help | InputMode::Alert(_) => self.input_mode = InputMode::Normal,
            InputMode::Settings => self.handle_settings_action(action)?,
            InputMode::Confirm(confirm_action) => {
                self.handle_confirm_action(action, confirm_action)
            }
        }
        Ok(())
    }

    fn handle_normal_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.quit()?,
            Action::ToggleView => {
                self.view = self.view.toggle();
                self.selected = 0;
                self.list_offset = 0;
            }

            Action::Up => self.move_selection_up(),
            Action::Down => self.move_selection_down(),
            Action::Top => {
                self.selected = 0;
                self.list_offset = 0;
            }
            Action::Bottom => {
                self.selected = self.current_list().len().saturating_sub(1);
                self.ensure_selection_visible();
            }

            Action::Flip | Action::Enter => self.flip_selected(),
            Action::CycleDefinition => self.cycle_selected_definition(),
            Action::MarkLearned | Action::Right | Action::Left => self.move_selected(),
            Action::AddWord => {
                self.word_input.clear();
                self.definition_input.clear();
                self.add_field = AddField::Word;
                self.input_mode = InputMode::AddWord;
            }
            Action::AddDefinition => {
                if self.selected_word().is_some() {
                    self.input_buffer.clear();
                    self.input_mode = InputMode::AddDefinition;
                }
            }
            Action::Shuffle => self.shuffle(),
            Action::ClearAll => {
                if self.words.total_len() > 0 || self.notification_time.is_some() {
                    self.input_mode = InputMode::Confirm(ConfirmAction::ClearAll);
                }
            }

            Action::NotifyNow => self.notify_now(),
            Action::SetNotificationTime => {
                self.input_buffer = self
                    .notification_time
                    .map(|at| local_time_of(at).format("%H:%M").to_string())
                    .unwrap_or_default();
                self.input_mode = InputMode::SetTime;
            }

            Action::Help => self.input_mode = InputMode::Help,
            Action::Settings => {
                self.input_mode = InputMode::Settings;
                self.settings_selection = SettingsSelection::default();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_add_word_action(&mut self, action: Action) {
        match action {
            Action::Escape => {
                self.input_mode = InputMode::Normal;
                self.word_input.clear();
                self.definition_input.clear();
            }
            Action::ToggleView | Action::NextField | Action::Up | Action::Down => {
                self.add_field = self.add_field.toggle();
            }
            Action::Enter => match self.add_field {
                AddField::Word => self.add_field = AddField::Definition,
                AddField::Definition => self.submit_new_word(),
            },
            Action::Backspace => {
                self.focused_input().pop();
            }
            Action::Char(c) => self.focused_input().push(c),
            _ => {}
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match self.add_field {
            AddField::Word => &mut self.word_input,
            AddField::Definition => &mut self.definition_input,
        }
    }

    /// Blank input leaves the dialog open with nothing saved.
    fn submit_new_word(&mut self) {
        let Some(id) = self.words.add_word(&self.word_input, &self.definition_input) else {
            return;
        };

        self.status_message = Some(format!("Added: {}", self.word_input.trim()));
        self.input_mode = InputMode::Normal;
        self.word_input.clear();
        self.definition_input.clear();

        self.view = ListKind::Unlearned;
        self.select_word(id);
        self.persist_words();
        self.reschedule(true);
    }

    fn handle_add_definition_action(&mut self, action: Action) {
        match action {
            Action::Escape => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            Action::Enter => {
                let Some(id) = self.selected_word().map(|w| w.id) else {
                    self.input_mode = InputMode::Normal;
                    return;
                };
                if self.words.add_definition(id, &self.input_buffer) {
                    self.status_message = Some("Definition added".to_string());
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                    self.persist_words();
                }
            }
            Action::Backspace => {
                self.input_buffer.pop();
            }
            Action::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_set_time_action(&mut self, action: Action) {
        match action {
            Action::Escape => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            Action::Enter => {
                let input = self.input_buffer.trim();
                if input.is_empty() {
                    self.input_mode = InputMode::Normal;
                    self.set_notification_time(None);
                    return;
                }
                match NaiveTime::parse_from_str(input, "%H:%M") {
                    Ok(time) => {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.set_notification_time(Some(time));
                    }
                    Err(_) => {
                        self.status_message = Some(format!("Invalid time: {} (use HH:MM)", input));
                    }
                }
            }
            Action::Backspace => {
                self.input_buffer.pop();
            }
            Action::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_settings_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Escape | Action::Settings | Action::Quit => {
                self.input_mode = InputMode::Normal;
                if let Err(e) = self.config.save(self.gateway.store()) {
                    error!(error = %e, "failed to save settings");
                    self.status_message = Some(format!("Failed to save settings: {}", e));
                }
            }
            Action::Up => self.settings_selection = self.settings_selection.prev(),
            Action::Down => self.settings_selection = self.settings_selection.next(),
            Action::Enter | Action::Right => self.change_setting(true),
            Action::Left => self.change_setting(false),
            _ => {}
        }
        Ok(())
    }

    fn change_setting(&mut self, forward: bool) {
        match self.settings_selection {
            SettingsSelection::SchedulePolicy => {
                self.config.schedule_policy = self.config.schedule_policy.next();
                self.scheduler.set_policy(self.config.schedule_policy);
                self.status_message =
                    Some(format!("Notifications: {}", self.config.schedule_policy.label()));
                self.scheduler.cancel_all();
                self.reschedule(true);
            }
            SettingsSelection::SortPolicy => {
                self.config.sort_policy = self.config.sort_policy.next();
                self.words.set_sort_policy(self.config.sort_policy);
                self.status_message = Some(format!("Sort: {}", self.config.sort_policy.label()));
            }
            SettingsSelection::Notifications => {
                self.config.notifications_enabled = !self.config.notifications_enabled;
                self.scheduler
                    .notifier_mut()
                    .set_enabled(self.config.notifications_enabled);
                self.status_message = Some(format!(
                    "Notifications: {}",
                    if self.config.notifications_enabled { "ON" } else { "OFF" }
                ));
                self.reschedule(true);
            }
            SettingsSelection::Theme => {
                self.config.theme = if forward {
                    self.config.theme.next()
                } else {
                    self.config.theme.prev()
                };
                self.status_message = Some(format!("Theme: {}", self.config.theme.label()));
            }
        }
    }

    fn handle_confirm_action(&mut self, action: Action, confirm: ConfirmAction) {
        match action {
            Action::Confirm | Action::Char('y') | Action::Char('Y') | Action::Enter => {
                match confirm {
                    ConfirmAction::ClearAll => self.clear_all(),
                }
                self.input_mode = InputMode::Normal;
            }
            Action::Escape | Action::Char('n') | Action::Char('N') | Action::NotifyNow => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    // ========== Word operations ==========

    pub fn current_list(&self) -> &[Word] {
        self.words.list(self.view)
    }

    pub fn selected_word(&self) -> Option<&Word> {
        self.current_list().get(self.selected)
    }

    fn select_word(&mut self, id: Uuid) {
        if let Some(index) = self.current_list().iter().position(|w| w.id == id) {
            self.selected = index;
            self.ensure_selection_visible();
        }
    }

    fn flip_selected(&mut self) {
        if let Some(id) = self.selected_word().map(|w| w.id) {
            self.words.toggle_flip(id);
        }
    }

    fn cycle_selected_definition(&mut self) {
        let Some(word) = self.selected_word() else {
            return;
        };
        if word.definitions.len() < 2 {
            return;
        }
        let id = word.id;
        self.words.cycle_definition(id);
        self.persist_words();
    }

    /// Mark learned in the unlearned view, unlearned in the learned view.
    fn move_selected(&mut self) {
        let index = self.selected;
        let moved = match self.view {
            ListKind::Unlearned => self.words.mark_learned(index),
            ListKind::Learned => self.words.mark_unlearned(index),
        }
        .map(|w| w.text.clone());

        let Some(text) = moved else {
            return;
        };

        self.status_message = Some(match self.view {
            ListKind::Unlearned => format!("Learned: {}", text),
            ListKind::Learned => format!("Back to unlearned: {}", text),
        });
        self.clamp_selection();
        self.persist_words();
    }

    fn shuffle(&mut self) {
        if self.view != ListKind::Unlearned || self.words.unlearned().len() < 2 {
            return;
        }
        self.words.shuffle(&mut rand::rng());
        self.selected = 0;
        self.list_offset = 0;
        self.status_message = Some("Shuffled".to_string());
        self.persist_words();
    }

    fn clear_all(&mut self) {
        self.words.clear_all();
        self.notification_time = None;
        self.scheduler.cancel_all();
        self.selected = 0;
        self.list_offset = 0;

        match self.gateway.clear() {
            Ok(()) => {
                info!("cleared all words");
                self.status_message = Some("All words cleared".to_string());
            }
            Err(e) => {
                error!(error = %e, "failed to clear stored words");
                self.status_message = Some(format!("Clear failed: {}", e));
            }
        }
    }

    fn persist_words(&mut self) {
        if let Err(e) = self.gateway.save(self.words.unlearned(), self.words.learned()) {
            error!(error = %e, "failed to save words");
            self.status_message = Some(format!("Save failed: {}", e));
        }
    }

    fn persist_notified(&mut self) {
        if let Err(e) = self.gateway.save_notified(self.words.notified()) {
            error!(error = %e, "failed to save notified words");
        }
    }

    // ========== Notifications ==========

    /// Run the configured policy now, on request.
    fn notify_now(&mut self) {
        let mut rng = rand::rng();
        let (unlearned, notified) = self.words.unlearned_and_notified();
        let result = self.scheduler.run(unlearned, notified, &mut rng);
        if result.is_ok() {
            self.persist_notified();
        }
        self.report(result, true);
    }

    /// Re-arm background notifications after a relevant change. Rotation
    /// reschedules every word; single-pick re-arms the daily reminder if a
    /// time is set.
    fn reschedule(&mut self, interactive: bool) {
        if !self.config.notifications_enabled {
            return;
        }

        let mut rng = rand::rng();
        let result = match self.config.schedule_policy {
            SchedulePolicy::Rotation => {
                self.scheduler
                    .rotate(self.words.unlearned(), Utc::now(), &mut rng)
            }
            SchedulePolicy::SinglePick => {
                let Some(at) = self.notification_time else {
                    return;
                };
                self.scheduler.schedule_daily(
                    self.words.unlearned(),
                    self.words.notified(),
                    local_time_of(at),
                    &mut rng,
                )
            }
        };

        self.report(result, interactive);
    }

    fn set_notification_time(&mut self, time: Option<NaiveTime>) {
        let at = time.and_then(timestamp_for);
        self.notification_time = at;
        if let Err(e) = self.gateway.save_notification_time(at) {
            error!(error = %e, "failed to save notification time");
            self.status_message = Some(format!("Save failed: {}", e));
            return;
        }

        match at {
            None => {
                if self.config.schedule_policy == SchedulePolicy::SinglePick {
                    self.scheduler.cancel_all();
                }
                self.status_message = Some("Daily reminder off".to_string());
            }
            Some(_) if !self.config.notifications_enabled => {
                self.status_message =
                    Some("Reminder time saved; notifications are disabled".to_string());
            }
            Some(_) if self.config.schedule_policy == SchedulePolicy::Rotation => {
                self.status_message =
                    Some("Reminder time saved; used by the word-of-the-day policy".to_string());
            }
            Some(_) => self.reschedule(true),
        }
    }

    fn report(&mut self, result: Result<ScheduleOutcome, NotifyError>, interactive: bool) {
        match result {
            Ok(outcome) => {
                if let Some(alert) = outcome.alert() {
                    if interactive {
                        self.input_mode = InputMode::Alert(alert.to_string());
                    } else {
                        info!(?outcome, "scheduling skipped");
                    }
                }
                self.status_message = Some(describe(&outcome));
            }
            Err(e) => {
                error!(error = %e, "failed to schedule notifications");
                let message = format!("Could not schedule notifications: {}", e);
                if interactive {
                    self.input_mode = InputMode::Alert(message.clone());
                }
                self.status_message = Some(message);
            }
        }
    }

    /// Drain notifications that fired since the last tick.
    pub fn process_notification_events(&mut self) {
        let events: Vec<DeliveredNotification> = if let Some(rx) = &mut self.deliveries {
            let mut events = Vec::new();
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
            events
        } else {
            return;
        };

        let mut marker_changed = false;
        for event in events {
            info!(title = %event.content.title, "notification delivered");
            let (unlearned, notified) = self.words.unlearned_and_notified();
            marker_changed |= record_delivery(unlearned, notified, &event.content.title);
            self.status_message = Some(format!("🔔 {}", event.content.title));
            self.last_notification = Some(event);
        }

        if marker_changed {
            self.persist_notified();
        }
    }

    // ========== Navigation ==========

    fn move_selection_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.list_offset {
                self.list_offset = self.selected;
            }
        }
    }

    fn move_selection_down(&mut self) {
        if self.selected + 1 < self.current_list().len() {
            self.selected += 1;
            self.ensure_selection_visible();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.current_list().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.ensure_selection_visible();
    }

    /// Keep the selected row inside the visible part of the card list
    fn ensure_selection_visible(&mut self) {
        let inner_height = self.card_list_area.height.saturating_sub(2); // Remove borders
        let visible_rows = inner_height as usize;

        if visible_rows == 0 {
            return;
        }

        if self.selected >= self.list_offset + visible_rows {
            self.list_offset = self.selected - visible_rows + 1;
        }
        if self.selected < self.list_offset {
            self.list_offset = self.selected;
        }
    }

    pub fn update_card_list_area(&mut self, area: Rect) {
        self.card_list_area = area;
    }

    pub fn theme(&self) -> Theme {
        self.config.theme.theme()
    }

    fn quit(&mut self) -> Result<()> {
        self.config.save(self.gateway.store())?;
        self.running = false;
        Ok(())
    }
}

fn describe(outcome: &ScheduleOutcome) -> String {
    match outcome {
        ScheduleOutcome::Delivered { text } => format!("Notified: {}", text),
        ScheduleOutcome::NoWordsAvailable => "No words available".to_string(),
        ScheduleOutcome::Scheduled { count } => {
            format!("Scheduled {} daily notifications", count)
        }
        ScheduleOutcome::NothingToSchedule => "Nothing to schedule".to_string(),
        ScheduleOutcome::DailyArmed { text, time } => format!(
            "Daily reminder at {} ({})",
            time.format("%H:%M"),
            text.as_deref().unwrap_or("no words")
        ),
        ScheduleOutcome::PermissionDenied => "Notifications disabled".to_string(),
    }
}

/// Local wall-clock time of a stored reminder timestamp.
fn local_time_of(at: DateTime<Utc>) -> NaiveTime {
    at.with_timezone(&Local).time()
}

/// Today's date at `time` in local time, as the timestamp to persist.
fn timestamp_for(time: NaiveTime) -> Option<DateTime<Utc>> {
    Local::now()
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}
