pub mod local;
pub mod scheduler;

use chrono::{DateTime, NaiveTime, Utc};
use thiserror::Error;

use crate::cards::Word;

pub use local::{DeliveredNotification, LocalNotifier};
pub use scheduler::{NotificationScheduler, ScheduleOutcome};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    #[error("trigger time {0} is in the past")]
    TriggerInPast(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// When a notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Immediate,
    At(DateTime<Utc>),
    /// Every day at this local time of day.
    Daily(NaiveTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Word on the title line, its first definition as the body.
    pub fn for_word(word: &Word) -> Self {
        Self::new(word.text.clone(), word.first_definition())
    }

    pub fn no_words() -> Self {
        Self::new("No words available", "Add some words to get daily reminders.")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: &'static str,
    pub name: &'static str,
}

pub const WORD_CHANNEL: NotificationChannel = NotificationChannel {
    id: "word-of-the-day",
    name: "Word of the day",
};

/// Local notification delivery.
pub trait Notifier {
    /// Ask for permission to post notifications. Must report `Granted`
    /// before anything is scheduled.
    fn request_permission(&mut self) -> Result<PermissionStatus, NotifyError>;

    fn set_channel(&mut self, channel: NotificationChannel) -> Result<(), NotifyError>;

    /// User-level switch. A disabled notifier denies permission and drops
    /// whatever it had pending.
    fn set_enabled(&mut self, enabled: bool);

    /// Drop every pending notification.
    fn cancel_all(&mut self);

    fn schedule_at(
        &mut self,
        trigger: Trigger,
        content: NotificationContent,
    ) -> Result<(), NotifyError>;

    fn schedule_immediate(&mut self, content: NotificationContent) -> Result<(), NotifyError> {
        self.schedule_at(Trigger::Immediate, content)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotifyError> {
        (**self).request_permission()
    }

    fn set_channel(&mut self, channel: NotificationChannel) -> Result<(), NotifyError> {
        (**self).set_channel(channel)
    }

    fn set_enabled(&mut self, enabled: bool) {
        (**self).set_enabled(enabled)
    }

    fn cancel_all(&mut self) {
        (**self).cancel_all()
    }

    fn schedule_at(
        &mut self,
        trigger: Trigger,
        content: NotificationContent,
    ) -> Result<(), NotifyError> {
        (**self).schedule_at(trigger, content)
    }

    fn schedule_immediate(&mut self, content: NotificationContent) -> Result<(), NotifyError> {
        (**self).schedule_immediate(content)
    }
}
