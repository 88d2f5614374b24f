use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::{debug, info, warn};

use super::{NotificationContent, Notifier, NotifyError, PermissionStatus, Trigger, WORD_CHANNEL};
use crate::cards::Word;
use crate::config::SchedulePolicy;

/// Spacing between rotation notifications.
pub const ROTATION_INTERVAL_HOURS: i64 = 24;

/// What a scheduling run did, for the UI to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A word notification went out now.
    Delivered { text: String },
    /// The unlearned list was empty; a "no words" notice went out instead.
    NoWordsAvailable,
    /// Rotation queued this many notifications.
    Scheduled { count: usize },
    /// Rotation had nothing to schedule.
    NothingToSchedule,
    /// Daily reminder armed at `time`, carrying `text` if there was a word.
    DailyArmed { text: Option<String>, time: NaiveTime },
    PermissionDenied,
}

impl ScheduleOutcome {
    /// Outcomes the user has to acknowledge.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            Self::NothingToSchedule => Some("No unlearned words to schedule."),
            Self::PermissionDenied => {
                Some("Notifications are disabled. Enable them in settings to get reminders.")
            }
            _ => None,
        }
    }
}

/// A word chosen for notification but not yet recorded in the marker.
#[derive(Debug, Clone, Copy)]
pub struct Pick<'a> {
    pub word: &'a Word,
    /// Every unlearned word was already notified; the marker restarts.
    pub resets_marker: bool,
}

impl Pick<'_> {
    /// Record the pick once the notification is actually out.
    pub fn commit(&self, notified: &mut BTreeSet<String>) {
        if self.resets_marker {
            notified.clear();
        }
        notified.insert(self.word.text.clone());
    }
}

/// Choose the next word for a single-pick notification. Words already in
/// `notified` are skipped until every unlearned word has had its turn.
pub fn choose_word<'a, R: Rng + ?Sized>(
    unlearned: &'a [Word],
    notified: &BTreeSet<String>,
    rng: &mut R,
) -> Option<Pick<'a>> {
    let available: Vec<&Word> = unlearned
        .iter()
        .filter(|w| !notified.contains(&w.text))
        .collect();

    if available.is_empty() {
        let word = unlearned.choose(rng)?;
        return Some(Pick {
            word,
            resets_marker: true,
        });
    }

    let word = *available.choose(rng)?;
    Some(Pick {
        word,
        resets_marker: false,
    })
}

/// Record that `text` reached the user. Unknown or already recorded texts
/// leave the marker alone. Returns whether the marker changed.
pub fn record_delivery(unlearned: &[Word], notified: &mut BTreeSet<String>, text: &str) -> bool {
    if notified.contains(text) || !unlearned.iter().any(|w| w.text == text) {
        return false;
    }
    notified.insert(text.to_string())
}

pub struct NotificationScheduler<N> {
    notifier: N,
    policy: SchedulePolicy,
}

impl<N: Notifier> NotificationScheduler<N> {
    pub fn new(notifier: N, policy: SchedulePolicy) -> Self {
        Self { notifier, policy }
    }

    /// Register the notification channel. Call once at startup.
    pub fn init(&mut self) -> Result<(), NotifyError> {
        self.notifier.set_channel(WORD_CHANNEL)
    }

    pub fn set_policy(&mut self, policy: SchedulePolicy) {
        self.policy = policy;
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn cancel_all(&mut self) {
        self.notifier.cancel_all();
    }

    fn permission_granted(&mut self) -> Result<bool, NotifyError> {
        match self.notifier.request_permission()? {
            PermissionStatus::Granted => Ok(true),
            PermissionStatus::Denied => {
                warn!("notification permission denied, skipping scheduling");
                Ok(false)
            }
        }
    }

    /// Run the configured policy.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        unlearned: &[Word],
        notified: &mut BTreeSet<String>,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, NotifyError> {
        match self.policy {
            SchedulePolicy::SinglePick => self.single_pick(unlearned, notified, rng),
            SchedulePolicy::Rotation => self.rotate(unlearned, Utc::now(), rng),
        }
    }

    /// Notify about one not-yet-notified word right now.
    pub fn single_pick<R: Rng + ?Sized>(
        &mut self,
        unlearned: &[Word],
        notified: &mut BTreeSet<String>,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, NotifyError> {
        if !self.permission_granted()? {
            return Ok(ScheduleOutcome::PermissionDenied);
        }

        match choose_word(unlearned, notified, rng) {
            Some(pick) => {
                self.notifier
                    .schedule_immediate(NotificationContent::for_word(pick.word))?;
                pick.commit(notified);
                debug!(text = %pick.word.text, notified = notified.len(), "picked word");
                Ok(ScheduleOutcome::Delivered {
                    text: pick.word.text.clone(),
                })
            }
            None => {
                self.notifier
                    .schedule_immediate(NotificationContent::no_words())?;
                notified.clear();
                Ok(ScheduleOutcome::NoWordsAvailable)
            }
        }
    }

    /// Replace everything scheduled with one notification per unlearned word,
    /// a day apart, in random order.
    pub fn rotate<R: Rng + ?Sized>(
        &mut self,
        unlearned: &[Word],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, NotifyError> {
        if !self.permission_granted()? {
            return Ok(ScheduleOutcome::PermissionDenied);
        }

        self.notifier.cancel_all();

        if unlearned.is_empty() {
            return Ok(ScheduleOutcome::NothingToSchedule);
        }

        let mut order: Vec<&Word> = unlearned.iter().collect();
        order.shuffle(rng);

        for (position, word) in (1..).zip(order.iter()) {
            let when = now + TimeDelta::hours(ROTATION_INTERVAL_HOURS * position);
            self.notifier
                .schedule_at(Trigger::At(when), NotificationContent::for_word(word))?;
        }

        info!(count = order.len(), "scheduled word rotation");
        Ok(ScheduleOutcome::Scheduled { count: order.len() })
    }

    /// Replace everything scheduled with a daily reminder at `time` carrying
    /// the next single-pick word. The marker is left untouched; the word is
    /// recorded through [`record_delivery`] when the reminder fires.
    pub fn schedule_daily<R: Rng + ?Sized>(
        &mut self,
        unlearned: &[Word],
        notified: &BTreeSet<String>,
        time: NaiveTime,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, NotifyError> {
        if !self.permission_granted()? {
            return Ok(ScheduleOutcome::PermissionDenied);
        }

        self.notifier.cancel_all();

        let (content, text) = match choose_word(unlearned, notified, rng) {
            Some(pick) => (
                NotificationContent::for_word(pick.word),
                Some(pick.word.text.clone()),
            ),
            None => (NotificationContent::no_words(), None),
        };
        self.notifier.schedule_at(Trigger::Daily(time), content)?;

        info!(%time, word = ?text, "armed daily reminder");
        Ok(ScheduleOutcome::DailyArmed { text, time })
    }
}
