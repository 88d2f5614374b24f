use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    NotificationChannel, NotificationContent, Notifier, NotifyError, PermissionStatus, Trigger,
};

const CHANNEL_CAPACITY: usize = 32;

/// A notification that fired, as seen by the UI loop.
#[derive(Debug, Clone)]
pub struct DeliveredNotification {
    pub content: NotificationContent,
    pub delivered_at: DateTime<Utc>,
    pub channel: Option<&'static str>,
}

/// In-process notifier. Each scheduled notification is a tokio task that
/// sleeps until its trigger and then sends over a channel drained by the app.
pub struct LocalNotifier {
    tx: mpsc::Sender<DeliveredNotification>,
    tasks: Vec<JoinHandle<()>>,
    enabled: bool,
    permission: Option<PermissionStatus>,
    channel: Option<NotificationChannel>,
}

impl LocalNotifier {
    /// Returns the notifier and the receiving end of its delivery channel.
    /// Starts disabled until [`Notifier::set_enabled`] switches it on.
    pub fn new() -> (Self, mpsc::Receiver<DeliveredNotification>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let notifier = Self {
            tx,
            tasks: Vec::new(),
            enabled: false,
            permission: None,
            channel: None,
        };
        (notifier, rx)
    }

    /// Number of notifications still waiting to fire.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn delivery(&self, content: NotificationContent) -> DeliveredNotification {
        DeliveredNotification {
            content,
            delivered_at: Utc::now(),
            channel: self.channel.map(|c| c.id),
        }
    }

    fn spawn<F>(&mut self, task: F) -> Result<(), NotifyError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(handle.spawn(task));
        Ok(())
    }
}

impl Notifier for LocalNotifier {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotifyError> {
        let status = if self.enabled {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        debug!(?status, "notification permission requested");
        self.permission = Some(status);
        Ok(status)
    }

    fn set_channel(&mut self, channel: NotificationChannel) -> Result<(), NotifyError> {
        debug!(id = channel.id, name = channel.name, "notification channel set");
        self.channel = Some(channel);
        Ok(())
    }

    /// Enabling or disabling forgets any earlier permission answer.
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.permission = None;
        if !enabled {
            self.cancel_all();
        }
    }

    fn cancel_all(&mut self) {
        let count = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if count > 0 {
            debug!(count, "cancelled scheduled notifications");
        }
    }

    fn schedule_at(
        &mut self,
        trigger: Trigger,
        content: NotificationContent,
    ) -> Result<(), NotifyError> {
        if self.permission != Some(PermissionStatus::Granted) {
            return Err(NotifyError::PermissionDenied);
        }

        match trigger {
            Trigger::Immediate => {
                info!(title = %content.title, "delivering notification");
                self.tx
                    .try_send(self.delivery(content))
                    .map_err(|e| NotifyError::Unavailable(e.to_string()))
            }
            Trigger::At(when) => {
                let delay = (when - Utc::now())
                    .to_std()
                    .map_err(|_| NotifyError::TriggerInPast(when))?;
                info!(title = %content.title, %when, "scheduling notification");

                let tx = self.tx.clone();
                let channel = self.channel.map(|c| c.id);
                self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let delivered = DeliveredNotification {
                        content,
                        delivered_at: Utc::now(),
                        channel,
                    };
                    if tx.send(delivered).await.is_err() {
                        warn!("notification receiver dropped");
                    }
                })
            }
            Trigger::Daily(time) => {
                info!(title = %content.title, %time, "scheduling daily notification");

                let tx = self.tx.clone();
                let channel = self.channel.map(|c| c.id);
                self.spawn(async move {
                    loop {
                        let now = Local::now();
                        let delay = (next_occurrence(&now, time) - now)
                            .to_std()
                            .unwrap_or_default();
                        tokio::time::sleep(delay).await;

                        let delivered = DeliveredNotification {
                            content: content.clone(),
                            delivered_at: Utc::now(),
                            channel,
                        };
                        if tx.send(delivered).await.is_err() {
                            warn!("notification receiver dropped");
                            break;
                        }
                    }
                })
            }
        }
    }
}

impl Drop for LocalNotifier {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// The next instant strictly after `now` whose wall-clock time is `time`.
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive().and_time(time);

    let candidate = tz
        .from_local_datetime(&today)
        .earliest()
        .filter(|at| at > now);
    if let Some(at) = candidate {
        return at;
    }

    let tomorrow = today + TimeDelta::days(1);
    tz.from_local_datetime(&tomorrow)
        .earliest()
        .unwrap_or_else(|| now.clone() + TimeDelta::days(1))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Timelike;

    use super::*;
    use crate::notify::WORD_CHANNEL;

    fn granted() -> (LocalNotifier, mpsc::Receiver<DeliveredNotification>) {
        let (mut notifier, rx) = LocalNotifier::new();
        notifier.set_enabled(true);
        assert_eq!(notifier.request_permission().unwrap(), PermissionStatus::Granted);
        (notifier, rx)
    }

    #[tokio::test]
    async fn immediate_is_delivered_right_away() {
        let (mut notifier, mut rx) = granted();
        notifier.set_channel(WORD_CHANNEL).unwrap();

        notifier
            .schedule_immediate(NotificationContent::new("cat", "a feline"))
            .unwrap();

        let delivered = rx.try_recv().unwrap();
        assert_eq!(delivered.content.title, "cat");
        assert_eq!(delivered.channel, Some("word-of-the-day"));
    }

    #[tokio::test]
    async fn scheduling_requires_permission() {
        let (mut notifier, _rx) = LocalNotifier::new();
        let err = notifier
            .schedule_immediate(NotificationContent::new("cat", "a feline"))
            .unwrap_err();
        assert!(matches!(err, NotifyError::PermissionDenied));

        assert_eq!(notifier.request_permission().unwrap(), PermissionStatus::Denied);
        assert!(notifier
            .schedule_immediate(NotificationContent::new("cat", "a feline"))
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_notification_fires_after_delay() {
        let (mut notifier, mut rx) = granted();
        let when = Utc::now() + TimeDelta::hours(24);

        notifier
            .schedule_at(Trigger::At(when), NotificationContent::new("dog", "a canine"))
            .unwrap();
        assert_eq!(notifier.pending(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());

        let delivered = rx.recv().await.unwrap();
        assert_eq!(delivered.content.title, "dog");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_pending_notifications() {
        let (mut notifier, mut rx) = granted();
        let when = Utc::now() + TimeDelta::hours(1);
        notifier
            .schedule_at(Trigger::At(when), NotificationContent::new("dog", "a canine"))
            .unwrap();

        notifier.cancel_all();
        assert_eq!(notifier.pending(), 0);

        tokio::time::sleep(Duration::from_secs(2 * 60 * 60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn past_trigger_is_rejected() {
        let (mut notifier, _rx) = granted();
        let when = Utc::now() - TimeDelta::hours(1);
        let err = notifier
            .schedule_at(Trigger::At(when), NotificationContent::new("dog", "a canine"))
            .unwrap_err();
        assert!(matches!(err, NotifyError::TriggerInPast(_)));
    }

    #[tokio::test]
    async fn disabling_forgets_permission() {
        let (mut notifier, _rx) = granted();
        notifier.set_enabled(false);
        assert!(notifier
            .schedule_immediate(NotificationContent::new("cat", "a feline"))
            .is_err());
        assert_eq!(notifier.request_permission().unwrap(), PermissionStatus::Denied);
    }

    #[test]
    fn scheduling_outside_runtime_is_unavailable() {
        let (mut notifier, _rx) = granted();
        let when = Utc::now() + TimeDelta::hours(1);
        let err = notifier
            .schedule_at(Trigger::At(when), NotificationContent::new("dog", "a canine"))
            .unwrap_err();
        assert!(matches!(err, NotifyError::Unavailable(_)));
    }

    #[test]
    fn next_occurrence_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(
            next_occurrence(&now, time),
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let next = next_occurrence(&now, time);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap());
        assert_eq!(next.hour(), 8);

        // Exactly now counts as already passed.
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(
            next_occurrence(&at, time),
            Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap()
        );
    }
}
