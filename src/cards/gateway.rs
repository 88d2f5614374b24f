//! Reads and writes word data through a [`KeyValueStore`].
//!
//! Every value is JSON. Keys:
//! - `unlearnedWords`: array of words
//! - `learnedWords`: array of words
//! - `notifiedWords`: array of word texts already notified this rotation
//! - `notificationTime`: RFC 3339 timestamp of the daily reminder

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::word::Word;
use crate::config::store::{KeyValueStore, Result};

pub const UNLEARNED_KEY: &str = "unlearnedWords";
pub const LEARNED_KEY: &str = "learnedWords";
pub const NOTIFIED_KEY: &str = "notifiedWords";
pub const NOTIFICATION_TIME_KEY: &str = "notificationTime";

/// Everything persisted, as loaded at startup.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub unlearned: Vec<Word>,
    pub learned: Vec<Word>,
    pub notified: BTreeSet<String>,
    pub notification_time: Option<DateTime<Utc>>,
}

pub struct WordGateway<S> {
    store: S,
}

impl<S: KeyValueStore> WordGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load all keys. Never fails: a missing, unreadable or malformed value
    /// is logged and replaced by its empty default.
    pub fn load(&self) -> Snapshot {
        let snapshot = Snapshot {
            unlearned: sanitize(self.read_json(UNLEARNED_KEY)),
            learned: sanitize(self.read_json(LEARNED_KEY)),
            notified: self.read_json(NOTIFIED_KEY),
            notification_time: self.read_json(NOTIFICATION_TIME_KEY),
        };
        debug!(
            unlearned = snapshot.unlearned.len(),
            learned = snapshot.learned.len(),
            notified = snapshot.notified.len(),
            "loaded words"
        );
        snapshot
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                error!(key, error = %e, "failed to read stored value");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!(key, error = %e, "malformed stored value, using default");
                T::default()
            }
        }
    }

    /// Write both word lists in one logical operation.
    pub fn save(&self, unlearned: &[Word], learned: &[Word]) -> Result<()> {
        self.store.multi_set(&[
            (UNLEARNED_KEY, serde_json::to_string(unlearned)?),
            (LEARNED_KEY, serde_json::to_string(learned)?),
        ])
    }

    pub fn save_notified(&self, notified: &BTreeSet<String>) -> Result<()> {
        self.store
            .set_item(NOTIFIED_KEY, &serde_json::to_string(notified)?)
    }

    /// Persist the daily reminder time; `None` forgets it.
    pub fn save_notification_time(&self, time: Option<DateTime<Utc>>) -> Result<()> {
        match time {
            Some(time) => self
                .store
                .set_item(NOTIFICATION_TIME_KEY, &serde_json::to_string(&time)?),
            None => self.store.remove_item(NOTIFICATION_TIME_KEY),
        }
    }

    /// Delete every key this gateway owns.
    pub fn clear(&self) -> Result<()> {
        self.store.multi_remove(&[
            UNLEARNED_KEY,
            LEARNED_KEY,
            NOTIFIED_KEY,
            NOTIFICATION_TIME_KEY,
        ])
    }
}

fn sanitize(words: Vec<Word>) -> Vec<Word> {
    words
        .into_iter()
        .filter_map(|mut word| {
            if word.normalize() {
                Some(word)
            } else {
                warn!(text = %word.text, "dropping stored word without definitions");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::store::MemoryStore;

    fn gateway() -> (MemoryStore, WordGateway<MemoryStore>) {
        let store = MemoryStore::new();
        (store.clone(), WordGateway::new(store))
    }

    #[test]
    fn empty_store_loads_defaults() {
        let (_, gateway) = gateway();
        let snapshot = gateway.load();
        assert!(snapshot.unlearned.is_empty());
        assert!(snapshot.learned.is_empty());
        assert!(snapshot.notified.is_empty());
        assert!(snapshot.notification_time.is_none());
    }

    #[test]
    fn saved_word_loads_back_at_first_definition() {
        let (_, gateway) = gateway();
        let word = Word::new("cat", "a feline").unwrap();
        gateway.save(&[word], &[]).unwrap();

        let snapshot = gateway.load();
        assert_eq!(snapshot.unlearned.len(), 1);
        assert_eq!(snapshot.unlearned[0].text, "cat");
        assert_eq!(snapshot.unlearned[0].definitions, vec!["a feline"]);
        assert_eq!(snapshot.unlearned[0].current_def_index, 0);
        assert!(snapshot.learned.is_empty());
    }

    #[test]
    fn stored_json_uses_expected_keys() {
        let (store, gateway) = gateway();
        let learned = Word::new("dog", "a canine").unwrap();
        gateway.save(&[], &[learned]).unwrap();

        assert_eq!(store.raw(UNLEARNED_KEY).as_deref(), Some("[]"));
        assert_eq!(
            store.raw(LEARNED_KEY).as_deref(),
            Some(r#"[{"text":"dog","definitions":["a canine"],"currentDefIndex":0}]"#)
        );
    }

    #[test]
    fn malformed_value_falls_back_per_key() {
        let (store, gateway) = gateway();
        store.set_item(UNLEARNED_KEY, "{not json").unwrap();
        store
            .set_item(
                LEARNED_KEY,
                r#"[{"text":"dog","definitions":["a canine"],"currentDefIndex":0}]"#,
            )
            .unwrap();

        let snapshot = gateway.load();
        assert!(snapshot.unlearned.is_empty());
        assert_eq!(snapshot.learned.len(), 1);
    }

    #[test]
    fn invalid_words_are_dropped_on_load() {
        let (store, gateway) = gateway();
        store
            .set_item(
                UNLEARNED_KEY,
                r#"[{"text":"cat","definitions":[],"currentDefIndex":0},
                    {"text":"dog","definitions":["a canine"],"currentDefIndex":3}]"#,
            )
            .unwrap();

        let snapshot = gateway.load();
        assert_eq!(snapshot.unlearned.len(), 1);
        assert_eq!(snapshot.unlearned[0].text, "dog");
        assert_eq!(snapshot.unlearned[0].current_def_index, 0);
    }

    #[test]
    fn notified_and_time_roundtrip() {
        let (_, gateway) = gateway();
        let notified: BTreeSet<String> = ["cat".to_string(), "dog".to_string()].into();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();

        gateway.save_notified(&notified).unwrap();
        gateway.save_notification_time(Some(time)).unwrap();

        let snapshot = gateway.load();
        assert_eq!(snapshot.notified, notified);
        assert_eq!(snapshot.notification_time, Some(time));

        gateway.save_notification_time(None).unwrap();
        assert!(gateway.load().notification_time.is_none());
    }

    #[test]
    fn clear_then_load_is_empty() {
        let (store, gateway) = gateway();
        gateway
            .save(&[Word::new("cat", "a feline").unwrap()], &[Word::new("dog", "a canine").unwrap()])
            .unwrap();
        gateway.save_notified(&["cat".to_string()].into()).unwrap();
        gateway.save_notification_time(Some(Utc::now())).unwrap();

        gateway.clear().unwrap();

        let snapshot = gateway.load();
        assert!(snapshot.unlearned.is_empty());
        assert!(snapshot.learned.is_empty());
        assert!(snapshot.notified.is_empty());
        assert!(snapshot.notification_time.is_none());
        assert!(store.raw(UNLEARNED_KEY).is_none());
    }

    #[test]
    fn write_failure_is_reported() {
        let (store, gateway) = gateway();
        store.set_fail_writes(true);
        assert!(gateway.save(&[], &[]).is_err());
    }
}
