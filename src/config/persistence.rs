use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::store::{ConfigStore, KeyValueStore, Result, StorageError};
use super::theme::ThemePreset;

/// Environment variable that overrides where the database and log live.
pub const DATA_DIR_ENV: &str = "WORDCARDS_DATA_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    #[default]
    Alphabetical,
    Insertion,
}

impl SortPolicy {
    pub fn next(self) -> Self {
        match self {
            Self::Alphabetical => Self::Insertion,
            Self::Insertion => Self::Alphabetical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alphabetical => "A-Z",
            Self::Insertion => "Added",
        }
    }

    fn to_db(self) -> i32 {
        match self {
            Self::Alphabetical => 0,
            Self::Insertion => 1,
        }
    }

    fn from_db(val: i32) -> Self {
        match val {
            1 => Self::Insertion,
            _ => Self::Alphabetical,
        }
    }
}

/// How word notifications are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePolicy {
    /// One random, not-yet-notified word per run.
    #[default]
    SinglePick,
    /// Every unlearned word, one per day, in shuffled order.
    Rotation,
}

impl SchedulePolicy {
    pub fn next(self) -> Self {
        match self {
            Self::SinglePick => Self::Rotation,
            Self::Rotation => Self::SinglePick,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SinglePick => "Word of the day",
            Self::Rotation => "Daily rotation",
        }
    }

    fn to_db(self) -> i32 {
        match self {
            Self::SinglePick => 0,
            Self::Rotation => 1,
        }
    }

    fn from_db(val: i32) -> Self {
        match val {
            1 => Self::Rotation,
            _ => Self::SinglePick,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub schedule_policy: SchedulePolicy,
    pub sort_policy: SortPolicy,
    pub theme: ThemePreset,
    pub notifications_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schedule_policy: SchedulePolicy::SinglePick,
            sort_policy: SortPolicy::Alphabetical,
            theme: ThemePreset::Default,
            notifications_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn load<S: ConfigStore + ?Sized>(store: &S) -> Result<Self> {
        let mut config = AppConfig::default();

        if let Some(v) = store.get_config_value("schedule_policy")? {
            config.schedule_policy = SchedulePolicy::from_db(v.parse().unwrap_or(0));
        }
        if let Some(v) = store.get_config_value("sort_policy")? {
            config.sort_policy = SortPolicy::from_db(v.parse().unwrap_or(0));
        }
        if let Some(v) = store.get_config_value("theme")? {
            config.theme = match v.as_str() {
                "dracula" => ThemePreset::Dracula,
                "gruvbox" => ThemePreset::Gruvbox,
                _ => ThemePreset::Default,
            };
        }
        if let Some(v) = store.get_config_value("notifications_enabled")? {
            config.notifications_enabled = v != "0";
        }

        Ok(config)
    }

    pub fn save<S: ConfigStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.set_config_value(
            "schedule_policy",
            &self.schedule_policy.to_db().to_string(),
        )?;
        store.set_config_value("sort_policy", &self.sort_policy.to_db().to_string())?;
        store.set_config_value(
            "theme",
            match self.theme {
                ThemePreset::Default => "default",
                ThemePreset::Dracula => "dracula",
                ThemePreset::Gruvbox => "gruvbox",
            },
        )?;
        store.set_config_value(
            "notifications_enabled",
            if self.notifications_enabled { "1" } else { "0" },
        )?;
        Ok(())
    }
}

/// Resolve the data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or(StorageError::NoConfigDir)?
            .join("wordcards"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new() -> Result<Self> {
        Self::open(&data_dir()?.join("wordcards.db"))
    }

    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Settings (key-value, plain strings)
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Word data (key-value, JSON values)
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(result)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }

    fn multi_set(&self, items: &[(&str, String)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in items {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?", [key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl ConfigStore for Database {
    fn get_config_value(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(result)
    }

    fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}
