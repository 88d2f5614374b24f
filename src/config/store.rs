use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not find config directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String-keyed store of JSON-encoded values.
///
/// Values are opaque strings at this layer; encoding lives in
/// [`crate::cards::WordGateway`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;

    /// Write several keys as one logical operation. Implementations backed by
    /// a transactional store should make this atomic.
    fn multi_set(&self, items: &[(&str, String)]) -> Result<()> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }
}

/// Flat settings table, kept apart from word data so clearing words never
/// touches preferences.
pub trait ConfigStore {
    fn get_config_value(&self, key: &str) -> Result<Option<String>>;

    fn set_config_value(&self, key: &str, value: &str) -> Result<()>;
}

/// Everything the app needs from its backing store.
pub trait Storage: KeyValueStore + ConfigStore {}

impl<T: KeyValueStore + ConfigStore + ?Sized> Storage for T {}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn multi_set(&self, items: &[(&str, String)]) -> Result<()> {
        (**self).multi_set(items)
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        (**self).multi_remove(keys)
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn get_config_value(&self, key: &str) -> Result<Option<String>> {
        (**self).get_config_value(key)
    }

    fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_config_value(key, value)
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;

    /// In-memory store for tests. Clones share the same maps so a test can
    /// keep a handle after boxing one into the app.
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        items: Rc<RefCell<HashMap<String, String>>>,
        config: Rc<RefCell<HashMap<String, String>>>,
        fail_writes: Rc<Cell<bool>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.set(fail);
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        fn check_writable(&self) -> Result<()> {
            if self.fail_writes.get() {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            Ok(())
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            Ok(self.items.borrow().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.check_writable()?;
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.check_writable()?;
            self.items.borrow_mut().remove(key);
            Ok(())
        }
    }

    impl ConfigStore for MemoryStore {
        fn get_config_value(&self, key: &str) -> Result<Option<String>> {
            Ok(self.config.borrow().get(key).cloned())
        }

        fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
            self.check_writable()?;
            self.config
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
