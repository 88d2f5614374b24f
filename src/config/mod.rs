pub mod persistence;
pub mod store;
pub mod theme;

pub use persistence::{data_dir, AppConfig, Database, SchedulePolicy, SortPolicy};
pub use store::Storage;
pub use theme::Theme;

#[cfg(test)]
pub use store::{ConfigStore, MemoryStore};
