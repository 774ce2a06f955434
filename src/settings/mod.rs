//! User settings and their persistence

pub mod store;
pub mod user;

pub use store::{FileStore, KeyValueStore, MemoryStore, SettingsRepository, SETTINGS_KEY};
pub use user::{parse_tank_count, UserSettings, Weekday};
