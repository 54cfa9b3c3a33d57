//! Settings loading and management

mod loader;

pub use loader::SettingsLoader;
