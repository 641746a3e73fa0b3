pub mod config;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod practicum;
pub mod status;
pub mod watcher;
