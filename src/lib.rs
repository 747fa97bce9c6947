pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reducer;
pub mod sheets;
pub mod state;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod tracker;

pub use app::router;
pub use config::Settings;
pub use models::{Collections, DailyLog, Habit, MoodLog, SyncConfig};
pub use sheets::SheetsClient;
pub use storage::LogStore;
pub use sync::{RemoteSheets, SyncEvent, SyncGateway};
pub use tracker::Tracker;
