use crate::models::{DailyLog, MoodLog};
use serde::{Serialize, de::DeserializeOwned};
use std::path::PathBuf;
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Habits,
    DailyLogs,
    MoodLogs,
    Config,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Habits => "habits",
            Slot::DailyLogs => "dailyLogs",
            Slot::MoodLogs => "moodLogs",
            Slot::Config => "config",
        }
    }
}

#[derive(Debug)]
pub struct LogStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }

    pub async fn load<T: DeserializeOwned>(&self, slot: Slot, default: T) -> T {
        let path = self.slot_path(slot);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    warn!(slot = slot.key(), "failed to parse stored slot: {err}");
                    default
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => default,
            Err(err) => {
                error!(slot = slot.key(), "failed to read stored slot: {err}");
                default
            }
        }
    }

    pub async fn save<T: Serialize>(&self, slot: Slot, value: &T) {
        let _guard = self.write_lock.lock().await;
        self.write_unlocked(slot, value).await;
    }

    pub async fn upsert_daily_log(&self, log: &DailyLog) {
        let _guard = self.write_lock.lock().await;
        let mut logs: Vec<DailyLog> = self.load(Slot::DailyLogs, Vec::new()).await;
        logs.retain(|existing| !existing.matches(log.date, &log.habit_id));
        logs.push(log.clone());
        self.write_unlocked(Slot::DailyLogs, &logs).await;
    }

    pub async fn upsert_mood_log(&self, log: &MoodLog) {
        let _guard = self.write_lock.lock().await;
        let mut logs: Vec<MoodLog> = self.load(Slot::MoodLogs, Vec::new()).await;
        logs.retain(|existing| existing.date != log.date);
        logs.push(*log);
        self.write_unlocked(Slot::MoodLogs, &logs).await;
    }

    async fn write_unlocked<T: Serialize>(&self, slot: Slot, value: &T) {
        let payload = match serde_json::to_vec_pretty(value) {
            Ok(payload) => payload,
            Err(err) => {
                error!(slot = slot.key(), "failed to serialize slot: {err}");
                return;
            }
        };

        if let Err(err) = fs::create_dir_all(&self.dir).await {
            error!(dir = %self.dir.display(), "failed to create data dir: {err}");
            return;
        }

        let path = self.slot_path(slot);
        match fs::write(&path, payload).await {
            Ok(()) => debug!(slot = slot.key(), "slot saved"),
            Err(err) => error!(slot = slot.key(), "failed to write slot: {err}"),
        }
    }
}
