use crate::errors::SyncError;
use crate::models::{Collections, DailyLog, MoodLog, SyncConfig, default_habits};
use crate::storage::{LogStore, Slot};
use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info, warn};

pub trait RemoteSheets: Send + Sync {
    fn read_all<'a>(&'a self, config: &'a SyncConfig) -> BoxFuture<'a, Result<Collections, SyncError>>;

    fn upsert_daily_log<'a>(
        &'a self,
        config: &'a SyncConfig,
        log: &'a DailyLog,
    ) -> BoxFuture<'a, Result<(), SyncError>>;

    fn upsert_mood_log<'a>(
        &'a self,
        config: &'a SyncConfig,
        log: &'a MoodLog,
    ) -> BoxFuture<'a, Result<(), SyncError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogKey {
    Daily { date: NaiveDate, habit_id: String },
    Mood { date: NaiveDate },
}

impl fmt::Display for LogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKey::Daily { date, habit_id } => write!(f, "daily:{date}:{habit_id}"),
            LogKey::Mood { date } => write!(f, "mood:{date}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Busy(bool),
    Mirrored(LogKey),
    Failed { key: Option<LogKey>, message: String },
    Superseded(LogKey),
}

#[derive(Debug, Clone)]
enum RemoteWrite {
    Daily(DailyLog),
    Mood(MoodLog),
}

pub struct SyncGateway {
    store: Arc<LogStore>,
    remote: Arc<dyn RemoteSheets>,
    config: RwLock<SyncConfig>,
    latency: Duration,
    remote_timeout: Duration,
    in_flight: AtomicUsize,
    versions: Mutex<HashMap<LogKey, u64>>,
    remote_lock: Mutex<()>,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl SyncGateway {
    pub fn new(
        store: Arc<LogStore>,
        remote: Arc<dyn RemoteSheets>,
        config: SyncConfig,
        latency: Duration,
        remote_timeout: Duration,
        events: mpsc::UnboundedSender<SyncEvent>,
    ) -> Self {
        Self {
            store,
            remote,
            config: RwLock::new(config),
            latency,
            remote_timeout,
            in_flight: AtomicUsize::new(0),
            versions: Mutex::new(HashMap::new()),
            remote_lock: Mutex::new(()),
            events,
        }
    }

    pub async fn config(&self) -> SyncConfig {
        self.config.read().await.clone()
    }

    pub async fn set_config(&self, config: SyncConfig) {
        *self.config.write().await = config;
    }

    pub async fn is_configured(&self) -> bool {
        self.config.read().await.is_configured()
    }

    pub async fn load_local(&self) -> Collections {
        Collections {
            habits: self.store.load(Slot::Habits, default_habits()).await,
            daily_logs: self.store.load(Slot::DailyLogs, Vec::new()).await,
            mood_logs: self.store.load(Slot::MoodLogs, Vec::new()).await,
        }
    }

    // Local slots are read after the wait so intents applied meanwhile are kept.
    pub async fn fetch_all(&self) -> Collections {
        let config = self.config().await;
        if !config.is_configured() {
            tokio::time::sleep(self.latency).await;
            return self.load_local().await;
        }

        let fetched = self.within_timeout(self.remote.read_all(&config)).await;
        let local = self.load_local().await;
        match fetched {
            Ok(remote) => {
                info!(
                    habits = remote.habits.len(),
                    daily_logs = remote.daily_logs.len(),
                    mood_logs = remote.mood_logs.len(),
                    "remote read complete"
                );
                merge_local_first(local, remote)
            }
            Err(err) => {
                warn!("remote read failed, using local data: {err}");
                self.emit(SyncEvent::Failed {
                    key: None,
                    message: err.to_string(),
                });
                local
            }
        }
    }

    pub async fn upsert_daily_log(self: &Arc<Self>, date: NaiveDate, habit_id: &str, completed: bool) {
        let log = DailyLog {
            date,
            habit_id: habit_id.to_string(),
            completed,
        };
        self.store.upsert_daily_log(&log).await;

        let key = LogKey::Daily {
            date,
            habit_id: log.habit_id.clone(),
        };
        self.mirror(key, RemoteWrite::Daily(log)).await;
    }

    pub async fn upsert_mood_log(
        self: &Arc<Self>,
        date: NaiveDate,
        mood_score: u8,
        motivation_score: u8,
    ) {
        let log = MoodLog {
            date,
            mood_score,
            motivation_score,
        };
        self.store.upsert_mood_log(&log).await;
        self.mirror(LogKey::Mood { date }, RemoteWrite::Mood(log)).await;
    }

    async fn mirror(self: &Arc<Self>, key: LogKey, write: RemoteWrite) {
        let config = self.config().await;
        if !config.is_configured() {
            return;
        }

        let version = {
            let mut versions = self.versions.lock().await;
            let version = versions.entry(key.clone()).or_insert(0);
            *version += 1;
            *version
        };

        self.begin_remote();
        let gateway = Arc::clone(self);
        tokio::spawn(async move {
            let event = gateway.send_if_latest(&config, key, version, write).await;
            gateway.emit(event);
            gateway.end_remote();
        });
    }

    async fn send_if_latest(
        &self,
        config: &SyncConfig,
        key: LogKey,
        version: u64,
        write: RemoteWrite,
    ) -> SyncEvent {
        let _serial = self.remote_lock.lock().await;
        let latest = self.versions.lock().await.get(&key).copied().unwrap_or(0);
        if version < latest {
            debug!(%key, version, latest, "dropping superseded remote write");
            return SyncEvent::Superseded(key);
        }

        let result = match &write {
            RemoteWrite::Daily(log) => {
                self.within_timeout(self.remote.upsert_daily_log(config, log))
                    .await
            }
            RemoteWrite::Mood(log) => {
                self.within_timeout(self.remote.upsert_mood_log(config, log))
                    .await
            }
        };
        match result {
            Ok(()) => {
                debug!(%key, "remote write complete");
                SyncEvent::Mirrored(key)
            }
            Err(err) => {
                warn!(%key, "remote write failed: {err}");
                SyncEvent::Failed {
                    key: Some(key),
                    message: err.to_string(),
                }
            }
        }
    }

    async fn within_timeout<T>(
        &self,
        call: BoxFuture<'_, Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        tokio::time::timeout(self.remote_timeout, call)
            .await
            .unwrap_or(Err(SyncError::Timeout(self.remote_timeout)))
    }

    fn begin_remote(&self) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.emit(SyncEvent::Busy(true));
        }
    }

    fn end_remote(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.emit(SyncEvent::Busy(false));
        }
    }

    fn emit(&self, event: SyncEvent) {
        if self.events.send(event).is_err() {
            debug!("sync event dropped, no listener");
        }
    }
}

/// Unions `remote` into `local`; on a shared key the local record wins.
pub fn merge_local_first(local: Collections, remote: Collections) -> Collections {
    let mut merged = local;
    for habit in remote.habits {
        if !merged.habits.iter().any(|known| known.id == habit.id) {
            merged.habits.push(habit);
        }
    }
    for log in remote.daily_logs {
        if !merged
            .daily_logs
            .iter()
            .any(|known| known.matches(log.date, &log.habit_id))
        {
            merged.daily_logs.push(log);
        }
    }
    for log in remote.mood_logs {
        if !merged.mood_logs.iter().any(|known| known.date == log.date) {
            merged.mood_logs.push(log);
        }
    }
    merged
}
