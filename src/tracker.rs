use crate::errors::TrackerError;
use crate::models::{
    CalendarView, DailyLog, MAX_SCORE, MIN_SCORE, MoodKind, MoodLog, StatsView, SyncConfig,
    TodayView, View,
};
use crate::reducer::{Action, AppState};
use crate::state::Store;
use crate::stats::{build_calendar, build_stats_at, build_today_at};
use crate::storage::{LogStore, Slot};
use crate::sync::{RemoteSheets, SyncEvent, SyncGateway};
use chrono::{Local, NaiveDate};
use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info};

#[derive(Clone)]
pub struct Tracker {
    store: Arc<Store>,
    gateway: Arc<SyncGateway>,
    log_store: Arc<LogStore>,
    intents: Arc<Mutex<()>>,
}

impl Tracker {
    pub async fn start(
        log_store: Arc<LogStore>,
        remote: Arc<dyn RemoteSheets>,
        latency: Duration,
        remote_timeout: Duration,
    ) -> Self {
        let config = log_store.load(Slot::Config, SyncConfig::default()).await;
        info!(configured = config.is_configured(), "loaded sync config");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let gateway = Arc::new(SyncGateway::new(
            Arc::clone(&log_store),
            remote,
            config,
            latency,
            remote_timeout,
            events_tx,
        ));
        let store = Arc::new(Store::new(AppState::initial(today())));

        tokio::spawn(apply_sync_events(Arc::clone(&store), events_rx));
        tokio::spawn(persist_changes(store.subscribe(), Arc::clone(&log_store)));

        Self {
            store,
            gateway,
            log_store,
            intents: Arc::new(Mutex::new(())),
        }
    }

    pub fn snapshot(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe()
    }

    // Intents issued during the fetch wait here so SetData cannot drop them.
    pub async fn refresh(&self) -> AppState {
        let _intent = self.intents.lock().await;
        self.store.dispatch(Action::SetError(None));
        self.store.dispatch(Action::SetLoading(true));
        let data = self.gateway.fetch_all().await;
        self.store.dispatch(Action::SetData {
            habits: data.habits,
            daily_logs: data.daily_logs,
            mood_logs: data.mood_logs,
        })
    }

    pub async fn toggle_habit(&self, habit_id: &str) -> Result<DailyLog, TrackerError> {
        self.toggle_habit_on(today(), habit_id).await
    }

    pub async fn toggle_habit_on(
        &self,
        date: NaiveDate,
        habit_id: &str,
    ) -> Result<DailyLog, TrackerError> {
        let _intent = self.intents.lock().await;
        if !self.store.snapshot().has_habit(habit_id) {
            return Err(TrackerError::UnknownHabit(habit_id.to_string()));
        }

        let state = self.store.dispatch(Action::ToggleHabit {
            date,
            habit_id: habit_id.to_string(),
        });
        let Some(log) = state.daily_log(date, habit_id).cloned() else {
            return Err(TrackerError::UnknownHabit(habit_id.to_string()));
        };
        debug!(%date, habit_id, completed = log.completed, "habit toggled");

        self.gateway
            .upsert_daily_log(date, habit_id, log.completed)
            .await;
        Ok(log)
    }

    pub async fn set_mood(&self, kind: MoodKind, value: i64) -> Result<MoodLog, TrackerError> {
        self.set_mood_on(today(), kind, value).await
    }

    pub async fn set_mood_on(
        &self,
        date: NaiveDate,
        kind: MoodKind,
        value: i64,
    ) -> Result<MoodLog, TrackerError> {
        let score = u8::try_from(value)
            .ok()
            .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
            .ok_or(TrackerError::ScoreOutOfRange(value))?;

        let _intent = self.intents.lock().await;
        let mut record = self
            .store
            .snapshot()
            .mood_log(date)
            .copied()
            .unwrap_or_else(|| MoodLog::neutral(date));
        match kind {
            MoodKind::Mood => record.mood_score = score,
            MoodKind::Motivation => record.motivation_score = score,
        }

        self.store.dispatch(Action::UpdateMood(record));
        self.gateway
            .upsert_mood_log(date, record.mood_score, record.motivation_score)
            .await;
        Ok(record)
    }

    pub fn change_view(&self, view: View) -> AppState {
        self.store.dispatch(Action::SetView(view))
    }

    pub fn change_month(&self, month: NaiveDate) -> AppState {
        self.store.dispatch(Action::SetMonth(month))
    }

    pub async fn config(&self) -> SyncConfig {
        self.gateway.config().await
    }

    pub async fn is_configured(&self) -> bool {
        self.gateway.is_configured().await
    }

    pub async fn save_config(&self, config: SyncConfig) -> AppState {
        self.log_store.save(Slot::Config, &config).await;
        info!(configured = config.is_configured(), "sync config saved");
        self.gateway.set_config(config).await;
        self.refresh().await
    }

    pub fn today_view(&self) -> TodayView {
        let state = self.snapshot();
        build_today_at(today(), &state.habits, &state.daily_logs, &state.mood_logs)
    }

    pub fn calendar_view(&self) -> CalendarView {
        let state = self.snapshot();
        build_calendar(state.current_month, &state.habits, &state.daily_logs)
    }

    pub fn stats_view(&self) -> StatsView {
        let state = self.snapshot();
        build_stats_at(today(), &state.habits, &state.daily_logs, &state.mood_logs)
    }
}

async fn apply_sync_events(store: Arc<Store>, mut events: mpsc::UnboundedReceiver<SyncEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            SyncEvent::Busy(busy) => {
                store.dispatch(Action::SetSyncing(busy));
            }
            SyncEvent::Failed { message, .. } => {
                store.dispatch(Action::SetError(Some(message)));
            }
            SyncEvent::Mirrored(key) => debug!(%key, "mirrored"),
            SyncEvent::Superseded(key) => debug!(%key, "superseded"),
        }
    }
}

async fn persist_changes(mut changes: watch::Receiver<AppState>, log_store: Arc<LogStore>) {
    let mut last = changes.borrow_and_update().clone();
    while changes.changed().await.is_ok() {
        let state = changes.borrow_and_update().clone();
        if state.habits != last.habits {
            log_store.save(Slot::Habits, &state.habits).await;
        }
        if state.daily_logs != last.daily_logs {
            log_store.save(Slot::DailyLogs, &state.daily_logs).await;
        }
        if state.mood_logs != last.mood_logs {
            log_store.save(Slot::MoodLogs, &state.mood_logs).await;
        }
        last = state;
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
