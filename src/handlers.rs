use crate::errors::AppError;
use crate::models::{
    CalendarView, ConfigResponse, DailyLog, MonthRequest, MoodLog, MoodRequest,
    StatsView, SyncConfig, TodayView, ViewRequest,
};
use crate::reducer::AppState;
use crate::tracker::Tracker;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: AppState,
    pub is_configured: bool,
}

pub async fn get_state(State(tracker): State<Tracker>) -> Json<StateResponse> {
    Json(state_response(&tracker, tracker.snapshot()).await)
}

pub async fn get_today(State(tracker): State<Tracker>) -> Json<TodayView> {
    Json(tracker.today_view())
}

pub async fn get_calendar(State(tracker): State<Tracker>) -> Json<CalendarView> {
    Json(tracker.calendar_view())
}

pub async fn get_stats(State(tracker): State<Tracker>) -> Json<StatsView> {
    Json(tracker.stats_view())
}

pub async fn toggle_habit(
    State(tracker): State<Tracker>,
    Path(habit_id): Path<String>,
) -> Result<Json<DailyLog>, AppError> {
    let log = tracker.toggle_habit(habit_id.trim()).await?;
    Ok(Json(log))
}

pub async fn set_mood(
    State(tracker): State<Tracker>,
    Json(payload): Json<MoodRequest>,
) -> Result<Json<MoodLog>, AppError> {
    let record = tracker.set_mood(payload.kind, payload.value).await?;
    Ok(Json(record))
}

pub async fn change_view(
    State(tracker): State<Tracker>,
    Json(payload): Json<ViewRequest>,
) -> Json<StateResponse> {
    let state = tracker.change_view(payload.view);
    Json(state_response(&tracker, state).await)
}

pub async fn change_month(
    State(tracker): State<Tracker>,
    Json(payload): Json<MonthRequest>,
) -> Json<StateResponse> {
    let state = tracker.change_month(payload.date);
    Json(state_response(&tracker, state).await)
}

pub async fn get_config(State(tracker): State<Tracker>) -> Json<ConfigResponse> {
    Json(to_config_response(tracker.config().await))
}

pub async fn save_config(
    State(tracker): State<Tracker>,
    Json(payload): Json<SyncConfig>,
) -> Json<ConfigResponse> {
    let config = SyncConfig {
        spreadsheet_id: payload.spreadsheet_id.trim().to_string(),
        api_key: payload.api_key.trim().to_string(),
    };
    tracker.save_config(config.clone()).await;
    Json(to_config_response(config))
}

pub async fn sync_now(State(tracker): State<Tracker>) -> Json<StateResponse> {
    let state = tracker.refresh().await;
    Json(state_response(&tracker, state).await)
}

async fn state_response(tracker: &Tracker, state: AppState) -> StateResponse {
    StateResponse {
        state,
        is_configured: tracker.is_configured().await,
    }
}

fn to_config_response(config: SyncConfig) -> ConfigResponse {
    ConfigResponse {
        is_configured: config.is_configured(),
        spreadsheet_id: config.spreadsheet_id,
        api_key: config.api_key,
    }
}
