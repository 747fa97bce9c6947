use crate::models::{DailyLog, Habit, MoodLog, View};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub habits: Vec<Habit>,
    pub daily_logs: Vec<DailyLog>,
    pub mood_logs: Vec<MoodLog>,
    pub view: View,
    pub current_month: NaiveDate,
    pub is_loading: bool,
    pub is_syncing: bool,
    pub error: Option<String>,
}

impl AppState {
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            current_month: today,
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn daily_log(&self, date: NaiveDate, habit_id: &str) -> Option<&DailyLog> {
        self.daily_logs.iter().find(|log| log.matches(date, habit_id))
    }

    pub fn mood_log(&self, date: NaiveDate) -> Option<&MoodLog> {
        self.mood_logs.iter().find(|log| log.date == date)
    }

    pub fn has_habit(&self, habit_id: &str) -> bool {
        self.habits.iter().any(|habit| habit.id == habit_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetData {
        habits: Vec<Habit>,
        daily_logs: Vec<DailyLog>,
        mood_logs: Vec<MoodLog>,
    },
    SetLoading(bool),
    SetSyncing(bool),
    SetError(Option<String>),
    SetView(View),
    SetMonth(NaiveDate),
    ToggleHabit { date: NaiveDate, habit_id: String },
    UpdateMood(MoodLog),
}

pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetData {
            habits,
            daily_logs,
            mood_logs,
        } => {
            state.habits = habits;
            state.daily_logs = daily_logs;
            state.mood_logs = mood_logs;
            state.is_loading = false;
        }
        Action::SetLoading(value) => state.is_loading = value,
        Action::SetSyncing(value) => state.is_syncing = value,
        Action::SetError(message) => state.error = message,
        Action::SetView(view) => state.view = view,
        Action::SetMonth(month) => state.current_month = month,
        Action::ToggleHabit { date, habit_id } => {
            // First interaction always marks the habit done.
            let completed = state
                .daily_log(date, &habit_id)
                .map(|log| !log.completed)
                .unwrap_or(true);
            state.daily_logs.retain(|log| !log.matches(date, &habit_id));
            state.daily_logs.push(DailyLog {
                date,
                habit_id,
                completed,
            });
        }
        Action::UpdateMood(record) => {
            state.mood_logs.retain(|log| log.date != record.date);
            state.mood_logs.push(record);
        }
    }
    state
}
