use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;
pub const DEFAULT_SCORE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub active: bool,
}

impl Habit {
    pub fn new(id: &str, icon: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            icon: icon.to_string(),
            name: name.to_string(),
            active: true,
        }
    }
}

pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::new("water", "💧", "Drink 2L of water"),
        Habit::new("exercise", "🏃", "Exercise 30 minutes"),
        Habit::new("read", "📚", "Read 20 pages"),
        Habit::new("meditate", "🧘", "Meditate 10 minutes"),
        Habit::new("sleep", "😴", "Sleep before midnight"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,
    pub habit_id: String,
    pub completed: bool,
}

impl DailyLog {
    pub fn matches(&self, date: NaiveDate, habit_id: &str) -> bool {
        self.date == date && self.habit_id == habit_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub date: NaiveDate,
    pub mood_score: u8,
    pub motivation_score: u8,
}

impl MoodLog {
    /// Placeholder record shown for a date nobody has rated yet.
    pub fn neutral(date: NaiveDate) -> Self {
        Self {
            date,
            mood_score: DEFAULT_SCORE,
            motivation_score: DEFAULT_SCORE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub api_key: String,
}

impl SyncConfig {
    pub fn is_configured(&self) -> bool {
        !self.spreadsheet_id.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Today,
    Calendar,
    Stats,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Mood,
    Motivation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    pub habits: Vec<Habit>,
    pub daily_logs: Vec<DailyLog>,
    pub mood_logs: Vec<MoodLog>,
}

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub kind: MoodKind,
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub view: View,
}

#[derive(Debug, Deserialize)]
pub struct MonthRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub spreadsheet_id: String,
    pub api_key: String,
    pub is_configured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    pub date: NaiveDate,
    pub habits: Vec<HabitStatus>,
    pub completion_rate: f64,
    pub mood: MoodLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellStatus {
    Full,
    PartialHigh,
    PartialLow,
    Empty,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub completion_rate: f64,
    pub status: CellStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub month: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarCell>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitTotal {
    pub habit_id: String,
    pub icon: String,
    pub name: String,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub completion_rate: f64,
    pub mood_score: Option<u8>,
    pub motivation_score: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub current_streak: u32,
    pub best_streak: u32,
    pub habit_totals: Vec<HabitTotal>,
    pub last_7_days: Vec<DailyPoint>,
}
