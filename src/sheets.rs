use crate::errors::SyncError;
use crate::models::{Collections, DailyLog, Habit, MAX_SCORE, MIN_SCORE, MoodLog, SyncConfig};
use crate::sync::RemoteSheets;
use chrono::NaiveDate;
use futures_util::{FutureExt, future::BoxFuture};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
enum Sheet {
    Habits,
    DailyLogs,
    MoodLogs,
}

impl Sheet {
    fn name(self) -> &'static str {
        match self {
            Sheet::Habits => "Habits",
            Sheet::DailyLogs => "DailyLogs",
            Sheet::MoodLogs => "MoodLogs",
        }
    }

    fn last_column(self) -> char {
        match self {
            Sheet::Habits => 'D',
            Sheet::DailyLogs | Sheet::MoodLogs => 'C',
        }
    }

    /// Data rows only; row 1 holds the header.
    fn data_range(self) -> String {
        format!("{}!A2:{}", self.name(), self.last_column())
    }

    fn row_range(self, row: usize) -> String {
        format!("{}!A{row}:{}{row}", self.name(), self.last_column())
    }

    fn append_range(self) -> String {
        format!("{}!A:{}:append", self.name(), self.last_column())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValueUpdate {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn values_url(&self, config: &SyncConfig, range: &str) -> String {
        format!("{}/{}/values/{range}", self.base_url, config.spreadsheet_id)
    }

    async fn read_rows(&self, config: &SyncConfig, sheet: Sheet) -> Result<Vec<Vec<String>>, SyncError> {
        let response = self
            .http
            .get(self.values_url(config, &sheet.data_range()))
            .query(&[("key", config.api_key.as_str())])
            .send()
            .await?;
        let body: ValueRange = ensure_success(response).await?.json().await?;
        debug!(sheet = sheet.name(), rows = body.values.len(), "read sheet");
        Ok(body.values)
    }

    async fn upsert_row<F>(
        &self,
        config: &SyncConfig,
        sheet: Sheet,
        is_same_key: F,
        row: Vec<String>,
    ) -> Result<(), SyncError>
    where
        F: Fn(&[String]) -> bool + Send,
    {
        let rows = self.read_rows(config, sheet).await?;
        let body = ValueUpdate { values: vec![row] };
        let request = match rows.iter().position(|existing| is_same_key(existing.as_slice())) {
            Some(index) => self
                .http
                .put(self.values_url(config, &sheet.row_range(index + 2))),
            None => self.http.post(self.values_url(config, &sheet.append_range())),
        };

        let response = request
            .query(&[
                ("valueInputOption", "RAW"),
                ("key", config.api_key.as_str()),
            ])
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

impl RemoteSheets for SheetsClient {
    fn read_all<'a>(&'a self, config: &'a SyncConfig) -> BoxFuture<'a, Result<Collections, SyncError>> {
        async move {
            let habits = self.read_rows(config, Sheet::Habits).await?;
            let daily_logs = self.read_rows(config, Sheet::DailyLogs).await?;
            let mood_logs = self.read_rows(config, Sheet::MoodLogs).await?;
            Ok(Collections {
                habits: parse_rows(Sheet::Habits, &habits, parse_habit),
                daily_logs: parse_rows(Sheet::DailyLogs, &daily_logs, parse_daily_log),
                mood_logs: parse_rows(Sheet::MoodLogs, &mood_logs, parse_mood_log),
            })
        }
        .boxed()
    }

    fn upsert_daily_log<'a>(
        &'a self,
        config: &'a SyncConfig,
        log: &'a DailyLog,
    ) -> BoxFuture<'a, Result<(), SyncError>> {
        let row = vec![
            log.date.to_string(),
            log.habit_id.clone(),
            format_bool(log.completed),
        ];
        let date = log.date.to_string();
        self.upsert_row(
            config,
            Sheet::DailyLogs,
            move |existing| {
                cell(existing, 0) == Some(date.as_str()) && cell(existing, 1) == Some(log.habit_id.as_str())
            },
            row,
        )
        .boxed()
    }

    fn upsert_mood_log<'a>(
        &'a self,
        config: &'a SyncConfig,
        log: &'a MoodLog,
    ) -> BoxFuture<'a, Result<(), SyncError>> {
        let row = vec![
            log.date.to_string(),
            log.mood_score.to_string(),
            log.motivation_score.to_string(),
        ];
        let date = log.date.to_string();
        self.upsert_row(
            config,
            Sheet::MoodLogs,
            move |existing| cell(existing, 0) == Some(date.as_str()),
            row,
        )
        .boxed()
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Status {
        status: status.as_u16(),
        body,
    })
}

fn parse_rows<T>(sheet: Sheet, rows: &[Vec<String>], parse: fn(&[String]) -> Result<T, SyncError>) -> Vec<T> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match parse(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(sheet = sheet.name(), row = index + 2, "skipping row: {err}");
                None
            }
        })
        .collect()
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(|value| value.trim())
}

fn required<'a>(row: &'a [String], index: usize, field: &str) -> Result<&'a str, SyncError> {
    cell(row, index)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SyncError::Malformed(format!("missing {field}")))
}

fn parse_bool(value: &str) -> Result<bool, SyncError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(SyncError::Malformed(format!("not a boolean: {other}"))),
    }
}

fn format_bool(value: bool) -> String {
    let text = if value { "TRUE" } else { "FALSE" };
    text.to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate, SyncError> {
    value
        .parse()
        .map_err(|_| SyncError::Malformed(format!("not a date: {value}")))
}

fn parse_score(value: &str) -> Result<u8, SyncError> {
    value
        .parse::<u8>()
        .ok()
        .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
        .ok_or_else(|| SyncError::Malformed(format!("score out of range: {value}")))
}

fn parse_habit(row: &[String]) -> Result<Habit, SyncError> {
    let active = match cell(row, 3) {
        Some(value) if !value.is_empty() => parse_bool(value)?,
        _ => true,
    };
    Ok(Habit {
        id: required(row, 0, "id")?.to_string(),
        icon: cell(row, 1).unwrap_or_default().to_string(),
        name: required(row, 2, "name")?.to_string(),
        active,
    })
}

fn parse_daily_log(row: &[String]) -> Result<DailyLog, SyncError> {
    Ok(DailyLog {
        date: parse_date(required(row, 0, "date")?)?,
        habit_id: required(row, 1, "habitId")?.to_string(),
        completed: parse_bool(required(row, 2, "completed")?)?,
    })
}

fn parse_mood_log(row: &[String]) -> Result<MoodLog, SyncError> {
    Ok(MoodLog {
        date: parse_date(required(row, 0, "date")?)?,
        mood_score: parse_score(required(row, 1, "moodScore")?)?,
        motivation_score: parse_score(required(row, 2, "motivationScore")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn ranges_follow_record_columns() {
        assert_eq!(Sheet::Habits.data_range(), "Habits!A2:D");
        assert_eq!(Sheet::DailyLogs.row_range(5), "DailyLogs!A5:C5");
        assert_eq!(Sheet::MoodLogs.append_range(), "MoodLogs!A:C:append");
    }

    #[test]
    fn habit_rows_default_to_active() {
        let habit = parse_habit(&row(&["water", "💧", "Water"])).unwrap();
        assert!(habit.active);
        let habit = parse_habit(&row(&["water", "💧", "Water", "FALSE"])).unwrap();
        assert!(!habit.active);
        assert!(parse_habit(&row(&["", "💧", "Water"])).is_err());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = vec![
            row(&["2026-01-02", "water", "TRUE"]),
            row(&["yesterday", "water", "TRUE"]),
            row(&["2026-01-02", "read", "maybe"]),
            row(&["2026-01-03", "read"]),
        ];
        let logs = parse_rows(Sheet::DailyLogs, &rows, parse_daily_log);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].habit_id, "water");
    }

    #[test]
    fn mood_scores_must_be_in_range() {
        assert!(parse_mood_log(&row(&["2026-01-02", "10", "1"])).is_ok());
        assert!(parse_mood_log(&row(&["2026-01-02", "11", "1"])).is_err());
        assert!(parse_mood_log(&row(&["2026-01-02", "0", "5"])).is_err());
    }
}
