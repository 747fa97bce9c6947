use crate::models::{
    CalendarCell, CalendarView, CellStatus, DailyLog, DailyPoint, Habit, HabitStatus, HabitTotal,
    MoodLog, StatsView, TodayView,
};
use chrono::{Datelike, Duration, NaiveDate};

const STREAK_WINDOW_DAYS: i64 = 365;

pub fn completion_rate(date: NaiveDate, habits: &[Habit], logs: &[DailyLog]) -> f64 {
    if habits.is_empty() {
        return 0.0;
    }
    let completed = completed_count(date, logs);
    let rate = completed as f64 * 100.0 / habits.len() as f64;
    rate.min(100.0)
}

pub fn classify(rate: f64) -> CellStatus {
    if rate >= 80.0 {
        CellStatus::Full
    } else if rate >= 40.0 {
        CellStatus::PartialHigh
    } else if rate > 0.0 {
        CellStatus::PartialLow
    } else {
        CellStatus::Empty
    }
}

// An unfinished today never ends the streak; it only adds when perfect.
pub fn current_streak_at(today: NaiveDate, habits: &[Habit], logs: &[DailyLog]) -> u32 {
    let mut streak = 0;
    if is_perfect_day(today, habits, logs) {
        streak += 1;
    }
    for offset in 1..STREAK_WINDOW_DAYS {
        let date = today - Duration::days(offset);
        if !is_perfect_day(date, habits, logs) {
            break;
        }
        streak += 1;
    }
    streak
}

pub fn best_streak_at(today: NaiveDate, habits: &[Habit], logs: &[DailyLog]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for offset in (0..STREAK_WINDOW_DAYS).rev() {
        let date = today - Duration::days(offset);
        if is_perfect_day(date, habits, logs) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

pub fn habit_total(habit_id: &str, logs: &[DailyLog]) -> usize {
    logs.iter()
        .filter(|log| log.completed && log.habit_id == habit_id)
        .count()
}

pub fn build_today_at(
    today: NaiveDate,
    habits: &[Habit],
    logs: &[DailyLog],
    moods: &[MoodLog],
) -> TodayView {
    let statuses = habits
        .iter()
        .filter(|habit| habit.active)
        .map(|habit| HabitStatus {
            habit: habit.clone(),
            completed: logs
                .iter()
                .any(|log| log.matches(today, &habit.id) && log.completed),
        })
        .collect();

    TodayView {
        date: today,
        habits: statuses,
        completion_rate: completion_rate(today, habits, logs),
        mood: mood_for(today, moods).unwrap_or_else(|| MoodLog::neutral(today)),
    }
}

pub fn build_calendar(month: NaiveDate, habits: &[Habit], logs: &[DailyLog]) -> CalendarView {
    let first = month.with_day(1).unwrap_or(month);
    let mut days = Vec::with_capacity(31);
    let mut date = first;
    while date.month() == first.month() {
        let rate = completion_rate(date, habits, logs);
        days.push(CalendarCell {
            date,
            completion_rate: rate,
            status: classify(rate),
        });
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    CalendarView {
        month: first.format("%Y-%m").to_string(),
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    }
}

pub fn build_stats_at(
    today: NaiveDate,
    habits: &[Habit],
    logs: &[DailyLog],
    moods: &[MoodLog],
) -> StatsView {
    let habit_totals = habits
        .iter()
        .map(|habit| HabitTotal {
            habit_id: habit.id.clone(),
            icon: habit.icon.clone(),
            name: habit.name.clone(),
            total: habit_total(&habit.id, logs),
        })
        .collect();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let mood = mood_for(date, moods);
        last_7_days.push(DailyPoint {
            date,
            completion_rate: completion_rate(date, habits, logs),
            mood_score: mood.map(|m| m.mood_score),
            motivation_score: mood.map(|m| m.motivation_score),
        });
    }

    StatsView {
        current_streak: current_streak_at(today, habits, logs),
        best_streak: best_streak_at(today, habits, logs),
        habit_totals,
        last_7_days,
    }
}

fn completed_count(date: NaiveDate, logs: &[DailyLog]) -> usize {
    logs.iter()
        .filter(|log| log.date == date && log.completed)
        .count()
}

fn is_perfect_day(date: NaiveDate, habits: &[Habit], logs: &[DailyLog]) -> bool {
    !habits.is_empty() && completed_count(date, logs) >= habits.len()
}

fn mood_for(date: NaiveDate, moods: &[MoodLog]) -> Option<MoodLog> {
    moods.iter().find(|log| log.date == date).copied()
}
