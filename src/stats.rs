use crate::dates;
use crate::errors::HabitError;
use crate::models::{
    CalendarDay, CalendarMonth, CategoryDistribution, CategoryShare, Habit, HabitView,
    MonthlySeries, StatsSummary, WeeklySeries,
};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, SecondsFormat, Utc};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Share of days since creation with a completion, as a whole percentage.
/// Partial days count as a full day; habits created now or in the future
/// report 0.
pub fn completion_rate(habit: &Habit, now: DateTime<Utc>) -> u8 {
    let elapsed = (now - habit.created_at).num_milliseconds();
    if elapsed <= 0 {
        return 0;
    }
    let days = (elapsed + DAY_MILLIS - 1) / DAY_MILLIS;
    let rate = habit.total_completions() as f64 / days as f64 * 100.0;
    rate.round().clamp(0.0, 100.0) as u8
}

pub fn completed_today(habits: &[Habit], today: NaiveDate) -> usize {
    habits
        .iter()
        .filter(|habit| habit.is_completed_on(today))
        .count()
}

pub fn productivity_score(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u8
}

pub fn longest_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(Habit::streak).max().unwrap_or(0)
}

pub fn build_summary_at(today: NaiveDate, habits: &[Habit]) -> StatsSummary {
    let today_count = completed_today(habits, today);
    StatsSummary {
        today_count,
        total_count: habits.len(),
        longest_streak: longest_streak(habits),
        productivity_score: productivity_score(today_count, habits.len()),
    }
}

/// Completions per weekday across every habit, Monday first.
pub fn weekly_distribution(habits: &[Habit]) -> WeeklySeries {
    let mut counts = [0u32; 7];
    for date in habits.iter().flat_map(|habit| habit.completed_dates().iter()) {
        counts[date.weekday().num_days_from_monday() as usize] += 1;
    }
    WeeklySeries {
        labels: WEEKDAY_LABELS,
        counts,
    }
}

/// Completions per day of the month containing `today`. Dates in other
/// months are left out.
pub fn monthly_distribution_at(today: NaiveDate, habits: &[Habit]) -> MonthlySeries {
    let (year, month) = (today.year(), today.month());
    let mut counts = vec![0u32; days_in_month(year, month).unwrap_or(31) as usize];

    for date in habits.iter().flat_map(|habit| habit.completed_dates().iter()) {
        if date.year() != year || date.month() != month {
            continue;
        }
        if let Some(slot) = counts.get_mut(date.day0() as usize) {
            *slot += 1;
        }
    }

    MonthlySeries {
        year,
        month,
        counts,
    }
}

pub fn category_distribution(habits: &[Habit]) -> CategoryDistribution {
    let mut distribution = CategoryDistribution::new();
    for habit in habits {
        *distribution.entry(habit.category.clone()).or_insert(0) += 1;
    }
    distribution
}

pub fn category_shares(distribution: CategoryDistribution) -> Vec<CategoryShare> {
    distribution
        .into_iter()
        .map(|(category, count)| CategoryShare {
            label: category.label().to_string(),
            category,
            count,
        })
        .collect()
}

/// Month grid for a Monday-first calendar, with per-day completion counts.
pub fn calendar_month(
    habits: &[Habit],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<CalendarMonth, HabitError> {
    let invalid = || HabitError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let length = days_in_month(year, month).ok_or_else(invalid)?;

    let days = (0..length)
        .map(|offset| {
            let date = first + Duration::days(i64::from(offset));
            CalendarDay {
                date: dates::to_canonical(date),
                display: dates::format_display(date),
                day: offset + 1,
                completed_habits: habits
                    .iter()
                    .filter(|habit| habit.is_completed_on(date))
                    .count(),
                is_today: date == today,
            }
        })
        .collect();

    Ok(CalendarMonth {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    })
}

pub fn habit_view(habit: &Habit, today: NaiveDate, now: DateTime<Utc>) -> HabitView {
    HabitView {
        id: habit.id,
        name: habit.name.clone(),
        category: habit.category.clone(),
        category_label: habit.category.label().to_string(),
        completed_dates: habit
            .completed_dates()
            .iter()
            .copied()
            .map(dates::to_canonical)
            .collect(),
        created_at: habit.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        streak: habit.streak(),
        total_completions: habit.total_completions(),
        completed_today: habit.is_completed_on(today),
        completion_rate: completion_rate(habit, now),
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}
