use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Which run of consecutive days a habit's `streak` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreakPolicy {
    /// Longest run anywhere in the history.
    #[default]
    Longest,
    /// Run ending today, or ending yesterday while today is still open.
    Current,
}

impl FromStr for StreakPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "longest" => Ok(StreakPolicy::Longest),
            "current" => Ok(StreakPolicy::Current),
            _ => Err(format!(
                "Invalid streak policy '{s}'. Valid options: longest, current"
            )),
        }
    }
}

pub fn calculate(dates: &BTreeSet<NaiveDate>, policy: StreakPolicy, today: NaiveDate) -> u32 {
    match policy {
        StreakPolicy::Longest => longest_run(dates),
        StreakPolicy::Current => current_run(dates, today),
    }
}

/// Gaps are whole calendar days, so clock changes never split a run.
pub fn longest_run(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut iter = dates.iter();
    let Some(mut prev) = iter.next() else {
        return 0;
    };

    let mut current = 1u32;
    let mut longest = 1u32;
    for date in iter {
        let gap = (*date - *prev).num_days();
        if gap == 1 {
            current += 1;
        } else if gap > 1 {
            current = 1;
        }
        longest = longest.max(current);
        prev = date;
    }
    longest
}

pub fn current_run(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut expected = if dates.contains(&today) {
        today
    } else if dates.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0u32;
    for date in dates.range(..=expected).rev() {
        if *date != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn set(days: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        days.iter().copied().collect()
    }

    #[test]
    fn longest_run_basic_cases() {
        assert_eq!(longest_run(&set(&[])), 0);
        assert_eq!(longest_run(&set(&[day(2024, 1, 1)])), 1);
        assert_eq!(
            longest_run(&set(&[day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 3)])),
            3
        );
        assert_eq!(longest_run(&set(&[day(2024, 1, 1), day(2024, 1, 3)])), 1);
    }

    #[test]
    fn longest_run_keeps_best_historical_run() {
        let dates = set(&[
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 4),
            day(2024, 1, 10),
            day(2024, 1, 11),
        ]);
        assert_eq!(longest_run(&dates), 4);
    }

    #[test]
    fn longest_run_crosses_month_and_dst_boundaries() {
        let dates = set(&[day(2024, 3, 30), day(2024, 3, 31), day(2024, 4, 1)]);
        assert_eq!(longest_run(&dates), 3);
        let leap = set(&[day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)]);
        assert_eq!(longest_run(&leap), 3);
    }

    #[test]
    fn current_run_counts_back_from_today() {
        let today = day(2024, 6, 15);
        let dates = set(&[day(2024, 6, 12), day(2024, 6, 14), day(2024, 6, 15)]);
        assert_eq!(current_run(&dates, today), 2);
    }

    #[test]
    fn current_run_starts_from_yesterday_when_today_open() {
        let today = day(2024, 6, 15);
        let dates = set(&[day(2024, 6, 13), day(2024, 6, 14)]);
        assert_eq!(current_run(&dates, today), 2);
    }

    #[test]
    fn current_run_zero_when_lapsed() {
        let today = day(2024, 6, 15);
        let dates = set(&[day(2024, 6, 1), day(2024, 6, 2), day(2024, 6, 3)]);
        assert_eq!(current_run(&dates, today), 0);
        assert_eq!(calculate(&dates, StreakPolicy::Longest, today), 3);
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("longest".parse::<StreakPolicy>().unwrap(), StreakPolicy::Longest);
        assert_eq!("CURRENT".parse::<StreakPolicy>().unwrap(), StreakPolicy::Current);
        assert!("weekly".parse::<StreakPolicy>().is_err());
    }
}
