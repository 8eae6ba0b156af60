//! Lock schedule of a stake.
//!
//! A stake records the end of its lock (`minimum_stake_timestamp`) and its
//! duration; the start is derived from both.

use {
    chrono::{DateTime, Datelike, NaiveDate, Utc},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSchedule {
    /// Unix seconds at which the stake was created.
    pub start_timestamp: u64,
    /// Unix seconds from which the stake can be withdrawn without penalty.
    pub unlock_timestamp: u64,
}

/// Calendar time left until a stake unlocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl StakeSchedule {
    pub fn new(minimum_stake_timestamp: u64, duration: u64) -> Self {
        Self {
            start_timestamp: minimum_stake_timestamp.saturating_sub(duration),
            unlock_timestamp: minimum_stake_timestamp,
        }
    }

    pub fn is_unlocked(&self, now: u64) -> bool {
        now >= self.unlock_timestamp
    }

    /// Years, months and days between `now` and the unlock date, counted on
    /// UTC calendar dates. Zero once the stake is unlocked.
    pub fn remaining(&self, now: u64) -> Remaining {
        if self.is_unlocked(now) {
            return Remaining::default();
        }
        let (Some(today), Some(end)) = (utc_date(now), utc_date(self.unlock_timestamp)) else {
            return Remaining::default();
        };

        let mut years = end.year().saturating_sub(today.year());
        let mut months = (end.month() as i32).saturating_sub(today.month() as i32);
        let mut days = (end.day() as i32).saturating_sub(today.day() as i32);

        if days < 0 {
            months = months.saturating_sub(1);
            days = days.saturating_add(days_in_month(today.year(), today.month()));
        }
        if months < 0 {
            years = years.saturating_sub(1);
            months = months.saturating_add(12);
        }

        Remaining { years, months, days }
    }
}

/// Whether a lock of `duration` starting at `now` ends after the pool stops
/// distributing rewards. Such a stake keeps its funds locked without earning.
pub fn extends_beyond_reward_period(now: u64, duration: u64, period_finish: u64) -> bool {
    now.saturating_add(duration) > period_finish
}

fn utc_date(timestamp: u64) -> Option<NaiveDate> {
    let seconds = i64::try_from(timestamp).ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}

fn days_in_month(year: i32, month: u32) -> i32 {
    let (next_year, next_month) = if month == 12 {
        (year.saturating_add(1), 1)
    } else {
        (year, month.saturating_add(1))
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day() as i32)
        .unwrap_or(30)
}
