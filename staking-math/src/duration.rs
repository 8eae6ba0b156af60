//! Human labels for lock durations.
//!
//! The pool expresses lock durations in seconds. The dashboard shows them as
//! a whole number of days, weeks, months or years, rounding with a fixed
//! ladder of thresholds. Bands are evaluated top-down and the first match
//! wins:
//!
//! | Band | Base value | Rounds up when |
//! |------|-----------|----------------|
//! | `>= 1 year` | whole years | remaining months > 6 |
//! | `>= 1 month` | whole months | remaining days > 15 (11 months + >15 days is `1 Year`) |
//! | `>= 1 week` | whole weeks | remaining days > 3 (3 weeks + >3 days is `1 Month`) |
//! | `>= 1 day` | whole days | remaining hours > 12 |
//!
//! Durations shorter than one day have no label.

use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

pub const SECONDS_IN_YEAR: u64 = 31_536_000;
pub const SECONDS_IN_MONTH: u64 = 2_592_000;
pub const SECONDS_IN_WEEK: u64 = 604_800;
pub const SECONDS_IN_DAY: u64 = 86_400;
pub const SECONDS_IN_HOUR: u64 = 3_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    /// Singular for a value of one, plural otherwise.
    pub fn label(self, value: u64) -> &'static str {
        match (self, value == 1) {
            (DurationUnit::Day, true) => "Day",
            (DurationUnit::Day, false) => "Days",
            (DurationUnit::Week, true) => "Week",
            (DurationUnit::Week, false) => "Weeks",
            (DurationUnit::Month, true) => "Month",
            (DurationUnit::Month, false) => "Months",
            (DurationUnit::Year, true) => "Year",
            (DurationUnit::Year, false) => "Years",
        }
    }
}

/// A rounded duration such as `3 Months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationLabel {
    pub value: u64,
    pub unit: DurationUnit,
}

impl DurationLabel {
    pub const fn new(value: u64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    pub fn label(&self) -> &'static str {
        self.unit.label(self.value)
    }
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.label())
    }
}

#[inline]
fn round_up(value: u64, condition: bool) -> u64 {
    if condition {
        value.saturating_add(1)
    } else {
        value
    }
}

/// Map a duration in seconds to its display label.
///
/// Returns `None` for durations shorter than one day; callers decide how to
/// render those.
pub fn parse_duration(seconds: u64) -> Option<DurationLabel> {
    if seconds >= SECONDS_IN_YEAR {
        let years = seconds / SECONDS_IN_YEAR;
        let remaining_months = (seconds % SECONDS_IN_YEAR) / SECONDS_IN_MONTH;
        return Some(DurationLabel::new(
            round_up(years, remaining_months > 6),
            DurationUnit::Year,
        ));
    }

    if seconds >= SECONDS_IN_MONTH {
        let total_months = seconds / SECONDS_IN_MONTH;
        let remaining_days = (seconds % SECONDS_IN_MONTH) / SECONDS_IN_DAY;

        // 12 months is five days short of a year.
        if total_months >= 12 {
            let years = total_months / 12;
            let remaining_months = total_months % 12;
            let bump = remaining_months > 6 || (remaining_months == 0 && remaining_days > 15);
            return Some(DurationLabel::new(round_up(years, bump), DurationUnit::Year));
        }

        if total_months == 11 && remaining_days > 15 {
            return Some(DurationLabel::new(1, DurationUnit::Year));
        }

        return Some(DurationLabel::new(
            round_up(total_months, remaining_days > 15),
            DurationUnit::Month,
        ));
    }

    if seconds >= SECONDS_IN_WEEK {
        let weeks = seconds / SECONDS_IN_WEEK;
        let remaining_days = (seconds % SECONDS_IN_WEEK) / SECONDS_IN_DAY;

        if weeks == 3 && remaining_days > 3 {
            return Some(DurationLabel::new(1, DurationUnit::Month));
        }

        return Some(DurationLabel::new(
            round_up(weeks, remaining_days > 3),
            DurationUnit::Week,
        ));
    }

    if seconds >= SECONDS_IN_DAY {
        let days = seconds / SECONDS_IN_DAY;
        let remaining_hours = (seconds % SECONDS_IN_DAY) / SECONDS_IN_HOUR;
        return Some(DurationLabel::new(
            round_up(days, remaining_hours > 12),
            DurationUnit::Day,
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    const HOUR: u64 = SECONDS_IN_HOUR;
    const DAY: u64 = SECONDS_IN_DAY;
    const WEEK: u64 = SECONDS_IN_WEEK;
    const MONTH: u64 = SECONDS_IN_MONTH;
    const YEAR: u64 = SECONDS_IN_YEAR;

    #[test_case(DAY, 1, DurationUnit::Day; "exactly one day")]
    #[test_case(DAY + 12 * HOUR, 1, DurationUnit::Day; "twelve extra hours do not round")]
    #[test_case(DAY + 13 * HOUR, 2, DurationUnit::Day; "thirteen extra hours round up")]
    #[test_case(6 * DAY + 23 * HOUR, 7, DurationUnit::Day; "just under a week")]
    #[test_case(WEEK, 1, DurationUnit::Week; "exactly one week")]
    #[test_case(WEEK + 3 * DAY, 1, DurationUnit::Week; "three extra days do not round")]
    #[test_case(WEEK + 4 * DAY, 2, DurationUnit::Week; "four extra days round up")]
    #[test_case(3 * WEEK + 3 * DAY, 3, DurationUnit::Week; "three weeks three days")]
    #[test_case(3 * WEEK + 4 * DAY, 1, DurationUnit::Month; "three weeks four days is a month")]
    #[test_case(4 * WEEK + DAY, 4, DurationUnit::Week; "four weeks and a day")]
    #[test_case(MONTH, 1, DurationUnit::Month; "exactly one month")]
    #[test_case(3 * MONTH, 3, DurationUnit::Month; "three months")]
    #[test_case(3 * MONTH + 15 * DAY, 3, DurationUnit::Month; "fifteen extra days do not round")]
    #[test_case(3 * MONTH + 16 * DAY, 4, DurationUnit::Month; "sixteen extra days round up")]
    #[test_case(11 * MONTH + 15 * DAY, 11, DurationUnit::Month; "eleven months fifteen days")]
    #[test_case(11 * MONTH + 16 * DAY, 1, DurationUnit::Year; "eleven months sixteen days is a year")]
    #[test_case(12 * MONTH, 1, DurationUnit::Year; "twelve months is a year")]
    #[test_case(12 * MONTH + 4 * DAY, 1, DurationUnit::Year; "just under a calendar year")]
    #[test_case(YEAR, 1, DurationUnit::Year; "exactly one year")]
    #[test_case(YEAR + 6 * MONTH, 1, DurationUnit::Year; "six extra months do not round")]
    #[test_case(YEAR + 7 * MONTH, 2, DurationUnit::Year; "seven extra months round up")]
    #[test_case(2 * YEAR, 2, DurationUnit::Year; "two years")]
    #[test_case(4 * YEAR, 4, DurationUnit::Year; "four years")]
    fn test_parse_duration(seconds: u64, value: u64, unit: DurationUnit) {
        assert_eq!(
            parse_duration(seconds),
            Some(DurationLabel::new(value, unit))
        );
    }

    #[test_case(0; "zero")]
    #[test_case(1; "one second")]
    #[test_case(DAY - 1; "one second short of a day")]
    fn test_parse_duration_below_one_day(seconds: u64) {
        assert_eq!(parse_duration(seconds), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DurationLabel::new(1, DurationUnit::Day).to_string(), "1 Day");
        assert_eq!(DurationLabel::new(5, DurationUnit::Day).to_string(), "5 Days");
        assert_eq!(DurationLabel::new(1, DurationUnit::Week).to_string(), "1 Week");
        assert_eq!(DurationLabel::new(2, DurationUnit::Week).to_string(), "2 Weeks");
        assert_eq!(DurationLabel::new(1, DurationUnit::Month).to_string(), "1 Month");
        assert_eq!(DurationLabel::new(3, DurationUnit::Month).to_string(), "3 Months");
        assert_eq!(DurationLabel::new(1, DurationUnit::Year).to_string(), "1 Year");
        assert_eq!(DurationLabel::new(4, DurationUnit::Year).to_string(), "4 Years");
    }
}
