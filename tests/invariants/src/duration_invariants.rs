//! Property-based tests for duration labels.
//!
//! Properties tested:
//! 1. Durations shorter than a day have no label.
//! 2. The day band counts days, rounding up past twelve hours.
//! 3. Year labels are within one of the whole years elapsed.
//! 4. Every labelled duration has a value of at least one.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        tokenfi_staking_math::duration::{
            parse_duration, DurationUnit, SECONDS_IN_DAY, SECONDS_IN_HOUR, SECONDS_IN_WEEK,
            SECONDS_IN_YEAR,
        },
    };

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn sub_day_has_no_label(seconds in 0..SECONDS_IN_DAY) {
            prop_assert_eq!(parse_duration(seconds), None);
        }

        #[test]
        fn day_band_counts_days(seconds in SECONDS_IN_DAY..SECONDS_IN_WEEK) {
            let label = parse_duration(seconds).unwrap();
            let days = seconds / SECONDS_IN_DAY;
            let hours = (seconds % SECONDS_IN_DAY) / SECONDS_IN_HOUR;
            let expected = if hours > 12 { days + 1 } else { days };

            prop_assert_eq!(label.unit, DurationUnit::Day);
            prop_assert_eq!(label.value, expected);
        }

        #[test]
        fn year_band_within_one_year(seconds in SECONDS_IN_YEAR..=100 * SECONDS_IN_YEAR) {
            let label = parse_duration(seconds).unwrap();
            let years = seconds / SECONDS_IN_YEAR;

            prop_assert_eq!(label.unit, DurationUnit::Year);
            prop_assert!(
                label.value == years || label.value == years + 1,
                "{}s labelled {} for {} whole years", seconds, label, years
            );
        }

        #[test]
        fn labels_are_at_least_one(seconds in SECONDS_IN_DAY..=u64::MAX) {
            let label = parse_duration(seconds).unwrap();
            prop_assert!(label.value >= 1);
        }
    }
}
