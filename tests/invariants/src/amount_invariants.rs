//! Property-based tests for amount handling.
//!
//! Properties tested:
//! 1. The penalty never makes the received amount exceed the unstaked amount.
//! 2. Formatting then parsing a fixed-point amount is lossless.
//! 3. USD values always carry exactly two truncated decimals.
//! 4. An unlocked stake has no lock time remaining.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        tokenfi_staking_math::{
            decimals::{format_units, parse_units},
            penalty::receive_amount,
            schedule::{Remaining, StakeSchedule},
            tvl::usd_value,
        },
    };

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Penalty conservation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn receive_plus_penalty_is_amount(
            amount in any::<u128>(),
            penalty in any::<u128>(),
        ) {
            let receive = receive_amount(amount, penalty);
            prop_assert!(receive <= amount);
            if penalty <= amount {
                prop_assert_eq!(receive + penalty, amount);
            } else {
                prop_assert_eq!(receive, 0);
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Lossless unit conversion
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn format_then_parse_is_lossless(
            value in any::<u64>(),
            decimals in 0..=18u8,
        ) {
            let value = u128::from(value);
            let text = format_units(value, decimals);
            prop_assert_eq!(parse_units(&text, decimals).unwrap(), value, "via {}", text);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. USD formatting
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn usd_value_truncates_to_cents(
            price in any::<u64>(),
            staked in any::<u64>(),
        ) {
            // 6-decimal USD price of a 9-decimal token: product has 15 decimals.
            let text = usd_value(u128::from(price), u128::from(staked), 9, 6);
            let product = u128::from(price) * u128::from(staked);
            let cents = product / 10u128.pow(13);

            let (whole, fraction) = text.split_once('.').unwrap();
            prop_assert_eq!(fraction.len(), 2);
            prop_assert_eq!(whole.parse::<u128>().unwrap(), cents / 100);
            prop_assert_eq!(fraction.parse::<u128>().unwrap(), cents % 100);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Lock schedule
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn unlocked_stake_has_nothing_remaining(
            unlock in 1_600_000_000..=2_500_000_000u64,
            duration in 0..=126_144_000u64,
            now in 1_500_000_000..=2_600_000_000u64,
        ) {
            let schedule = StakeSchedule::new(unlock, duration);
            prop_assert_eq!(schedule.start_timestamp + duration, unlock);

            let remaining = schedule.remaining(now);
            if schedule.is_unlocked(now) {
                prop_assert_eq!(remaining, Remaining::default());
            } else {
                prop_assert!(remaining.years >= 0 && remaining.months >= 0 && remaining.days >= 0);
                prop_assert!(remaining.months < 12);
            }
        }
    }
}
