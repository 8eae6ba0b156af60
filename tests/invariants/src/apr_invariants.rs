//! Property-based tests for the APR estimate.
//!
//! Properties tested:
//! 1. The estimate does not depend on the stake principal.
//! 2. The estimate scales linearly with the multiplier.
//! 3. A missing or zero pool input yields exactly zero.
//! 4. The estimate is always finite and non-negative.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        tokenfi_staking_math::apr::{calculate_apr, AprInputs, PriceQuote},
    };

    const ONE_TOKEN: u128 = 1_000_000_000;

    fn quote(priced: u128) -> Option<PriceQuote> {
        Some(PriceQuote {
            priced,
            reference: ONE_TOKEN,
        })
    }

    fn inputs(amount: u128, multiplier: u128, weight: u128, rate: u128, price: u128) -> AprInputs {
        AprInputs {
            amount,
            amount_decimals: 9,
            multiplier,
            total_weight: Some(weight),
            rewards_rate: Some(rate),
            staking_quote: quote(price),
            rewards_quote: quote(price),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        if b == 0.0 {
            return a == 0.0;
        }
        ((a - b) / b).abs() < 1e-9
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Principal cancels out
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn apr_independent_of_principal(
            amount in 1..=1_000_000_000u128,
            factor in 2..=1_000u128,
            multiplier in 10_000..=50_000u128,
            weight in 1..=1_000_000_000u128,
            rate in 1..=100u128,
            price in 1_000..=1_000_000_000_000u128,
        ) {
            let weight = weight * ONE_TOKEN;
            let rate = rate * ONE_TOKEN;
            let base = calculate_apr(&inputs(amount * ONE_TOKEN, multiplier, weight, rate, price));
            let scaled = calculate_apr(&inputs(amount * factor * ONE_TOKEN, multiplier, weight, rate, price));

            // ── INVARIANT: apr(k * amount) == apr(amount) ──
            prop_assert!(
                close(scaled, base),
                "APR changed with principal x{}: {} vs {}", factor, base, scaled
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Multiplier is linear
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn apr_linear_in_multiplier(
            multiplier in 1..=100_000u128,
            factor in 1..=10u128,
            weight in 1..=1_000_000u128,
        ) {
            let weight = weight * ONE_TOKEN;
            let base = calculate_apr(&inputs(ONE_TOKEN, multiplier, weight, ONE_TOKEN, ONE_TOKEN));
            let scaled = calculate_apr(&inputs(ONE_TOKEN, multiplier * factor, weight, ONE_TOKEN, ONE_TOKEN));

            prop_assert!(close(scaled, base * factor as f64));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Missing inputs
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn missing_pool_input_is_zero(
            amount in 1..=1_000_000u128,
            missing in 0..=5u8,
        ) {
            let mut apr_inputs = inputs(amount * ONE_TOKEN, 10_000, ONE_TOKEN, ONE_TOKEN, ONE_TOKEN);
            match missing {
                0 => apr_inputs.total_weight = None,
                1 => apr_inputs.total_weight = Some(0),
                2 => apr_inputs.rewards_rate = None,
                3 => apr_inputs.rewards_rate = Some(0),
                4 => apr_inputs.staking_quote = None,
                _ => apr_inputs.rewards_quote = quote(0),
            }

            // ── INVARIANT: never NaN or infinity, exactly zero ──
            prop_assert_eq!(calculate_apr(&apr_inputs), 0.0);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Always a displayable number
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn apr_finite_and_non_negative(
            amount in any::<u64>(),
            multiplier in any::<u64>(),
            weight in any::<u64>(),
            rate in any::<u64>(),
            staking_price in any::<u64>(),
            rewards_price in any::<u64>(),
        ) {
            let apr = calculate_apr(&AprInputs {
                amount: u128::from(amount),
                amount_decimals: 9,
                multiplier: u128::from(multiplier),
                total_weight: Some(u128::from(weight)),
                rewards_rate: Some(u128::from(rate)),
                staking_quote: quote(u128::from(staking_price)),
                rewards_quote: quote(u128::from(rewards_price)),
            });
            prop_assert!(apr.is_finite(), "APR {} is not finite", apr);
            prop_assert!(apr >= 0.0, "APR {} is negative", apr);
        }
    }
}
