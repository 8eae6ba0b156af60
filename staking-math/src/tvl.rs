//! Total value locked, in USD.

use {crate::decimals::format_digits, num_bigint::BigUint};

/// USD value of `total_staked` tokens given the USD price of one whole token.
///
/// `token_price` is in USD-token base units (`usd_decimals`) and
/// `total_staked` in staking-token base units (`token_decimals`), so their
/// product has `token_decimals + usd_decimals` decimals. The product is
/// computed in arbitrary precision, then truncated (not rounded) to cents.
pub fn usd_value(token_price: u128, total_staked: u128, token_decimals: u8, usd_decimals: u8) -> String {
    let product = BigUint::from(token_price) * BigUint::from(total_staked);
    let decimals = token_decimals.saturating_add(usd_decimals);
    let formatted = format_digits(&product.to_str_radix(10), decimals);

    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let cents: String = fraction.chars().chain(std::iter::repeat('0')).take(2).collect();
    format!("{whole}.{cents}")
}

/// Aggregate USD value across chains.
///
/// The total is only meaningful once every chain reported, so any missing
/// chain yields `0.0`.
pub fn total_usd(per_chain: &[Option<f64>]) -> f64 {
    if per_chain.is_empty() || per_chain.iter().any(Option::is_none) {
        return 0.0;
    }
    per_chain.iter().flatten().sum()
}
