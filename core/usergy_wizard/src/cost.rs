//! Cost summary shown beside the tester-count input and on the launch step.

use std::fmt;

use serde::Serialize;

/// Fixed price per recruited tester, in whole dollars.
pub const PRICE_PER_USER: u64 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub user_count: u64,
    pub price_per_user: u64,
    pub total: u64,
}

impl CostSummary {
    pub fn new(user_count: u64, price_per_user: u64) -> Self {
        Self {
            user_count,
            price_per_user,
            total: user_count.saturating_mul(price_per_user),
        }
    }

    /// Recompute from the raw input on every keystroke.
    pub fn from_input(input: &str, price_per_user: u64) -> Self {
        Self::new(u64::from(coerce_user_count(input)), price_per_user)
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} testers × ${} = ${}",
            group_thousands(self.user_count),
            group_thousands(self.price_per_user),
            group_thousands(self.total)
        )
    }
}

/// Lenient integer coercion for display: fractional input is rounded,
/// anything non-numeric, negative or beyond what a save accepts counts as
/// zero.
pub fn coerce_user_count(input: &str) -> u32 {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return n;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 && f.round() <= f64::from(u32::MAX) => f.round() as u32,
        _ => 0,
    }
}

/// `1750` -> `1,750`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_testers_cost_1750() {
        let c = CostSummary::from_input("50", PRICE_PER_USER);
        assert_eq!(c.total, 1750);
        assert_eq!(c.user_count, 50);
    }

    #[test]
    fn zero_and_garbage_cost_nothing() {
        assert_eq!(CostSummary::from_input("0", PRICE_PER_USER).total, 0);
        assert_eq!(CostSummary::from_input("abc", PRICE_PER_USER).total, 0);
        assert_eq!(CostSummary::from_input("", PRICE_PER_USER).total, 0);
        assert_eq!(CostSummary::from_input("-4", PRICE_PER_USER).total, 0);
    }

    #[test]
    fn fractional_input_is_rounded() {
        assert_eq!(coerce_user_count("10.4"), 10);
        assert_eq!(coerce_user_count("10.5"), 11);
        assert_eq!(coerce_user_count("NaN"), 0);
    }

    #[test]
    fn counts_a_save_would_refuse_cost_nothing() {
        assert_eq!(coerce_user_count("5000000000"), 0);
        assert_eq!(coerce_user_count("4294967296"), 0);
        assert_eq!(coerce_user_count("1e12"), 0);
        assert_eq!(CostSummary::from_input("5000000000", PRICE_PER_USER).total, 0);

        let max = u32::MAX.to_string();
        assert_eq!(coerce_user_count(&max), u32::MAX);
        assert_eq!(crate::criteria::parse_user_count(&max), Some(u32::MAX));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1750), "1,750");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn display_uses_grouped_amounts() {
        let c = CostSummary::new(1000, PRICE_PER_USER);
        assert_eq!(c.to_string(), "1,000 testers × $35 = $35,000");
    }
}
