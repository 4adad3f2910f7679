//! Royalty and platform fee split of realized copy-trade profit

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum realized profit (USD) that triggers a royalty distribution
pub const ROYALTY_THRESHOLD: Decimal = Decimal::ONE;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("percentage must not be negative: {0}")]
    NegativePercentage(Decimal),
    #[error("royalty and platform fee add up to {0}, more than the whole profit")]
    ExceedsProfit(Decimal),
    #[error("profit {0} is below the royalty threshold")]
    BelowThreshold(Decimal),
}

/// Whether a realized profit is large enough to distribute
pub fn qualifies_for_royalty(profit: Decimal) -> bool {
    profit >= ROYALTY_THRESHOLD
}

/// Result of splitting one realized profit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltySplit {
    /// Realized profit that was split
    pub profit: Decimal,
    /// Paid to the strategy creator
    pub creator_royalty: Decimal,
    /// Kept by the platform
    pub platform_fee: Decimal,
    /// Left to the copying trader
    pub trader_net: Decimal,
}

impl RoyaltySplit {
    /// Split `profit` with fractional percentages (`0.10` = 10 %)
    pub fn compute(
        profit: Decimal,
        royalty_pct: Decimal,
        platform_fee_pct: Decimal,
    ) -> Result<Self, SplitError> {
        if !qualifies_for_royalty(profit) {
            return Err(SplitError::BelowThreshold(profit));
        }
        validate_percentages(royalty_pct, platform_fee_pct)?;

        let creator_royalty = to_cents(profit * royalty_pct);
        let platform_fee = to_cents(profit * platform_fee_pct);
        let trader_net = profit - creator_royalty - platform_fee;

        Ok(Self {
            profit,
            creator_royalty,
            platform_fee,
            trader_net,
        })
    }
}

pub fn validate_percentages(royalty_pct: Decimal, platform_fee_pct: Decimal) -> Result<(), SplitError> {
    for pct in [royalty_pct, platform_fee_pct] {
        if pct.is_sign_negative() && !pct.is_zero() {
            return Err(SplitError::NegativePercentage(pct));
        }
    }
    let total = royalty_pct + platform_fee_pct;
    if total > Decimal::ONE {
        return Err(SplitError::ExceedsProfit(total));
    }
    Ok(())
}

/// Royalty fraction from a strategy's fee percentage (`10` → `0.10`),
/// `fallback` when the strategy does not set one.
pub fn royalty_pct_from_fee(fee_percentage: Decimal, fallback: Decimal) -> Decimal {
    if fee_percentage > Decimal::ZERO {
        fee_percentage / Decimal::ONE_HUNDRED
    } else {
        fallback
    }
}

/// Highest strategy fee percentage that still leaves room for the platform fee
pub fn max_fee_percentage(platform_fee_pct: Decimal) -> Decimal {
    ((Decimal::ONE - platform_fee_pct) * Decimal::ONE_HUNDRED).max(Decimal::ZERO)
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
