//! Net-credit risk estimator for multi-leg option strategies

use serde::{Deserialize, Serialize};

use crate::leg::{LegSide, TradingLeg};

/// Premium received and paid across all legs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetPremium {
    /// Sum of sell-leg notionals
    pub total_credit: f64,
    /// Sum of buy-leg notionals
    pub total_debit: f64,
}

impl NetPremium {
    /// Accumulate notionals by side
    pub fn from_legs(legs: &[TradingLeg]) -> Self {
        legs.iter().fold(Self::default(), |mut acc, leg| {
            match leg.buy_sell {
                LegSide::Sell => acc.total_credit += leg.notional(),
                LegSide::Buy => acc.total_debit += leg.notional(),
            }
            acc
        })
    }

    /// Positive for a net credit, negative for a net debit
    pub fn net_credit(&self) -> f64 {
        self.total_credit - self.total_debit
    }
}

/// Risk metrics shown in the strategy builder and preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub max_profit: f64,
    /// Same magnitude as `max_profit`; negative when the strategy is a net debit
    pub max_loss: f64,
    /// `None` when `max_loss` is zero
    pub risk_reward_ratio: Option<f64>,
}

impl RiskMetrics {
    /// Max profit as whole dollars, e.g. `$200`
    pub fn display_max_profit(&self) -> String {
        format_dollars(self.max_profit)
    }

    /// Max loss as whole dollars, e.g. `-$700`
    pub fn display_max_loss(&self) -> String {
        format_dollars(self.max_loss)
    }

    /// Ratio with two decimals, `N/A` when undefined
    pub fn display_ratio(&self) -> String {
        match self.risk_reward_ratio {
            Some(ratio) => format!("{:.2}", ratio),
            None => "N/A".to_string(),
        }
    }
}

fn format_dollars(amount: f64) -> String {
    let rounded = amount.round();
    if rounded < 0.0 {
        format!("-${}", -rounded as i64)
    } else {
        format!("${}", rounded as i64)
    }
}

/// Risk calculator
pub struct RiskCalculator;

impl RiskCalculator {
    /// Compute metrics for an ordered leg list. Total: never fails, an
    /// unreadable premium contributes zero.
    pub fn calculate(legs: &[TradingLeg]) -> RiskMetrics {
        Self::from_net_premium(&NetPremium::from_legs(legs))
    }

    pub fn from_net_premium(premium: &NetPremium) -> RiskMetrics {
        let net_credit = premium.net_credit();

        let max_profit = if net_credit > 0.0 {
            net_credit
        } else {
            net_credit.abs()
        };
        // Mirrors max_profit rather than bounding the spread width; kept as
        // the builder has always displayed it.
        let max_loss = if net_credit > 0.0 {
            net_credit.abs()
        } else {
            net_credit
        };
        let risk_reward_ratio = if max_loss != 0.0 {
            Some(max_profit / max_loss.abs())
        } else {
            None
        };

        RiskMetrics {
            max_profit,
            max_loss,
            risk_reward_ratio,
        }
    }
}
