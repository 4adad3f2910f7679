//! Integration tests for the net-credit risk estimator

use strategy_core::config::StrategyConfig;
use strategy_core::leg::{LegSide, OptionType, TradingLeg};
use strategy_core::presets::{iron_condor, QuotedStrike};
use strategy_core::risk::{NetPremium, RiskCalculator};

/// Helper function to create a leg with a given side, premium and size
fn leg(side: LegSide, price: &str, size: u32) -> TradingLeg {
    TradingLeg::new(OptionType::Put, side, "100", "30", size, price)
}

#[test]
fn test_empty_legs() {
    let metrics = RiskCalculator::calculate(&[]);
    assert_eq!(metrics.max_profit, 0.0);
    assert_eq!(metrics.max_loss, 0.0);
    assert_eq!(metrics.risk_reward_ratio, None);
    assert_eq!(metrics.display_ratio(), "N/A");
}

#[test]
fn test_single_sell_leg() {
    let metrics = RiskCalculator::calculate(&[leg(LegSide::Sell, "2.00", 1)]);
    assert_eq!(metrics.max_profit, 200.0);
    assert_eq!(metrics.max_loss, 200.0);
    assert_eq!(metrics.risk_reward_ratio, Some(1.0));
    assert_eq!(metrics.display_ratio(), "1.00");
}

#[test]
fn test_single_buy_leg_net_debit() {
    let legs = [leg(LegSide::Buy, "3.50", 2)];
    assert_eq!(NetPremium::from_legs(&legs).net_credit(), -700.0);

    let metrics = RiskCalculator::calculate(&legs);
    assert_eq!(metrics.max_profit, 700.0);
    assert_eq!(metrics.max_loss, -700.0);
    assert_eq!(metrics.risk_reward_ratio, Some(1.0));
    assert_eq!(metrics.display_max_loss(), "-$700");
}

#[test]
fn test_all_sell_legs_net_credit() {
    let legs = [leg(LegSide::Sell, "1.10", 1), leg(LegSide::Sell, "0.90", 3)];
    let premium = NetPremium::from_legs(&legs);
    assert!((premium.net_credit() - 380.0).abs() < 1e-9);
    assert_eq!(premium.total_debit, 0.0);

    let metrics = RiskCalculator::calculate(&legs);
    assert!((metrics.max_profit - 380.0).abs() < 1e-9);
    assert!(metrics.max_loss > 0.0);
}

#[test]
fn test_all_buy_legs_net_debit() {
    let legs = [leg(LegSide::Buy, "1.00", 1), leg(LegSide::Buy, "0.50", 2)];
    let metrics = RiskCalculator::calculate(&legs);
    assert_eq!(metrics.max_profit, 200.0);
    assert_eq!(metrics.max_loss, -200.0);
}

#[test]
fn test_mixed_legs_summing_to_zero() {
    let legs = [leg(LegSide::Sell, "1.50", 2), leg(LegSide::Buy, "3.00", 1)];
    let metrics = RiskCalculator::calculate(&legs);
    assert_eq!(metrics.max_profit, 0.0);
    assert_eq!(metrics.max_loss, 0.0);
    assert_eq!(metrics.risk_reward_ratio, None);
}

#[test]
fn test_unparseable_price_does_not_fail() {
    let legs = [leg(LegSide::Sell, "N/A", 1), leg(LegSide::Sell, "1.00", 1)];
    let metrics = RiskCalculator::calculate(&legs);
    assert_eq!(metrics.max_profit, 100.0);
}

#[test]
fn test_profit_and_loss_mirror_for_many_shapes() {
    let prices = ["0.05", "0.75", "1.30", "2.00", "abc", "", "12.5"];
    for (i, a) in prices.iter().enumerate() {
        for b in prices.iter().skip(i) {
            for size in 1..4 {
                let legs = [leg(LegSide::Sell, a, size), leg(LegSide::Buy, b, 1)];
                let metrics = RiskCalculator::calculate(&legs);
                assert!(metrics.max_profit >= 0.0);
                assert!((metrics.max_loss.abs() - metrics.max_profit).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_iron_condor_preview() {
    let config: StrategyConfig = iron_condor(
        &QuotedStrike::new("90", "0.50"),
        &QuotedStrike::new("95", "1.50"),
        &QuotedStrike::new("105", "1.40"),
        &QuotedStrike::new("110", "0.45"),
        "30",
        1,
    );
    let premium = NetPremium::from_legs(&config.legs);
    assert!((premium.total_credit - 290.0).abs() < 1e-9);
    assert!((premium.total_debit - 95.0).abs() < 1e-9);

    let metrics = RiskCalculator::calculate(&config.legs);
    assert_eq!(metrics.display_max_profit(), "$195");
    assert_eq!(metrics.display_max_loss(), "$195");
}

#[test]
fn test_calculation_is_deterministic() {
    let legs = [leg(LegSide::Sell, "1.23", 2), leg(LegSide::Buy, "0.37", 2)];
    assert_eq!(RiskCalculator::calculate(&legs), RiskCalculator::calculate(&legs));
}
