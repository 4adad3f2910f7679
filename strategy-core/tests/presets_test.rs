//! Preset builders produce configs the rest of the pipeline accepts

use strategy_core::config::StrategyConfig;
use strategy_core::leg::LegSide;
use strategy_core::presets::{bear_call_spread, iron_butterfly, PresetKind, QuotedStrike};
use strategy_core::risk::RiskCalculator;

fn quotes(pairs: &[(&str, &str)]) -> Vec<QuotedStrike> {
    pairs.iter().map(|(s, p)| QuotedStrike::new(*s, *p)).collect()
}

#[test]
fn test_every_preset_validates_and_round_trips_through_json() {
    let four = quotes(&[("90", "0.50"), ("95", "1.50"), ("105", "1.40"), ("110", "0.45")]);
    let two = quotes(&[("95", "1.20"), ("100", "0.40")]);
    let cases = [
        (PresetKind::IronCondor, &four),
        (PresetKind::IronButterfly, &four),
        (PresetKind::BullPutSpread, &two),
        (PresetKind::BearCallSpread, &two),
    ];
    for (kind, quotes) in cases {
        let config = kind.build(quotes, "45", 1).unwrap();
        config.validate().unwrap();
        let stored = config.to_json();
        assert_eq!(StrategyConfig::from_json(&stored).unwrap(), config, "{:?}", kind);
    }
}

#[test]
fn test_credit_presets_have_positive_max_profit() {
    let spread = bear_call_spread(&QuotedStrike::new("105", "1.40"), &QuotedStrike::new("110", "0.45"), "30", 2);
    let metrics = RiskCalculator::calculate(&spread.legs);
    assert!((metrics.max_profit - 190.0).abs() < 1e-9);
    assert!(metrics.max_loss > 0.0);
    assert_eq!(spread.legs[0].buy_sell, LegSide::Sell);
}

#[test]
fn test_iron_butterfly_shares_center_strike() {
    let config = iron_butterfly(
        &QuotedStrike::new("90", "0.30"),
        &QuotedStrike::new("100", "3.10"),
        &QuotedStrike::new("100", "2.90"),
        &QuotedStrike::new("110", "0.35"),
        "7",
        1,
    );
    let shorts: Vec<_> = config
        .legs
        .iter()
        .filter(|l| l.buy_sell == LegSide::Sell)
        .map(|l| l.strike.as_str())
        .collect();
    assert_eq!(shorts, vec!["100", "100"]);
}
