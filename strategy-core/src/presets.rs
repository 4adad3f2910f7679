//! Preset multi-leg strategies offered by the builder

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::leg::{LegSide, OptionType, TradingLeg};

/// Preset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    IronCondor,
    IronButterfly,
    BullPutSpread,
    BearCallSpread,
}

impl PresetKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IronCondor => "Iron Condor",
            Self::IronButterfly => "Iron Butterfly",
            Self::BullPutSpread => "Bull Put Spread",
            Self::BearCallSpread => "Bear Call Spread",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::IronCondor | Self::IronButterfly => "neutral",
            Self::BullPutSpread => "bullish",
            Self::BearCallSpread => "bearish",
        }
    }

    /// Build from quotes ordered by ascending strike: four for the iron
    /// presets (long put, short put, short call, long call), two for spreads
    /// (lower, higher). `None` on a wrong quote count.
    pub fn build(&self, quotes: &[QuotedStrike], expiration: &str, size: u32) -> Option<StrategyConfig> {
        match (self, quotes) {
            (Self::IronCondor, [lp, sp, sc, lc]) => Some(iron_condor(lp, sp, sc, lc, expiration, size)),
            (Self::IronButterfly, [lp, cp, cc, lc]) => Some(iron_butterfly(lp, cp, cc, lc, expiration, size)),
            (Self::BullPutSpread, [lower, higher]) => Some(bull_put_spread(higher, lower, expiration, size)),
            (Self::BearCallSpread, [lower, higher]) => Some(bear_call_spread(lower, higher, expiration, size)),
            _ => None,
        }
    }
}

/// One strike with its quoted premium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedStrike {
    pub strike: String,
    pub premium: String,
}

impl QuotedStrike {
    pub fn new(strike: impl Into<String>, premium: impl Into<String>) -> Self {
        Self {
            strike: strike.into(),
            premium: premium.into(),
        }
    }
}

fn leg(option_type: OptionType, side: LegSide, quote: &QuotedStrike, expiration: &str, size: u32) -> TradingLeg {
    TradingLeg::new(option_type, side, quote.strike.clone(), expiration, size, quote.premium.clone())
}

/// Sell the higher put, buy the lower put
pub fn bull_put_spread(short_put: &QuotedStrike, long_put: &QuotedStrike, expiration: &str, size: u32) -> StrategyConfig {
    StrategyConfig::new(
        vec![
            leg(OptionType::Put, LegSide::Sell, short_put, expiration, size),
            leg(OptionType::Put, LegSide::Buy, long_put, expiration, size),
        ],
        vec![],
    )
}

/// Sell the lower call, buy the higher call
pub fn bear_call_spread(short_call: &QuotedStrike, long_call: &QuotedStrike, expiration: &str, size: u32) -> StrategyConfig {
    StrategyConfig::new(
        vec![
            leg(OptionType::Call, LegSide::Sell, short_call, expiration, size),
            leg(OptionType::Call, LegSide::Buy, long_call, expiration, size),
        ],
        vec![],
    )
}

/// Bull put spread + bear call spread on the same expiration
pub fn iron_condor(
    long_put: &QuotedStrike,
    short_put: &QuotedStrike,
    short_call: &QuotedStrike,
    long_call: &QuotedStrike,
    expiration: &str,
    size: u32,
) -> StrategyConfig {
    let mut config = bull_put_spread(short_put, long_put, expiration, size);
    config
        .legs
        .extend(bear_call_spread(short_call, long_call, expiration, size).legs);
    config
}

/// Iron condor whose short put and short call share the center strike
pub fn iron_butterfly(
    long_put: &QuotedStrike,
    center_put: &QuotedStrike,
    center_call: &QuotedStrike,
    long_call: &QuotedStrike,
    expiration: &str,
    size: u32,
) -> StrategyConfig {
    iron_condor(long_put, center_put, center_call, long_call, expiration, size)
}

/// Widest distance between a short strike and its protective long strike
/// of the same type. Informational only.
pub fn spread_width(config: &StrategyConfig) -> Option<f64> {
    let mut widest: Option<f64> = None;
    for option_type in [OptionType::Put, OptionType::Call] {
        let strikes = |side: LegSide| {
            config
                .legs
                .iter()
                .filter(move |l| l.option_type == option_type && l.buy_sell == side)
                .filter_map(|l| l.strike_value())
                .collect::<Vec<_>>()
        };
        let shorts = strikes(LegSide::Sell);
        let longs = strikes(LegSide::Buy);
        for short in &shorts {
            for long in &longs {
                let width = (short - long).abs();
                widest = Some(widest.map_or(width, |w| w.max(width)));
            }
        }
    }
    widest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iron_condor_leg_order() {
        let config = iron_condor(
            &QuotedStrike::new("90", "0.50"),
            &QuotedStrike::new("95", "1.50"),
            &QuotedStrike::new("105", "1.40"),
            &QuotedStrike::new("110", "0.45"),
            "30",
            1,
        );
        let shape: Vec<_> = config
            .legs
            .iter()
            .map(|l| (l.option_type, l.buy_sell, l.strike.as_str()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (OptionType::Put, LegSide::Sell, "95"),
                (OptionType::Put, LegSide::Buy, "90"),
                (OptionType::Call, LegSide::Sell, "105"),
                (OptionType::Call, LegSide::Buy, "110"),
            ]
        );
        assert_eq!(spread_width(&config), Some(5.0));
    }

    #[test]
    fn test_spread_width_none_without_pairs() {
        let config = bull_put_spread(&QuotedStrike::new("x", "1"), &QuotedStrike::new("90", "0.5"), "30", 1);
        assert_eq!(spread_width(&config), None);
    }

    #[test]
    fn test_preset_labels() {
        assert_eq!(PresetKind::IronCondor.label(), "Iron Condor");
        assert_eq!(PresetKind::BearCallSpread.category(), "bearish");
    }

    #[test]
    fn test_build_checks_quote_count() {
        let quotes = [QuotedStrike::new("90", "0.40"), QuotedStrike::new("95", "1.30")];
        let spread = PresetKind::BullPutSpread.build(&quotes, "14", 2).unwrap();
        assert_eq!(spread.legs[0].strike, "95");
        assert_eq!(spread.legs[0].buy_sell, LegSide::Sell);
        assert_eq!(spread.legs[1].size, 2);

        assert!(PresetKind::IronCondor.build(&quotes, "14", 1).is_none());
    }
}
