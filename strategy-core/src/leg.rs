//! Option legs

use serde::{Deserialize, Serialize};

/// Shares controlled by one option contract
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Option type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option
    Call,
    /// Put option
    Put,
}

/// Leg side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegSide {
    /// Premium paid (debit)
    Buy,
    /// Premium received (credit)
    Sell,
}

/// One option position within a strategy.
///
/// Numeric fields are kept as the free text the builder produced; the
/// accessors below parse them and degrade to a default instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingLeg {
    /// Strike price
    pub strike: String,
    /// Call or put
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Days to expiry
    pub expiration: String,
    /// Buy or sell
    #[serde(rename = "buySell")]
    pub buy_sell: LegSide,
    /// Contract count
    #[serde(default = "default_size", deserialize_with = "deserialize_size")]
    pub size: u32,
    /// Premium per share
    #[serde(default)]
    pub price: String,
}

fn default_size() -> u32 {
    1
}

/// Builder forms send the size either as a number or as text.
fn deserialize_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let size = match &value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(size
        .and_then(|s| u32::try_from(s).ok())
        .filter(|s| *s > 0)
        .unwrap_or_else(default_size))
}

impl TradingLeg {
    /// Create new leg
    pub fn new(
        option_type: OptionType,
        buy_sell: LegSide,
        strike: impl Into<String>,
        expiration: impl Into<String>,
        size: u32,
        price: impl Into<String>,
    ) -> Self {
        Self {
            strike: strike.into(),
            option_type,
            expiration: expiration.into(),
            buy_sell,
            size,
            price: price.into(),
        }
    }

    /// Premium per share, `0.0` when the text does not parse
    pub fn premium(&self) -> f64 {
        parse_amount(&self.price).unwrap_or(0.0)
    }

    /// Contract count, a zero size counts as one contract
    pub fn contracts(&self) -> u32 {
        if self.size == 0 {
            1
        } else {
            self.size
        }
    }

    /// Premium for the whole leg: `premium × contracts × 100`
    pub fn notional(&self) -> f64 {
        self.premium() * self.contracts() as f64 * CONTRACT_MULTIPLIER
    }

    /// Strike as a number
    pub fn strike_value(&self) -> Option<f64> {
        parse_amount(&self.strike)
    }

    /// Expiration as whole days
    pub fn days_to_expiry(&self) -> Option<u32> {
        self.expiration.trim().parse().ok()
    }

    /// True when the premium text is a usable number
    pub fn has_valid_premium(&self) -> bool {
        parse_amount(&self.price).is_some()
    }

    pub fn is_credit(&self) -> bool {
        self.buy_sell == LegSide::Sell
    }
}

/// Parse a user-entered amount such as `"2.05"`, `" $1.10 "` or `"1,250"`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notional_uses_contract_multiplier() {
        let leg = TradingLeg::new(OptionType::Call, LegSide::Sell, "105", "30", 3, "1.25");
        assert_eq!(leg.notional(), 375.0);
    }

    #[test]
    fn test_unparseable_premium_is_zero() {
        let leg = TradingLeg::new(OptionType::Put, LegSide::Buy, "90", "30", 1, "N/A");
        assert_eq!(leg.premium(), 0.0);
        assert_eq!(leg.notional(), 0.0);
        assert!(!leg.has_valid_premium());
    }

    #[test]
    fn test_zero_size_counts_as_one() {
        let leg = TradingLeg::new(OptionType::Put, LegSide::Buy, "90", "30", 0, "1.00");
        assert_eq!(leg.contracts(), 1);
        assert_eq!(leg.notional(), 100.0);
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount(" $2.50 "), Some(2.5));
        assert_eq!(parse_amount("1,250"), Some(1250.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_builder_json_shape() {
        let json = r#"{"strike":"100","type":"Call","expiration":"45","buySell":"Sell","size":2,"price":"3.10"}"#;
        let leg: TradingLeg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.option_type, OptionType::Call);
        assert_eq!(leg.buy_sell, LegSide::Sell);
        assert_eq!(leg.size, 2);
        assert_eq!(leg.strike_value(), Some(100.0));
        assert_eq!(leg.days_to_expiry(), Some(45));
    }

    #[test]
    fn test_missing_size_defaults_to_one() {
        let json = r#"{"strike":"100","type":"Put","expiration":"7","buySell":"Buy","price":"0.40"}"#;
        let leg: TradingLeg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.size, 1);
    }

    #[test]
    fn test_size_as_text() {
        let json = r#"{"strike":"100","type":"Put","expiration":"7","buySell":"Buy","size":"4","price":"0.40"}"#;
        let leg: TradingLeg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.size, 4);

        let json = r#"{"strike":"100","type":"Put","expiration":"7","buySell":"Buy","size":"lots","price":"0.40"}"#;
        let leg: TradingLeg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.size, 1);
    }
}
