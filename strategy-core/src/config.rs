//! Strategy configuration document (legs + conditions)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::condition::StrategyCondition;
use crate::leg::TradingLeg;

/// Upper bound on legs accepted for review
pub const MAX_LEGS: usize = 8;

/// Underlying traded when a strategy does not name one
pub const DEFAULT_UNDERLYING: &str = "SPY";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("strategy config must be a JSON object")]
    NotAnObject,
    #[error("invalid strategy config: {0}")]
    Malformed(String),
    #[error("strategy needs at least one leg")]
    NoLegs,
    #[error("strategy has {0} legs, at most 8 are allowed")]
    TooManyLegs(usize),
    #[error("leg {0} has an unreadable premium")]
    InvalidPremium(usize),
    #[error("leg {index} does not exist (strategy has {len} legs)")]
    LegOutOfRange { index: usize, len: usize },
}

/// Legs and conditions as persisted in `trading_strategies.config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Underlying symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,
    /// Ordered legs
    #[serde(default)]
    pub legs: Vec<TradingLeg>,
    /// Entry/exit rules
    #[serde(default)]
    pub conditions: Vec<StrategyCondition>,
}

impl StrategyConfig {
    pub fn new(legs: Vec<TradingLeg>, conditions: Vec<StrategyCondition>) -> Self {
        Self {
            underlying: None,
            legs,
            conditions,
        }
    }

    pub fn with_underlying(mut self, symbol: impl Into<String>) -> Self {
        self.underlying = Some(symbol.into());
        self
    }

    /// Upper-cased underlying, falling back to [`DEFAULT_UNDERLYING`]
    pub fn underlying_symbol(&self) -> String {
        self.underlying
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_UNDERLYING)
            .to_uppercase()
    }

    /// Read the stored JSON document
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Checks applied before a strategy is submitted for review
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.legs.is_empty() {
            return Err(ConfigError::NoLegs);
        }
        if self.legs.len() > MAX_LEGS {
            return Err(ConfigError::TooManyLegs(self.legs.len()));
        }
        if let Some(index) = self.legs.iter().position(|leg| !leg.has_valid_premium()) {
            return Err(ConfigError::InvalidPremium(index));
        }
        Ok(())
    }

    pub fn add_leg(&mut self, leg: TradingLeg) {
        self.legs.push(leg);
    }

    /// Replace the leg at `index`
    pub fn replace_leg(&mut self, index: usize, leg: TradingLeg) -> Result<(), ConfigError> {
        let len = self.legs.len();
        let slot = self
            .legs
            .get_mut(index)
            .ok_or(ConfigError::LegOutOfRange { index, len })?;
        *slot = leg;
        Ok(())
    }

    /// Remove the leg at `index`, later legs shift down
    pub fn remove_leg(&mut self, index: usize) -> Result<TradingLeg, ConfigError> {
        if index >= self.legs.len() {
            return Err(ConfigError::LegOutOfRange {
                index,
                len: self.legs.len(),
            });
        }
        Ok(self.legs.remove(index))
    }
}
