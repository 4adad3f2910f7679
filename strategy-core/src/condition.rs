//! Entry/exit conditions and their evaluation

use serde::{Deserialize, Serialize};

/// Condition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    /// Rule for opening the position
    Entry,
    /// Rule for closing the position
    Exit,
}

/// Descriptive entry/exit rule, e.g. `IV Rank > 50 on 1d`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCondition {
    /// Entry or exit
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Indicator name
    #[serde(default)]
    pub indicator: String,
    /// Comparison operator as entered
    #[serde(default)]
    pub operator: String,
    /// Threshold as entered
    #[serde(default)]
    pub value: String,
    /// Timeframe as entered
    #[serde(default)]
    pub timeframe: String,
}

impl StrategyCondition {
    pub fn new(
        kind: ConditionKind,
        indicator: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
        timeframe: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            indicator: indicator.into(),
            operator: operator.into(),
            value: value.into(),
            timeframe: timeframe.into(),
        }
    }
}

/// Filter entry conditions
pub fn entries(conditions: &[StrategyCondition]) -> impl Iterator<Item = &StrategyCondition> {
    conditions.iter().filter(|c| c.kind == ConditionKind::Entry)
}

/// Filter exit conditions
pub fn exits(conditions: &[StrategyCondition]) -> impl Iterator<Item = &StrategyCondition> {
    conditions.iter().filter(|c| c.kind == ConditionKind::Exit)
}

/// Decides whether a strategy's conditions allow a copy run to trade.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, conditions: &[StrategyCondition]) -> bool;
}

/// Conditions are descriptive only; no market data is consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl ConditionEvaluator for AlwaysTrue {
    fn evaluate(&self, _conditions: &[StrategyCondition]) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_json_shape() {
        let json = r#"{"type":"exit","indicator":"PnL %","operator":">=","value":"50","timeframe":"1d"}"#;
        let cond: StrategyCondition = serde_json::from_str(json).unwrap();
        assert_eq!(cond.kind, ConditionKind::Exit);
        assert_eq!(cond.indicator, "PnL %");
    }

    #[test]
    fn test_filters_and_stub_evaluator() {
        let conditions = vec![
            StrategyCondition::new(ConditionKind::Entry, "IV Rank", ">", "50", "1d"),
            StrategyCondition::new(ConditionKind::Exit, "DTE", "<=", "21", "1d"),
            StrategyCondition::new(ConditionKind::Entry, "VIX", "<", "25", "1h"),
        ];
        assert_eq!(entries(&conditions).count(), 2);
        assert_eq!(exits(&conditions).count(), 1);
        assert!(AlwaysTrue.evaluate(&conditions));
        assert!(AlwaysTrue.evaluate(&[]));
    }
}
