//! Strategy-Core: the options strategy domain shared by the Condor services
//!
//! Everything in this crate is pure: no IO, no clocks, no randomness.
//!
//! # Features
//!
//! - **Legs**: option legs as entered in the strategy builder, tolerant numeric parsing
//! - **Conditions**: descriptive entry/exit rules and the evaluator seam
//! - **Config**: the leg + condition document persisted with a strategy
//! - **Risk**: net-credit risk estimator (max profit, max loss, risk/reward)
//! - **Status**: strategy lifecycle and its allowed transitions
//! - **Settlement**: creator royalty and platform fee split of realized profit
//! - **Presets**: iron condor and related multi-leg builders
//!
//! # Example
//!
//! ```
//! use strategy_core::prelude::*;
//!
//! let legs = vec![TradingLeg::new(OptionType::Put, LegSide::Sell, "95", "30", 1, "2.00")];
//! let metrics = RiskCalculator::calculate(&legs);
//! assert_eq!(metrics.display_max_profit(), "$200");
//! ```

pub mod condition;
pub mod config;
pub mod leg;
pub mod presets;
pub mod risk;
pub mod settlement;
pub mod status;

// Re-export commonly used types
pub mod prelude {
    pub use crate::condition::*;
    pub use crate::config::*;
    pub use crate::leg::*;
    pub use crate::presets::*;
    pub use crate::risk::*;
    pub use crate::settlement::*;
    pub use crate::status::*;
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
