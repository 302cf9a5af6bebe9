//! Correction calculator
//!
//! Corrects a principal from an origin date to a target date by a published
//! index. Both strategies share one period decomposition and differ only in
//! how the per-period factors are folded:
//!
//! - **Flat**: factors are compounded at high precision into one cumulative
//!   factor, applied to the principal once and rounded once.
//! - **Accumulated**: the running value is multiplied by each period's factor
//!   and rounded after every step, producing a breakdown trail. Per-step
//!   rounding means the two strategies can differ by a few cents.
//!
//! # Example
//!
//! ```rust,ignore
//! use monetary_correction::{CorrectionCalculator, CorrectionConfig, IndexName, MonetaryAmount};
//!
//! let rates = monetary_correction::rates::load_rates("data/rates.csv")?;
//! let calculator = CorrectionCalculator::new(CorrectionConfig::default());
//! let result = calculator.apply_accumulated(
//!     &MonetaryAmount::parse("10000.00")?,
//!     origin,
//!     target,
//!     IndexName::IpcaE,
//!     &rates,
//! )?;
//! println!("{}", result.explain());
//! ```

mod engine;
mod fold;
mod request;
pub mod result;

pub use engine::CorrectionCalculator;
pub use request::CorrectionRequest;
pub use result::{BreakdownEntry, CorrectionResult, CorrectionSummary};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CorrectionError;
use crate::money::{RoundingMode, MONETARY_SCALE};
use crate::period::PeriodInclusion;

/// Tagged outcome of one correction: the result, or why there is none
pub type CorrectionOutcome = Result<CorrectionResult, CorrectionError>;

/// Default number of fractional digits kept on cumulative factors
pub const DEFAULT_FACTOR_SCALE: u32 = 16;

/// How period factors are folded into the corrected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One cumulative factor, one rounding
    Flat,
    /// Month-by-month compounding, rounding every step
    #[default]
    Accumulated,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Flat => f.write_str("flat"),
            Strategy::Accumulated => f.write_str("accumulated"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "single" => Ok(Strategy::Flat),
            "accumulated" | "monthly" => Ok(Strategy::Accumulated),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Configuration for correction calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Rounding rule for monetary values and factors
    pub rounding: RoundingMode,

    /// Fractional digits of monetary results (and of every accumulated step)
    pub scale: u32,

    /// Fractional digits kept on cumulative factors
    pub factor_scale: u32,

    /// Which edge periods of the interval are corrected
    pub inclusion: PeriodInclusion,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::HalfUp,
            scale: MONETARY_SCALE,
            factor_scale: DEFAULT_FACTOR_SCALE,
            inclusion: PeriodInclusion::FromFollowingPeriod,
        }
    }
}

impl CorrectionConfig {
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_factor_scale(mut self, factor_scale: u32) -> Self {
        self.factor_scale = factor_scale;
        self
    }

    pub fn with_inclusion(mut self, inclusion: PeriodInclusion) -> Self {
        self.inclusion = inclusion;
        self
    }
}
