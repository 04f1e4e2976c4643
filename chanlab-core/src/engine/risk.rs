//! Risk parameters for the execution engine.
//!
//! Every field has a default, so a TOML `[risk]` table may name only the
//! values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::DEFAULT_ATR_PERIOD;

pub const DEFAULT_MAX_DRAWDOWN: f64 = 0.15;
pub const DEFAULT_MAX_CONSECUTIVE_LOSSES: u32 = 3;
pub const DEFAULT_RISK_PER_TRADE: f64 = 0.02;
pub const DEFAULT_MAX_POSITION_FRACTION: f64 = 0.10;
pub const DEFAULT_TRAIL_ATR_MULTIPLE: f64 = 2.0;
pub const DEFAULT_BREAKEVEN_TRIGGER: f64 = 0.02;

#[derive(Debug, Error, PartialEq)]
#[error("invalid risk parameter {name} = {value}: {reason}")]
pub struct RiskParamError {
    pub name: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskParams {
    /// Drawdown (as a positive fraction) at which new entries stop.
    pub max_drawdown: f64,
    /// Losing closes in a row at which new entries stop.
    pub max_consecutive_losses: u32,
    /// Fraction of capital risked between entry and stop.
    pub risk_per_trade: f64,
    /// Cap on position notional as a fraction of capital.
    pub max_position_fraction: f64,
    pub atr_period: usize,
    /// Trailing stop distance in ATRs.
    pub trail_atr_multiple: f64,
    /// Favourable move (fraction of entry) that moves the stop to break-even.
    pub breakeven_trigger: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            max_drawdown: DEFAULT_MAX_DRAWDOWN,
            max_consecutive_losses: DEFAULT_MAX_CONSECUTIVE_LOSSES,
            risk_per_trade: DEFAULT_RISK_PER_TRADE,
            max_position_fraction: DEFAULT_MAX_POSITION_FRACTION,
            atr_period: DEFAULT_ATR_PERIOD,
            trail_atr_multiple: DEFAULT_TRAIL_ATR_MULTIPLE,
            breakeven_trigger: DEFAULT_BREAKEVEN_TRIGGER,
        }
    }
}

impl RiskParams {
    pub fn validate(&self) -> Result<(), RiskParamError> {
        fraction("max_drawdown", self.max_drawdown)?;
        fraction("risk_per_trade", self.risk_per_trade)?;
        fraction("max_position_fraction", self.max_position_fraction)?;
        positive("trail_atr_multiple", self.trail_atr_multiple)?;
        positive("breakeven_trigger", self.breakeven_trigger)?;
        if self.max_consecutive_losses == 0 {
            return Err(RiskParamError {
                name: "max_consecutive_losses",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.atr_period == 0 {
            return Err(RiskParamError {
                name: "atr_period",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), RiskParamError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(RiskParamError {
            name,
            value,
            reason: "must be in (0, 1]",
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), RiskParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RiskParamError {
            name,
            value,
            reason: "must be positive",
        })
    }
}
