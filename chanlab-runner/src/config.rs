//! Serializable strategy configuration.
//!
//! ```toml
//! [strategy]
//! symbol = "BTC/USDT"
//! trend_timeframe = "1d"
//! execution_timeframe = "1h"
//! initial_capital = 10000.0
//!
//! [risk]            # optional; every field defaults
//! max_drawdown = 0.15
//! atr_period = 14
//! ```

use std::path::Path;

use chanlab_core::domain::Timeframe;
use chanlab_core::engine::{RiskParamError, RiskParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("initial_capital must be positive and finite, got {0}")]
    InvalidCapital(f64),

    #[error(
        "trend timeframe {trend} must be coarser than execution timeframe {execution}"
    )]
    TimeframeOrder {
        trend: Timeframe,
        execution: Timeframe,
    },

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error(transparent)]
    Risk(#[from] RiskParamError),
}

/// Complete configuration for one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    pub strategy: StrategySection,
    #[serde(default)]
    pub risk: RiskParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategySection {
    pub symbol: String,
    /// Higher timeframe that resolves the trend.
    pub trend_timeframe: Timeframe,
    /// Lower timeframe that is stepped for signals and exits.
    pub execution_timeframe: Timeframe,
    pub initial_capital: f64,
}

impl StrategyConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text. Unknown timeframes fail here.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strategy;
        if s.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if !(s.initial_capital.is_finite() && s.initial_capital > 0.0) {
            return Err(ConfigError::InvalidCapital(s.initial_capital));
        }
        if s.trend_timeframe <= s.execution_timeframe {
            return Err(ConfigError::TimeframeOrder {
                trend: s.trend_timeframe,
                execution: s.execution_timeframe,
            });
        }
        self.risk.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[strategy]
symbol = "BTC/USDT"
trend_timeframe = "1d"
execution_timeframe = "1h"
initial_capital = 10000.0
"#;

    #[test]
    fn minimal_config_uses_default_risk() {
        let config = StrategyConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.strategy.trend_timeframe, Timeframe::Day);
        assert_eq!(config.strategy.execution_timeframe, Timeframe::Hour1);
        assert_eq!(config.risk, RiskParams::default());
    }

    #[test]
    fn risk_overrides_are_partial() {
        let text = format!("{MINIMAL}\n[risk]\nmax_drawdown = 0.1\natr_period = 20\n");
        let config = StrategyConfig::from_toml(&text).unwrap();
        assert_eq!(config.risk.max_drawdown, 0.1);
        assert_eq!(config.risk.atr_period, 20);
        assert_eq!(config.risk.risk_per_trade, RiskParams::default().risk_per_trade);
    }

    #[test]
    fn unknown_timeframe_is_a_parse_error() {
        let text = MINIMAL.replace("\"1h\"", "\"2h\"");
        let err = StrategyConfig::from_toml(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("2h"));
    }

    #[test]
    fn trend_must_be_coarser() {
        let text = MINIMAL.replace("\"1d\"", "\"15m\"");
        let err = StrategyConfig::from_toml(&text).unwrap_err();
        assert!(matches!(err, ConfigError::TimeframeOrder { .. }));
    }

    #[test]
    fn rejects_bad_capital_and_risk() {
        let text = MINIMAL.replace("10000.0", "-5.0");
        assert!(matches!(
            StrategyConfig::from_toml(&text),
            Err(ConfigError::InvalidCapital(_))
        ));

        let text = format!("{MINIMAL}\n[risk]\nrisk_per_trade = 0.0\n");
        assert!(matches!(
            StrategyConfig::from_toml(&text),
            Err(ConfigError::Risk(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = format!("{MINIMAL}\n[risk]\nmax_drawdwn = 0.1\n");
        assert!(matches!(
            StrategyConfig::from_toml(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let config = StrategyConfig::from_toml(MINIMAL).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(StrategyConfig::from_toml(&text).unwrap(), config);
    }
}
