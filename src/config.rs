use serde::{Deserialize, Serialize};

/// How the diversification effect picks its comparison variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversificationMode {
    /// Compare the portfolio series against itself. Always yields 0.
    SelfReference,
    /// Compare against the variance of the undiversified basket, (Σ wᵢσᵢ)².
    Undiversified,
}

/// Tunables shared by every calculator. Defaults match the conventions the
/// metrics are reported in (252-day year, 3% risk-free rate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub trading_days: u32,
    /// Annual risk-free rate as a fraction (0.03 = 3%)
    pub risk_free_rate: f64,
    pub window_size: usize,
    pub top_periods: usize,
    pub min_period_days: u32,
    pub max_period_days: u32,
    /// Tail probability used for VaR / CVaR / modified VaR (0.05 = 95% confidence)
    pub var_level: f64,
    pub diversification: DiversificationMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trading_days: 252,
            risk_free_rate: 0.03,
            window_size: 5,
            top_periods: 5,
            min_period_days: 1,
            max_period_days: 365,
            var_level: 0.05,
            diversification: DiversificationMode::SelfReference,
        }
    }
}

impl AnalysisConfig {
    /// Read overrides from the environment (and `.env`), falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trading_days: env_parse("TRADING_DAYS_PER_YEAR").unwrap_or(defaults.trading_days),
            risk_free_rate: env_parse("RISK_FREE_RATE").unwrap_or(defaults.risk_free_rate),
            window_size: env_parse("CANDLE_WINDOW_SIZE").unwrap_or(defaults.window_size),
            top_periods: env_parse("SPECTRAL_TOP_PERIODS").unwrap_or(defaults.top_periods),
            min_period_days: defaults.min_period_days,
            max_period_days: env_parse("SPECTRAL_MAX_PERIOD_DAYS")
                .unwrap_or(defaults.max_period_days),
            var_level: defaults.var_level,
            diversification: match dotenvy::var("DIVERSIFICATION_MODE")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "undiversified" => DiversificationMode::Undiversified,
                _ => defaults.diversification,
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trading_days == 0 {
            return Err("TRADING_DAYS_PER_YEAR must be positive".to_string());
        }
        if !self.risk_free_rate.is_finite() || self.risk_free_rate <= -1.0 {
            return Err(format!("RISK_FREE_RATE {} is out of range", self.risk_free_rate));
        }
        if self.window_size == 0 {
            return Err("CANDLE_WINDOW_SIZE must be at least 1".to_string());
        }
        if self.min_period_days > self.max_period_days {
            return Err(format!(
                "Spectral period range [{}, {}] is empty",
                self.min_period_days, self.max_period_days
            ));
        }
        if !(self.var_level > 0.0 && self.var_level < 1.0) {
            return Err(format!("VaR level {} must lie in (0, 1)", self.var_level));
        }
        Ok(())
    }

    /// Daily-compounded equivalent of the annual risk-free rate.
    pub fn daily_risk_free(&self) -> f64 {
        (1.0 + self.risk_free_rate).powf(1.0 / self.trading_days as f64) - 1.0
    }

    pub fn periods_per_year(&self) -> f64 {
        self.trading_days as f64
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    dotenvy::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_daily_risk_free_compounds_back_to_annual() {
        let config = AnalysisConfig::default();
        let annual = (1.0 + config.daily_risk_free()).powi(252) - 1.0;
        assert!((annual - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let config = AnalysisConfig {
            window_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
