use serde::{Deserialize, Serialize};

use crate::services::numeric::finite_or_zero;

/// Return-side metrics. All values are percentages (e.g., 12.3 for 12.3%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnMetrics {
    /// Compound annual growth rate
    pub cagr: f64,
    /// Mean daily return extrapolated to one year
    pub annual_return: f64,
    /// Best compounded calendar-year return
    pub best_year: f64,
    /// Worst compounded calendar-year return
    pub worst_year: f64,
}

/// Volatility and tail-loss metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Annualized standard deviation of daily returns, as a percentage
    pub standard_dev: f64,

    /// Maximum peak-to-trough decline, as a negative percentage
    pub max_drawdown: f64,

    /// Annualized Sharpe ratio (unscaled)
    pub sharpe_ratio: f64,

    /// 5th percentile daily return, as a percentage
    pub var_five_percent: f64,

    /// Mean of the returns at or below the 5% VaR, as a percentage
    pub cvar_five_percent: f64,
}

/// Metrics relative to the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    /// Jensen's alpha, annualized percentage
    pub alpha: f64,
    pub beta: f64,
    pub correlation: f64,
    /// Up-market capture ratio, as a percentage
    pub up_capture: f64,
    /// Down-market capture ratio, as a percentage
    pub down_capture: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionMetrics {
    pub skewness: f64,
    /// Excess kurtosis (normal distribution = 0)
    pub kurtosis: f64,
}

/// The primary metrics block for a portfolio against its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsBlock {
    pub returns: ReturnMetrics,
    pub risk: RiskMetrics,
    pub market: MarketMetrics,
    pub distribution: DistributionMetrics,
}

impl MetricsBlock {
    /// Every numeric leaf, in declaration order.
    pub fn leaves(&self) -> [f64; 16] {
        [
            self.returns.cagr,
            self.returns.annual_return,
            self.returns.best_year,
            self.returns.worst_year,
            self.risk.standard_dev,
            self.risk.max_drawdown,
            self.risk.sharpe_ratio,
            self.risk.var_five_percent,
            self.risk.cvar_five_percent,
            self.market.alpha,
            self.market.beta,
            self.market.correlation,
            self.market.up_capture,
            self.market.down_capture,
            self.distribution.skewness,
            self.distribution.kurtosis,
        ]
    }
}

/// Secondary risk metrics computed from the portfolio's own return series.
///
/// `diversification_effect`, `treynor_ratio`, `modified_var` and `value_at_risk`
/// are percentages; `information_ratio` and `omega_ratio` are unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalRiskBlock {
    pub diversification_effect: f64,

    /// Mean excess return over return variance (not over beta)
    pub treynor_ratio: f64,

    pub information_ratio: f64,

    /// Cornish-Fisher adjusted VaR, reported as a positive loss
    #[serde(rename = "modifiedVaR")]
    pub modified_var: f64,

    pub omega_ratio: f64,

    /// Historical 5th percentile daily return
    pub value_at_risk: f64,
}

impl SupplementalRiskBlock {
    /// Block returned when the supplemental computation cannot complete.
    pub fn fallback() -> Self {
        Self {
            diversification_effect: 0.0,
            treynor_ratio: 0.0,
            information_ratio: 0.0,
            modified_var: 0.0,
            omega_ratio: 1.0,
            value_at_risk: 0.0,
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            diversification_effect: finite_or_zero(self.diversification_effect),
            treynor_ratio: finite_or_zero(self.treynor_ratio),
            information_ratio: finite_or_zero(self.information_ratio),
            modified_var: finite_or_zero(self.modified_var),
            omega_ratio: finite_or_zero(self.omega_ratio),
            value_at_risk: finite_or_zero(self.value_at_risk),
        }
    }

    pub fn leaves(&self) -> [f64; 6] {
        [
            self.diversification_effect,
            self.treynor_ratio,
            self.information_ratio,
            self.modified_var,
            self.omega_ratio,
            self.value_at_risk,
        ]
    }
}

/// One holding's share of the portfolio variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskContribution {
    pub ticker: String,
    /// Percentage of total variance; a basket's contributions sum to 100
    pub contribution: f64,
}
