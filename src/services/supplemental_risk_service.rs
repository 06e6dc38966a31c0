use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::errors::{AnalyticsError, Result};
use crate::models::{Holding, RiskContribution, SupplementalRiskBlock, TimeSeries};
use crate::services::numeric::finite_or_zero;
use crate::services::statistics;

/// What the diversification effect compares the portfolio variance against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiversificationBasis {
    /// The portfolio's own variance. The effect is then always 0: the series is
    /// compared with itself. Kept as the default so existing readings do not move.
    SelfReference,
    /// An externally computed variance, e.g. that of the undiversified basket.
    Reference { variance: f64 },
}

/// Secondary risk metrics from the portfolio's daily returns alone.
///
/// Never fails: if the block cannot be computed the cause is logged and
/// [`SupplementalRiskBlock::fallback`] is returned instead.
pub fn compute_supplemental(
    returns: &[f64],
    basis: &DiversificationBasis,
    config: &AnalysisConfig,
) -> SupplementalRiskBlock {
    match try_compute_supplemental(returns, basis, config) {
        Ok(block) => block,
        Err(e) => {
            warn!("Supplemental risk metrics unavailable, using fallback: {}", e);
            SupplementalRiskBlock::fallback()
        }
    }
}

fn try_compute_supplemental(
    returns: &[f64],
    basis: &DiversificationBasis,
    config: &AnalysisConfig,
) -> Result<SupplementalRiskBlock> {
    if returns.is_empty() {
        return Err(AnalyticsError::insufficient("supplemental risk metrics", 1, 0));
    }
    if let Some(bad) = returns.iter().find(|r| !r.is_finite()) {
        return Err(AnalyticsError::ComputationFailure(format!(
            "Non-finite return {} in supplemental input",
            bad
        )));
    }

    let variance = statistics::variance(returns);
    let reference_variance = match basis {
        DiversificationBasis::SelfReference => variance,
        DiversificationBasis::Reference { variance } => *variance,
    };
    let diversification_effect = 1.0 - variance / reference_variance;

    let daily_rf = config.daily_risk_free();
    let mean_excess = statistics::mean(returns) - daily_rf;
    let treynor_ratio = mean_excess / variance;

    let information_ratio = compute_information_ratio(returns);
    let modified_var = compute_modified_var(returns, config.var_level)?;
    let value_at_risk = statistics::percentile(returns, config.var_level);

    Ok(SupplementalRiskBlock {
        diversification_effect: diversification_effect * 100.0,
        treynor_ratio: treynor_ratio * 100.0,
        information_ratio,
        modified_var: modified_var * 100.0,
        omega_ratio: compute_omega_ratio(returns),
        value_at_risk: value_at_risk * 100.0,
    }
    .sanitized())
}

/// Split the portfolio variance into per-holding contributions.
///
/// With weights `w` and the sample covariance matrix `Σ` of the holdings' daily
/// returns, holding `i` contributes `w_i·(Σw)_i / wᵀΣw`, reported ×100. Returns are
/// aligned on `dates` with missing days counted as zero, as in aggregation.
/// A portfolio without variance has nothing to split and every holding reports 0.
pub fn compute_risk_decomposition(
    holdings: &[Holding],
    dates: &[NaiveDate],
) -> Vec<RiskContribution> {
    let returns: Vec<TimeSeries> = holdings
        .iter()
        .map(|h| TimeSeries::from_prices(&h.prices).pct_change().reindex_or_zero(dates))
        .collect();

    // (Σw)_i for each holding
    let marginal: Vec<f64> = returns
        .iter()
        .map(|own| {
            returns
                .iter()
                .zip(holdings)
                .map(|(other, h)| h.weight * statistics::covariance(own.values(), other.values()))
                .sum::<f64>()
        })
        .collect();
    let portfolio_variance: f64 = holdings
        .iter()
        .zip(&marginal)
        .map(|(h, m)| h.weight * m)
        .sum();

    let usable = portfolio_variance.is_finite() && portfolio_variance > 0.0;
    if !usable && !holdings.is_empty() {
        warn!(
            "Portfolio variance {} over {} days cannot be decomposed; contributions set to 0",
            portfolio_variance,
            dates.len()
        );
    }

    holdings
        .iter()
        .zip(&marginal)
        .map(|(h, m)| RiskContribution {
            ticker: h.ticker.clone(),
            contribution: if usable {
                finite_or_zero(h.weight * m / portfolio_variance * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

/// Mean return over the tracking error against the series lagged by one day.
fn compute_information_ratio(returns: &[f64]) -> f64 {
    let active: Vec<f64> = returns.windows(2).map(|w| w[1] - w[0]).collect();
    statistics::mean(returns) / statistics::std_dev(&active)
}

/// Cornish-Fisher VaR as a positive loss fraction.
fn compute_modified_var(returns: &[f64], level: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AnalyticsError::ComputationFailure(format!("Standard normal: {}", e)))?;
    let z = normal.inverse_cdf(level);

    let s = statistics::skewness(returns);
    let k = statistics::excess_kurtosis(returns);
    let z_cf = z + (z * z - 1.0) * s / 6.0 + (z.powi(3) - 3.0 * z) * k / 24.0
        - (2.0 * z.powi(3) - 5.0 * z) * s * s / 36.0;

    Ok(-(statistics::mean(returns) + z_cf * statistics::std_dev(returns)))
}

/// Gain/loss count ratio at a zero threshold.
///
/// 1.0 when there are no losing days, and also for a series that never moved.
fn compute_omega_ratio(returns: &[f64]) -> f64 {
    let gains = returns.iter().filter(|r| **r > 0.0).count();
    let losses = returns.len() - gains;
    let flat = returns.iter().all(|r| *r == 0.0);

    if losses == 0 || flat {
        return 1.0;
    }
    gains as f64 / losses as f64
}
