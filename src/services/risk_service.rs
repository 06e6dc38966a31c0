use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::{debug, error};

use crate::config::AnalysisConfig;
use crate::errors::{AnalyticsError, Result};
use crate::models::risk::{
    DistributionMetrics, MarketMetrics, MetricsBlock, ReturnMetrics, RiskMetrics,
};
use crate::models::TimeSeries;
use crate::services::numeric::finite_or_zero;
use crate::services::statistics;

/// Compute the primary metrics block for a portfolio against its benchmark.
///
/// Both series hold fractional daily returns. The market series is aligned to the
/// portfolio's dates; dates with no benchmark observation count as a zero return.
///
/// Percentages (returns, volatility, drawdown, VaR/CVaR, alpha, capture ratios) are
/// scaled by 100. Sharpe, beta, correlation, skewness and kurtosis are unscaled.
///
/// Fails with `InsufficientData` on an empty portfolio series and with
/// `ComputationFailure` when the inputs cannot be computed on. No partial block is
/// ever returned.
pub fn compute_metrics(
    portfolio: &TimeSeries,
    market: &TimeSeries,
    config: &AnalysisConfig,
) -> Result<MetricsBlock> {
    if portfolio.is_empty() {
        return Err(AnalyticsError::insufficient("risk/return metrics", 1, 0));
    }

    let market = market.reindex_or_zero(portfolio.dates());
    let returns = portfolio.values();
    let market_returns = market.values();

    check_finite("portfolio", portfolio)?;
    check_finite("benchmark", &market)?;
    if returns.len() != market_returns.len() {
        let message = format!(
            "Portfolio ({}) and benchmark ({}) returns are misaligned",
            returns.len(),
            market_returns.len()
        );
        error!("{}", message);
        return Err(AnalyticsError::ComputationFailure(message));
    }

    let periods = config.periods_per_year();
    let rf = config.risk_free_rate;
    let daily_rf = config.daily_risk_free();

    let annual_return = statistics::mean(returns) * periods;
    let annual_std = statistics::std_dev(returns) * periods.sqrt();
    let annual_market_return = statistics::mean(market_returns) * periods;

    let (best_year, worst_year) = compute_calendar_year_extremes(portfolio);
    let sharpe = compute_sharpe(returns, daily_rf, periods);
    let beta = compute_beta(returns, market_returns);
    let alpha = annual_return - (rf + beta * (annual_market_return - rf));
    let var = statistics::percentile(returns, config.var_level);
    let cvar = compute_cvar(returns, var);

    debug!(
        "Computed metrics over {} observations (beta {:.4}, sharpe {:.4})",
        returns.len(),
        beta,
        sharpe
    );

    Ok(MetricsBlock {
        returns: ReturnMetrics {
            cagr: finite_or_zero(compute_cagr(returns, periods) * 100.0),
            annual_return: finite_or_zero(annual_return * 100.0),
            best_year: finite_or_zero(best_year * 100.0),
            worst_year: finite_or_zero(worst_year * 100.0),
        },
        risk: RiskMetrics {
            standard_dev: finite_or_zero(annual_std * 100.0),
            max_drawdown: finite_or_zero(compute_max_drawdown(returns) * 100.0),
            sharpe_ratio: finite_or_zero(sharpe),
            var_five_percent: finite_or_zero(var * 100.0),
            cvar_five_percent: finite_or_zero(cvar * 100.0),
        },
        market: MarketMetrics {
            alpha: finite_or_zero(alpha * 100.0),
            beta: finite_or_zero(beta),
            correlation: finite_or_zero(statistics::correlation(returns, market_returns)),
            up_capture: finite_or_zero(compute_capture(returns, market_returns, |m| m > 0.0)),
            down_capture: finite_or_zero(compute_capture(returns, market_returns, |m| m < 0.0)),
        },
        distribution: DistributionMetrics {
            skewness: finite_or_zero(statistics::skewness(returns)),
            kurtosis: finite_or_zero(statistics::excess_kurtosis(returns)),
        },
    })
}

fn check_finite(label: &str, series: &TimeSeries) -> Result<()> {
    if let Some((date, value)) = series.iter().find(|(_, v)| !v.is_finite()) {
        let message = format!(
            "Non-finite {} return {} on {} ({} observations)",
            label,
            value,
            date,
            series.len()
        );
        error!("{}", message);
        return Err(AnalyticsError::ComputationFailure(message));
    }
    Ok(())
}

/// Geometric annualized growth. A cumulative product at or below zero means the
/// compounding collapsed and the CAGR is reported as 0.
fn compute_cagr(returns: &[f64], periods: f64) -> f64 {
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    if growth <= 0.0 {
        return 0.0;
    }
    growth.powf(periods / returns.len() as f64) - 1.0
}

/// Most negative drawdown of the compounded growth curve, as a fraction.
///
/// The running peak starts at the initial capital of 1.0, so a loss on the first
/// day already counts.
fn compute_max_drawdown(returns: &[f64]) -> f64 {
    returns
        .iter()
        .scan((1.0_f64, 1.0_f64), |(cum, peak), r| {
            *cum *= 1.0 + r;
            *peak = peak.max(*cum);
            Some(*cum / *peak - 1.0)
        })
        .fold(0.0, f64::min)
}

/// Compounded return of each calendar year; returns `(best, worst)`.
fn compute_calendar_year_extremes(returns: &TimeSeries) -> (f64, f64) {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for (date, r) in returns.iter() {
        *by_year.entry(date.year()).or_insert(1.0) *= 1.0 + r;
    }

    by_year
        .values()
        .map(|growth| growth - 1.0)
        .fold((f64::NAN, f64::NAN), |(best, worst), yearly| {
            (best.max(yearly), worst.min(yearly))
        })
}

/// Annualized Sharpe ratio on daily excess returns; 0 without dispersion.
fn compute_sharpe(returns: &[f64], daily_rf: f64, periods: f64) -> f64 {
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let std = statistics::std_dev(&excess);
    if !std.is_finite() || std == 0.0 {
        return 0.0;
    }
    periods.sqrt() * statistics::mean(&excess) / std
}

/// Beta against the benchmark. A flat benchmark defaults to 1.0 rather than 0 so
/// the reading does not suggest the portfolio is uncorrelated.
fn compute_beta(returns: &[f64], market: &[f64]) -> f64 {
    let market_variance = statistics::variance(market);
    if !market_variance.is_finite() || market_variance == 0.0 {
        return 1.0;
    }
    statistics::covariance(returns, market) / market_variance
}

/// Mean of the returns at or below the VaR threshold.
fn compute_cvar(returns: &[f64], var: f64) -> f64 {
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    statistics::mean(&tail)
}

/// Conditional mean ratio (×100) over the days selected by `condition` on the
/// market return. 0 when no day qualifies or the market mean is zero.
fn compute_capture(returns: &[f64], market: &[f64], condition: impl Fn(f64) -> bool) -> f64 {
    let (portfolio_side, market_side): (Vec<f64>, Vec<f64>) = returns
        .iter()
        .zip(market)
        .filter(|(_, m)| condition(**m))
        .map(|(r, m)| (*r, *m))
        .unzip();

    if market_side.is_empty() {
        return 0.0;
    }

    let market_mean = statistics::mean(&market_side);
    if market_mean == 0.0 {
        return 0.0;
    }
    statistics::mean(&portfolio_side) / market_mean * 100.0
}
