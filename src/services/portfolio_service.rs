use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::{AnalyticsError, Result};
use crate::models::{Holding, PricePoint, TimeSeries};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Combine weighted holdings into one portfolio price series and its daily returns.
///
/// Each holding contributes `close * weight` on the dates it has data for. The
/// portfolio value on a date is the sum over the holdings that traded that day;
/// holdings missing a date contribute zero rather than dropping the date. Holdings
/// may be supplied in any order.
///
/// Returns `(portfolio_price, portfolio_return)`, both over the union of all dates.
pub fn aggregate(holdings: &[Holding]) -> Result<(TimeSeries, TimeSeries)> {
    if holdings.is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "Portfolio must contain at least one holding".to_string(),
        ));
    }

    for holding in holdings {
        validate_holding(holding)?;
    }

    let weight_sum: f64 = holdings.iter().map(|h| h.weight).sum();
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(
            "Holding weights sum to {:.6} instead of 1.0; using them as given",
            weight_sum
        );
    }

    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for holding in holdings {
        for point in &holding.prices {
            *totals.entry(point.date).or_insert(0.0) += point.close * holding.weight;
        }
    }

    let (dates, values): (Vec<NaiveDate>, Vec<f64>) = totals.into_iter().unzip();
    debug!(
        "Aggregated {} holdings into {} portfolio observations",
        holdings.len(),
        dates.len()
    );

    let price = TimeSeries::new(dates, values).ok_or_else(|| {
        AnalyticsError::ComputationFailure("Portfolio dates and values diverged".to_string())
    })?;
    let returns = price.pct_change();

    Ok((price, returns))
}

fn validate_holding(holding: &Holding) -> Result<()> {
    if holding.ticker.trim().is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "Holding ticker must not be empty".to_string(),
        ));
    }
    if !holding.weight.is_finite() || !(0.0..=1.0).contains(&holding.weight) {
        return Err(AnalyticsError::InvalidInput(format!(
            "Weight {} for {} must be a fraction in [0, 1]",
            holding.weight, holding.ticker
        )));
    }
    validate_prices(&holding.ticker, &holding.prices)
}

/// Reject empty or unordered price histories and closes that are not positive
/// finite numbers.
pub(crate) fn validate_prices(label: &str, prices: &[PricePoint]) -> Result<()> {
    if prices.is_empty() {
        return Err(AnalyticsError::InvalidInput(format!(
            "No price data supplied for {}",
            label
        )));
    }
    if let Some(bad) = prices.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
        return Err(AnalyticsError::InvalidInput(format!(
            "Close {} for {} on {} must be a positive finite price",
            bad.close, label, bad.date
        )));
    }
    if let Some(pair) = prices.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(AnalyticsError::InvalidInput(format!(
            "Prices for {} must have strictly increasing dates ({} follows {})",
            label, pair[1].date, pair[0].date
        )));
    }
    Ok(())
}
