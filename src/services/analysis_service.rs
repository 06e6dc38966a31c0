use tracing::{error, info, info_span};

use crate::config::{AnalysisConfig, DiversificationMode};
use crate::errors::{AnalyticsError, Result};
use crate::models::{AnalysisRequest, AnalysisResult, Holding, TimeSeries};
use crate::services::numeric::finite_or_zero;
use crate::services::supplemental_risk_service::DiversificationBasis;
use crate::services::{
    classification_service, historical_service, portfolio_service, risk_service, spectral_service,
    statistics,
};

const REQUIRED_KEYS: [&str; 6] = [
    "returns",
    "risk",
    "market",
    "distribution",
    "spectral",
    "historical",
];
const REQUIRED_HISTORICAL_KEYS: [&str; 5] = [
    "candlestick",
    "returns",
    "riskMetrics",
    "riskDecomposition",
    "beta",
];

/// Run the full analytics pipeline for one portfolio.
///
/// Aggregates the holdings, then computes the metrics block, the spectral
/// decomposition and the historical view over the same portfolio series. Any
/// failure in aggregation, metrics or spectral analysis aborts the whole request;
/// the historical risk block degrades on its own.
pub fn analyze(request: &AnalysisRequest, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let span = info_span!(
        "portfolio_analysis",
        holdings = request.holdings.len(),
        benchmark_points = request.benchmark.len()
    );
    let _guard = span.enter();

    config.validate().map_err(AnalyticsError::InvalidInput)?;
    portfolio_service::validate_prices("benchmark", &request.benchmark)?;

    info!("Analyzing portfolio of {} holdings", request.holdings.len());

    let (price, returns) = portfolio_service::aggregate(&request.holdings)?;
    let market = TimeSeries::from_prices(&request.benchmark).pct_change();

    let metrics = risk_service::compute_metrics(&returns, &market, config).inspect_err(|e| {
        error!("Metrics computation failed over {} observations: {}", returns.len(), e);
    })?;

    let spectral = spectral_service::analyze(returns.values(), config).inspect_err(|e| {
        error!("Spectral analysis failed: {}", e);
    })?;

    let basis = diversification_basis(&request.holdings, config);
    let historical = historical_service::aggregate(
        &price,
        &request.holdings,
        metrics.market.beta,
        config.window_size,
        &basis,
        config,
    )?;

    let sectors = request
        .classification
        .as_ref()
        .map(|map| classification_service::sector_breakdown(&request.holdings, map));

    let result = AnalysisResult {
        metrics,
        spectral,
        historical,
        sectors,
    };

    verify_schema(&result)?;

    info!(
        "Analysis complete: {} observations, {} candles, {} cycles",
        returns.len(),
        result.historical.candlestick.len(),
        result.spectral.significant_periods.len()
    );

    Ok(result)
}

fn diversification_basis(holdings: &[Holding], config: &AnalysisConfig) -> DiversificationBasis {
    match config.diversification {
        DiversificationMode::SelfReference => DiversificationBasis::SelfReference,
        DiversificationMode::Undiversified => DiversificationBasis::Reference {
            variance: undiversified_variance(holdings),
        },
    }
}

/// Variance of a basket whose holdings were perfectly correlated: (Σ wᵢσᵢ)².
fn undiversified_variance(holdings: &[Holding]) -> f64 {
    let weighted_vol: f64 = holdings
        .iter()
        .map(|h| {
            let returns = TimeSeries::from_prices(&h.prices).pct_change();
            h.weight * finite_or_zero(statistics::std_dev(returns.values()))
        })
        .sum();
    weighted_vol * weighted_vol
}

/// Check that the serialized result carries every top-level and historical key.
pub fn verify_schema(result: &AnalysisResult) -> Result<()> {
    let value = serde_json::to_value(result)?;

    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| value.get(**k).is_none()) {
        error!("Assembled analysis result is missing '{}'", missing);
        return Err(AnalyticsError::SchemaIntegrity(format!(
            "Missing top-level key '{}'",
            missing
        )));
    }

    let historical = &value["historical"];
    if let Some(missing) = REQUIRED_HISTORICAL_KEYS
        .iter()
        .find(|k| historical.get(**k).is_none())
    {
        error!("Assembled historical view is missing '{}'", missing);
        return Err(AnalyticsError::SchemaIntegrity(format!(
            "Missing historical key '{}'",
            missing
        )));
    }

    Ok(())
}
