use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    ClassificationMap, Holding, MetricsBlock, PricePoint, RiskContribution, SectorBreakdown,
    SupplementalRiskBlock,
};

/// Dominant cycles found in a return series, ascending by period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralResult {
    /// Cycle lengths in trading days
    pub significant_periods: Vec<u32>,
    /// Power of each period relative to the strongest selected one, in [0, 1]
    pub power_spectrum: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalView {
    pub candlestick: Vec<Candle>,
    pub returns: Vec<DailyReturn>,
    pub risk_metrics: SupplementalRiskBlock,
    /// Variance contribution of each holding, in request order
    pub risk_decomposition: Vec<RiskContribution>,
    /// Portfolio beta against the benchmark, same value as the metrics block
    pub beta: f64,
}

/// Everything one analysis needs: the basket and the benchmark closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub holdings: Vec<Holding>,
    pub benchmark: Vec<PricePoint>,
    /// Optional ticker → sector/group tags for the allocation breakdown
    #[serde(default)]
    pub classification: Option<ClassificationMap>,
}

/// Combined analytics for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub metrics: MetricsBlock,
    pub spectral: SpectralResult,
    pub historical: HistoricalView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<SectorBreakdown>,
}
