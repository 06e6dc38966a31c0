mod analytics;
mod classification;
mod holding;
mod price_point;
pub mod risk;

pub use analytics::{
    AnalysisRequest, AnalysisResult, Candle, DailyReturn, HistoricalView, SpectralResult,
};
pub use classification::{Classification, ClassificationMap, SectorBreakdown};
pub use holding::Holding;
pub use price_point::{PricePoint, TimeSeries};
pub use risk::{
    DistributionMetrics, MarketMetrics, MetricsBlock, ReturnMetrics, RiskContribution,
    RiskMetrics, SupplementalRiskBlock,
};
