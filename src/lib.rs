//! Risk, return and cyclical-structure analytics for weighted portfolios.
//!
//! The crate is a pure computation core: callers hand in already-downloaded daily
//! closes for each holding plus a benchmark series and get back a serializable
//! [`AnalysisResult`](models::AnalysisResult). Nothing here performs I/O or keeps
//! state between calls.
//!
//! ```no_run
//! use portfolio_analytics::{analyze, AnalysisConfig, AnalysisRequest};
//!
//! # fn run(request: AnalysisRequest) -> Result<(), portfolio_analytics::AnalyticsError> {
//! let result = analyze(&request, &AnalysisConfig::default())?;
//! println!("sharpe = {}", result.metrics.risk.sharpe_ratio);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;

pub use config::{AnalysisConfig, DiversificationMode};
pub use errors::{AnalyticsError, Result};
pub use models::{AnalysisRequest, AnalysisResult, Holding, PricePoint};
pub use services::analysis_service::analyze;
