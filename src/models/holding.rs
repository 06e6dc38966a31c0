use serde::{Deserialize, Serialize};

use crate::models::PricePoint;

// One security in the basket with its weight and downloaded daily closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    /// Fraction of the portfolio in [0, 1]
    pub weight: f64,
    pub prices: Vec<PricePoint>,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, weight: f64, prices: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
            prices,
        }
    }

    /// Build a holding from a percentage weight (e.g. `25.0` for 25%).
    pub fn from_percent_weight(
        ticker: impl Into<String>,
        weight_pct: f64,
        prices: Vec<PricePoint>,
    ) -> Self {
        Self::new(ticker, weight_pct / 100.0, prices)
    }
}
