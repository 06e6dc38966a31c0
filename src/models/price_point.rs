use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One daily close for a security or index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// A dated sequence of values (prices or fractional returns), ascending by date.
///
/// `dates` and `values` always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Option<Self> {
        if dates.len() != values.len() {
            return None;
        }
        Some(Self { dates, values })
    }

    pub fn from_prices(prices: &[PricePoint]) -> Self {
        Self {
            dates: prices.iter().map(|p| p.date).collect(),
            values: prices.iter().map(|p| p.close).collect(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Simple percentage change aligned 1:1 with this series.
    ///
    /// The first element has no prior observation and is 0. A change that is not
    /// finite (previous value of zero) is also reported as 0.
    pub fn pct_change(&self) -> TimeSeries {
        let values = std::iter::once(0.0)
            .chain(self.values.windows(2).map(|w| {
                let change = (w[1] - w[0]) / w[0];
                if change.is_finite() { change } else { 0.0 }
            }))
            .take(self.values.len())
            .collect();

        TimeSeries {
            dates: self.dates.clone(),
            values,
        }
    }

    /// Values re-indexed onto `dates`; dates absent from this series map to 0.
    pub fn reindex_or_zero(&self, dates: &[NaiveDate]) -> TimeSeries {
        let lookup: std::collections::HashMap<NaiveDate, f64> = self.iter().collect();
        TimeSeries {
            dates: dates.to_vec(),
            values: dates
                .iter()
                .map(|d| lookup.get(d).copied().unwrap_or(0.0))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_pct_change_starts_at_zero() {
        let series =
            TimeSeries::new(vec![day(1), day(2), day(3)], vec![100.0, 110.0, 99.0]).unwrap();
        let returns = series.pct_change();
        assert_eq!(returns.len(), 3);
        assert_eq!(returns.values()[0], 0.0);
        assert!((returns.values()[1] - 0.10).abs() < 1e-12);
        assert!((returns.values()[2] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_from_zero_price_is_zero() {
        let series = TimeSeries::new(vec![day(1), day(2)], vec![0.0, 5.0]).unwrap();
        assert_eq!(series.pct_change().values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_reindex_fills_missing_dates_with_zero() {
        let series = TimeSeries::new(vec![day(1), day(3)], vec![0.5, 0.7]).unwrap();
        let aligned = series.reindex_or_zero(&[day(1), day(2), day(3)]);
        assert_eq!(aligned.values(), &[0.5, 0.0, 0.7]);
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        assert!(TimeSeries::new(vec![day(1)], vec![]).is_none());
    }
}
