use tracing::debug;

use crate::config::AnalysisConfig;
use crate::errors::{AnalyticsError, Result};
use crate::models::{Candle, DailyReturn, HistoricalView, Holding, TimeSeries};
use crate::services::numeric::finite_or_zero;
use crate::services::supplemental_risk_service::{self, DiversificationBasis};

/// Build the charting view of a portfolio price series.
///
/// Prices are cut into consecutive, non-overlapping windows of `window_size`
/// observations (the last one may be shorter), each summarized as a candle dated at
/// its first observation. Daily returns cover the full series, and the attached risk
/// block comes from the supplemental calculator, so it degrades to the fallback
/// block rather than failing. The holdings feed the per-holding variance split;
/// `market_beta` is carried through from the metrics block.
pub fn aggregate(
    price: &TimeSeries,
    holdings: &[Holding],
    market_beta: f64,
    window_size: usize,
    basis: &DiversificationBasis,
    config: &AnalysisConfig,
) -> Result<HistoricalView> {
    if window_size == 0 {
        return Err(AnalyticsError::InvalidInput(
            "Candlestick window size must be at least 1".to_string(),
        ));
    }

    let candlestick = build_candles(price, window_size);

    let daily = price.pct_change();
    let returns: Vec<DailyReturn> = daily
        .iter()
        .map(|(date, value)| DailyReturn { date, value })
        .collect();

    let risk_metrics =
        supplemental_risk_service::compute_supplemental(daily.values(), basis, config);
    let risk_decomposition =
        supplemental_risk_service::compute_risk_decomposition(holdings, price.dates());

    debug!(
        "Historical view: {} candles of {} days from {} prices",
        candlestick.len(),
        window_size,
        price.len()
    );

    Ok(HistoricalView {
        candlestick,
        returns,
        risk_metrics,
        risk_decomposition,
        beta: finite_or_zero(market_beta),
    })
}

fn build_candles(price: &TimeSeries, window_size: usize) -> Vec<Candle> {
    price
        .dates()
        .chunks(window_size)
        .zip(price.values().chunks(window_size))
        .map(|(dates, values)| Candle {
            date: dates[0],
            open: values[0],
            high: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            low: values.iter().copied().fold(f64::INFINITY, f64::min),
            close: values[values.len() - 1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prices(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        TimeSeries::new(dates, values.to_vec()).unwrap()
    }

    fn view(series: &TimeSeries, window: usize) -> Result<HistoricalView> {
        aggregate(
            series,
            &[],
            1.0,
            window,
            &DiversificationBasis::SelfReference,
            &AnalysisConfig::default(),
        )
    }

    #[test]
    fn test_windows_cover_every_price_once() {
        let series = prices(&[10.0, 11.0, 9.0, 12.0, 13.0, 12.5, 14.0]);
        let result = view(&series, 5).unwrap();

        assert_eq!(result.candlestick.len(), 2);

        let first = result.candlestick[0];
        assert_eq!(first.date, series.dates()[0]);
        assert_eq!(first.open, 10.0);
        assert_eq!(first.close, 13.0);
        assert_eq!(first.high, 13.0);
        assert_eq!(first.low, 9.0);

        let last = result.candlestick[1];
        assert_eq!(last.date, series.dates()[5]);
        assert_eq!(last.open, 12.5);
        assert_eq!(last.close, 14.0);
    }

    #[test]
    fn test_returns_cover_full_series_with_leading_zero() {
        let series = prices(&[100.0, 110.0, 99.0]);
        let result = view(&series, 2).unwrap();

        assert_eq!(result.returns.len(), 3);
        assert_eq!(result.returns[0].value, 0.0);
        assert!((result.returns[1].value - 0.1).abs() < 1e-12);
        assert_eq!(result.returns[2].date, series.dates()[2]);
    }

    #[test]
    fn test_zero_window_is_invalid_input() {
        let series = prices(&[1.0, 2.0]);
        assert!(matches!(view(&series, 0).unwrap_err(), AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_series_degrades_risk_block() {
        let result = view(&TimeSeries::default(), 5).unwrap();
        assert!(result.candlestick.is_empty());
        assert!(result.returns.is_empty());
        assert_eq!(result.risk_metrics, crate::models::SupplementalRiskBlock::fallback());
    }

    #[test]
    fn test_candles_start_on_every_window_boundary() {
        let series = prices(&[5.0, 6.0, 4.0, 7.0, 8.0, 6.5, 9.0, 9.5, 8.5, 10.0, 11.0]);
        for window in 1..=series.len() + 1 {
            let candles = view(&series, window).unwrap().candlestick;

            let starts: Vec<NaiveDate> = candles.iter().map(|c| c.date).collect();
            let expected: Vec<NaiveDate> =
                series.dates().iter().copied().step_by(window).collect();
            assert_eq!(starts, expected, "window {window}");

            // each window's points run up to the next candle's first date
            let covered: usize = starts
                .iter()
                .map(|d| series.dates().iter().filter(|x| *x >= d).count().min(window))
                .sum();
            assert_eq!(covered, series.len(), "window {window}");
            assert_eq!(candles.last().unwrap().close, 11.0);
        }
    }

    #[test]
    fn test_decomposition_and_beta_are_attached() {
        let series = prices(&[10.0, 10.5, 10.2, 10.9]);
        let closes = |values: &[f64]| {
            series
                .dates()
                .iter()
                .zip(values)
                .map(|(d, c)| crate::models::PricePoint::new(*d, *c))
                .collect::<Vec<_>>()
        };
        let holdings = [
            Holding::new("AAA", 0.5, closes(&[10.0, 11.0, 10.4, 11.8])),
            Holding::new("BBB", 0.5, closes(&[10.0, 10.0, 10.0, 10.0])),
        ];
        let result = aggregate(
            &series,
            &holdings,
            0.8,
            5,
            &DiversificationBasis::SelfReference,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(result.beta, 0.8);
        assert_eq!(result.risk_decomposition.len(), 2);
        assert!((result.risk_decomposition[0].contribution - 100.0).abs() < 1e-9);
        assert_eq!(result.risk_decomposition[1].contribution, 0.0);
    }
}
