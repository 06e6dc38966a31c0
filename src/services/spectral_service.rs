use rustfft::{num_complex::Complex, FftPlanner};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::errors::{AnalyticsError, Result};
use crate::models::SpectralResult;
use crate::services::numeric::finite_or_zero;

/// One positive-frequency bin of the periodogram.
#[derive(Debug, Clone, Copy)]
struct Bin {
    period: f64,
    power: f64,
}

/// Find the dominant cycles in a daily return series.
///
/// Takes the squared-magnitude FFT spectrum, keeps the strictly positive
/// frequencies, picks the `top_periods` strongest bins, normalizes their power to
/// the strongest one, rounds periods to whole days and keeps those inside the
/// configured day range. Output is sorted by ascending period and may hold fewer
/// than `top_periods` entries.
pub fn analyze(returns: &[f64], config: &AnalysisConfig) -> Result<SpectralResult> {
    let n = returns.len();
    if n < 2 {
        return Err(AnalyticsError::insufficient("spectral analysis", 2, n));
    }

    let mut top = positive_frequency_bins(returns);
    top.sort_by(|a, b| b.power.total_cmp(&a.power));
    top.truncate(config.top_periods);

    let max_power = top.iter().map(|b| b.power).fold(0.0, f64::max);
    if max_power > 0.0 {
        for bin in &mut top {
            bin.power /= max_power;
        }
    }

    let min_period = f64::from(config.min_period_days);
    let max_period = f64::from(config.max_period_days);
    let mut selected: Vec<(u32, f64)> = top
        .into_iter()
        .map(|b| (b.period.round_ties_even(), b.power))
        .filter(|(period, _)| *period >= min_period && *period <= max_period)
        .map(|(period, power)| (period as u32, finite_or_zero(power)))
        .collect();
    selected.sort_by_key(|(period, _)| *period);

    debug!(
        "Spectral analysis over {} observations kept {} periods",
        n,
        selected.len()
    );

    let (significant_periods, power_spectrum) = selected.into_iter().unzip();
    Ok(SpectralResult {
        significant_periods,
        power_spectrum,
    })
}

/// Power and period of every bin with frequency k/n, k = 1..=(n-1)/2.
///
/// For even n the Nyquist bin is treated as a negative frequency and skipped.
fn positive_frequency_bins(returns: &[f64]) -> Vec<Bin> {
    let n = returns.len();
    let mut buffer: Vec<Complex<f64>> = returns.iter().map(|&r| Complex::new(r, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    (1..=(n - 1) / 2)
        .map(|k| Bin {
            period: n as f64 / k as f64,
            power: buffer[k].norm_sqr(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(n: usize, period: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|t| amplitude * (2.0 * PI * t as f64 / period).sin())
            .collect()
    }

    fn assert_well_formed(result: &SpectralResult) {
        assert_eq!(result.significant_periods.len(), result.power_spectrum.len());
        assert!(result.significant_periods.len() <= 5);
        assert!(result.significant_periods.windows(2).all(|w| w[0] <= w[1]));
        assert!(result.significant_periods.iter().all(|p| (1..=365).contains(p)));
        assert!(result.power_spectrum.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_fewer_than_two_points_is_insufficient_data() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            analyze(&[], &config).unwrap_err(),
            AnalyticsError::InsufficientData { required: 2, actual: 0, .. }
        ));
        assert!(matches!(
            analyze(&[0.01], &config).unwrap_err(),
            AnalyticsError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_two_points_have_no_positive_frequencies() {
        let result = analyze(&[0.01, -0.01], &AnalysisConfig::default()).unwrap();
        assert!(result.significant_periods.is_empty());
        assert!(result.power_spectrum.is_empty());
    }

    #[test]
    fn test_pure_cycle_is_detected_with_full_power() {
        // 200 days of a 20-day cycle lands exactly on bin k = 10
        let returns = sine(200, 20.0, 0.01);
        let result = analyze(&returns, &AnalysisConfig::default()).unwrap();

        assert_well_formed(&result);
        let strongest = result
            .power_spectrum
            .iter()
            .position(|p| *p == 1.0)
            .unwrap();
        assert_eq!(result.significant_periods[strongest], 20);
    }

    #[test]
    fn test_two_cycles_are_sorted_by_period() {
        let returns: Vec<f64> = sine(240, 60.0, 0.02)
            .iter()
            .zip(sine(240, 8.0, 0.01))
            .map(|(a, b)| a + b)
            .collect();
        let result = analyze(&returns, &AnalysisConfig::default()).unwrap();

        assert_well_formed(&result);
        assert!(result.significant_periods.contains(&8));
        assert!(result.significant_periods.contains(&60));
        let long = result.significant_periods.iter().position(|p| *p == 60).unwrap();
        let short = result.significant_periods.iter().position(|p| *p == 8).unwrap();
        assert!(short < long);
        assert_eq!(result.power_spectrum[long], 1.0);
        assert!(result.power_spectrum[short] < 1.0);
    }

    #[test]
    fn test_periods_beyond_range_are_dropped() {
        // the 1000-day cycle is the strongest bin but lies outside [1, 365]
        let returns: Vec<f64> = sine(1000, 1000.0, 0.02)
            .iter()
            .zip(sine(1000, 10.0, 0.01))
            .map(|(a, b)| a + b)
            .collect();
        let config = AnalysisConfig {
            top_periods: 2,
            ..AnalysisConfig::default()
        };
        let result = analyze(&returns, &config).unwrap();

        assert_eq!(result.significant_periods, vec![10]);
        // normalized against the dropped 1000-day bin
        assert!((result.power_spectrum[0] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_stays_unnormalized_zero() {
        let result = analyze(&[0.0; 30], &AnalysisConfig::default()).unwrap();
        assert_well_formed(&result);
        assert!(result.power_spectrum.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let returns = sine(128, 16.0, 0.01);
        let config = AnalysisConfig::default();
        assert_eq!(analyze(&returns, &config).unwrap(), analyze(&returns, &config).unwrap());
    }
}
