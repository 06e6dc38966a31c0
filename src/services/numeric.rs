/// Coerce a metric to a finite number: NaN and ±infinity become 0.0.
///
/// Every numeric leaf leaving the analytics services passes through here.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
