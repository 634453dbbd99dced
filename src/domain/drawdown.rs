//! Maximum drawdown over a prepared series.

use super::series::IndicatorSeries;

/// Largest peak-to-trough decline of the close, as a fraction in `(-1, 0]`.
/// `None` for an empty series. A flat or monotonically rising series yields 0.
pub fn max_drawdown(series: &IndicatorSeries) -> Option<f64> {
    let first = series.points.first()?;

    let mut peak = first.close;
    let mut worst = 0.0_f64;

    for point in &series.points {
        if point.close > peak {
            peak = point.close;
        } else if peak > 0.0 {
            let dd = (point.close - peak) / peak;
            if dd < worst {
                worst = dd;
            }
        }
    }

    Some(worst)
}
