//! Series preparation: sorting, validation and moving averages.

use chrono::NaiveDate;

use super::error::FincrossError;
use super::price::PricePoint;

/// Trailing window for the short moving average.
pub const SHORT_MA_WINDOW: usize = 50;
/// Trailing window for the long moving average.
pub const LONG_MA_WINDOW: usize = 200;

/// One point of the prepared series. The moving averages are absent until
/// their trailing window has filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
}

/// A date-sorted price series with derived indicators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSeries {
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

/// Sort raw points ascending by date, reject duplicate dates and attach the
/// 50- and 200-day trailing means. Pure transform; empty input yields an
/// empty series.
pub fn prepare(mut raw: Vec<PricePoint>) -> Result<IndicatorSeries, FincrossError> {
    raw.sort_by_key(|p| p.date);

    for pair in raw.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(FincrossError::DuplicateDate { date: pair[0].date });
        }
    }

    let closes: Vec<f64> = raw.iter().map(|p| p.close).collect();
    let short = rolling_mean(&closes, SHORT_MA_WINDOW);
    let long = rolling_mean(&closes, LONG_MA_WINDOW);

    let points = raw
        .iter()
        .zip(short)
        .zip(long)
        .map(|((p, ma_short), ma_long)| IndicatorPoint {
            date: p.date,
            close: p.close,
            ma_short,
            ma_long,
        })
        .collect();

    Ok(IndicatorSeries { points })
}

/// Trailing arithmetic mean over a fixed window. Entry `i` is defined once
/// `window` values ending at `i` exist, i.e. for `i >= window - 1`.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}
