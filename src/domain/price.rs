//! Daily price records.

use chrono::NaiveDate;
use serde::Serialize;

/// One closing price observation. The core consumes nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A full daily bar as stored by the data adapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl DailyBar {
    /// Project the bar onto the core's input shape.
    pub fn price_point(&self) -> PricePoint {
        PricePoint {
            date: self.date,
            close: self.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_point_projection() {
        let bar = DailyBar {
            symbol: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        };
        let point = bar.price_point();
        assert_eq!(point.date, bar.date);
        assert!((point.close - 105.0).abs() < f64::EPSILON);
    }
}
