//! Report generation port trait.

use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::domain::series::IndicatorSeries;

/// Port for writing backtest reports. The prepared series is passed alongside
/// the result so chart-producing implementations can draw the price and its
/// moving averages; value-only writers may ignore it.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        series: &IndicatorSeries,
        output_path: &str,
    ) -> Result<(), FincrossError>;
}
