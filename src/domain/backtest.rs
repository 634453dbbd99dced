//! Backtest orchestration: prepare, simulate, aggregate.

use super::error::FincrossError;
use super::metrics::{self, BacktestResult};
use super::price::PricePoint;
use super::series;
use super::simulator;

/// Investment applied when the caller does not specify one.
pub const DEFAULT_INITIAL_INVESTMENT: f64 = 10_000.0;

/// Run one full backtest over a raw price series. Pure: no I/O, no retries,
/// no shared state; concurrent runs on separate inputs are safe.
///
/// `symbol` is an opaque identifier carried through onto the result.
pub fn run(
    symbol: &str,
    raw: Vec<PricePoint>,
    initial_investment: f64,
) -> Result<BacktestResult, FincrossError> {
    run_with_series(symbol, raw, initial_investment).map(|(result, _)| result)
}

/// Like [`run`], but also returns the prepared series so chart-producing
/// reporters can draw the price and its moving averages.
pub fn run_with_series(
    symbol: &str,
    raw: Vec<PricePoint>,
    initial_investment: f64,
) -> Result<(BacktestResult, series::IndicatorSeries), FincrossError> {
    let series = series::prepare(raw)?;
    let simulation = simulator::simulate(&series, initial_investment);
    let result = metrics::aggregate(&series, simulation, symbol, initial_investment)?;
    Ok((result, series))
}
