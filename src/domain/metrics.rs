//! Reduction of a simulation run into summary statistics.

use serde::Serialize;

use super::drawdown;
use super::error::FincrossError;
use super::series::{IndicatorSeries, LONG_MA_WINDOW};
use super::simulator::{Simulation, Trade};

/// Immutable output of one backtest run. Constructed once; reporting
/// collaborators consume it without further computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub initial_investment: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub num_trades: usize,
    /// Set when the series is shorter than the long MA window, in which case
    /// the sell signal can never activate and zero trades is expected.
    pub insufficient_history: bool,
    pub trade_log: Vec<Trade>,
    pub value_path: Vec<f64>,
}

/// Reduce the trade log and value path into a [`BacktestResult`].
///
/// Fails with [`FincrossError::EmptySeries`] when no data exists for the
/// requested symbol; no partial result is ever produced.
pub fn aggregate(
    series: &IndicatorSeries,
    simulation: Simulation,
    symbol: &str,
    initial_investment: f64,
) -> Result<BacktestResult, FincrossError> {
    let final_value = simulation
        .value_path
        .last()
        .copied()
        .ok_or(FincrossError::EmptySeries)?;
    let max_drawdown = drawdown::max_drawdown(series).ok_or(FincrossError::EmptySeries)?;

    let total_return_pct = (final_value - initial_investment) / initial_investment * 100.0;

    Ok(BacktestResult {
        symbol: symbol.to_string(),
        initial_investment,
        final_value,
        total_return_pct,
        max_drawdown_pct: max_drawdown * 100.0,
        num_trades: simulation.trades.len(),
        insufficient_history: series.len() < LONG_MA_WINDOW,
        trade_log: simulation.trades,
        value_path: simulation.value_path,
    })
}
