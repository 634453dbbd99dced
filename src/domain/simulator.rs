//! Crossover strategy simulation.
//!
//! Single forward pass over the prepared series. The decision at each step
//! sees only state produced by earlier steps; the position is all-in/all-out
//! with whole shares only.

use chrono::NaiveDate;
use serde::Serialize;

use super::series::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// One executed transition, recorded at the step that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub action: TradeAction,
    pub date: NaiveDate,
    pub price: f64,
    pub shares: u64,
}

/// Simulation-internal portfolio state, mutated once per step.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares_held: u64,
}

impl PortfolioState {
    pub fn new(initial_investment: f64) -> Self {
        PortfolioState {
            cash: initial_investment,
            shares_held: 0,
        }
    }

    /// Cash plus mark-to-market value of any held shares.
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.shares_held as f64 * price
    }
}

/// Output of one simulation run: the ordered trade log and the portfolio
/// value recorded after every step, aligned 1:1 with the input series.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub trades: Vec<Trade>,
    pub value_path: Vec<f64>,
}

/// Walk the series once, applying the crossover policy:
///
/// - buy all-in when the close is below the short MA and the position is flat,
/// - otherwise sell all-out when the close is above the long MA and shares
///   are held,
/// - hold while either moving average is still undefined.
///
/// Buy is checked before sell; a step never does both. A buy that affords
/// zero whole shares is still logged. An open position at the end of the
/// series is left unliquidated; the value path carries its mark-to-market
/// value at the last close.
pub fn simulate(series: &IndicatorSeries, initial_investment: f64) -> Simulation {
    let mut state = PortfolioState::new(initial_investment);
    let mut trades = Vec::new();
    let mut value_path = Vec::with_capacity(series.len());

    for point in &series.points {
        let (Some(ma_short), Some(ma_long)) = (point.ma_short, point.ma_long) else {
            value_path.push(state.total_value(point.close));
            continue;
        };

        if point.close < ma_short && state.shares_held == 0 && point.close > 0.0 {
            let shares = (state.cash / point.close).floor() as u64;
            state.cash -= shares as f64 * point.close;
            state.shares_held = shares;
            trades.push(Trade {
                action: TradeAction::Buy,
                date: point.date,
                price: point.close,
                shares,
            });
        } else if point.close > ma_long && state.shares_held > 0 {
            let shares = state.shares_held;
            state.cash += shares as f64 * point.close;
            state.shares_held = 0;
            trades.push(Trade {
                action: TradeAction::Sell,
                date: point.date,
                price: point.close,
                shares,
            });
        }

        value_path.push(state.total_value(point.close));
    }

    Simulation { trades, value_path }
}
