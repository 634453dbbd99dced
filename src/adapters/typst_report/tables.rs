//! Typst table rendering for report sections.

use crate::domain::metrics::BacktestResult;
use crate::domain::simulator::{Trade, TradeAction};

pub fn render_run_summary(result: &BacktestResult) -> String {
    format!(
        "#table(\n  columns: (auto, auto),\n  stroke: 0.5pt,\n  \
         [*Symbol*], [{}],\n  \
         [*Initial Investment*], [{:.2}],\n)\n",
        escape(&result.symbol),
        result.initial_investment,
    )
}

pub fn render_metrics_table(result: &BacktestResult) -> String {
    format!(
        "#table(\n  columns: (auto, auto),\n  stroke: 0.5pt,\n  \
         [*Final Value*], [{:.2}],\n  \
         [*Total Return*], [{:.2}%],\n  \
         [*Max Drawdown*], [{:.2}%],\n  \
         [*Trades*], [{}],\n)\n",
        result.final_value,
        result.total_return_pct,
        result.max_drawdown_pct,
        result.num_trades,
    )
}

pub fn render_trade_log(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "_No trades._".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: (auto, auto, auto, auto),\n  stroke: 0.5pt,\n  \
         [*Action*], [*Date*], [*Price*], [*Shares*],\n",
    );
    for trade in trades {
        let action = match trade.action {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        };
        out.push_str(&format!(
            "  [{}], [{}], [{:.2}], [{}],\n",
            action, trade.date, trade.price, trade.shares
        ));
    }
    out.push_str(")\n");
    out
}

/// Escape Typst markup characters in user-supplied text.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('#', "\\#")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('*', "\\*")
        .replace('_', "\\_")
}
