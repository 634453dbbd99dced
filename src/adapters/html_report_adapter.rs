//! HTML report adapter implementing ReportPort.
//!
//! Renders the Askama report template with inline SVG charts.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::chart_svg;
use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::domain::series::IndicatorSeries;
use crate::domain::simulator::{Trade, TradeAction};
use crate::ports::report_port::ReportPort;

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub symbol: String,
    pub initial_investment: String,
    pub final_value: String,
    pub total_return: String,
    pub max_drawdown: String,
    pub num_trades: usize,
    pub insufficient_history: bool,
    pub price_svg: String,
    pub value_svg: String,
    pub trades: Vec<TradeRow>,
}

pub struct TradeRow {
    pub action: &'static str,
    pub date: String,
    pub price: String,
    pub shares: u64,
}

impl ReportTemplate {
    pub fn from_result(result: &BacktestResult, series: &IndicatorSeries) -> Self {
        let trades = result
            .trade_log
            .iter()
            .map(|trade: &Trade| TradeRow {
                action: match trade.action {
                    TradeAction::Buy => "buy",
                    TradeAction::Sell => "sell",
                },
                date: trade.date.format("%Y-%m-%d").to_string(),
                price: format!("{:.2}", trade.price),
                shares: trade.shares,
            })
            .collect();

        ReportTemplate {
            symbol: result.symbol.clone(),
            initial_investment: format!("{:.2}", result.initial_investment),
            final_value: format!("{:.2}", result.final_value),
            total_return: format!("{:.2}%", result.total_return_pct),
            max_drawdown: format!("{:.2}%", result.max_drawdown_pct),
            num_trades: result.num_trades,
            insufficient_history: result.insufficient_history,
            price_svg: chart_svg::render_price_chart(series, &result.trade_log),
            value_svg: chart_svg::render_value_chart(&result.value_path),
            trades,
        }
    }
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        series: &IndicatorSeries,
        output_path: &str,
    ) -> Result<(), FincrossError> {
        let template = ReportTemplate::from_result(result, series);
        let html = template
            .render()
            .map_err(|e| FincrossError::Io(std::io::Error::other(e.to_string())))?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(FincrossError::Io)?;
            }
        }
        fs::write(path, html).map_err(FincrossError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest;
    use crate::domain::price::PricePoint;
    use crate::domain::series::prepare;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> (BacktestResult, IndicatorSeries) {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let mut closes = vec![100.0; 200];
        closes.extend([95.0, 112.0]);
        let raw: Vec<PricePoint> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        let series = prepare(raw.clone()).unwrap();
        let result = backtest::run("AAPL", raw, 10_000.0).unwrap();
        (result, series)
    }

    #[test]
    fn rendered_report_contains_summary_and_trades() {
        let (result, series) = sample();
        let html = ReportTemplate::from_result(&result, &series).render().unwrap();

        assert!(html.contains("AAPL"));
        assert!(html.contains("10000.00"));
        assert!(html.contains("<svg"));
        assert!(html.contains("buy"));
        assert!(html.contains("sell"));
        assert!(!html.contains("history is shorter"));
    }

    #[test]
    fn insufficient_history_notice_appears_for_short_series() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let raw: Vec<PricePoint> = (0..10)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i),
                close: 100.0,
            })
            .collect();
        let series = prepare(raw.clone()).unwrap();
        let result = backtest::run("AAPL", raw, 10_000.0).unwrap();

        let html = ReportTemplate::from_result(&result, &series).render().unwrap();
        assert!(html.contains("history is shorter"));
    }

    #[test]
    fn write_creates_file() {
        let (result, series) = sample();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");

        HtmlReportAdapter::new()
            .write(&result, &series, path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<!DOCTYPE html>"));
    }
}
