//! HTTP request handlers for the web adapter.

use askama::Template;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::adapters::chart_svg;
use crate::adapters::html_report_adapter::ReportTemplate;
use crate::domain::backtest::{self, DEFAULT_INITIAL_INVESTMENT};
use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::domain::price::PricePoint;
use crate::domain::series::IndicatorSeries;

use super::{AppState, WebError};

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let symbols = state.data_port.list_symbols()?;
    let template = super::templates::DashboardTemplate { symbols };
    let html = template
        .render()
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Html(html).into_response())
}

pub async fn fetch_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, WebError> {
    let symbol = symbol.to_uppercase();

    // The market data port blocks on the remote API; keep it off the runtime.
    let market_data = state.market_data.clone();
    let requested = symbol.clone();
    let bars = tokio::task::spawn_blocking(move || market_data.fetch_daily_history(&requested))
        .await
        .map_err(|e| WebError::internal(e.to_string()))??;
    if bars.is_empty() {
        return Err(WebError::not_found(format!(
            "no daily history returned for {symbol}"
        )));
    }

    let rows = state.data_port.upsert_daily_bars(&bars)?;
    Ok(Json(serde_json::json!({
        "symbol": symbol,
        "rows": rows,
        "status": "ok",
    }))
    .into_response())
}

pub async fn backtest_json(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, WebError> {
    let investment = default_investment(&state);
    let (result, _) = run_for_symbol(&state, &symbol, investment)?;
    Ok(Json(result).into_response())
}

pub async fn backtest_json_with_investment(
    State(state): State<Arc<AppState>>,
    Path((symbol, investment)): Path<(String, f64)>,
) -> Result<Response, WebError> {
    if !investment.is_finite() || investment <= 0.0 {
        return Err(WebError::bad_request("investment must be positive"));
    }
    let (result, _) = run_for_symbol(&state, &symbol, investment)?;
    Ok(Json(result).into_response())
}

pub async fn report_page(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, WebError> {
    let investment = default_investment(&state);
    let (result, series) = run_for_symbol(&state, &symbol, investment)?;

    let template = ReportTemplate::from_result(&result, &series);
    let html = template
        .render()
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Html(html).into_response())
}

pub async fn price_chart_svg(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, WebError> {
    let investment = default_investment(&state);
    let (result, series) = run_for_symbol(&state, &symbol, investment)?;

    let svg = chart_svg::render_price_chart(&series, &result.trade_log);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
        .into_response())
}

pub async fn not_found() -> Response {
    WebError::not_found("no such route").into_response()
}

fn default_investment(state: &AppState) -> f64 {
    state
        .config
        .get_double("backtest", "initial_investment", DEFAULT_INITIAL_INVESTMENT)
}

/// Load the stored series for a symbol and run the core backtest over it.
fn run_for_symbol(
    state: &AppState,
    symbol: &str,
    investment: f64,
) -> Result<(BacktestResult, IndicatorSeries), WebError> {
    let symbol = symbol.to_uppercase();
    let (start_date, end_date) = resolve_date_range(state, &symbol)?;

    let bars = state
        .data_port
        .fetch_daily_bars(&symbol, start_date, end_date)?;
    if bars.is_empty() {
        return Err(FincrossError::NoData { symbol }.into());
    }

    let points: Vec<PricePoint> = bars.iter().map(|b| b.price_point()).collect();
    Ok(backtest::run_with_series(&symbol, points, investment)?)
}

/// Date range from `[backtest] start_date`/`end_date`, defaulting to the full
/// stored range for the symbol.
fn resolve_date_range(state: &AppState, symbol: &str) -> Result<(NaiveDate, NaiveDate), WebError> {
    let parse = |key: &str, value: String| {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            WebError::bad_request(format!(
                "invalid [backtest] {key}: expected YYYY-MM-DD, got {value}"
            ))
        })
    };

    let configured_start = state
        .config
        .get_string("backtest", "start_date")
        .map(|v| parse("start_date", v))
        .transpose()?;
    let configured_end = state
        .config
        .get_string("backtest", "end_date")
        .map(|v| parse("end_date", v))
        .transpose()?;

    if let (Some(start), Some(end)) = (configured_start, configured_end) {
        return Ok((start, end));
    }

    let Some((min, max, _)) = state.data_port.get_data_range(symbol)? else {
        return Err(FincrossError::NoData {
            symbol: symbol.to_string(),
        }
        .into());
    };

    Ok((configured_start.unwrap_or(min), configured_end.unwrap_or(max)))
}
