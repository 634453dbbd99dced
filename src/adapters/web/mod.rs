//! Web server adapter.
//!
//! Axum router exposing fetch, backtest and report endpoints over the same
//! ports the CLI uses.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::market_data_port::MarketDataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub market_data: Arc<dyn MarketDataPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/fetch/{symbol}", post(handlers::fetch_symbol))
        .route("/backtest/{symbol}", get(handlers::backtest_json))
        .route(
            "/backtest/{symbol}/{investment}",
            get(handlers::backtest_json_with_investment),
        )
        .route("/report/{symbol}", get(handlers::report_page))
        .route("/report/{symbol}/chart.svg", get(handlers::price_chart_svg))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
