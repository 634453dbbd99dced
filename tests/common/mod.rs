#![allow(dead_code)]

use chrono::NaiveDate;
use fincross::domain::error::FincrossError;
pub use fincross::domain::price::{DailyBar, PricePoint};
use fincross::ports::data_port::DataPort;
use fincross::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockDataPort {
    data: Mutex<HashMap<String, Vec<DailyBar>>>,
    errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.data.lock().unwrap().insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, FincrossError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FincrossError::Database {
                reason: reason.clone(),
            });
        }
        let mut bars: Vec<DailyBar> = self
            .data
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn upsert_daily_bars(&self, bars: &[DailyBar]) -> Result<usize, FincrossError> {
        let mut data = self.data.lock().unwrap();
        for bar in bars {
            let entry = data.entry(bar.symbol.clone()).or_default();
            entry.retain(|b| b.date != bar.date);
            entry.push(bar.clone());
            entry.sort_by_key(|b| b.date);
        }
        Ok(bars.len())
    }

    fn list_symbols(&self) -> Result<Vec<String>, FincrossError> {
        let mut symbols: Vec<String> = self.data.lock().unwrap().keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FincrossError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FincrossError::Database {
                reason: reason.clone(),
            });
        }
        match self.data.lock().unwrap().get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub struct MockMarketData {
    pub history: HashMap<String, Vec<DailyBar>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            history: HashMap::new(),
        }
    }

    pub fn with_history(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.history.insert(symbol.to_string(), bars);
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>, FincrossError> {
        Ok(self.history.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date_str: &str, close: f64) -> DailyBar {
    DailyBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Consecutive daily bars with the given closes, starting at `start_date`.
pub fn bars_from_closes(symbol: &str, start_date: &str, closes: &[f64]) -> Vec<DailyBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| DailyBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// 200 flat closes to fill both MA windows, then a dip below the short MA
/// (buy) and a rally above the long MA (sell): exactly one round trip.
pub fn crossover_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 200];
    closes.push(95.0);
    closes.extend([112.0, 113.0]);
    closes
}
