//! Price storage port trait.

use crate::domain::error::FincrossError;
use crate::domain::price::DailyBar;
use chrono::NaiveDate;

/// Storage of daily bars, queried by symbol and date range. Implementations
/// must return bars sorted ascending by date.
pub trait DataPort {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, FincrossError>;

    /// Insert or replace bars keyed by (symbol, date); returns the number of
    /// rows written.
    fn upsert_daily_bars(&self, bars: &[DailyBar]) -> Result<usize, FincrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, FincrossError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FincrossError>;
}
