//! CSV file data adapter.
//!
//! One `{SYMBOL}.csv` file per symbol under a base directory, with a
//! `date,open,high,low,close,volume` header.

use crate::domain::error::FincrossError;
use crate::domain::price::DailyBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<DailyBar>, FincrossError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| FincrossError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FincrossError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let field = |i: usize, name: &str| -> Result<&str, FincrossError> {
                record.get(i).ok_or_else(|| FincrossError::Database {
                    reason: format!("missing {} column", name),
                })
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
                FincrossError::Database {
                    reason: format!("invalid date value: {}", e),
                }
            })?;

            let number = |i: usize, name: &str| -> Result<f64, FincrossError> {
                field(i, name)?.parse().map_err(|e| FincrossError::Database {
                    reason: format!("invalid {} value: {}", name, e),
                })
            };

            let volume: i64 =
                field(5, "volume")?
                    .parse()
                    .map_err(|e| FincrossError::Database {
                        reason: format!("invalid volume value: {}", e),
                    })?;

            bars.push(DailyBar {
                symbol: symbol.to_string(),
                date,
                open: number(1, "open")?,
                high: number(2, "high")?,
                low: number(3, "low")?,
                close: number(4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn write_all(&self, symbol: &str, bars: &[DailyBar]) -> Result<(), FincrossError> {
        let path = self.csv_path(symbol);
        let mut wtr = csv::Writer::from_path(&path).map_err(|e| FincrossError::Database {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        wtr.write_record(["date", "open", "high", "low", "close", "volume"])
            .map_err(|e| FincrossError::Database {
                reason: format!("CSV write error: {}", e),
            })?;

        for bar in bars {
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(|e| FincrossError::Database {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush().map_err(|e| FincrossError::Database {
            reason: format!("CSV flush error: {}", e),
        })?;
        Ok(())
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, FincrossError> {
        let bars = self.read_all(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn upsert_daily_bars(&self, bars: &[DailyBar]) -> Result<usize, FincrossError> {
        let mut by_symbol: BTreeMap<&str, Vec<&DailyBar>> = BTreeMap::new();
        for bar in bars {
            by_symbol.entry(bar.symbol.as_str()).or_default().push(bar);
        }

        let mut written = 0;
        for (symbol, new_bars) in by_symbol {
            let mut merged: BTreeMap<NaiveDate, DailyBar> = match self.read_all(symbol) {
                Ok(existing) => existing.into_iter().map(|b| (b.date, b)).collect(),
                Err(_) => BTreeMap::new(), // no file yet
            };
            for bar in new_bars {
                merged.insert(bar.date, bar.clone());
                written += 1;
            }
            let all: Vec<DailyBar> = merged.into_values().collect();
            self.write_all(symbol, &all)?;
        }

        Ok(written)
    }

    fn list_symbols(&self) -> Result<Vec<String>, FincrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FincrossError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FincrossError::Database {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FincrossError> {
        let bars = match self.read_all(symbol) {
            Ok(bars) => bars,
            Err(_) => return Ok(None),
        };
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
