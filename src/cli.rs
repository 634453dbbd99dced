//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::DEFAULT_INITIAL_INVESTMENT;
use crate::domain::error::FincrossError;
use crate::domain::metrics::BacktestResult;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "fincross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch daily history from the market data API into the database
    Fetch {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        verbose: bool,
    },
    /// Run a backtest over stored data
    Backtest {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
        /// Initial investment; overrides [backtest] initial_investment
        #[arg(long)]
        investment: Option<f64>,
        /// Report file; format chosen by extension (.json, .html, .typ)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the stored date range for symbol(s)
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols present in the database
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Fetch {
            symbol,
            config,
            verbose,
        } => run_fetch(&symbol, &config, verbose),
        Command::Backtest {
            symbol,
            config,
            investment,
            output,
        } => run_backtest(&symbol, &config, investment, output.as_ref()),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), &config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FincrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Investment precedence: command-line flag, then `[backtest]
/// initial_investment`, then the built-in default. Must be positive.
pub fn resolve_investment(
    flag: Option<f64>,
    config: &dyn ConfigPort,
) -> Result<f64, FincrossError> {
    let investment = flag.unwrap_or_else(|| {
        config.get_double("backtest", "initial_investment", DEFAULT_INITIAL_INVESTMENT)
    });
    if !investment.is_finite() || investment <= 0.0 {
        return Err(FincrossError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_investment".into(),
            reason: "must be a positive number".into(),
        });
    }
    Ok(investment)
}

/// Date range from `[backtest] start_date`/`end_date`, defaulting to the full
/// stored range for the symbol.
pub fn resolve_date_range(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    symbol: &str,
) -> Result<(NaiveDate, NaiveDate), FincrossError> {
    let parse = |key: &str, value: String| {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| FincrossError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        })
    };

    let start = config
        .get_string("backtest", "start_date")
        .map(|v| parse("start_date", v))
        .transpose()?;
    let end = config
        .get_string("backtest", "end_date")
        .map(|v| parse("end_date", v))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        return Ok((start, end));
    }

    let Some((min, max, _)) = data_port.get_data_range(symbol)? else {
        return Err(FincrossError::NoData {
            symbol: symbol.to_string(),
        });
    };

    Ok((start.unwrap_or(min), end.unwrap_or(max)))
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Backtest Results: {} ===", result.symbol);
    eprintln!("Initial Investment: {:>12.2}", result.initial_investment);
    eprintln!("Final Value:        {:>12.2}", result.final_value);
    eprintln!("Total Return:       {:>11.2}%", result.total_return_pct);
    eprintln!("Max Drawdown:       {:>11.2}%", result.max_drawdown_pct);
    eprintln!("Trades:             {:>12}", result.num_trades);
    if result.insufficient_history {
        eprintln!(
            "note: history shorter than the 200-day window; the sell signal never activates"
        );
    }
}

fn run_fetch(symbol: &str, config_path: &PathBuf, verbose: bool) -> ExitCode {
    #[cfg(all(feature = "fetch", feature = "sqlite"))]
    {
        use crate::adapters::alpha_vantage_adapter::AlphaVantageAdapter;
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::ports::market_data_port::MarketDataPort;

        let symbol = symbol.to_uppercase();

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let market_data = match AlphaVantageAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        eprintln!("Fetching daily history for {symbol}...");
        let bars = match market_data.fetch_daily_history(&symbol) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if bars.is_empty() {
            let err = FincrossError::NoData { symbol };
            eprintln!("error: {err}");
            return (&err).into();
        }

        if verbose {
            for bar in &bars {
                eprintln!("  {} {} close {:.2}", bar.symbol, bar.date, bar.close);
            }
        }

        let data_port = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        match data_port.upsert_daily_bars(&bars) {
            Ok(rows) => {
                eprintln!("Stored {rows} bars for {symbol}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(all(feature = "fetch", feature = "sqlite")))]
    {
        let _ = (symbol, config_path, verbose);
        eprintln!("error: fetch and sqlite features are required for fetch");
        ExitCode::from(1)
    }
}

fn run_backtest(
    symbol: &str,
    config_path: &PathBuf,
    investment_flag: Option<f64>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::domain::backtest;
        use crate::domain::price::PricePoint;

        let symbol = symbol.to_uppercase();

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let investment = match resolve_investment(investment_flag, &config) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let data_port = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let (start_date, end_date) = match resolve_date_range(&config, &data_port, &symbol) {
            Ok(range) => range,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        eprintln!("Running backtest: {symbol}, {start_date} to {end_date}");

        let bars = match data_port.fetch_daily_bars(&symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if bars.is_empty() {
            let err = FincrossError::NoData { symbol };
            eprintln!("error: {err}");
            return (&err).into();
        }

        let points: Vec<PricePoint> = bars.iter().map(|b| b.price_point()).collect();
        let (result, series) = match backtest::run_with_series(&symbol, points, investment) {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        print_summary(&result);

        match output_path {
            Some(output) => {
                if let Err(e) = write_report(&result, &series, output, &config) {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
                eprintln!("\nReport written to: {}", output.display());
            }
            None => match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize result: {e}");
                    return ExitCode::from(1);
                }
            },
        }

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (symbol, config_path, investment_flag, output_path);
        eprintln!("error: sqlite feature is required for backtest");
        ExitCode::from(1)
    }
}

#[cfg(feature = "sqlite")]
fn write_report(
    result: &BacktestResult,
    series: &crate::domain::series::IndicatorSeries,
    output: &PathBuf,
    config: &dyn ConfigPort,
) -> Result<(), FincrossError> {
    use crate::adapters::html_report_adapter::HtmlReportAdapter;
    use crate::adapters::json_report_adapter::JsonReportAdapter;
    use crate::adapters::typst_report::TypstReportAdapter;
    use crate::ports::report_port::ReportPort;

    let path_str = output.display().to_string();
    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match extension {
        "json" => JsonReportAdapter::new().write(result, series, &path_str),
        "html" => HtmlReportAdapter::new().write(result, series, &path_str),
        "typ" => {
            let adapter = match config.get_string("report", "template_path") {
                Some(template_path) => {
                    let template = std::fs::read_to_string(&template_path)?;
                    TypstReportAdapter::with_template(template)
                }
                None => TypstReportAdapter::new(),
            };
            adapter.write(result, series, &path_str)
        }
        other => Err(FincrossError::Io(std::io::Error::other(format!(
            "unsupported report extension: {other:?} (expected json, html or typ)"
        )))),
    }
}

fn run_info(symbol: Option<&str>, config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data_port = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let symbols = match symbol {
            Some(s) => vec![s.to_uppercase()],
            None => match data_port.list_symbols() {
                Ok(symbols) => symbols,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            },
        };

        for s in &symbols {
            match data_port.get_data_range(s) {
                Ok(Some((min_date, max_date, count))) => {
                    println!("{s}: {count} bars, {min_date} to {max_date}");
                }
                Ok(None) => {
                    eprintln!("{s}: no data found");
                }
                Err(e) => {
                    eprintln!("error querying {s}: {e}");
                }
            }
        }
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (symbol, config_path);
        eprintln!("error: sqlite feature is required for info");
        ExitCode::from(1)
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data_port = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let symbols = match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if symbols.is_empty() {
            eprintln!("No symbols stored");
        } else {
            for symbol in &symbols {
                println!("{symbol}");
            }
            eprintln!("{} symbols found", symbols.len());
        }
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = config_path;
        eprintln!("error: sqlite feature is required for list-symbols");
        ExitCode::from(1)
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::alpha_vantage_adapter::AlphaVantageAdapter;
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data_port = match SqliteAdapter::from_config(&config) {
            Ok(a) => Arc::new(a) as Arc<dyn DataPort + Send + Sync>,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let market_data = match AlphaVantageAdapter::from_config(&config) {
            Ok(a) => {
                Arc::new(a) as Arc<dyn crate::ports::market_data_port::MarketDataPort + Send + Sync>
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {addr}");

        let state = AppState {
            data_port,
            market_data,
            config: Arc::new(config),
        };

        let router = build_router(state);

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
