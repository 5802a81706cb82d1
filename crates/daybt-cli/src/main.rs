//! daybt-cli
//!
//! Thin entry point: parses flags, wires the CSV
//! price store, the simulator, and a built-in strategy together, and
//! prints the resulting metrics. All real logic lives in the library
//! crates this binary only wires up.

use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use daybt_backtest::{BacktestConfig, Simulator};
use daybt_demo_strategies::{BuyAndHold, EmaCrossover};
use daybt_md::MarketDataAdapter;
use daybt_metrics::{default_computers, MetricConfig};
use daybt_strategy::Strategy;

#[derive(Parser)]
#[command(name = "daybt", about = "Deterministic single-process equity backtesting engine")]
struct Cli {
    /// Root of the per-symbol price CSV layout.
    #[arg(long = "data-dir")]
    data_dir: std::path::PathBuf,

    /// Comma-separated watchlist, e.g. AAPL,MSFT.
    #[arg(long, value_delimiter = ',', required = true)]
    symbols: Vec<String>,

    /// First trading day of the run, YYYY-MM-DD.
    #[arg(long)]
    start: NaiveDate,

    /// Last trading day of the run, YYYY-MM-DD (inclusive).
    #[arg(long)]
    end: NaiveDate,

    /// Load the backtest config (cash, commission, risk-free rate) from a
    /// JSON file instead of the flags below.
    #[arg(long = "config")]
    config_file: Option<std::path::PathBuf>,

    #[arg(long = "initial-cash", default_value_t = 100_000.0)]
    initial_cash: f64,

    #[arg(long = "commission-per-share", default_value_t = 0.005)]
    commission_per_share: f64,

    #[arg(long = "commission-min", default_value_t = 1.0)]
    commission_min: f64,

    #[arg(long = "risk-free-rate", default_value_t = 0.0)]
    risk_free_rate: f64,

    /// Which built-in strategy to run.
    #[arg(long, default_value = "buy-and-hold")]
    strategy: String,

    /// Shares per position, used by every built-in strategy.
    #[arg(long, default_value_t = 10)]
    quantity: i64,

    /// Fast EMA period, only used by `--strategy ema-crossover`.
    #[arg(long = "ema-fast", default_value_t = 10)]
    ema_fast: u32,

    /// Slow EMA period, only used by `--strategy ema-crossover`.
    #[arg(long = "ema-slow", default_value_t = 30)]
    ema_slow: u32,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.symbols.is_empty() {
        anyhow::bail!("--symbols must name at least one ticker");
    }

    let adapter = MarketDataAdapter::new(&cli.data_dir);
    adapter.preload(&cli.symbols).context("preloading watchlist prices")?;

    let config = match &cli.config_file {
        Some(path) => BacktestConfig::from_file(path).context("loading --config file")?,
        None => BacktestConfig {
            initial_cash: cli.initial_cash,
            commission_per_share: cli.commission_per_share,
            commission_minimum: cli.commission_min,
            risk_free_rate: cli.risk_free_rate,
        },
    };

    let mut simulator = Simulator::new(adapter, cli.symbols.clone(), cli.start, cli.end, &config);

    let mut strategy: Box<dyn Strategy> = match cli.strategy.as_str() {
        "buy-and-hold" => Box::new(BuyAndHold::new(cli.symbols[0].clone(), cli.quantity)),
        "ema-crossover" => {
            Box::new(EmaCrossover::new(cli.symbols[0].clone(), cli.ema_fast, cli.ema_slow, cli.quantity))
        }
        other => anyhow::bail!("unknown --strategy {other:?} (expected buy-and-hold or ema-crossover)"),
    };

    let metric_config = MetricConfig::new(config.risk_free_rate);
    let result = simulator
        .run(strategy.as_mut(), &default_computers(), &metric_config)
        .context("running backtest")?;

    println!("steps: {}", result.steps.len());
    println!("final cash: {:.2}", result.final_portfolio.current_cash);
    println!("realized pnl: {:.2}", result.final_portfolio.realized_pnl);
    for metric in &result.metrics {
        println!("{:?} = {:.4} ({:?})", metric.kind, metric.value, metric.unit);
    }
    Ok(())
}
