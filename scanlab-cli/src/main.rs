//! ScanLab CLI — scan a universe of CSV sources or backtest a single one.
//!
//! Commands:
//! - `scan` — evaluate every source, print actionable symbols, write a ranked report
//! - `backtest` — run the reference strategy and portfolio on one source
//!
//! Logging goes through `env_logger` (default level `info`, override with `RUST_LOG`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scanlab_core::backtest::{BacktestEngine, BacktestStats, CostModel, SignalPortfolio};
use scanlab_core::data::SourceId;
use scanlab_core::signals::align_signal_set;
use scanlab_core::strategy::{RsiEmaStrategy, StrategyAdapter};
use scanlab_runner::{
    emit_report, rank, BatchScanner, RecommendationResult, ReportFormat, ReportPayload, ScanConfig,
};

#[derive(Parser)]
#[command(
    name = "scanlab",
    about = "ScanLab CLI — multi-symbol signal scanner and report generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan CSV sources for recent buy/sell signals and write a ranked report.
    Scan {
        /// CSV paths or http(s) URLs.
        sources: Vec<String>,

        /// Also scan every *.csv in this directory (sorted by name).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum rows in the report.
        #[arg(long)]
        limit: Option<usize>,

        /// Report format.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Report path. Defaults to the config's `report.output`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Evaluate symbols in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Per-symbol evaluation deadline in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Backtest the reference strategy on one source.
    Backtest {
        /// CSV path or http(s) URL.
        source: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// First local date to include (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Last local date to include (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Fee fraction per side (default 0.001425).
        #[arg(long)]
        fees: Option<f64>,

        /// Bar frequency label (default derived from the sampling interval).
        #[arg(long)]
        freq: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Markdown,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ReportFormat::Html,
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            sources,
            dir,
            config,
            limit,
            format,
            output,
            parallel,
            timeout,
        } => run_scan(sources, dir, config, limit, format, output, parallel, timeout),
        Commands::Backtest {
            source,
            config,
            start,
            end,
            fees,
            freq,
        } => run_backtest(source, config, start, end, fees, freq),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(p) => ScanConfig::from_file(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(ScanConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scan(
    raw_sources: Vec<String>,
    dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    limit: Option<usize>,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
    parallel: bool,
    timeout: Option<u64>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(limit) = limit {
        config.scan.limit = limit;
    }
    if let Some(format) = format {
        config.report.format = format.into();
    }
    if parallel {
        config.scan.parallel = true;
    }
    if timeout.is_some() {
        config.scan.symbol_timeout_secs = timeout;
    }
    config.validate()?;

    let mut sources: Vec<SourceId> = raw_sources.iter().map(|s| SourceId::parse(s)).collect();
    if let Some(dir) = &dir {
        sources.extend(list_csv_sources(dir)?);
    }
    if sources.is_empty() {
        bail!("no sources given (pass CSV paths/URLs or --dir)");
    }

    let scanner = BatchScanner::new(&config, Arc::new(RsiEmaStrategy::new()))?;
    let outcome = scanner.scan(&sources);

    for rec in &outcome.recommendations {
        println!("{}", console_line(rec));
    }

    let ranked = rank(&outcome.recommendations, config.scan.limit, config.scan.tie_break);
    let payload = ReportPayload::build(&ranked, &outcome, &config, &sources);
    let renderer = config.report.format.renderer();
    let output = output.unwrap_or_else(|| report_path(&config.report.output, renderer.extension()));
    emit_report(&payload, renderer.as_ref(), &output)?;
    println!("Report written to: {}", output.display());

    if !outcome.processed_any() {
        eprintln!("No source could be evaluated ({} failed).", outcome.failures.len());
        std::process::exit(1);
    }
    if !outcome.failures.is_empty() {
        warn!("{} source(s) failed: {}", outcome.failures.len(), outcome.failed_symbols().join(", "));
    }

    Ok(())
}

fn run_backtest(
    raw_source: String,
    config_path: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    fees: Option<f64>,
    freq: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let start_date = parse_date(start.as_deref())?;
    let end_date = parse_date(end.as_deref())?;
    if let (Some(s), Some(e)) = (start_date, end_date) {
        if s > e {
            bail!("--start {s} is after --end {e}");
        }
    }

    let source = SourceId::parse(&raw_source);
    let series = config.normalizer()?.load(&source)?;
    let window = series.window(start_date, end_date);
    if window.is_empty() {
        bail!(
            "{}: no bars between {} and {}",
            series.symbol,
            start_date.map_or("start".to_string(), |d| d.to_string()),
            end_date.map_or("end".to_string(), |d| d.to_string())
        );
    }
    info!("{}: backtesting {} of {} bars", window.symbol, window.len(), series.len());

    let adapter = StrategyAdapter::new(Arc::new(RsiEmaStrategy::new()), config.strategy.clone());
    let signals = adapter.evaluate(&window)?;
    let (entries, exits) = align_signal_set(&signals, &window)?;

    let mut costs = CostModel::default();
    costs.freq_label = freq.unwrap_or_else(|| config.sampling().freq_label());
    if let Some(fee) = fees {
        costs.fee_fraction = fee;
    }

    let stats = SignalPortfolio::new(config.strategy.initial_money).run(
        &window.closes(),
        &entries.flags,
        &exits.flags,
        &costs,
    )?;
    let verdict = config.recency_window().classify(&signals, window.len());

    print_summary(&window.symbol, &window, &stats, signals.buy_indices.len(), signals.sell_indices.len());
    println!(
        "Strategy gain:  {:.2} ({:+.2}%)",
        signals.total_gain, signals.invested_capital
    );
    println!(
        "Recent signal:  buy={} sell={}",
        verdict.should_buy, verdict.should_sell
    );
    println!();

    Ok(())
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'")))
        .transpose()
}

/// Every `*.csv` file directly under `dir`, sorted by file name.
fn list_csv_sources(dir: &Path) -> Result<Vec<SourceId>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();
    Ok(paths.into_iter().map(SourceId::from).collect())
}

/// Configured report path with the extension matching the renderer.
fn report_path(configured: &Path, extension: &str) -> PathBuf {
    configured.with_extension(extension)
}

fn console_line(rec: &RecommendationResult) -> String {
    format!(
        "Stock: {:<10} | Buy: {:<5} | Sell: {:<5} | Price: {:<8.2} | Gain: {:.2}",
        rec.symbol_id, rec.should_buy, rec.should_sell, rec.last_close, rec.total_gain
    )
}

fn print_summary(
    symbol: &str,
    series: &scanlab_core::domain::PriceSeries,
    stats: &BacktestStats,
    buys: usize,
    sells: usize,
) {
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {symbol}");
    if let (Some(start), Some(end)) = (series.start_date(), series.end_date()) {
        println!("Period:         {start} to {end}");
    }
    println!("Bars:           {} ({})", stats.bar_count, stats.freq_label);
    println!("Signals:        {buys} buy / {sells} sell");
    println!("Trades:         {}", stats.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Start Value:    {:.2}", stats.start_value);
    println!("End Value:      {:.2}", stats.end_value);
    println!("Total Return:   {:.2}%", stats.total_return * 100.0);
    println!("Total Fees:     {:.2}", stats.total_fees);
    println!("Max Drawdown:   {:.2}%", stats.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", stats.win_rate * 100.0);
}
