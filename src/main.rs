use analytics::AnalyticsEngine;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use data::{CsvBarSource, DataHandler, StaticStockSelector, StockSelector};
use engine::Engine;
use portfolio::{CostConfig as PortfolioCostConfig, Portfolio, RiskConfig};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;

/// Runs a single A-share backtest over one invocation: load the
/// configuration, build the universe and the Data Handler, wire the
/// Portfolio/Execution/Strategy components, drive the Engine to
/// completion, and print the performance report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides `[backtest].start_date` from the config file.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Overrides `[backtest].end_date` from the config file.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Overrides `[backtest].initial_capital` from the config file.
    #[arg(long)]
    initial_capital: Option<Decimal>,

    /// Comma-separated symbol universe, e.g. `600519,000001.SZ`.
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = configuration::load_settings(
        cli.config
            .to_str()
            .context("config path must be valid UTF-8")?,
    )?;

    if cli.symbols.is_empty() {
        bail!("no symbols provided; pass --symbols SYM1,SYM2,...");
    }

    let start_date = cli.start_date.unwrap_or(settings.backtest.start_date);
    let end_date = cli.end_date.unwrap_or(settings.backtest.end_date);
    let initial_capital = cli.initial_capital.unwrap_or(settings.backtest.initial_capital);

    tracing::info!(%start_date, %end_date, %initial_capital, "starting backtest");

    let selector = StaticStockSelector::new(cli.symbols)?;
    let universe = selector.select(start_date)?;
    tracing::info!(symbols = universe.len(), "resolved stock universe");

    let source = CsvBarSource::new(&settings.data.csv_root_path);
    let data = DataHandler::new(&source, &universe, start_date, end_date)?;

    let sizer = sizer::create_sizer(&settings.portfolio.sizer);
    // 10% portfolio-level cash reserve, independent of whatever the chosen
    // sizer caps itself to.
    let risk = RiskConfig {
        max_positions: settings.strategy.max_positions,
        cash_reserve_ratio: Decimal::new(10, 2),
    };
    let portfolio_cost = PortfolioCostConfig {
        commission_rate: settings.execution.commission_rate,
        min_commission: settings.execution.min_commission,
    };
    let portfolio = Portfolio::new(initial_capital, sizer, risk, portfolio_cost)?;

    let execution = execution::ExecutionSimulator::new(execution::CostConfig {
        commission_rate: settings.execution.commission_rate,
        min_commission: settings.execution.min_commission,
        slippage_rate: settings.execution.slippage_rate,
    })?;

    let mut strategies: HashMap<String, Box<dyn strategy::Strategy>> = HashMap::new();
    for symbol in &universe {
        let strat = strategy::create_strategy(&settings.strategy.parameters, symbol.clone())?;
        strategies.insert(symbol.clone(), strat);
    }

    let mut engine = Engine::new(data, portfolio, execution, strategies)?;
    engine.run();
    tracing::info!(ticks = engine.ticks_run(), "backtest finished");

    let analytics = AnalyticsEngine::default();
    let report = analytics.calculate(engine.portfolio().equity_curve(), engine.portfolio().fill_history())?;

    print_report(&report);
    write_outputs(&settings.data.output_path, &engine, &report)?;

    Ok(())
}

fn print_report(report: &analytics::PerformanceReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec![Cell::new("Total Return"), Cell::new(format!("{:.2}%", report.total_return * 100.0))]);
    table.add_row(vec![Cell::new("Annualized Return"), Cell::new(format!("{:.2}%", report.annualized_return * 100.0))]);
    table.add_row(vec![Cell::new("Max Drawdown"), Cell::new(format!("{:.2}%", report.max_drawdown * 100.0))]);
    table.add_row(vec![Cell::new("Volatility"), Cell::new(format!("{:.4}", report.volatility))]);
    table.add_row(vec![Cell::new("Sharpe Ratio"), Cell::new(format!("{:.2}", report.sharpe_ratio))]);
    table.add_row(vec![Cell::new("Calmar Ratio"), Cell::new(format!("{:.2}", report.calmar_ratio))]);
    table.add_row(vec![Cell::new("Trading Days"), Cell::new(report.trading_days)]);
    table.add_row(vec![Cell::new("Total Trades"), Cell::new(report.total_trades)]);
    table.add_row(vec![Cell::new("Win Rate"), Cell::new(format!("{:.2}%", report.win_rate * 100.0))]);
    table.add_row(vec![Cell::new("Profit/Loss Ratio"), Cell::new(format!("{:.2}", report.profit_loss_ratio))]);
    table.add_row(vec![Cell::new("Total Commission"), Cell::new(report.total_commission.to_string())]);

    tracing::info!("\n{table}");
}

/// Writes the equity curve, fill history, and report as CSV/JSON under
/// `output_path` (spec.md §6 outputs).
fn write_outputs(output_path: &str, engine: &Engine, report: &analytics::PerformanceReport) -> Result<()> {
    std::fs::create_dir_all(output_path)
        .with_context(|| format!("failed to create output directory {output_path}"))?;

    let equity_path = std::path::Path::new(output_path).join("equity_curve.csv");
    let mut writer = csv::Writer::from_path(&equity_path)
        .with_context(|| format!("failed to open {}", equity_path.display()))?;
    for point in engine.portfolio().equity_curve() {
        writer.serialize(point)?;
    }
    writer.flush()?;

    let fills_path = std::path::Path::new(output_path).join("fill_history.csv");
    let mut writer = csv::Writer::from_path(&fills_path)
        .with_context(|| format!("failed to open {}", fills_path.display()))?;
    for fill in engine.portfolio().fill_history() {
        writer.serialize(fill)?;
    }
    writer.flush()?;

    let trades_path = std::path::Path::new(output_path).join("closed_trades.csv");
    let mut writer = csv::Writer::from_path(&trades_path)
        .with_context(|| format!("failed to open {}", trades_path.display()))?;
    for trade in analytics::match_fifo_trades(engine.portfolio().fill_history()) {
        writer.serialize(trade)?;
    }
    writer.flush()?;

    let report_path = std::path::Path::new(output_path).join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    tracing::info!(path = %output_path, "wrote backtest outputs");
    Ok(())
}
