//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::analysis::BacktestAnalysis;
use crate::domain::config::AnalyticsConfig;
use crate::domain::distribution::{
    histogram, month_year_heatmap, weekday_hour_heatmap, HistogramBin, MonthYearCell,
    WeekdayHourHeatmap,
};
use crate::domain::error::RetrospectError;
use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi,
    calculate_sma, calculate_stochastic, IndicatorSeries,
};
use crate::domain::metrics::Ratio;
use crate::domain::replay::ReplayController;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "retrospect", about = "Backtest analytics engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the full analysis of a run from an equity curve and trade log
    Metrics {
        #[arg(short, long)]
        equity: PathBuf,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute the standard indicator set over an OHLCV history
    Indicators {
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build pnl distribution histograms and calendar heatmaps
    Distribution {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(long)]
        bins: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play a run back step by step on a timer
    Replay {
        #[arg(short, long)]
        equity: PathBuf,
        #[arg(short, long)]
        speed: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Metrics {
            equity,
            trades,
            config,
            output,
        } => run_metrics(&equity, trades.as_deref(), config.as_deref(), output.as_deref()),
        Command::Indicators {
            bars,
            config,
            output,
        } => run_indicators(&bars, config.as_deref(), output.as_deref()),
        Command::Distribution {
            trades,
            bins,
            config,
            output,
        } => run_distribution(&trades, bins, config.as_deref(), output.as_deref()),
        Command::Replay {
            equity,
            speed,
            config,
        } => run_replay(&equity, speed, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(&err)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig, RetrospectError> {
    let config = match path {
        Some(path) => AnalyticsConfig::from_config(&FileConfigAdapter::from_file(path)?),
        None => AnalyticsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_metrics(
    equity_path: &Path,
    trades_path: Option<&Path>,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), RetrospectError> {
    let config = load_config(config_path)?;
    let mut adapter = CsvHistoryAdapter::new().with_equity(equity_path);
    if let Some(path) = trades_path {
        adapter = adapter.with_trades(path);
    }

    let equity = adapter.load_equity_curve()?;
    let trades = match trades_path {
        Some(_) => adapter.load_trades()?,
        None => Vec::new(),
    };

    let analysis = BacktestAnalysis::compute(&equity, &trades, config.histogram_bins);
    print_summary(&analysis);

    if let Some(path) = output {
        JsonReportAdapter::to_file(path).write(&analysis)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndicatorReport {
    series: Vec<IndicatorSeries>,
}

fn run_indicators(
    bars_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), RetrospectError> {
    let config = load_config(config_path)?;
    let adapter = CsvHistoryAdapter::new().with_bars(bars_path);
    let bars = adapter.load_bars()?;

    let report = IndicatorReport {
        series: vec![
            calculate_sma(&bars, config.sma_period),
            calculate_ema(&bars, config.ema_period),
            calculate_rsi(&bars, config.rsi_period),
            calculate_macd(&bars, config.macd_fast, config.macd_slow, config.macd_signal),
            calculate_bollinger(&bars, config.bollinger_period, config.bollinger_mult_x100),
            calculate_atr(&bars, config.atr_period),
            calculate_stochastic(&bars, config.stochastic_k, config.stochastic_d),
        ],
    };

    for series in &report.series {
        println!("{}: {} points", series.kind, series.len());
    }
    write_json(&report, output)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistributionReport {
    pnl_histogram: Vec<HistogramBin>,
    weekday_hour: WeekdayHourHeatmap,
    month_year: Vec<MonthYearCell>,
}

fn run_distribution(
    trades_path: &Path,
    bins: Option<usize>,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), RetrospectError> {
    let config = load_config(config_path)?;
    let adapter = CsvHistoryAdapter::new().with_trades(trades_path);
    let trades = adapter.load_trades()?;
    let bins = bins.unwrap_or(config.histogram_bins);

    let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
    let report = DistributionReport {
        pnl_histogram: histogram(&pnls, bins),
        weekday_hour: weekday_hour_heatmap(&trades),
        month_year: month_year_heatmap(&trades),
    };

    println!(
        "{} trades over {} bins; {} active months",
        trades.len(),
        report.pnl_histogram.len(),
        report.month_year.len()
    );
    write_json(&report, output)
}

fn run_replay(
    equity_path: &Path,
    speed: Option<f64>,
    config_path: Option<&Path>,
) -> Result<(), RetrospectError> {
    let config = load_config(config_path)?;
    let adapter = CsvHistoryAdapter::new().with_equity(equity_path);
    let equity = adapter.load_equity_curve()?;

    let mut controller = ReplayController::with_config(equity.len(), config.replay);
    if let Some(speed) = speed {
        controller.set_speed(speed);
    }
    controller.play();

    // The CLI loop is the single external driver advancing the cursor.
    while controller.is_playing() {
        std::thread::sleep(controller.tick_interval());
        if controller.tick() {
            let visible = controller.visible(&equity);
            let point = &visible[visible.len() - 1];
            println!(
                "[{:>5.1}%] {} equity {:.2}",
                controller.progress_percent(),
                point.time.format("%Y-%m-%d %H:%M"),
                point.equity
            );
        }
    }

    let analysis = BacktestAnalysis::compute(&equity, &[], config.histogram_bins);
    print_summary(&analysis);
    Ok(())
}

fn write_json<T: Serialize>(report: &T, output: Option<&Path>) -> Result<(), RetrospectError> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn fmt_ratio(ratio: &Ratio) -> String {
    match ratio {
        Ratio::Value(v) => format!("{:.3}", v),
        Ratio::Unbounded => "unbounded".to_string(),
    }
}

fn print_summary(analysis: &BacktestAnalysis) {
    let m = &analysis.metrics;
    println!("total return   {:>10.2}%", m.total_return_percent);
    println!("max drawdown   {:>10.2}%", m.max_drawdown_percent);
    println!("sharpe         {:>10}", fmt_ratio(&m.sharpe));
    println!("sortino        {:>10}", fmt_ratio(&m.sortino));
    println!("calmar         {:>10}", fmt_ratio(&m.calmar));
    println!("profit factor  {:>10}", fmt_ratio(&m.profit_factor));
    println!("expectancy     {:>10.2}", m.expectancy);
    println!("win rate       {:>10.2}%", m.win_rate_percent);
    println!(
        "trades         {:>10} ({} won / {} lost)",
        analysis.completed_trades, m.trades_won, m.trades_lost
    );
}
