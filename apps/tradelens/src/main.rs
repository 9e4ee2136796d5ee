mod commands;
mod infra;
mod obs;
mod output;

use clap::{Parser, Subcommand};
use commands::Command;
use output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradelens")]
#[command(about = "Read-only queries over stored Binance aggTrade data.", version)]
#[command(arg_required_else_help = true)]
#[command(
    after_help = "Examples:\n  tradelens symbols\n  tradelens history BTCUSDT --period 1h --limit 20\n  tradelens ohlcv BTCUSDT --interval 5m\n  tradelens profile ETHUSDT --bins 50\n  tradelens stats --period 24h\n  tradelens watch BTCUSDT ETHUSDT --interval-secs 2\n"
)]
struct Cli {
    /// Config file path (TOML). Defaults apply when omitted.
    #[arg(long, env = "TRADELENS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Expose Prometheus metrics on host:port; bare flag uses 127.0.0.1:9184
    /// (requires feature `prometheus`).
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = obs::DEFAULT_METRICS_ADDR)]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List all symbols known to the store.
    Symbols,
    /// Show the most recent trade for a symbol.
    Latest { symbol: String },
    /// List trades inside the lookback window.
    History {
        symbol: String,
        /// Lookback window, e.g. 90m, 1h, 24h, 7d (default: query.lookback_hours).
        #[arg(long)]
        period: Option<String>,
        /// Only print the most recent N trades.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Resample trades into OHLCV bars.
    Ohlcv {
        symbol: String,
        /// Bar width, e.g. 30s, 1min, 5m, 1h (default: query.interval).
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        period: Option<String>,
    },
    /// Volume by price over quantile bins.
    Profile {
        symbol: String,
        /// Number of quantile bins (default: query.price_bins).
        #[arg(long)]
        bins: Option<usize>,
        #[arg(long)]
        period: Option<String>,
    },
    /// Per-symbol summary over the lookback window (all symbols when none given).
    Stats {
        symbols: Vec<String>,
        #[arg(long)]
        period: Option<String>,
    },
    /// Poll latest trades and print price changes.
    Watch {
        symbols: Vec<String>,
        #[arg(long, default_value_t = 1)]
        interval_secs: u64,
        /// Stop after N polls (default: run until interrupted).
        #[arg(long)]
        iterations: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = match cli.command {
        CliCommand::Symbols => Command::Symbols,
        CliCommand::Latest { symbol } => Command::Latest { symbol },
        CliCommand::History {
            symbol,
            period,
            limit,
        } => Command::History {
            symbol,
            period,
            limit,
        },
        CliCommand::Ohlcv {
            symbol,
            interval,
            period,
        } => Command::Ohlcv {
            symbol,
            interval,
            period,
        },
        CliCommand::Profile {
            symbol,
            bins,
            period,
        } => Command::Profile {
            symbol,
            bins,
            period,
        },
        CliCommand::Stats { symbols, period } => Command::Stats { symbols, period },
        CliCommand::Watch {
            symbols,
            interval_secs,
            iterations,
        } => Command::Watch {
            symbols,
            interval_secs,
            iterations,
        },
    };
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Table
    };

    if let Err(err) = run(cli.config, cli.metrics_addr, command, mode) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(
    config_path: Option<PathBuf>,
    metrics_addr: Option<String>,
    command: Command,
    mode: OutputMode,
) -> Result<(), String> {
    let config = commands::load_or_default(config_path.as_deref())?;
    obs::init_tracing(&config.log)?;
    obs::init_metrics(metrics_addr.as_deref())?;
    let client = infra::build_client(&config)?;
    commands::run(command, &client, &config, mode)
}
