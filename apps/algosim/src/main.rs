use algosim::headless::{exit_code_for, run_headless, HeadlessArgs, HeadlessMode};
use algosim::obs::{init_metrics, init_tracing};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "algosim")]
#[command(about = "Submit strategy backtests and render the results dashboard.", version)]
struct Cli {
    /// validate | backtest | report | strategies
    #[arg(long)]
    mode: Mode,

    /// Config file path (TOML). If omitted, uses env ALGOSIM_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Existing run directory to regenerate (report mode only).
    #[arg(long)]
    run_dir: Option<PathBuf>,

    /// Override `output.out_dir` (backtest mode only).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Validate,
    Backtest,
    Report,
    Strategies,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let log_format = match cli.log_format {
        LogFormat::Text => "text",
        LogFormat::Json => "json",
    };
    if let Err(err) = init_tracing(log_format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let mode = match cli.mode {
        Mode::Validate => HeadlessMode::Validate,
        Mode::Backtest => HeadlessMode::Backtest,
        Mode::Report => HeadlessMode::Report,
        Mode::Strategies => HeadlessMode::Strategies,
    };

    let config_path = cli.config.or_else(|| {
        std::env::var("ALGOSIM_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });

    let result = run_headless(HeadlessArgs {
        mode,
        config_path,
        run_dir: cli.run_dir,
        out: cli.out,
    });

    match result {
        Ok(json) => {
            println!(
                "{}",
                serde_json::to_string(&json)
                    .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
            );
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(exit_code_for(&err));
        }
    }
}
