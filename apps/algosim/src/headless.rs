use algosim_application::config::{load_config, load_config_with_source, Config};
use algosim_domain::services::strategy_catalog::STRATEGIES;
use algosim_infrastructure::artifacts::{FilesystemArtifactReader, FilesystemArtifactWriter};
use algosim_infrastructure::backtest_service::HttpBacktestService;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessMode {
    Validate,
    Backtest,
    Report,
    Strategies,
}

impl HeadlessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadlessMode::Validate => "validate",
            HeadlessMode::Backtest => "backtest",
            HeadlessMode::Report => "report",
            HeadlessMode::Strategies => "strategies",
        }
    }
}

pub struct HeadlessArgs {
    pub mode: HeadlessMode,
    pub config_path: Option<PathBuf>,
    pub run_dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

pub fn run_headless(args: HeadlessArgs) -> Result<serde_json::Value, String> {
    metrics::counter!("algosim.headless.runs_total", "mode" => args.mode.as_str()).increment(1);
    match args.mode {
        HeadlessMode::Strategies => Ok(run_strategies()),
        HeadlessMode::Report => {
            let run_dir = args
                .run_dir
                .as_deref()
                .ok_or_else(|| "--run-dir is required for report mode".to_string())?;
            run_report(run_dir)
        }
        mode => {
            let config_path = args
                .config_path
                .as_deref()
                .ok_or_else(|| "--config is required for this mode".to_string())?;
            match mode {
                HeadlessMode::Validate => run_validate(&load_config(config_path)?),
                _ => {
                    let (config, config_toml) = load_config_with_source(config_path)?;
                    run_backtest(&config, &config_toml, args.out)
                }
            }
        }
    }
}

/// Exit status for a failed run: 2 for invalid input, 3 when the backtest
/// service could not produce a result, 1 otherwise.
///
/// Only the prefix counts: service details may quote arbitrary server text.
pub fn exit_code_for(err: &str) -> i32 {
    if err.starts_with("backtest service failed") {
        3
    } else if err.starts_with("validation failed") {
        2
    } else {
        1
    }
}

fn artifacts_for_run(run_dir: &Path, html: bool) -> serde_json::Value {
    serde_json::json!({
        "run_dir": run_dir.display().to_string(),
        "request_json": run_dir.join("request.json").display().to_string(),
        "response_json": run_dir.join("response.json").display().to_string(),
        "chart_json": run_dir.join("chart.json").display().to_string(),
        "chart_csv": run_dir.join("chart.csv").display().to_string(),
        "config_snapshot_toml": run_dir.join("config_snapshot.toml").display().to_string(),
        "dashboard_html": html.then(|| run_dir.join("dashboard.html").display().to_string()),
    })
}

fn run_strategies() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "mode": "strategies",
        "strategies": STRATEGIES,
    })
}

fn run_validate(config: &Config) -> Result<serde_json::Value, String> {
    let report = algosim_application::validation::validate(config)?;
    Ok(serde_json::json!({
        "status": "ok",
        "mode": "validate",
        "out_dir": config.output.out_dir,
        "report": report,
    }))
}

fn run_backtest(
    config: &Config,
    config_toml: &str,
    out: Option<PathBuf>,
) -> Result<serde_json::Value, String> {
    let base_url = config.service.resolve_base_url();
    let service = HttpBacktestService::new(base_url.clone(), config.service.timeout_ms)
        .map_err(|err| format!("failed to init backtest service client (url={base_url}): {err}"))?;
    let artifacts = FilesystemArtifactWriter::new();

    let run = algosim_application::backtesting::run_backtest(
        config,
        config_toml,
        out,
        &service,
        &artifacts,
    )?;
    Ok(serde_json::json!({
        "status": "ok",
        "mode": "backtest",
        "run_id": run.run_id,
        "base_url": base_url,
        "chart": run.chart,
        "trades": run.trades,
        "artifacts": artifacts_for_run(&run.run_dir, run.wrote_html),
    }))
}

fn run_report(run_dir: &Path) -> Result<serde_json::Value, String> {
    let reader = FilesystemArtifactReader::new();
    let writer = FilesystemArtifactWriter::new();
    let report = algosim_application::reporting::generate_report(run_dir, &reader, &writer)?;
    Ok(serde_json::json!({
        "status": "ok",
        "mode": "report",
        "run_id": report.run_id,
        "chart": report.chart,
        "artifacts": artifacts_for_run(&report.input_dir, report.wrote_html),
    }))
}
