use crate::config::{to_toml_pretty, Config};
use crate::shared::{build_request, resolve_run_id, run_meta};
use algosim_domain::entities::backtest_result::BacktestResult;
use algosim_domain::repositories::artifacts::ArtifactWriter;
use algosim_domain::repositories::backtest_service::{BacktestService, SubmitError};
use algosim_domain::services::series_reconciler::{reconcile, ChartStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info_span;

#[derive(Debug, Clone, Serialize)]
pub struct BacktestRunResult {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub chart: ChartStats,
    pub trades: usize,
    pub wrote_html: bool,
}

pub fn run_backtest(
    config: &Config,
    config_toml: &str,
    out: Option<PathBuf>,
    service: &dyn BacktestService,
    artifacts: &dyn ArtifactWriter,
) -> Result<BacktestRunResult, String> {
    let request = build_request(config)?;
    let run_id = resolve_run_id(config, &request)?;
    let _span = info_span!(
        "run_backtest",
        run_id = %run_id,
        ticker = %request.ticker,
        strategy = %request.strategy
    )
    .entered();

    let stage_start = Instant::now();
    let result = service.submit(&request).map_err(describe_submit_error)?;
    metrics::histogram!("algosim.backtest.submit_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    tracing::info!(
        equity_points = result.equity_curve.len(),
        trades = result.trades.len(),
        has_benchmark = result.benchmark.is_some(),
        "backtest response received"
    );

    let base_dir = out.unwrap_or_else(|| PathBuf::from(&config.output.out_dir));
    let run_dir = base_dir.join(&run_id);
    artifacts.ensure_dir(&run_dir)?;

    artifacts.write_request_json(run_dir.join("request.json").as_path(), &request)?;
    artifacts.write_response_json(run_dir.join("response.json").as_path(), &result)?;
    // Configs built in code have no source text; snapshot the parsed form.
    let snapshot = if config_toml.trim().is_empty() {
        to_toml_pretty(config)?
    } else {
        config_toml.to_string()
    };
    artifacts.write_config_snapshot_toml(
        run_dir.join("config_snapshot.toml").as_path(),
        &snapshot,
    )?;

    let meta = run_meta(&run_id, &request);
    let wrote_html = config.output.html_enabled();
    let chart = write_chart_artifacts(&run_dir, &result, Some(&meta), wrote_html, artifacts)?;

    Ok(BacktestRunResult {
        run_id,
        run_dir,
        chart,
        trades: result.trades.len(),
        wrote_html,
    })
}

/// Reconciles the result and writes `chart.json`, `chart.csv` and, when
/// asked, `dashboard.html` into `run_dir`.
pub(crate) fn write_chart_artifacts(
    run_dir: &Path,
    result: &BacktestResult,
    meta: Option<&algosim_domain::entities::run_meta::RunMeta>,
    html: bool,
    artifacts: &dyn ArtifactWriter,
) -> Result<ChartStats, String> {
    let stage_start = Instant::now();
    let points = reconcile(result);
    metrics::histogram!("algosim.backtest.reconcile_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("algosim.backtest.chart_points").set(points.len() as f64);

    let stats = ChartStats::from_points(&points);
    tracing::debug!(
        points = stats.points,
        benchmark_points = stats.benchmark_points,
        buy_markers = stats.buy_markers,
        sell_markers = stats.sell_markers,
        "series reconciled"
    );

    artifacts.write_chart_json(run_dir.join("chart.json").as_path(), &points)?;
    artifacts.write_chart_csv(run_dir.join("chart.csv").as_path(), &points)?;
    if html {
        artifacts.write_dashboard_html(
            run_dir.join("dashboard.html").as_path(),
            meta,
            &result.metrics,
            &points,
        )?;
    }
    Ok(stats)
}

fn describe_submit_error(err: SubmitError) -> String {
    metrics::counter!(
        "algosim.backtest.submit_errors_total",
        "kind" => match &err {
            SubmitError::Network(_) => "network",
            SubmitError::Server { .. } => "server",
        }
    )
    .increment(1);
    format!("backtest service failed: {err}")
}
