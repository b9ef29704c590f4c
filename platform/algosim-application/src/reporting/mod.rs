use crate::backtesting::write_chart_artifacts;
use crate::config::load_config_from_str;
use crate::shared::run_meta;
use algosim_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
use algosim_domain::services::series_reconciler::ChartStats;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info_span;

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReportResult {
    pub input_dir: PathBuf,
    pub run_id: String,
    pub chart: ChartStats,
    pub wrote_html: bool,
}

/// Rebuilds the chart artifacts of an existing run from its `response.json`.
pub fn generate_report(
    input_dir: &Path,
    reader: &dyn ArtifactReader,
    writer: &dyn ArtifactWriter,
) -> Result<GenerateReportResult, String> {
    let _span = info_span!("generate_report", input_dir = %input_dir.display()).entered();

    let stage_start = Instant::now();
    let response_path = input_dir.join("response.json");
    if !reader.exists(&response_path) {
        return Err(format!("missing response.json in {}", input_dir.display()));
    }
    let result = reader.read_response_json(&response_path)?;
    metrics::histogram!("algosim.report.load_ms").record(stage_start.elapsed().as_millis() as f64);

    let request = reader.read_request_json(input_dir.join("request.json").as_path())?;
    let config = reader
        .read_config_snapshot_toml(input_dir.join("config_snapshot.toml").as_path())?
        .and_then(|raw| match load_config_from_str(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable config snapshot");
                None
            }
        });

    let run_id = config
        .as_ref()
        .and_then(|c| c.request.run_id.clone())
        .or_else(|| {
            input_dir
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string());
    let meta = request.as_ref().map(|r| run_meta(&run_id, r));
    let wrote_html = config
        .as_ref()
        .map(|c| c.output.html_enabled())
        .unwrap_or(true);

    let chart = write_chart_artifacts(input_dir, &result, meta.as_ref(), wrote_html, writer)?;
    tracing::info!(run_id = %run_id, points = chart.points, "report regenerated");

    Ok(GenerateReportResult {
        input_dir: input_dir.to_path_buf(),
        run_id,
        chart,
        wrote_html,
    })
}
