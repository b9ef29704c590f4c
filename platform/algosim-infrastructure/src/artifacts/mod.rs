use crate::reporting;
use algosim_domain::entities::backtest_request::BacktestRequest;
use algosim_domain::entities::backtest_result::BacktestResult;
use algosim_domain::entities::run_meta::RunMeta;
use algosim_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
use algosim_domain::value_objects::chart_point::ChartPoint;
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

fn record_write_metrics(kind: &'static str, start: Instant, result: &Result<(), String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "algosim.infra.artifacts.write.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("algosim.infra.artifacts.write_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

fn record_read_metrics<T>(kind: &'static str, start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "algosim.infra.artifacts.read.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("algosim.infra.artifacts.read_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

impl ArtifactWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err));
        record_write_metrics("ensure_dir", start, &result);
        result
    }

    fn write_response_json(&self, path: &Path, result: &BacktestResult) -> Result<(), String> {
        let start = Instant::now();
        let outcome = reporting::write_json_pretty(path, result, "response json");
        record_write_metrics("response_json", start, &outcome);
        outcome
    }

    fn write_request_json(&self, path: &Path, request: &BacktestRequest) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_json_pretty(path, request, "request json");
        record_write_metrics("request_json", start, &result);
        result
    }

    fn write_chart_json(&self, path: &Path, points: &[ChartPoint]) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_json_pretty(path, points, "chart json");
        record_write_metrics("chart_json", start, &result);
        result
    }

    fn write_chart_csv(&self, path: &Path, points: &[ChartPoint]) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_chart_csv(path, points);
        record_write_metrics("chart_csv", start, &result);
        result
    }

    fn write_dashboard_html(
        &self,
        path: &Path,
        meta: Option<&RunMeta>,
        metrics: &serde_json::Value,
        points: &[ChartPoint],
    ) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_dashboard_html(path, meta, metrics, points);
        record_write_metrics("dashboard_html", start, &result);
        result
    }

    fn write_config_snapshot_toml(&self, path: &Path, contents: &str) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::write(path, contents).map_err(|err| {
            format!(
                "failed to write config snapshot {}: {}",
                path.display(),
                err
            )
        });
        record_write_metrics("config_snapshot_toml", start, &result);
        result
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactReader;

impl FilesystemArtifactReader {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactReader for FilesystemArtifactReader {
    fn read_response_json(&self, path: &Path) -> Result<BacktestResult, String> {
        let start = Instant::now();
        let result = reporting::read_response_json(path);
        record_read_metrics("response_json", start, &result);
        result
    }

    fn read_request_json(&self, path: &Path) -> Result<Option<BacktestRequest>, String> {
        let start = Instant::now();
        if !path.exists() {
            record_read_metrics(
                "request_json",
                start,
                &Ok::<Option<BacktestRequest>, String>(None),
            );
            return Ok(None);
        }
        let result = fs::read_to_string(path)
            .map_err(|err| format!("failed to read request {}: {}", path.display(), err))
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|err| format!("failed to parse request {}: {}", path.display(), err))
            });
        record_read_metrics("request_json", start, &result);
        result
    }

    fn read_config_snapshot_toml(&self, path: &Path) -> Result<Option<String>, String> {
        let start = Instant::now();
        if !path.exists() {
            record_read_metrics(
                "config_snapshot_toml",
                start,
                &Ok::<Option<String>, String>(None),
            );
            return Ok(None);
        }
        let result = fs::read_to_string(path)
            .map(Some)
            .map_err(|err| format!("failed to read config snapshot {}: {}", path.display(), err));
        record_read_metrics("config_snapshot_toml", start, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::{FilesystemArtifactReader, FilesystemArtifactWriter};
    use algosim_domain::entities::backtest_request::{BacktestRequest, BacktestRequestDraft};
    use algosim_domain::entities::backtest_result::BacktestResult;
    use algosim_domain::repositories::artifacts::{ArtifactReader, ArtifactWriter};
    use algosim_domain::value_objects::equity_point::EquityPoint;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_tmp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("algosim_{prefix}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn writer_and_reader_share_layout() {
        let dir = unique_tmp_dir("artifacts").join("nested");
        let writer = FilesystemArtifactWriter::new();
        let reader = FilesystemArtifactReader::new();
        writer.ensure_dir(&dir).expect("ensure dir");

        let request = BacktestRequest::build(&BacktestRequestDraft {
            ticker: "spy".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2020-06-01".to_string(),
            initial_capital: 1000.0,
            strategy: "momentum".to_string(),
            ..BacktestRequestDraft::default()
        })
        .expect("request");
        let result = BacktestResult {
            equity_curve: vec![EquityPoint::new("2020-01-01", 1000.0)],
            ..BacktestResult::default()
        };

        let request_path = dir.join("request.json");
        let response_path = dir.join("response.json");
        let snapshot_path = dir.join("config_snapshot.toml");

        assert_eq!(reader.read_request_json(&request_path).expect("read"), None);
        assert_eq!(
            reader.read_config_snapshot_toml(&snapshot_path).expect("read"),
            None
        );

        writer
            .write_request_json(&request_path, &request)
            .expect("request");
        writer
            .write_response_json(&response_path, &result)
            .expect("response");
        writer
            .write_config_snapshot_toml(&snapshot_path, "[service]\n")
            .expect("snapshot");

        assert!(reader.exists(&response_path));
        assert_eq!(
            reader.read_request_json(&request_path).expect("read"),
            Some(request)
        );
        assert_eq!(
            reader
                .read_response_json(&response_path)
                .expect("read")
                .equity_curve
                .len(),
            1
        );
        assert_eq!(
            reader
                .read_config_snapshot_toml(&snapshot_path)
                .expect("read")
                .as_deref(),
            Some("[service]\n")
        );
    }

    #[test]
    fn unreadable_response_reports_path() {
        let dir = unique_tmp_dir("artifacts_bad");
        std::fs::create_dir_all(&dir).expect("dir");
        let path = dir.join("response.json");
        std::fs::write(&path, "{not json").expect("write");

        let err = FilesystemArtifactReader::new()
            .read_response_json(&path)
            .expect_err("invalid json");
        assert!(err.contains("response.json"));
    }
}
