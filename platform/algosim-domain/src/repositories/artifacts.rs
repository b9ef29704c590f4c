use crate::entities::backtest_request::BacktestRequest;
use crate::entities::backtest_result::BacktestResult;
use crate::entities::run_meta::RunMeta;
use crate::value_objects::chart_point::ChartPoint;
use std::path::Path;

pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_response_json(&self, path: &Path, result: &BacktestResult) -> Result<(), String>;
    fn write_request_json(&self, path: &Path, request: &BacktestRequest) -> Result<(), String>;
    fn write_chart_json(&self, path: &Path, points: &[ChartPoint]) -> Result<(), String>;
    fn write_chart_csv(&self, path: &Path, points: &[ChartPoint]) -> Result<(), String>;
    fn write_dashboard_html(
        &self,
        path: &Path,
        meta: Option<&RunMeta>,
        metrics: &serde_json::Value,
        points: &[ChartPoint],
    ) -> Result<(), String>;
    fn write_config_snapshot_toml(&self, path: &Path, contents: &str) -> Result<(), String>;
}

pub trait ArtifactReader {
    fn read_response_json(&self, path: &Path) -> Result<BacktestResult, String>;
    fn read_request_json(&self, path: &Path) -> Result<Option<BacktestRequest>, String>;
    fn read_config_snapshot_toml(&self, path: &Path) -> Result<Option<String>, String>;
    fn exists(&self, path: &Path) -> bool;
}
