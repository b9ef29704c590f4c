use algosim_domain::entities::backtest_request::BacktestRequest;
use algosim_domain::entities::backtest_result::BacktestResult;
use algosim_domain::repositories::backtest_service::{
    BacktestService, SubmitError, SERVER_ERROR_MESSAGE,
};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct CallInfo {
    pub attempts: u32,
    pub duration_ms: u64,
    pub status: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BacktestCallResult {
    pub info: CallInfo,
    pub outcome: Result<BacktestResult, SubmitError>,
}

/// Blocking client for `POST {base_url}/backtest`. Failures are reported once
/// and never retried.
pub struct HttpBacktestService {
    pub base_url: String,
    pub timeout_ms: u64,
    client: Client,
}

impl HttpBacktestService {
    pub fn new(base_url: String, timeout_ms: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms,
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/backtest", self.base_url.trim_end_matches('/'))
    }

    pub fn submit_detailed(&self, request: &BacktestRequest) -> BacktestCallResult {
        let endpoint = self.endpoint();
        let span = tracing::info_span!(
            "infra.backtest_service.submit",
            base_url = %self.base_url,
            endpoint = %endpoint,
            timeout_ms = self.timeout_ms,
            ticker = %request.ticker,
            strategy = %request.strategy
        );
        let _enter = span.enter();

        let start = Instant::now();
        metrics::counter!("algosim.infra.backtest_service.requests_total").increment(1);

        let (status, outcome, error_kind) = match self.client.post(&endpoint).json(request).send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    match resp.json::<BacktestResult>() {
                        Ok(parsed) => (Some(status.as_u16()), Ok(parsed), None),
                        Err(err) => (
                            Some(status.as_u16()),
                            Err(SubmitError::Server {
                                status: Some(status.as_u16()),
                                message: format!("failed to parse backtest response: {err}"),
                            }),
                            Some("decode"),
                        ),
                    }
                } else {
                    let body = resp.text().unwrap_or_default();
                    (
                        Some(status.as_u16()),
                        Err(SubmitError::Server {
                            status: Some(status.as_u16()),
                            message: server_error_message(&body),
                        }),
                        Some("http_status"),
                    )
                }
            }
            Err(err) => (None, Err(SubmitError::Network(err.to_string())), Some("transport")),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let status_label = status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        let result_label = if outcome.is_ok() { "ok" } else { "err" };
        metrics::counter!(
            "algosim.infra.backtest_service.calls_total",
            "result" => result_label,
            "status" => status_label.clone()
        )
        .increment(1);
        metrics::histogram!(
            "algosim.infra.backtest_service.call_ms",
            "result" => result_label,
            "status" => status_label.clone()
        )
        .record(duration_ms as f64);

        let error = match (&outcome, error_kind) {
            (Err(err), Some(kind)) => {
                metrics::counter!(
                    "algosim.infra.backtest_service.errors_total",
                    "kind" => kind,
                    "status" => status_label
                )
                .increment(1);
                tracing::warn!(status = ?status, kind, error = %err, "backtest request failed");
                Some(err.to_string())
            }
            _ => {
                tracing::info!(status = ?status, duration_ms, "backtest request succeeded");
                None
            }
        };

        BacktestCallResult {
            info: CallInfo {
                attempts: 1,
                duration_ms,
                status,
                error,
            },
            outcome,
        }
    }
}

/// Reads `detail` from an error body: either a string, or a list of
/// validation entries carrying `msg`.
fn server_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return SERVER_ERROR_MESSAGE.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() {
                SERVER_ERROR_MESSAGE.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => SERVER_ERROR_MESSAGE.to_string(),
    }
}

impl BacktestService for HttpBacktestService {
    fn submit(&self, request: &BacktestRequest) -> Result<BacktestResult, SubmitError> {
        self.submit_detailed(request).outcome
    }
}
