use crate::config::Config;
use crate::shared::{build_request, resolve_run_id};
use std::time::Instant;
use tracing::info_span;

/// Builds and checks the request without touching the network.
pub fn validate(config: &Config) -> Result<serde_json::Value, String> {
    let _span = info_span!(
        "validate",
        ticker = %config.request.ticker,
        strategy = %config.request.strategy
    )
    .entered();

    let stage_start = Instant::now();
    let request = build_request(config)?;
    let run_id = resolve_run_id(config, &request)?;
    metrics::histogram!("algosim.validate.build_request_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    tracing::info!(run_id = %run_id, "request is valid");

    Ok(serde_json::json!({
        "run_id": run_id,
        "base_url": config.service.resolve_base_url(),
        "timeout_ms": config.service.timeout_ms,
        "request": request,
    }))
}
