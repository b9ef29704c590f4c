use crate::config::Config;
use algosim_domain::entities::backtest_request::{BacktestRequest, BacktestRequestDraft};
use algosim_domain::entities::run_meta::RunMeta;
use sha2::{Digest, Sha256};

pub fn draft_from_config(config: &Config) -> BacktestRequestDraft {
    BacktestRequestDraft {
        ticker: config.request.ticker.clone(),
        start_date: config.request.start_date.clone(),
        end_date: config.request.end_date.clone(),
        initial_capital: config.request.initial_capital,
        strategy: config.request.strategy.clone(),
        parameters: config.parameters.clone().unwrap_or_default(),
    }
}

pub fn build_request(config: &Config) -> Result<BacktestRequest, String> {
    BacktestRequest::build(&draft_from_config(config))
        .map_err(|err| format!("validation failed: {err}"))
}

/// Configured run id, else `<ticker>_<strategy>_<request hash>`.
///
/// The id becomes a single directory under `out_dir`, so a configured id
/// containing path separators or `..` is rejected.
pub fn resolve_run_id(config: &Config, request: &BacktestRequest) -> Result<String, String> {
    if let Some(run_id) = config
        .request
        .run_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        if run_id.contains(['/', '\\']) || run_id.contains("..") || run_id == "." {
            return Err(format!(
                "validation failed: invalid run_id '{run_id}' (must be a single directory name)"
            ));
        }
        return Ok(run_id.to_string());
    }
    let hash = request_hash(request)?;
    Ok(format!(
        "{}_{}_{}",
        request.ticker.to_lowercase(),
        request.strategy,
        hash
    ))
}

pub fn request_hash(request: &BacktestRequest) -> Result<String, String> {
    let canonical = serde_json::to_string(request)
        .map_err(|err| format!("failed to serialize request: {err}"))?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let bytes = hasher.finalize();
    Ok(to_hex_short(&bytes[..], 12))
}

fn to_hex_short(bytes: &[u8], chars: usize) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(chars);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        if out.len() >= chars {
            break;
        }
        out.push(HEX[(b & 0x0f) as usize] as char);
        if out.len() >= chars {
            break;
        }
    }
    out
}

pub fn run_meta(run_id: &str, request: &BacktestRequest) -> RunMeta {
    RunMeta {
        run_id: run_id.to_string(),
        ticker: request.ticker.clone(),
        strategy: request.strategy.clone(),
        start_date: request.start_date.to_string(),
        end_date: request.end_date.to_string(),
        initial_capital: request.initial_capital,
    }
}
