use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::trade::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default)]
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

/// Response body of the backtest service.
///
/// `metrics` is opaque: it is stored, formatted for display and written back
/// out, but never recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default)]
    pub metrics: serde_json::Value,
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default)]
    pub benchmark: Option<BenchmarkResult>,
    #[serde(default)]
    pub trades: Vec<Trade>,
}
