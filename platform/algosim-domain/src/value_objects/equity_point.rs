use serde::{Deserialize, Serialize};

/// One sample of an equity curve as returned by the backtest service.
///
/// `date` is kept as the raw string the service sent: it is the merge key
/// used by the reconciler, so it must not be normalized on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: String,
    pub equity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
}

impl EquityPoint {
    pub fn new(date: impl Into<String>, equity: f64) -> Self {
        Self {
            date: date.into(),
            equity,
            cash: None,
        }
    }
}
