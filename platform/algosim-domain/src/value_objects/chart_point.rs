use crate::value_objects::trade_action::TradeAction;
use serde::{Deserialize, Serialize};

/// One row of the merged chart series.
///
/// `price` is reconstructed from benchmark equity and stays at `0.0` when no
/// benchmark sample exists for the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub equity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<f64>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_marker: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_marker: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<TradeAction>,
}

impl ChartPoint {
    pub fn seeded(date: impl Into<String>, equity: f64) -> Self {
        Self {
            date: date.into(),
            equity,
            benchmark: None,
            price: 0.0,
            buy_marker: None,
            sell_marker: None,
            action: None,
        }
    }
}
