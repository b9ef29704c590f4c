use serde::{Deserialize, Serialize};

/// A closed round trip reported by the backtest service.
///
/// Only `entry_date` and `exit_date` drive chart annotations; the remaining
/// fields are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: String,
    pub exit_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl_net: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Trade {
    pub fn round_trip(entry_date: impl Into<String>, exit_date: impl Into<String>) -> Self {
        Self {
            entry_date: entry_date.into(),
            exit_date: exit_date.into(),
            ..Self::default()
        }
    }
}
