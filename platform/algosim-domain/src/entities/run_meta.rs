use serde::{Deserialize, Serialize};

/// Identifies a run in artifact headers and the dashboard title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub ticker: String,
    pub strategy: String,
    pub start_date: String,
    pub end_date: String,
    pub initial_capital: f64,
}
