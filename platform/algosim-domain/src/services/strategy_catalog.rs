use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
}

impl ParamDefinition {
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamDefinition],
}

impl StrategyDefinition {
    pub fn param(&self, name: &str) -> Option<&'static ParamDefinition> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn defaults(&self) -> BTreeMap<String, f64> {
        self.params
            .iter()
            .map(|p| (p.name.to_string(), p.default))
            .collect()
    }
}

/// Strategies the backtest service understands, with their tunable inputs.
pub static STRATEGIES: &[StrategyDefinition] = &[
    StrategyDefinition {
        id: "ma_crossover",
        name: "Moving Average Crossover",
        description: "Buy when Short MA crosses above Long MA.",
        params: &[
            ParamDefinition {
                name: "short_window",
                label: "Short Window",
                default: 20.0,
                min: Some(1.0),
                max: None,
                step: 1.0,
            },
            ParamDefinition {
                name: "long_window",
                label: "Long Window",
                default: 50.0,
                min: Some(1.0),
                max: None,
                step: 1.0,
            },
        ],
    },
    StrategyDefinition {
        id: "rsi_mean_reversion",
        name: "RSI Mean Reversion",
        description: "Buy when RSI < Lower, Sell when RSI > Upper.",
        params: &[
            ParamDefinition {
                name: "rsi_period",
                label: "RSI Period",
                default: 14.0,
                min: Some(2.0),
                max: None,
                step: 1.0,
            },
            ParamDefinition {
                name: "lower_threshold",
                label: "Lower Threshold",
                default: 30.0,
                min: Some(0.0),
                max: Some(100.0),
                step: 1.0,
            },
            ParamDefinition {
                name: "upper_threshold",
                label: "Upper Threshold",
                default: 70.0,
                min: Some(0.0),
                max: Some(100.0),
                step: 1.0,
            },
        ],
    },
    StrategyDefinition {
        id: "momentum",
        name: "Momentum Strategy",
        description: "Trend following based on recent returns.",
        params: &[
            ParamDefinition {
                name: "momentum_period",
                label: "Momentum Period",
                default: 10.0,
                min: Some(1.0),
                max: None,
                step: 1.0,
            },
            ParamDefinition {
                name: "threshold",
                label: "Signal Threshold",
                default: 0.0,
                min: None,
                max: None,
                step: 0.001,
            },
        ],
    },
];

pub fn find_strategy(id: &str) -> Option<&'static StrategyDefinition> {
    STRATEGIES.iter().find(|s| s.id == id)
}

/// Default parameter set for a strategy; empty when the id is unknown.
pub fn strategy_defaults(id: &str) -> BTreeMap<String, f64> {
    find_strategy(id)
        .map(StrategyDefinition::defaults)
        .unwrap_or_default()
}

pub fn strategy_ids() -> Vec<&'static str> {
    STRATEGIES.iter().map(|s| s.id).collect()
}
