use crate::services::strategy_catalog::{find_strategy, strategy_ids};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated request inputs, as typed by the user or read from config.
#[derive(Debug, Clone, Default)]
pub struct BacktestRequestDraft {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub initial_capital: f64,
    pub strategy: String,
    /// Overrides applied on top of the strategy defaults.
    pub parameters: BTreeMap<String, f64>,
}

/// Body of `POST /backtest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub strategy: String,
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(&'static str),
    InvalidTicker(String),
    InvalidDate {
        field: &'static str,
        value: String,
    },
    DateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    InvalidCapital(f64),
    UnknownStrategy {
        id: String,
        available: Vec<String>,
    },
    UnknownParameter {
        strategy: String,
        name: String,
    },
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(field) => {
                write!(f, "missing required field: {field}")
            }
            ValidationError::InvalidTicker(value) => write!(
                f,
                "invalid ticker '{value}' (allowed: letters, digits, '.', '_', '^', '=', '-')"
            ),
            ValidationError::InvalidDate { field, value } => {
                write!(f, "invalid {field}: {value} (expected YYYY-MM-DD)")
            }
            ValidationError::DateRange { start, end } => {
                write!(f, "end_date ({end}) must be after start_date ({start})")
            }
            ValidationError::InvalidCapital(value) => {
                write!(f, "initial_capital must be finite and > 0 (got {value})")
            }
            ValidationError::UnknownStrategy { id, available } => write!(
                f,
                "strategy '{id}' not found. Available: {}",
                available.join(", ")
            ),
            ValidationError::UnknownParameter { strategy, name } => {
                write!(f, "unknown parameter '{name}' for strategy {strategy}")
            }
            ValidationError::ParameterOutOfRange {
                name,
                value,
                min,
                max,
            } => {
                let min = min.map(|v| v.to_string()).unwrap_or_else(|| "-inf".to_string());
                let max = max.map(|v| v.to_string()).unwrap_or_else(|| "inf".to_string());
                write!(f, "parameter {name}={value} outside [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl BacktestRequest {
    pub fn build(draft: &BacktestRequestDraft) -> Result<Self, ValidationError> {
        let ticker = draft.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::MissingField("ticker"));
        }
        if !ticker.chars().all(is_ticker_char) {
            return Err(ValidationError::InvalidTicker(ticker));
        }

        let start_date = parse_date("start_date", &draft.start_date)?;
        let end_date = parse_date("end_date", &draft.end_date)?;
        if end_date <= start_date {
            return Err(ValidationError::DateRange {
                start: start_date,
                end: end_date,
            });
        }

        if !draft.initial_capital.is_finite() || draft.initial_capital <= 0.0 {
            return Err(ValidationError::InvalidCapital(draft.initial_capital));
        }

        let strategy_id = draft.strategy.trim();
        if strategy_id.is_empty() {
            return Err(ValidationError::MissingField("strategy"));
        }
        let strategy = find_strategy(strategy_id).ok_or_else(|| ValidationError::UnknownStrategy {
            id: strategy_id.to_string(),
            available: strategy_ids().into_iter().map(str::to_string).collect(),
        })?;

        let mut parameters = strategy.defaults();
        for (name, value) in &draft.parameters {
            let param = strategy
                .param(name)
                .ok_or_else(|| ValidationError::UnknownParameter {
                    strategy: strategy.id.to_string(),
                    name: name.clone(),
                })?;
            if !param.accepts(*value) {
                return Err(ValidationError::ParameterOutOfRange {
                    name: name.clone(),
                    value: *value,
                    min: param.min,
                    max: param.max,
                });
            }
            parameters.insert(name.clone(), *value);
        }

        Ok(Self {
            ticker,
            start_date,
            end_date,
            initial_capital: draft.initial_capital,
            strategy: strategy.id.to_string(),
            parameters,
        })
    }
}

/// Tickers end up in run directory names, so separators are never allowed.
fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '^' | '=' | '-')
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: trimmed.to_string(),
    })
}
