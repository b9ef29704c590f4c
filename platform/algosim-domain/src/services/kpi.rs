use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiFormat {
    Percent,
    Currency,
    Decimal,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub format: KpiFormat,
}

pub static KPI_GRID: &[KpiDefinition] = &[
    KpiDefinition {
        key: "total_return",
        label: "Total Return",
        format: KpiFormat::Percent,
    },
    KpiDefinition {
        key: "cagr",
        label: "CAGR",
        format: KpiFormat::Percent,
    },
    KpiDefinition {
        key: "sharpe_ratio",
        label: "Sharpe Ratio",
        format: KpiFormat::Decimal,
    },
    KpiDefinition {
        key: "volatility",
        label: "Volatility",
        format: KpiFormat::Percent,
    },
    KpiDefinition {
        key: "max_drawdown",
        label: "Max Drawdown",
        format: KpiFormat::Percent,
    },
    KpiDefinition {
        key: "win_rate",
        label: "Win Rate",
        format: KpiFormat::Percent,
    },
    KpiDefinition {
        key: "profit_factor",
        label: "Profit Factor",
        format: KpiFormat::Decimal,
    },
    KpiDefinition {
        key: "avg_trade_net_pnl",
        label: "Avg Trade Net PnL",
        format: KpiFormat::Currency,
    },
    KpiDefinition {
        key: "total_trades",
        label: "Total Trades",
        format: KpiFormat::Number,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub key: String,
    pub label: String,
    pub value: String,
    pub tone: KpiTone,
}

/// Display text for a pre-computed metric. Missing values render as `-`.
pub fn format_kpi(value: Option<f64>, format: KpiFormat) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    match format {
        KpiFormat::Percent => format!("{:.2}%", value * 100.0),
        KpiFormat::Currency => format!("${value:.2}"),
        KpiFormat::Decimal => format!("{value:.2}"),
        KpiFormat::Number => {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                format!("{}", value as i64)
            } else {
                value.to_string()
            }
        }
    }
}

fn tone(value: Option<f64>, format: KpiFormat) -> KpiTone {
    match (value, format) {
        (Some(v), KpiFormat::Percent) if v > 0.0 => KpiTone::Positive,
        (Some(v), KpiFormat::Percent) if v < 0.0 => KpiTone::Negative,
        _ => KpiTone::Neutral,
    }
}

/// Builds the KPI grid from the service's opaque metrics object.
pub fn kpi_tiles(metrics: &serde_json::Value) -> Vec<KpiTile> {
    KPI_GRID
        .iter()
        .map(|def| {
            let value = metrics.get(def.key).and_then(serde_json::Value::as_f64);
            KpiTile {
                key: def.key.to_string(),
                label: def.label.to_string(),
                value: format_kpi(value, def.format),
                tone: tone(value, def.format),
            }
        })
        .collect()
}
