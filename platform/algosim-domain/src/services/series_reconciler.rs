use crate::entities::backtest_result::BacktestResult;
use crate::services::date_key::{compare_date_keys, parse_date_key};
use crate::value_objects::chart_point::ChartPoint;
use crate::value_objects::trade_action::TradeAction;
use serde::Serialize;
use std::collections::HashMap;

/// Merges the strategy curve, the benchmark curve and the trade list into one
/// chronological chart series.
///
/// Points are keyed by the raw date string. Benchmark samples only annotate
/// dates already present on the strategy curve, and their equity doubles as
/// the reconstructed price (buy-and-hold of one unit). Trade markers are
/// pinned at that price; when entry and exit share a date the exit is applied
/// last, so `action` reads `SELL`.
pub fn reconcile(result: &BacktestResult) -> Vec<ChartPoint> {
    let mut points: HashMap<&str, ChartPoint> = HashMap::with_capacity(result.equity_curve.len());

    for point in &result.equity_curve {
        points.insert(
            point.date.as_str(),
            ChartPoint::seeded(point.date.as_str(), point.equity),
        );
    }

    if let Some(benchmark) = result.benchmark.as_ref() {
        for point in &benchmark.equity_curve {
            if let Some(existing) = points.get_mut(point.date.as_str()) {
                existing.benchmark = Some(point.equity);
                existing.price = point.equity;
            }
        }
    }

    for trade in &result.trades {
        if let Some(existing) = points.get_mut(trade.entry_date.as_str()) {
            existing.buy_marker = Some(existing.price);
            existing.action = Some(TradeAction::Buy);
        }
        if let Some(existing) = points.get_mut(trade.exit_date.as_str()) {
            existing.sell_marker = Some(existing.price);
            existing.action = Some(TradeAction::Sell);
        }
    }

    let mut keyed: Vec<(Option<i64>, ChartPoint)> = points
        .into_values()
        .map(|point| (parse_date_key(&point.date), point))
        .collect();
    keyed.sort_by(|(a_key, a), (b_key, b)| {
        compare_date_keys(*a_key, *b_key).then_with(|| a.date.cmp(&b.date))
    });
    keyed.into_iter().map(|(_, point)| point).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartStats {
    pub points: usize,
    pub benchmark_points: usize,
    pub buy_markers: usize,
    pub sell_markers: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl ChartStats {
    pub fn from_points(points: &[ChartPoint]) -> Self {
        Self {
            points: points.len(),
            benchmark_points: points.iter().filter(|p| p.benchmark.is_some()).count(),
            buy_markers: points.iter().filter(|p| p.buy_marker.is_some()).count(),
            sell_markers: points.iter().filter(|p| p.sell_marker.is_some()).count(),
            first_date: points.first().map(|p| p.date.clone()),
            last_date: points.last().map(|p| p.date.clone()),
        }
    }
}
