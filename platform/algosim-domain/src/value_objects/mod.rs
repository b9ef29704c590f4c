pub mod chart_point;
pub mod equity_point;
pub mod trade;
pub mod trade_action;
