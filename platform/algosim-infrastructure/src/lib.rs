pub mod artifacts;
pub mod backtest_service;
pub mod reporting;
