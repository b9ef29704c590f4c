pub mod artifacts;
pub mod backtest_service;
