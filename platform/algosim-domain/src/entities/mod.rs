pub mod backtest_request;
pub mod backtest_result;
pub mod run_meta;
