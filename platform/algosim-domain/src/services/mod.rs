pub mod date_key;
pub mod kpi;
pub mod series_reconciler;
pub mod strategy_catalog;
