//! Core analysis pipeline
//!
//! The stages every command composes:
//! - **classify**: code taxonomy for row and column codes
//! - **aggregate**: filtered sums and grouped sums over flow frames
//! - **temporal**: time series construction and growth mathematics
//! - **deflate**: nominal-to-real conversion via price indices
//! - **bilateral**: export reconstruction and trade balances
//! - **summary**: run counters for data completeness reporting

pub mod aggregate;
pub mod bilateral;
pub mod classify;
pub mod deflate;
pub mod summary;
pub mod temporal;

pub use aggregate::{
    category_sums, group_sum, group_sum_pairs, sum_where, value_distribution, CategoryStat,
    FlowFilter, ValueDistribution,
};
pub use bilateral::{exports_of, imports_of, trade_balance, TradeBalance};
pub use classify::{classify, CodeCategory};
pub use deflate::PriceIndexTable;
pub use summary::RunSummary;
pub use temporal::{
    build_series, cagr, deviation_from_trend, metric_components, pearson, pct_change,
    trend_extrapolate, yoy_change, Metric, TimeSeries,
};
