//! # figaro-nam - FIGARO National Accounts Exploration Toolkit
//!
//! figaro-nam is a batch analysis tool built in Rust that turns the
//! Eurostat FIGARO-NAM transaction-level dataset (hive-partitioned
//! parquet) into derived economic indicators: domestic and foreign flow
//! aggregates, time series with growth mathematics, HICP-deflated real
//! indices and bilateral trade balances reconstructed from partner books.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Loading** per-country, per-year flow partitions via the flow store
//! - **Classifying** row/column codes into the FIGARO code taxonomy
//! - **Aggregating** flows by code, origin and category
//! - **Deriving** time series, YoY change, CAGR, trend deviation and
//!   real (deflated) indices
//! - **Reconciling** bilateral trade from partner-book scans
//! - **Writing** CSV tables and dashboard JSON artifacts
//!
//! ## Architecture
//!
//! figaro-nam follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Analysis logic (classify, aggregate, temporal, deflate,
//!   bilateral, summary)
//! - [`adapters`] - External integrations (parquet store, CSV/JSON output)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`reference`] - Static label tables for countries, sectors and codes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figaro_nam::adapters::FlowStore;
//! use figaro_nam::core::aggregate::{sum_where, FlowFilter};
//! use figaro_nam::domain::CountryCode;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FlowStore::open("data/parquet")?;
//!     let de = CountryCode::new("DE")?;
//!
//!     let df = store.load(&de, 2019)?;
//!     let wages = sum_where(&df, &FlowFilter::row_code("D11").domestic(true))?;
//!
//!     println!("DE wages 2019: {wages:.0} million EUR");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! figaro-nam uses the [`domain::FigaroError`] type for all errors:
//!
//! ```rust,no_run
//! use figaro_nam::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = figaro_nam::config::load_config("figaro.toml")?;
//!     let _ = config;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! figaro-nam uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting analysis");
//! warn!(country = "FR", year = 2021, "Partition missing");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod reference;
