//! Adapters for external systems
//!
//! The store adapter reads the partitioned parquet dataset; the output
//! adapters write CSV tables and dashboard JSON artifacts.

pub mod output;
pub mod store;

pub use output::{write_json, write_table};
pub use store::FlowStore;
