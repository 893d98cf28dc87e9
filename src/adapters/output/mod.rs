//! Output adapters: CSV tables and dashboard JSON

pub mod csv;
pub mod json;

pub use csv::write_table;
pub use json::write_json;
