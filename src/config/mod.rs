//! Configuration management
//!
//! TOML-based configuration with environment variable substitution and
//! validation on load.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    AnalysisConfig, ApplicationConfig, DataConfig, DeflatorConfig, FigaroConfig, LoggingConfig,
    OutputConfig,
};
