//! Domain models and types
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CountryCode`])
//! - **The flow record model and frame schema** ([`flow`])
//! - **Error types** ([`FigaroError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type safety
//!
//! Country codes use the newtype pattern so they cannot be confused with
//! the row/column classification codes that are also plain strings:
//!
//! ```
//! use figaro_nam::domain::CountryCode;
//!
//! # fn example() -> Result<(), String> {
//! let focal = CountryCode::new("DE")?;
//! assert_eq!(focal.as_str(), "DE");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod flow;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FigaroError, StoreError};
pub use flow::{empty_frame, frame_from_records, FlowRecord};
pub use ids::CountryCode;
pub use result::Result;
