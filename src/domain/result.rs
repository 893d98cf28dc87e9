//! Result type alias
//!
//! Convenience alias using `FigaroError` as the error type; use this
//! throughout the crate for fallible operations.

use super::errors::FigaroError;

/// Result type alias for figaro-nam operations
///
/// # Examples
///
/// ```
/// use figaro_nam::domain::result::Result;
/// use figaro_nam::domain::errors::FigaroError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FigaroError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FigaroError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FigaroError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(FigaroError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
