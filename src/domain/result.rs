//! Result type alias for Transit operations

use crate::domain::errors::TransitError;

/// Result type used throughout the Transit crate
///
/// # Examples
///
/// ```
/// use transit::domain::{Result, TransitError};
///
/// fn might_fail(flag: bool) -> Result<u32> {
///     if flag {
///         Ok(42)
///     } else {
///         Err(TransitError::Other("failed".to_string()))
///     }
/// }
///
/// assert!(might_fail(true).is_ok());
/// ```
pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ok() {
        let r: Result<u32> = Ok(1);
        assert!(r.is_ok());
    }

    #[test]
    fn test_result_err() {
        let r: Result<u32> = Err(TransitError::Other("nope".to_string()));
        assert!(r.is_err());
    }
}
