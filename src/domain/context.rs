//! Error context extension trait
//!
//! A context extension similar to `anyhow::Context` that stays within
//! `Result<T, TransitError>`, so library code can attach unit ids and
//! stage information to errors without losing the domain error type.
//!
//! # Examples
//!
//! ```rust
//! use transit::domain::Result;
//! use transit::domain::context::ResultExt;
//!
//! fn read_mapping(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .context(format!("Failed to read mapping file: {}", path))
//! }
//! ```

use crate::domain::errors::TransitError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// Provides `.context()` and `.with_context()` for contextual error
/// information while keeping `TransitError` throughout library code.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly; use `.with_context()` when the
    /// context string is expensive to compute.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use transit::domain::Result;
    /// use transit::domain::context::ResultExt;
    ///
    /// fn transform_unit(patient_id: i64) -> Result<()> {
    ///     run_transform(patient_id)
    ///         .with_context(|| format!("Failed to transform patient {}", patient_id))
    /// }
    /// # fn run_transform(_id: i64) -> Result<()> { Ok(()) }
    /// ```
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TransitError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| {
            let base_error = e.into();
            TransitError::Other(format!("{context}: {base_error}"))
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            let context = f();
            TransitError::Other(format!("{context}: {base_error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SourceError;

    #[test]
    fn test_context_with_transit_error() {
        let result: Result<()> = Err(TransitError::Configuration("Invalid config".to_string()));
        let with_context = result.context("Failed to load mapping tables");

        assert!(with_context.is_err());
        let err_msg = with_context.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to load mapping tables"));
        assert!(err_msg.contains("Invalid config"));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let called = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let called_clone = called.clone();

        let result: Result<i32> = Ok(42);
        let with_context = result.with_context(|| {
            called_clone.store(true, std::sync::atomic::Ordering::SeqCst);
            "Expensive context"
        });

        // Context must not be evaluated for Ok results
        assert!(with_context.is_ok());
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_context_with_source_error() {
        let result: Result<()> =
            Err(SourceError::ConnectionFailed("Network timeout".to_string()).into());
        let with_context = result.context("Failed to fetch encounters for location 100");

        assert!(with_context.is_err());
        let err_msg = with_context.unwrap_err().to_string();
        assert!(err_msg.contains("location 100"));
        assert!(err_msg.contains("Network timeout"));
    }

    #[test]
    fn test_context_chaining() {
        let result: Result<()> = Err(TransitError::Ledger("write failed".to_string()));
        let with_context = result
            .context("Failed to persist progress")
            .context("Failed to complete unit 42");

        let err_msg = with_context.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to complete unit 42"));
        assert!(err_msg.contains("Failed to persist progress"));
        assert!(err_msg.contains("write failed"));
    }
}
