//! Error handling utilities for tweet operations

use crate::error::AppError;

/// Extension trait for logging errors with context and converting to AppError
pub trait LogErr<T> {
    fn log_err(self, context: &str) -> Result<T, AppError>;
}

impl<T, E> LogErr<T> for Result<T, E>
where
    E: std::fmt::Display + Into<AppError>,
{
    fn log_err(self, context: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!(error = %e, "{}", context);
            e.into()
        })
    }
}
