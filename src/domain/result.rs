//! Result type alias for Xtractor

use super::errors::XtractorError;

/// Result type alias for Xtractor operations
///
/// # Examples
///
/// ```
/// use xtractor::domain::result::Result;
/// use xtractor::domain::errors::XtractorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(XtractorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, XtractorError>;
