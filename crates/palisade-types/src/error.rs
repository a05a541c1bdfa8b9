//! Unified error code interface.
//!
//! Every palisade error enum implements [`ErrorCode`] so that callers can
//! branch on a stable, machine-readable code instead of matching on display
//! strings.

/// Machine-readable error code and recoverability.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, e.g. `"AUTHZ_ACCESS_DENIED"`
/// - Prefixed with the owning domain (`"AUTHZ_"`, `"CONFIG_"`)
/// - Stable across versions
///
/// # Recoverability
///
/// An error is recoverable if retrying may succeed (transient lookup
/// failure) or the caller can fix it without a code or config change.
/// Denials and configuration errors are not recoverable.
///
/// # Example
///
/// ```
/// use palisade_types::ErrorCode;
///
/// enum LookupError {
///     Timeout,
///     Missing,
/// }
///
/// impl ErrorCode for LookupError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Timeout => "LOOKUP_TIMEOUT",
///             Self::Missing => "LOOKUP_MISSING",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         matches!(self, Self::Timeout)
///     }
/// }
///
/// assert_eq!(LookupError::Timeout.code(), "LOOKUP_TIMEOUT");
/// assert!(!LookupError::Missing.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows the naming conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts [`assert_error_code`] for every error in `errors`.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
