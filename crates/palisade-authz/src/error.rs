//! Error types for the authorization engine.
//!
//! Denials and faults are different outcomes and stay distinguishable:
//!
//! ```text
//! check returned Deny        → AccessDenied         (caller is not allowed)
//! check failed to evaluate   → CheckExecution       (fault, never a denial)
//! principal lookup failed    → PrincipalUnavailable (fault, never a denial)
//! composer over zero checks  → EmptyConfiguration   (programming error)
//! ```

use palisade_types::ErrorCode;
use thiserror::Error;

/// Errors produced by checks, composers and the interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// A before- or after-check denied the call.
    #[error("access denied to '{operation}' by [{check}]: {reason}")]
    AccessDenied {
        /// FQN of the protected operation.
        operation: String,
        /// ID of the check that denied.
        check: String,
        /// Reason given by the check.
        reason: String,
    },

    /// A composer was constructed with no delegates.
    #[error("{composer} composer requires at least one check")]
    EmptyConfiguration {
        /// Which composer was being built ("before", "after", "matcher").
        composer: &'static str,
    },

    /// A check's own decision logic failed.
    #[error("check execution failed [{check}]: {message}")]
    CheckExecution {
        /// ID of the failing check.
        check: String,
        /// Error message.
        message: String,
    },

    /// The principal could not be resolved.
    #[error("principal unavailable: {0}")]
    PrincipalUnavailable(String),

    /// A matcher pattern could not be parsed.
    #[error("invalid operation pattern: {0}")]
    InvalidPattern(String),
}

impl AuthzError {
    /// Creates a [`AuthzError::CheckExecution`] for `check`.
    #[must_use]
    pub fn check_failed(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckExecution {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a deliberate denial rather than a fault.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

impl ErrorCode for AuthzError {
    fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => "AUTHZ_ACCESS_DENIED",
            Self::EmptyConfiguration { .. } => "AUTHZ_EMPTY_CONFIGURATION",
            Self::CheckExecution { .. } => "AUTHZ_CHECK_EXECUTION",
            Self::PrincipalUnavailable(_) => "AUTHZ_PRINCIPAL_UNAVAILABLE",
            Self::InvalidPattern(_) => "AUTHZ_INVALID_PATTERN",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CheckExecution { .. } | Self::PrincipalUnavailable(_)
        )
    }
}
