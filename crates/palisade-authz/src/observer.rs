//! Observers of authorization outcomes.
//!
//! Observers are told what happened after each phase has decided. They
//! cannot influence the decision.

use crate::{AuthzError, Phase};
use palisade_types::ErrorCode;
use serde::{Deserialize, Serialize};

/// What a phase concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The phase let the call (or its result) through.
    Granted,
    /// A check denied.
    Denied {
        /// ID of the denying check.
        check: String,
        /// Reason given by the check.
        reason: String,
    },
    /// Evaluation failed.
    Failed {
        /// [`ErrorCode::code`] of the failure.
        code: String,
    },
}

/// One authorization outcome for one phase of one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationEvent {
    /// Phase that produced the outcome.
    pub phase: Phase,
    /// FQN of the operation.
    pub operation: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl AuthorizationEvent {
    /// Builds an event from the outcome of a phase.
    #[must_use]
    pub fn new(
        phase: Phase,
        operation: impl Into<String>,
        result: Result<(), &AuthzError>,
    ) -> Self {
        let outcome = match result {
            Ok(()) => Outcome::Granted,
            Err(AuthzError::AccessDenied { check, reason, .. }) => Outcome::Denied {
                check: check.clone(),
                reason: reason.clone(),
            },
            Err(err) => Outcome::Failed {
                code: err.code().to_string(),
            },
        };
        Self {
            phase,
            operation: operation.into(),
            outcome,
        }
    }
}

/// Receives authorization events.
pub trait AuthorizationObserver: Send + Sync {
    /// Called once per evaluated phase.
    fn on_event(&self, event: &AuthorizationEvent);
}

/// Logs events with `tracing`.
///
/// Grants at `debug`, denials at `info`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AuthorizationObserver for TracingObserver {
    fn on_event(&self, event: &AuthorizationEvent) {
        match &event.outcome {
            Outcome::Granted => tracing::debug!(
                phase = %event.phase,
                operation = %event.operation,
                "authorization granted"
            ),
            Outcome::Denied { check, reason } => tracing::info!(
                phase = %event.phase,
                operation = %event.operation,
                check_id = %check,
                reason = %reason,
                "authorization denied"
            ),
            Outcome::Failed { code } => tracing::warn!(
                phase = %event.phase,
                operation = %event.operation,
                code = %code,
                "authorization failed"
            ),
        }
    }
}

/// Observer that records every event.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Keeps every event it sees, in order.
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<AuthorizationEvent>>,
    }

    impl RecordingObserver {
        /// Creates an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of the recorded events.
        pub fn events(&self) -> Vec<AuthorizationEvent> {
            self.events.lock().clone()
        }
    }

    impl AuthorizationObserver for RecordingObserver {
        fn on_event(&self, event: &AuthorizationEvent) {
            self.events.lock().push(event.clone());
        }
    }
}
