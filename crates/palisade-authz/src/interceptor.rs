//! Interceptor around protected operations.
//!
//! ```text
//! invoke(ctx, principal, op)
//!   │
//!   ├─ registry.resolve(ctx.operation)       (cached)
//!   ├─ before.authorize(principal, ctx) ──✗──▶ Authorization(AccessDenied)
//!   ├─ op(ctx) ───────────────────────────✗──▶ Operation(E)
//!   └─ after.authorize_result(..)  ───────✗──▶ Authorization(AccessDenied)
//!           │
//!           ▼
//!        Ok(value)
//! ```

use crate::{
    AuthorizationEvent, AuthorizationObserver, AuthzError, CheckRegistry, OperationContext, Phase,
    PrincipalSupplier,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Failure of an intercepted call.
///
/// Keeps authorization failures apart from the protected operation's own
/// errors.
#[derive(Debug, Error)]
pub enum InvocationError<E> {
    /// Authorization denied or failed to evaluate.
    #[error("authorization: {0}")]
    Authorization(#[source] AuthzError),

    /// The protected operation itself failed.
    #[error("operation: {0}")]
    Operation(#[source] E),
}

impl<E> InvocationError<E> {
    /// Returns `true` if a check denied the call or its result.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Authorization(err) if err.is_denial())
    }

    /// Returns the authorization error, if that is what this is.
    #[must_use]
    pub fn authorization(&self) -> Option<&AuthzError> {
        match self {
            Self::Authorization(err) => Some(err),
            Self::Operation(_) => None,
        }
    }
}

/// Runs the registered checks around each call of a protected operation.
///
/// Cheap to clone; clones share the registry and observers.
///
/// # Example
///
/// ```
/// use palisade_authz::{
///     AuthorizationInterceptor, Authenticated, CheckRegistry, InvocationError,
///     OperationContext, PrincipalSupplier,
/// };
/// use palisade_types::{Operation, Principal};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = CheckRegistry::new();
/// registry.register_before(Arc::new(Authenticated::new()), 100);
/// let interceptor = AuthorizationInterceptor::new(Arc::new(registry));
///
/// let ctx = OperationContext::new(Operation::new("docs", "get"), json!({"id": 1}));
/// let anonymous = PrincipalSupplier::resolved(Principal::Anonymous);
///
/// let result = interceptor.invoke(&ctx, &anonymous, |_| Ok::<_, std::io::Error>(json!("doc")));
/// assert!(matches!(result, Err(InvocationError::Authorization(_))));
/// ```
#[derive(Clone)]
pub struct AuthorizationInterceptor {
    registry: Arc<CheckRegistry>,
    observers: Vec<Arc<dyn AuthorizationObserver>>,
}

impl AuthorizationInterceptor {
    /// Creates an interceptor over `registry`.
    #[must_use]
    pub fn new(registry: Arc<CheckRegistry>) -> Self {
        Self {
            registry,
            observers: Vec::new(),
        }
    }

    /// Adds an observer. Observers are notified in the order added.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AuthorizationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The registry this interceptor consults.
    #[must_use]
    pub fn registry(&self) -> &Arc<CheckRegistry> {
        &self.registry
    }

    /// Authorizes and runs `operation`.
    ///
    /// With no applicable checks the call runs unguarded. An operation
    /// error is returned as is; after-checks do not see it.
    ///
    /// # Errors
    ///
    /// - [`InvocationError::Authorization`] if a before- or after-check
    ///   denied or failed. On a before-phase failure `operation` is never
    ///   called; on an after-phase failure its result is dropped.
    /// - [`InvocationError::Operation`] if `operation` failed.
    pub fn invoke<E, F>(
        &self,
        ctx: &OperationContext,
        principal: &PrincipalSupplier<'_>,
        operation: F,
    ) -> Result<Value, InvocationError<E>>
    where
        F: FnOnce(&OperationContext) -> Result<Value, E>,
    {
        let resolved = self.registry.resolve(&ctx.operation);

        if let Some(before) = &resolved.before {
            let outcome = before.authorize(principal, ctx);
            self.notify(Phase::Before, ctx, outcome.as_ref().map(|_| ()));
            outcome.map_err(InvocationError::Authorization)?;
        }

        let result = operation(ctx).map_err(InvocationError::Operation)?;

        let Some(after) = &resolved.after else {
            return Ok(result);
        };
        let outcome = after.authorize_result(principal, ctx, result);
        self.notify(Phase::After, ctx, outcome.as_ref().map(|_| ()));
        outcome.map_err(InvocationError::Authorization)
    }

    fn notify(&self, phase: Phase, ctx: &OperationContext, result: Result<(), &AuthzError>) {
        if self.observers.is_empty() {
            return;
        }
        let event = AuthorizationEvent::new(phase, ctx.fqn(), result);
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

impl std::fmt::Debug for AuthorizationInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationInterceptor")
            .field("registry", &self.registry)
            .field("observers", &self.observers.len())
            .finish()
    }
}
