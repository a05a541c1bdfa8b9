//! Deny-overrides-grant composition of before-checks.

use crate::{
    AuthzError, CheckBefore, Decision, Matcher, MatcherUnion, OperationContext, PrincipalSupplier,
};
use std::fmt;
use std::sync::Arc;

const COMPOSER_ID: &str = "before-composer";

/// Ordered set of before-checks evaluated as one.
///
/// # Semantics
///
/// Delegates run in the order given:
///
/// - `Deny` → stop, return that denial unchanged
/// - `Grant` / `Abstain` → continue
/// - `Err` → stop, return the error unchanged
///
/// If every delegate ran without denying, the composed decision is
/// [`Decision::Grant`].
///
/// # Example
///
/// ```
/// use palisade_authz::{BeforeComposer, CheckBefore, DenyAll, PermitAll};
/// use std::sync::Arc;
///
/// let checks: Vec<Arc<dyn CheckBefore>> =
///     vec![Arc::new(PermitAll::new()), Arc::new(DenyAll::new())];
/// let composer = BeforeComposer::new(checks).unwrap();
/// assert_eq!(composer.len(), 2);
/// ```
pub struct BeforeComposer {
    checks: Vec<Arc<dyn CheckBefore>>,
    matcher: Arc<MatcherUnion>,
}

impl BeforeComposer {
    /// Builds a composer over `checks`. Order is significant and fixed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::EmptyConfiguration`] if `checks` is empty.
    pub fn new(checks: Vec<Arc<dyn CheckBefore>>) -> Result<Self, AuthzError> {
        if checks.is_empty() {
            return Err(AuthzError::EmptyConfiguration { composer: "before" });
        }
        let matcher = MatcherUnion::new(checks.iter().map(|c| c.matcher()).collect())?;
        Ok(Self {
            checks,
            matcher: Arc::new(matcher),
        })
    }

    /// Number of delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Always `false`: construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// IDs of the delegates, in evaluation order.
    pub fn check_ids(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.id())
    }

    /// Runs the composed decision and turns a denial into an error.
    ///
    /// # Errors
    ///
    /// - [`AuthzError::AccessDenied`] if a delegate denied
    /// - any error a delegate returned, unchanged
    pub fn authorize(
        &self,
        principal: &PrincipalSupplier<'_>,
        ctx: &OperationContext,
    ) -> Result<(), AuthzError> {
        match self.decide(principal, ctx)? {
            Decision::Deny(denial) => Err(AuthzError::AccessDenied {
                operation: ctx.fqn(),
                check: denial.check,
                reason: denial.reason,
            }),
            Decision::Grant | Decision::Abstain => Ok(()),
        }
    }
}

impl CheckBefore for BeforeComposer {
    fn id(&self) -> &str {
        COMPOSER_ID
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher) as Arc<dyn Matcher>
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        ctx: &OperationContext,
    ) -> Result<Decision, AuthzError> {
        tracing::trace!(
            operation = %ctx.operation,
            checks = self.checks.len(),
            "evaluating before-checks"
        );

        for check in &self.checks {
            let decision = check.decide(principal, ctx)?;
            tracing::trace!(
                check_id = check.id(),
                decision = decision.status_str(),
                "before-check decided"
            );
            if let Decision::Deny(denial) = decision {
                tracing::debug!(
                    operation = %ctx.operation,
                    check_id = %denial.check,
                    reason = %denial.reason,
                    "call denied"
                );
                return Ok(Decision::Deny(denial));
            }
        }

        Ok(Decision::Grant)
    }
}

impl fmt::Debug for BeforeComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeforeComposer")
            .field("checks", &self.check_ids().collect::<Vec<_>>())
            .finish()
    }
}
