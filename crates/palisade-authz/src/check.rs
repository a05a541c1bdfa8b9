//! Check traits and testing utilities.

use crate::{AuthzError, Decision, Matcher, OperationContext, PrincipalSupplier, ResultDecision};
use serde_json::Value;
use std::sync::Arc;

/// A single authorization check evaluated before the protected operation.
///
/// Each check declares:
///
/// - An ID (used in denials and diagnostics)
/// - A matcher (which operations it applies to)
/// - A decision over the caller and the call's context
///
/// # Contract
///
/// - The principal is resolved only through `principal`, and only if the
///   decision actually depends on it.
/// - No per-call state is kept on `self`. Checks are shared across
///   concurrent calls, hence `Send + Sync`.
/// - A failure to evaluate is returned as `Err`, never disguised as
///   [`Decision::Deny`].
pub trait CheckBefore: Send + Sync {
    /// Unique identifier for this check.
    fn id(&self) -> &str;

    /// Matcher deciding which operations this check applies to.
    fn matcher(&self) -> Arc<dyn Matcher>;

    /// Decides whether the call may proceed.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision could not be evaluated.
    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        ctx: &OperationContext,
    ) -> Result<Decision, AuthzError>;
}

/// A single authorization check evaluated on the operation's result.
///
/// Same contract as [`CheckBefore`], plus: the check receives the current
/// result by value and returns the value the next stage sees. To leave the
/// result untouched, release the value that was passed in.
pub trait CheckAfter: Send + Sync {
    /// Unique identifier for this check.
    fn id(&self) -> &str;

    /// Matcher deciding which operations this check applies to.
    fn matcher(&self) -> Arc<dyn Matcher>;

    /// Inspects and possibly transforms `result`.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision could not be evaluated.
    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        ctx: &OperationContext,
        result: Value,
    ) -> Result<ResultDecision, AuthzError>;
}

/// Test utilities for checks.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use crate::MatchAll;
    use palisade_types::Principal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type BeforeFn = Box<
        dyn Fn(&PrincipalSupplier<'_>, &OperationContext) -> Result<Decision, AuthzError>
            + Send
            + Sync,
    >;
    type AfterFn = Box<
        dyn Fn(
                &PrincipalSupplier<'_>,
                &OperationContext,
                Value,
            ) -> Result<ResultDecision, AuthzError>
            + Send
            + Sync,
    >;

    /// A mock before-check.
    ///
    /// Runs `decide_fn` on every call and counts invocations via
    /// `call_count`.
    pub struct MockBeforeCheck {
        /// Check ID.
        pub id: String,
        /// Matcher.
        pub matcher: Arc<dyn Matcher>,
        /// Decision function.
        pub decide_fn: BeforeFn,
        /// Number of times `decide()` has been called.
        pub call_count: Arc<AtomicUsize>,
    }

    impl MockBeforeCheck {
        fn with_fn(id: &str, decide_fn: BeforeFn) -> Self {
            Self {
                id: id.to_string(),
                matcher: Arc::new(MatchAll),
                decide_fn,
                call_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Always grants without touching the principal.
        pub fn granting(id: &str) -> Self {
            Self::with_fn(id, Box::new(|_, _| Ok(Decision::Grant)))
        }

        /// Always abstains without touching the principal.
        pub fn abstaining(id: &str) -> Self {
            Self::with_fn(id, Box::new(|_, _| Ok(Decision::Abstain)))
        }

        /// Always denies with `reason`.
        pub fn denying(id: &str, reason: &str) -> Self {
            let check = id.to_string();
            let reason = reason.to_string();
            Self::with_fn(
                id,
                Box::new(move |_, _| Ok(Decision::deny(check.clone(), reason.clone()))),
            )
        }

        /// Always fails with [`AuthzError::CheckExecution`].
        pub fn failing(id: &str, message: &str) -> Self {
            let check = id.to_string();
            let message = message.to_string();
            Self::with_fn(
                id,
                Box::new(move |_, _| Err(AuthzError::check_failed(check.clone(), message.clone()))),
            )
        }

        /// Panics if invoked. Used to prove short-circuiting.
        pub fn unreachable(id: &str) -> Self {
            let check = id.to_string();
            Self::with_fn(
                id,
                Box::new(move |_, _| panic!("check '{check}' must not be invoked")),
            )
        }

        /// Resolves the principal and grants if `accept` returns `true`.
        pub fn inspecting(
            id: &str,
            accept: impl Fn(&Principal) -> bool + Send + Sync + 'static,
        ) -> Self {
            let check = id.to_string();
            Self::with_fn(
                id,
                Box::new(move |principal, _| {
                    let p = principal.get()?;
                    Ok(Decision::from_granted(accept(p), &check, "rejected principal"))
                }),
            )
        }

        /// Sets the matcher.
        #[must_use]
        pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
            self.matcher = matcher;
            self
        }

        /// Returns the number of times this check has been invoked.
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    impl CheckBefore for MockBeforeCheck {
        fn id(&self) -> &str {
            &self.id
        }

        fn matcher(&self) -> Arc<dyn Matcher> {
            Arc::clone(&self.matcher)
        }

        fn decide(
            &self,
            principal: &PrincipalSupplier<'_>,
            ctx: &OperationContext,
        ) -> Result<Decision, AuthzError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.decide_fn)(principal, ctx)
        }
    }

    /// A mock after-check.
    pub struct MockAfterCheck {
        /// Check ID.
        pub id: String,
        /// Matcher.
        pub matcher: Arc<dyn Matcher>,
        /// Decision function.
        pub decide_fn: AfterFn,
        /// Number of times `decide()` has been called.
        pub call_count: Arc<AtomicUsize>,
    }

    impl MockAfterCheck {
        fn with_fn(id: &str, decide_fn: AfterFn) -> Self {
            Self {
                id: id.to_string(),
                matcher: Arc::new(MatchAll),
                decide_fn,
                call_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Releases the result unchanged.
        pub fn pass_through(id: &str) -> Self {
            Self::with_fn(id, Box::new(|_, _, result| Ok(ResultDecision::Release(result))))
        }

        /// Releases `transform(result)`.
        pub fn transformer(
            id: &str,
            transform: impl Fn(Value) -> Value + Send + Sync + 'static,
        ) -> Self {
            Self::with_fn(
                id,
                Box::new(move |_, _, result| Ok(ResultDecision::Release(transform(result)))),
            )
        }

        /// Always denies with `reason`.
        pub fn denying(id: &str, reason: &str) -> Self {
            let check = id.to_string();
            let reason = reason.to_string();
            Self::with_fn(
                id,
                Box::new(move |_, _, _| Ok(ResultDecision::deny(check.clone(), reason.clone()))),
            )
        }

        /// Always fails with [`AuthzError::CheckExecution`].
        pub fn failing(id: &str, message: &str) -> Self {
            let check = id.to_string();
            let message = message.to_string();
            Self::with_fn(
                id,
                Box::new(move |_, _, _| {
                    Err(AuthzError::check_failed(check.clone(), message.clone()))
                }),
            )
        }

        /// Sets the matcher.
        #[must_use]
        pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
            self.matcher = matcher;
            self
        }

        /// Returns the number of times this check has been invoked.
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    impl CheckAfter for MockAfterCheck {
        fn id(&self) -> &str {
            &self.id
        }

        fn matcher(&self) -> Arc<dyn Matcher> {
            Arc::clone(&self.matcher)
        }

        fn decide(
            &self,
            principal: &PrincipalSupplier<'_>,
            ctx: &OperationContext,
            result: Value,
        ) -> Result<ResultDecision, AuthzError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.decide_fn)(principal, ctx, result)
        }
    }

    /// Resolver stub counting how often it is asked for the principal.
    #[derive(Clone)]
    pub struct CountingResolver {
        principal: Principal,
        count: Arc<AtomicUsize>,
    }

    impl CountingResolver {
        /// Creates a resolver that always yields `principal`.
        pub fn new(principal: Principal) -> Self {
            Self {
                principal,
                count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Builds a supplier backed by this resolver.
        pub fn supplier(&self) -> PrincipalSupplier<'_> {
            PrincipalSupplier::new(move || {
                self.count.fetch_add(1, Ordering::SeqCst);
                Ok(self.principal.clone())
            })
        }

        /// Returns how many times the principal was resolved.
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }
}
