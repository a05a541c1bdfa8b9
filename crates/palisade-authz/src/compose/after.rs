//! Sequential pipeline of after-checks.

use crate::{
    AuthzError, CheckAfter, Matcher, MatcherUnion, OperationContext, PrincipalSupplier,
    ResultDecision,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

const COMPOSER_ID: &str = "after-composer";

/// Ordered set of after-checks applied to a result as a fold.
///
/// Each delegate receives the value released by the previous one. The
/// first `Deny` or error ends the pipeline; nothing reaches the caller and
/// no later delegate runs.
///
/// ```text
/// result ──▶ check₁ ──Release(v₁)──▶ check₂ ──Release(v₂)──▶ … ──▶ caller
///                 └──Deny──▶ AccessDenied
/// ```
pub struct AfterComposer {
    checks: Vec<Arc<dyn CheckAfter>>,
    matcher: Arc<MatcherUnion>,
}

impl AfterComposer {
    /// Builds a pipeline over `checks`. Order is significant and fixed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::EmptyConfiguration`] if `checks` is empty.
    pub fn new(checks: Vec<Arc<dyn CheckAfter>>) -> Result<Self, AuthzError> {
        if checks.is_empty() {
            return Err(AuthzError::EmptyConfiguration { composer: "after" });
        }
        let matcher = MatcherUnion::new(checks.iter().map(|c| c.matcher()).collect())?;
        Ok(Self {
            checks,
            matcher: Arc::new(matcher),
        })
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Always `false`: construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// IDs of the stages, in evaluation order.
    pub fn check_ids(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.id())
    }

    /// Runs the pipeline and returns the final value, or the denial as an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`AuthzError::AccessDenied`] if a stage denied
    /// - any error a stage returned, unchanged
    pub fn authorize_result(
        &self,
        principal: &PrincipalSupplier<'_>,
        ctx: &OperationContext,
        result: Value,
    ) -> Result<Value, AuthzError> {
        match self.decide(principal, ctx, result)? {
            ResultDecision::Release(value) => Ok(value),
            ResultDecision::Deny(denial) => Err(AuthzError::AccessDenied {
                operation: ctx.fqn(),
                check: denial.check,
                reason: denial.reason,
            }),
        }
    }
}

impl CheckAfter for AfterComposer {
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
        result: Value,
    ) -> Result<ResultDecision, AuthzError> {
        tracing::trace!(
            operation = %ctx.operation,
            checks = self.checks.len(),
            "evaluating after-checks"
        );

        let mut current = result;
        for check in &self.checks {
            match check.decide(principal, ctx, current)? {
                ResultDecision::Release(next) => {
                    tracing::trace!(check_id = check.id(), "after-check released");
                    current = next;
                }
                ResultDecision::Deny(denial) => {
                    tracing::debug!(
                        operation = %ctx.operation,
                        check_id = %denial.check,
                        reason = %denial.reason,
                        "result withheld"
                    );
                    return Ok(ResultDecision::Deny(denial));
                }
            }
        }

        Ok(ResultDecision::Release(current))
    }
}

impl fmt::Debug for AfterComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AfterComposer")
            .field("checks", &self.check_ids().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAfterCheck;
    use palisade_types::{Operation, Principal};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn test_ctx() -> OperationContext {
        OperationContext::new(Operation::new("docs", "list"), Value::Null)
    }

    fn arc(check: MockAfterCheck) -> Arc<dyn CheckAfter> {
        Arc::new(check)
    }

    fn drop_evens() -> MockAfterCheck {
        MockAfterCheck::transformer("drop-evens", |value| match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|v| v.as_i64().map_or(true, |n| n % 2 != 0))
                    .collect(),
            ),
            other => other,
        })
    }

    fn append_x() -> MockAfterCheck {
        MockAfterCheck::transformer("append-x", |value| match value {
            Value::Array(mut items) => {
                items.push(json!("x"));
                Value::Array(items)
            }
            other => other,
        })
    }

    #[test]
    fn empty_is_rejected() {
        let err = AfterComposer::new(Vec::new()).unwrap_err();
        assert_eq!(err, AuthzError::EmptyConfiguration { composer: "after" });
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AfterComposer>();
    }

    #[test]
    fn stages_apply_in_order() {
        let composer = AfterComposer::new(vec![arc(drop_evens()), arc(append_x())])
            .expect("composer should build");
        let supplier = PrincipalSupplier::resolved(Principal::System);

        let out = composer
            .authorize_result(&supplier, &test_ctx(), json!([1, 2, 3, 4]))
            .expect("pipeline should release");
        assert_eq!(out, json!([1, 3, "x"]));
    }

    #[test]
    fn order_is_significant() {
        let first_two = || {
            MockAfterCheck::transformer("first-two", |value| match value {
                Value::Array(items) => Value::Array(items.into_iter().take(2).collect()),
                other => other,
            })
        };
        let supplier = PrincipalSupplier::resolved(Principal::System);

        let append_then_cut = AfterComposer::new(vec![arc(append_x()), arc(first_two())])
            .expect("composer should build");
        let cut_then_append = AfterComposer::new(vec![arc(first_two()), arc(append_x())])
            .expect("composer should build");

        assert_eq!(
            append_then_cut
                .authorize_result(&supplier, &test_ctx(), json!([1, 2, 3]))
                .expect("pipeline should release"),
            json!([1, 2])
        );
        assert_eq!(
            cut_then_append
                .authorize_result(&supplier, &test_ctx(), json!([1, 2, 3]))
                .expect("pipeline should release"),
            json!([1, 2, "x"])
        );
        assert_eq!(
            cut_then_append.check_ids().collect::<Vec<_>>(),
            ["first-two", "append-x"]
        );
    }

    #[test]
    fn deny_aborts_pipeline() {
        let last = MockAfterCheck::transformer("b", |_| json!("leaked"));
        let last_calls = Arc::clone(&last.call_count);
        let composer = AfterComposer::new(vec![
            arc(MockAfterCheck::transformer("a", |v| json!({"inner": v}))),
            arc(MockAfterCheck::denying("gate", "confidential")),
            arc(last),
        ])
        .expect("composer should build");
        let supplier = PrincipalSupplier::resolved(Principal::System);

        let err = composer
            .authorize_result(&supplier, &test_ctx(), json!(1))
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::AccessDenied {
                operation: "docs::list".into(),
                check: "gate".into(),
                reason: "confidential".into(),
            }
        );
        assert_eq!(last_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pass_through_keeps_value() {
        let composer = AfterComposer::new(vec![arc(MockAfterCheck::pass_through("p"))])
            .expect("composer should build");
        let supplier = PrincipalSupplier::resolved(Principal::System);
        assert_eq!(
            composer.decide(&supplier, &test_ctx(), json!({"k": "v"})),
            Ok(ResultDecision::Release(json!({"k": "v"})))
        );
    }

    #[test]
    fn error_propagates_and_stops() {
        let last = MockAfterCheck::pass_through("b");
        let last_calls = Arc::clone(&last.call_count);
        let composer = AfterComposer::new(vec![
            arc(MockAfterCheck::failing("a", "serializer broke")),
            arc(last),
        ])
        .expect("composer should build");
        let supplier = PrincipalSupplier::resolved(Principal::System);

        let err = composer
            .decide(&supplier, &test_ctx(), json!(null))
            .unwrap_err();
        assert_eq!(err, AuthzError::check_failed("a", "serializer broke"));
        assert_eq!(last_calls.load(Ordering::SeqCst), 0);
    }
}
