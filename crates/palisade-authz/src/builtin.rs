//! Built-in checks.
//!
//! # Before-checks
//!
//! | Check | Decision |
//! |-------|----------|
//! | [`PermitAll`] | always `Grant`, principal untouched |
//! | [`DenyAll`] | always `Deny`, principal untouched |
//! | [`Authenticated`] | `Deny` for anonymous callers |
//! | [`HasAnyAuthority`] | `Grant` if the caller holds a listed authority |
//! | [`FnBeforeCheck`] | closure |
//!
//! # After-checks
//!
//! | Check | Effect on the result |
//! |-------|----------------------|
//! | [`OwnerMatches`] | `Deny` unless `result[field]` is the caller's name |
//! | [`RedactFields`] | removes object keys |
//! | [`PostFilter`] | keeps the array elements the caller may see |
//! | [`FnAfterCheck`] | closure |
//!
//! Every built-in applies to all operations until narrowed with
//! `with_matcher`.

use crate::{
    AuthzError, CheckAfter, CheckBefore, Decision, MatchAll, Matcher, OperationContext,
    PrincipalSupplier, ResultDecision,
};
use palisade_types::Principal;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Adds `with_id` / `with_matcher` builders to a check holding
/// `id: String` and `matcher: Arc<dyn Matcher>`.
macro_rules! check_builders {
    ($ty:ident) => {
        impl $ty {
            /// Replaces the check ID.
            #[must_use]
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = id.into();
                self
            }

            /// Narrows the operations this check applies to.
            #[must_use]
            pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
                self.matcher = matcher;
                self
            }
        }
    };
}

fn match_all() -> Arc<dyn Matcher> {
    Arc::new(MatchAll)
}

// ── Before ──────────────────────────────────────────────────────

/// Grants every call.
pub struct PermitAll {
    id: String,
    matcher: Arc<dyn Matcher>,
}

impl PermitAll {
    /// Creates the check with ID `"permit-all"`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: "permit-all".into(),
            matcher: match_all(),
        }
    }
}

impl Default for PermitAll {
    fn default() -> Self {
        Self::new()
    }
}

check_builders!(PermitAll);

impl CheckBefore for PermitAll {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        _: &PrincipalSupplier<'_>,
        _: &OperationContext,
    ) -> Result<Decision, AuthzError> {
        Ok(Decision::Grant)
    }
}

/// Denies every call.
pub struct DenyAll {
    id: String,
    matcher: Arc<dyn Matcher>,
}

impl DenyAll {
    /// Creates the check with ID `"deny-all"`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: "deny-all".into(),
            matcher: match_all(),
        }
    }
}

impl Default for DenyAll {
    fn default() -> Self {
        Self::new()
    }
}

check_builders!(DenyAll);

impl CheckBefore for DenyAll {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        _: &PrincipalSupplier<'_>,
        _: &OperationContext,
    ) -> Result<Decision, AuthzError> {
        Ok(Decision::deny(&self.id, "operation is disabled"))
    }
}

/// Denies anonymous callers and grants everyone else.
pub struct Authenticated {
    id: String,
    matcher: Arc<dyn Matcher>,
}

impl Authenticated {
    /// Creates the check with ID `"authenticated"`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: "authenticated".into(),
            matcher: match_all(),
        }
    }
}

impl Default for Authenticated {
    fn default() -> Self {
        Self::new()
    }
}

check_builders!(Authenticated);

impl CheckBefore for Authenticated {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        _: &OperationContext,
    ) -> Result<Decision, AuthzError> {
        let granted = principal.get()?.is_authenticated();
        Ok(Decision::from_granted(granted, &self.id, "authentication required"))
    }
}

/// Grants if the caller holds at least one of the listed authorities.
///
/// `System` holds no authorities and is denied like anyone else.
pub struct HasAnyAuthority {
    id: String,
    matcher: Arc<dyn Matcher>,
    authorities: BTreeSet<String>,
}

impl HasAnyAuthority {
    /// Creates the check with ID `"has-any-authority"`.
    pub fn new<I, S>(authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: "has-any-authority".into(),
            matcher: match_all(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    /// The accepted authorities.
    #[must_use]
    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }
}

check_builders!(HasAnyAuthority);

impl CheckBefore for HasAnyAuthority {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        _: &OperationContext,
    ) -> Result<Decision, AuthzError> {
        if principal.get()?.has_any_authority(&self.authorities) {
            return Ok(Decision::Grant);
        }
        let wanted: Vec<&str> = self.authorities.iter().map(String::as_str).collect();
        Ok(Decision::deny(
            &self.id,
            format!("requires one of [{}]", wanted.join(", ")),
        ))
    }
}

type BeforeFn = dyn Fn(&PrincipalSupplier<'_>, &OperationContext) -> Result<Decision, AuthzError>
    + Send
    + Sync;

/// Before-check backed by a closure.
///
/// # Example
///
/// ```
/// use palisade_authz::{Decision, FnBeforeCheck};
///
/// let check = FnBeforeCheck::new("has-id", |_, ctx| {
///     Ok(if ctx.argument("id").is_some() {
///         Decision::Abstain
///     } else {
///         Decision::deny("has-id", "missing id")
///     })
/// });
/// ```
pub struct FnBeforeCheck {
    id: String,
    matcher: Arc<dyn Matcher>,
    decide_fn: Box<BeforeFn>,
}

impl FnBeforeCheck {
    /// Creates a check from `decide_fn`.
    pub fn new(
        id: impl Into<String>,
        decide_fn: impl Fn(
                &PrincipalSupplier<'_>,
                &OperationContext,
            ) -> Result<Decision, AuthzError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            matcher: match_all(),
            decide_fn: Box::new(decide_fn),
        }
    }
}

check_builders!(FnBeforeCheck);

impl CheckBefore for FnBeforeCheck {
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
        (self.decide_fn)(principal, ctx)
    }
}

impl fmt::Debug for FnBeforeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBeforeCheck")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ── After ───────────────────────────────────────────────────────

/// Releases the result only if the caller owns it.
///
/// Ownership means `result[field]` is a string equal to the caller's
/// name. For an array result every element must be owned. A result with
/// no such field, or a caller without a name, is denied.
pub struct OwnerMatches {
    id: String,
    matcher: Arc<dyn Matcher>,
    field: String,
}

impl OwnerMatches {
    /// Creates the check with ID `"owner-matches"`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            id: "owner-matches".into(),
            matcher: match_all(),
            field: field.into(),
        }
    }

    fn owned_by(&self, value: &Value, name: &str) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.owned_by(item, name)),
            other => other.get(&self.field).and_then(Value::as_str) == Some(name),
        }
    }
}

check_builders!(OwnerMatches);

impl CheckAfter for OwnerMatches {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        _: &OperationContext,
        result: Value,
    ) -> Result<ResultDecision, AuthzError> {
        let owned = match principal.get()?.name() {
            Some(name) => self.owned_by(&result, name),
            None => false,
        };
        if owned {
            Ok(ResultDecision::Release(result))
        } else {
            Ok(ResultDecision::deny(
                &self.id,
                format!("caller does not own the result ('{}')", self.field),
            ))
        }
    }
}

/// Removes object keys from the result.
///
/// Objects nested inside arrays are redacted element-wise. Callers holding
/// one of the `exempt` authorities see the result unchanged. With no
/// exemptions the principal is never resolved.
pub struct RedactFields {
    id: String,
    matcher: Arc<dyn Matcher>,
    fields: BTreeSet<String>,
    exempt: BTreeSet<String>,
}

impl RedactFields {
    /// Creates the check with ID `"redact-fields"`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: "redact-fields".into(),
            matcher: match_all(),
            fields: fields.into_iter().map(Into::into).collect(),
            exempt: BTreeSet::new(),
        }
    }

    /// Callers holding any of these authorities are not redacted.
    #[must_use]
    pub fn exempting<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt.extend(authorities.into_iter().map(Into::into));
        self
    }

    fn redact(&self, value: &mut Value) {
        match value {
            Value::Array(items) => items.iter_mut().for_each(|item| self.redact(item)),
            Value::Object(map) => {
                for field in &self.fields {
                    map.remove(field);
                }
            }
            _ => {}
        }
    }
}

check_builders!(RedactFields);

impl CheckAfter for RedactFields {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        _: &OperationContext,
        mut result: Value,
    ) -> Result<ResultDecision, AuthzError> {
        if !self.exempt.is_empty() && principal.get()?.has_any_authority(&self.exempt) {
            return Ok(ResultDecision::Release(result));
        }
        self.redact(&mut result);
        Ok(ResultDecision::Release(result))
    }
}

type VisibleFn = dyn Fn(&Principal, &Value) -> bool + Send + Sync;

/// Keeps only the array elements the caller may see.
///
/// Non-array results pass through untouched without resolving the
/// principal.
pub struct PostFilter {
    id: String,
    matcher: Arc<dyn Matcher>,
    visible: Box<VisibleFn>,
}

impl PostFilter {
    /// Creates the check with ID `"post-filter"`.
    pub fn new(visible: impl Fn(&Principal, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            id: "post-filter".into(),
            matcher: match_all(),
            visible: Box::new(visible),
        }
    }
}

check_builders!(PostFilter);

impl CheckAfter for PostFilter {
    fn id(&self) -> &str {
        &self.id
    }

    fn matcher(&self) -> Arc<dyn Matcher> {
        Arc::clone(&self.matcher)
    }

    fn decide(
        &self,
        principal: &PrincipalSupplier<'_>,
        _: &OperationContext,
        result: Value,
    ) -> Result<ResultDecision, AuthzError> {
        let Value::Array(items) = result else {
            return Ok(ResultDecision::Release(result));
        };
        let caller = principal.get()?;
        let kept = items
            .into_iter()
            .filter(|item| (self.visible)(caller, item))
            .collect();
        Ok(ResultDecision::Release(Value::Array(kept)))
    }
}

type AfterFn = dyn Fn(
        &PrincipalSupplier<'_>,
        &OperationContext,
        Value,
    ) -> Result<ResultDecision, AuthzError>
    + Send
    + Sync;

/// After-check backed by a closure.
pub struct FnAfterCheck {
    id: String,
    matcher: Arc<dyn Matcher>,
    decide_fn: Box<AfterFn>,
}

impl FnAfterCheck {
    /// Creates a check from `decide_fn`.
    pub fn new(
        id: impl Into<String>,
        decide_fn: impl Fn(
                &PrincipalSupplier<'_>,
                &OperationContext,
                Value,
            ) -> Result<ResultDecision, AuthzError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            matcher: match_all(),
            decide_fn: Box::new(decide_fn),
        }
    }
}

check_builders!(FnAfterCheck);

impl CheckAfter for FnAfterCheck {
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
        (self.decide_fn)(principal, ctx, result)
    }
}

impl fmt::Debug for FnAfterCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAfterCheck")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingResolver;
    use crate::{OperationPattern, TagMatcher};
    use palisade_types::{Operation, PrincipalId};
    use serde_json::json;

    fn ctx() -> OperationContext {
        OperationContext::new(Operation::new("docs", "get"), json!({"id": 1}))
    }

    fn alice() -> Principal {
        Principal::user(PrincipalId::named("alice"), "alice").with_authority("ROLE_USER")
    }

    fn admin() -> Principal {
        Principal::user(PrincipalId::named("root"), "root").with_authority("ROLE_ADMIN")
    }

    // ── PermitAll / DenyAll ─────────────────────────────────────

    #[test]
    fn permit_all_never_resolves() {
        let resolver = CountingResolver::new(alice());
        let supplier = resolver.supplier();
        assert_eq!(PermitAll::new().decide(&supplier, &ctx()), Ok(Decision::Grant));
        assert_eq!(resolver.count(), 0);
    }

    #[test]
    fn deny_all_names_itself() {
        let supplier = PrincipalSupplier::resolved(alice());
        let check = DenyAll::new().with_id("maintenance");
        assert_eq!(
            check.decide(&supplier, &ctx()),
            Ok(Decision::deny("maintenance", "operation is disabled"))
        );
    }

    #[test]
    fn builders_override_matcher() {
        let pattern = OperationPattern::parse("admin::*").expect("valid pattern");
        let check = DenyAll::new().with_matcher(Arc::new(pattern));
        assert!(check.matcher().matches(&Operation::new("admin", "reset")));
        assert!(!check.matcher().matches(&Operation::new("docs", "get")));
        assert!(PermitAll::default().matcher().matches(&Operation::new("x", "y")));
    }

    // ── Authenticated ───────────────────────────────────────────

    #[test]
    fn authenticated_denies_anonymous() {
        let supplier = PrincipalSupplier::resolved(Principal::Anonymous);
        let decision = Authenticated::new()
            .decide(&supplier, &ctx())
            .expect("check should evaluate");
        assert_eq!(decision, Decision::deny("authenticated", "authentication required"));
    }

    #[test]
    fn authenticated_grants_users_and_system() {
        for principal in [alice(), Principal::System] {
            let supplier = PrincipalSupplier::resolved(principal);
            assert_eq!(Authenticated::new().decide(&supplier, &ctx()), Ok(Decision::Grant));
        }
    }

    #[test]
    fn authenticated_propagates_resolver_failure() {
        let supplier =
            PrincipalSupplier::new(|| Err(AuthzError::PrincipalUnavailable("no session".into())));
        let err = Authenticated::new().decide(&supplier, &ctx()).unwrap_err();
        assert_eq!(err, AuthzError::PrincipalUnavailable("no session".into()));
        assert!(!err.is_denial());
    }

    // ── HasAnyAuthority ─────────────────────────────────────────

    #[test]
    fn has_any_authority_grants_on_match() {
        let check = HasAnyAuthority::new(["ROLE_ADMIN", "ROLE_USER"]);
        let supplier = PrincipalSupplier::resolved(alice());
        assert_eq!(check.decide(&supplier, &ctx()), Ok(Decision::Grant));
        assert_eq!(check.authorities().len(), 2);
    }

    #[test]
    fn has_any_authority_denies_otherwise() {
        let check = HasAnyAuthority::new(["ROLE_ADMIN"]).with_id("admins-only");
        let supplier = PrincipalSupplier::resolved(alice());
        assert_eq!(
            check.decide(&supplier, &ctx()),
            Ok(Decision::deny("admins-only", "requires one of [ROLE_ADMIN]"))
        );
    }

    #[test]
    fn has_any_authority_denies_system() {
        let check = HasAnyAuthority::new(["ROLE_ADMIN"]);
        let supplier = PrincipalSupplier::resolved(Principal::System);
        assert!(check
            .decide(&supplier, &ctx())
            .expect("check should evaluate")
            .is_deny());
    }

    // ── FnBeforeCheck ───────────────────────────────────────────

    #[test]
    fn fn_before_check_sees_arguments() {
        let check = FnBeforeCheck::new("positive-id", |_, ctx| {
            let ok = ctx.argument("id").and_then(Value::as_i64).is_some_and(|n| n > 0);
            Ok(Decision::from_granted(ok, "positive-id", "id must be positive"))
        })
        .with_matcher(Arc::new(TagMatcher::new("write")));

        let supplier = PrincipalSupplier::resolved(alice());
        assert_eq!(check.decide(&supplier, &ctx()), Ok(Decision::Grant));
        assert!(!check.matcher().matches(&Operation::new("docs", "get")));
        assert_eq!(check.id(), "positive-id");
    }

    // ── OwnerMatches ────────────────────────────────────────────

    #[test]
    fn owner_matches_releases_own_object() {
        let supplier = PrincipalSupplier::resolved(alice());
        let result = json!({"owner": "alice", "body": "hi"});
        assert_eq!(
            OwnerMatches::new("owner").decide(&supplier, &ctx(), result.clone()),
            Ok(ResultDecision::Release(result))
        );
    }

    #[test]
    fn owner_matches_denies_foreign_object() {
        let supplier = PrincipalSupplier::resolved(alice());
        let decision = OwnerMatches::new("owner")
            .decide(&supplier, &ctx(), json!({"owner": "bob"}))
            .expect("check should evaluate");
        assert_eq!(
            decision,
            ResultDecision::deny("owner-matches", "caller does not own the result ('owner')")
        );
    }

    #[test]
    fn owner_matches_checks_every_element() {
        let supplier = PrincipalSupplier::resolved(alice());
        let check = OwnerMatches::new("owner");

        let all_mine = json!([{"owner": "alice"}, {"owner": "alice"}]);
        assert!(check
            .decide(&supplier, &ctx(), all_mine)
            .expect("check should evaluate")
            .is_release());

        let mixed = json!([{"owner": "alice"}, {"owner": "bob"}]);
        assert!(check
            .decide(&supplier, &ctx(), mixed)
            .expect("check should evaluate")
            .is_deny());
    }

    #[test]
    fn owner_matches_denies_nameless_callers() {
        let check = OwnerMatches::new("owner");
        for principal in [Principal::System, Principal::Anonymous] {
            let supplier = PrincipalSupplier::resolved(principal);
            assert!(check
                .decide(&supplier, &ctx(), json!({"owner": "alice"}))
                .expect("check should evaluate")
                .is_deny());
        }
    }

    #[test]
    fn owner_matches_denies_missing_field() {
        let supplier = PrincipalSupplier::resolved(alice());
        assert!(OwnerMatches::new("owner")
            .decide(&supplier, &ctx(), json!({"title": "x"}))
            .expect("check should evaluate")
            .is_deny());
    }

    // ── RedactFields ────────────────────────────────────────────

    #[test]
    fn redact_fields_removes_keys() {
        let resolver = CountingResolver::new(alice());
        let supplier = resolver.supplier();
        let check = RedactFields::new(["ssn", "salary"]);

        let out = check
            .decide(
                &supplier,
                &ctx(),
                json!({"name": "bob", "ssn": "123", "salary": 10}),
            )
            .expect("check should evaluate");
        assert_eq!(out, ResultDecision::Release(json!({"name": "bob"})));
        assert_eq!(resolver.count(), 0);
    }

    #[test]
    fn redact_fields_element_wise() {
        let supplier = PrincipalSupplier::resolved(alice());
        let out = RedactFields::new(["ssn"])
            .decide(
                &supplier,
                &ctx(),
                json!([{"n": 1, "ssn": "a"}, {"n": 2}, 3]),
            )
            .expect("check should evaluate");
        assert_eq!(out, ResultDecision::Release(json!([{"n": 1}, {"n": 2}, 3])));
    }

    #[test]
    fn redact_fields_exempt_authority() {
        let check = RedactFields::new(["ssn"]).exempting(["ROLE_ADMIN"]);
        let result = json!({"ssn": "123"});

        let supplier = PrincipalSupplier::resolved(admin());
        assert_eq!(
            check.decide(&supplier, &ctx(), result.clone()),
            Ok(ResultDecision::Release(result.clone()))
        );

        let supplier = PrincipalSupplier::resolved(alice());
        assert_eq!(
            check.decide(&supplier, &ctx(), result),
            Ok(ResultDecision::Release(json!({})))
        );
    }

    // ── PostFilter ──────────────────────────────────────────────

    fn visible_to_owner() -> PostFilter {
        PostFilter::new(|caller, item| {
            item.get("owner").and_then(Value::as_str) == caller.name()
        })
    }

    #[test]
    fn post_filter_keeps_visible_elements() {
        let supplier = PrincipalSupplier::resolved(alice());
        let out = visible_to_owner()
            .decide(
                &supplier,
                &ctx(),
                json!([{"owner": "alice", "n": 1}, {"owner": "bob", "n": 2}]),
            )
            .expect("check should evaluate");
        assert_eq!(
            out,
            ResultDecision::Release(json!([{"owner": "alice", "n": 1}]))
        );
    }

    #[test]
    fn post_filter_passes_non_arrays_without_resolving() {
        let resolver = CountingResolver::new(alice());
        let supplier = resolver.supplier();
        let out = visible_to_owner()
            .decide(&supplier, &ctx(), json!({"owner": "bob"}))
            .expect("check should evaluate");
        assert_eq!(out, ResultDecision::Release(json!({"owner": "bob"})));
        assert_eq!(resolver.count(), 0);
    }

    // ── FnAfterCheck ────────────────────────────────────────────

    #[test]
    fn fn_after_check_transforms() {
        let check = FnAfterCheck::new("count", |_, _, result| {
            let n = result.as_array().map_or(0, Vec::len);
            Ok(ResultDecision::Release(json!({"count": n})))
        });
        let supplier = PrincipalSupplier::resolved(alice());
        assert_eq!(
            check.decide(&supplier, &ctx(), json!([1, 2, 3])),
            Ok(ResultDecision::Release(json!({"count": 3})))
        );
    }

    #[test]
    fn builtins_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PermitAll>();
        assert_send_sync::<DenyAll>();
        assert_send_sync::<Authenticated>();
        assert_send_sync::<HasAnyAuthority>();
        assert_send_sync::<FnBeforeCheck>();
        assert_send_sync::<OwnerMatches>();
        assert_send_sync::<RedactFields>();
        assert_send_sync::<PostFilter>();
        assert_send_sync::<FnAfterCheck>();
    }
}
