//! Authorization decisions for protected operations.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  palisade-types : Principal, Operation, ErrorCode           │
//! └─────────────────────────────────────────────────────────────┘
//!           ↕
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Decision Engine               ◄── HERE    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  palisade-authz : Matcher, Check traits, Composers,         │
//! │                   Registry, Interceptor, Config             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Overview
//!
//! Every call to a protected operation passes through two phases:
//!
//! 1. **Before**: may the caller invoke this operation with these
//!    arguments? Checks vote; one `Deny` wins over any number of grants.
//! 2. **After**: may the caller see this result, and in what shape?
//!    Checks form a pipeline over the result.
//!
//! # Core Concepts
//!
//! ## Matchers
//!
//! A [`Matcher`] decides which operations a check applies to, from the
//! [`Operation`](palisade_types::Operation) descriptor alone:
//!
//! ```text
//! <namespace>::<name>     each segment: exact | prefix* | *
//! ```
//!
//! Examples: `"docs::get"`, `"docs::list*"`, `"*::*"`. Tags are matched
//! with [`TagMatcher`]; matchers combine with [`MatcherUnion`] and
//! [`MatchBoth`].
//!
//! ## Checks
//!
//! ```ignore
//! pub trait CheckBefore: Send + Sync {
//!     fn id(&self) -> &str;
//!     fn matcher(&self) -> Arc<dyn Matcher>;
//!     fn decide(&self, principal: &PrincipalSupplier<'_>, ctx: &OperationContext)
//!         -> Result<Decision, AuthzError>;
//! }
//! ```
//!
//! [`CheckAfter`] has the same shape and additionally receives the result
//! by value, returning a [`ResultDecision`].
//!
//! ## Decisions
//!
//! - [`Decision::Grant`]: approve, keep evaluating
//! - [`Decision::Abstain`]: no opinion, keep evaluating
//! - [`Decision::Deny`]: refuse, stop
//!
//! A check that cannot decide returns `Err`. Faults are never turned into
//! denials; see [`AuthzError`].
//!
//! ## Lazy principal
//!
//! Checks receive a [`PrincipalSupplier`]. The caller's identity is looked
//! up only if some check asks for it, and at most once per call.
//!
//! ## Composers
//!
//! [`BeforeComposer`] (deny-overrides-grant) and [`AfterComposer`]
//! (sequential pipeline) turn an ordered list of checks into one check.
//!
//! ## Registry and interceptor
//!
//! [`CheckRegistry`] holds checks by priority and caches the composers
//! for each operation. [`AuthorizationInterceptor`] wraps a call with
//! both phases and reports outcomes to [`AuthorizationObserver`]s.
//!
//! ## Configuration
//!
//! [`ChecksConfig`] and [`CheckDef`] declare built-in checks in TOML.
//!
//! # Example
//!
//! ```
//! use palisade_authz::{
//!     AuthorizationInterceptor, Authenticated, CheckRegistry, OperationContext,
//!     OperationPattern, OwnerMatches, PrincipalSupplier,
//! };
//! use palisade_types::{Operation, Principal, PrincipalId};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = CheckRegistry::new();
//! registry.register_before(Arc::new(Authenticated::new()), 10);
//! let docs_get = Arc::new(OperationPattern::parse("docs::get")?);
//! registry.register_after(Arc::new(OwnerMatches::new("owner").with_matcher(docs_get)), 100);
//! let interceptor = AuthorizationInterceptor::new(Arc::new(registry));
//!
//! let ctx = OperationContext::new(Operation::new("docs", "get"), json!({"id": 7}));
//! let alice = Principal::user(PrincipalId::named("alice"), "alice");
//! let supplier = PrincipalSupplier::new(|| Ok(alice.clone()));
//!
//! let doc = interceptor
//!     .invoke(&ctx, &supplier, |_| Ok::<_, std::io::Error>(json!({"id": 7, "owner": "alice"})))
//!     .expect("alice owns document 7");
//! assert_eq!(doc["owner"], "alice");
//! assert_eq!(supplier.resolutions(), 1);
//! # Ok::<(), palisade_authz::AuthzError>(())
//! ```

mod builtin;
pub mod check;
mod compose;
mod config;
mod context;
mod decision;
mod error;
mod interceptor;
mod matcher;
mod observer;
mod phase;
mod principal;
mod registry;

// Re-export core types
pub use builtin::{
    Authenticated, DenyAll, FnAfterCheck, FnBeforeCheck, HasAnyAuthority, OwnerMatches,
    PermitAll, PostFilter, RedactFields,
};
pub use check::{CheckAfter, CheckBefore};
pub use compose::{AfterComposer, BeforeComposer};
pub use config::{CheckDef, CheckDefValidationError, CheckKind, ChecksConfig};
pub use context::OperationContext;
pub use decision::{Decision, Denial, ResultDecision};
pub use error::AuthzError;
pub use interceptor::{AuthorizationInterceptor, InvocationError};
pub use matcher::{
    MatchAll, MatchBoth, Matcher, MatcherUnion, OperationPattern, PatternSegment, TagMatcher,
};
pub use observer::{AuthorizationEvent, AuthorizationObserver, Outcome, TracingObserver};
pub use phase::{Phase, UnknownPhase};
pub use principal::PrincipalSupplier;
pub use registry::{CheckRegistry, ResolvedChecks, DEFAULT_CACHE_CAPACITY};

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for the authorization engine.
    //!
    //! Provides mock checks, a counting principal resolver and a recording
    //! observer.
    pub use crate::check::testing::{CountingResolver, MockAfterCheck, MockBeforeCheck};
    pub use crate::observer::testing::RecordingObserver;
}
