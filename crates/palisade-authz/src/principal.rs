//! Lazily resolved principal.
//!
//! Checks receive a [`PrincipalSupplier`] rather than a resolved
//! [`Principal`]. A check that can decide without knowing the caller
//! (e.g. it abstains for this operation) never pays for the lookup.

use crate::AuthzError;
use palisade_types::Principal;
use std::cell::{Cell, OnceCell};
use std::fmt;

type Resolver<'a> = Box<dyn Fn() -> Result<Principal, AuthzError> + 'a>;

/// Deferred accessor for the calling identity of one call.
///
/// The resolver runs on the first [`get`](Self::get) and its successful
/// result is kept for the rest of the call, so it runs at most once per
/// call however many checks ask. A failed resolution is not kept; the next
/// `get` tries again.
///
/// Created per call and dropped with it. Not shared across threads.
///
/// # Example
///
/// ```
/// use palisade_authz::PrincipalSupplier;
/// use palisade_types::Principal;
///
/// let supplier = PrincipalSupplier::new(|| Ok(Principal::System));
/// assert!(!supplier.is_resolved());
///
/// assert_eq!(supplier.get().unwrap(), &Principal::System);
/// assert_eq!(supplier.get().unwrap(), &Principal::System);
/// assert_eq!(supplier.resolutions(), 1);
/// ```
pub struct PrincipalSupplier<'a> {
    resolve: Resolver<'a>,
    resolved: OnceCell<Principal>,
    resolutions: Cell<usize>,
}

impl<'a> PrincipalSupplier<'a> {
    /// Creates a supplier around a resolver closure.
    pub fn new(resolve: impl Fn() -> Result<Principal, AuthzError> + 'a) -> Self {
        Self {
            resolve: Box::new(resolve),
            resolved: OnceCell::new(),
            resolutions: Cell::new(0),
        }
    }

    /// Creates a supplier that is already resolved to `principal`.
    #[must_use]
    pub fn resolved(principal: Principal) -> Self {
        let resolved = OnceCell::new();
        let _ = resolved.set(principal);
        Self {
            resolve: Box::new(|| Err(AuthzError::PrincipalUnavailable("already resolved".into()))),
            resolved,
            resolutions: Cell::new(0),
        }
    }

    /// Resolves (once) and returns the principal.
    ///
    /// # Errors
    ///
    /// Returns whatever the resolver returned on failure, typically
    /// [`AuthzError::PrincipalUnavailable`].
    pub fn get(&self) -> Result<&Principal, AuthzError> {
        if let Some(principal) = self.resolved.get() {
            return Ok(principal);
        }
        self.resolutions.set(self.resolutions.get() + 1);
        let principal = (self.resolve)()?;
        Ok(self.resolved.get_or_init(|| principal))
    }

    /// Returns `true` once a principal has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns how many times the resolver has run.
    #[must_use]
    pub fn resolutions(&self) -> usize {
        self.resolutions.get()
    }
}

impl fmt::Debug for PrincipalSupplier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalSupplier")
            .field("resolved", &self.resolved.get())
            .field("resolutions", &self.resolutions.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_types::PrincipalId;

    #[test]
    fn resolver_not_called_until_get() {
        let calls = Cell::new(0);
        let supplier = PrincipalSupplier::new(|| {
            calls.set(calls.get() + 1);
            Ok(Principal::Anonymous)
        });
        assert_eq!(calls.get(), 0);
        assert!(!supplier.is_resolved());
        assert_eq!(supplier.resolutions(), 0);
    }

    #[test]
    fn resolution_is_memoised() {
        let calls = Cell::new(0);
        let supplier = PrincipalSupplier::new(|| {
            calls.set(calls.get() + 1);
            Ok(Principal::user(PrincipalId::named("alice"), "alice"))
        });

        let first = supplier.get().expect("resolver succeeds");
        assert_eq!(first.name(), Some("alice"));
        let second = supplier.get().expect("memoised value");
        assert_eq!(second.name(), Some("alice"));

        assert_eq!(calls.get(), 1);
        assert_eq!(supplier.resolutions(), 1);
        assert!(supplier.is_resolved());
    }

    #[test]
    fn failure_is_not_memoised() {
        let calls = Cell::new(0);
        let supplier = PrincipalSupplier::new(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(AuthzError::PrincipalUnavailable("store offline".into()))
            } else {
                Ok(Principal::System)
            }
        });

        assert_eq!(
            supplier.get(),
            Err(AuthzError::PrincipalUnavailable("store offline".into()))
        );
        assert!(!supplier.is_resolved());
        assert_eq!(supplier.get(), Ok(&Principal::System));
        assert_eq!(supplier.resolutions(), 2);
    }

    #[test]
    fn pre_resolved_never_calls_resolver() {
        let supplier = PrincipalSupplier::resolved(Principal::System);
        assert!(supplier.is_resolved());
        assert_eq!(supplier.get(), Ok(&Principal::System));
        assert_eq!(supplier.resolutions(), 0);
    }
}
