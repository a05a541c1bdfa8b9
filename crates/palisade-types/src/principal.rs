//! Principal (caller identity) types.
//!
//! A [`Principal`] is the resolved identity of whoever invoked a protected
//! operation. Resolving it can be expensive (session lookup, token
//! introspection), which is why the authorization engine only ever sees it
//! through a lazy supplier. This crate defines the resolved value only.

use crate::PrincipalId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The caller of a protected operation.
///
/// # Variants
///
/// | Variant | Authenticated | Authorities | Typical Use |
/// |---------|---------------|-------------|-------------|
/// | `User` | yes | granted set | Human or API client |
/// | `System` | yes | none | Internal housekeeping |
/// | `Anonymous` | no | none | Unauthenticated caller |
///
/// `System` is authenticated but holds no authorities, so authority-based
/// checks deny it unless they explicitly allow system callers.
///
/// # Example
///
/// ```
/// use palisade_types::{Principal, PrincipalId};
///
/// let user = Principal::user(PrincipalId::named("alice"), "alice")
///     .with_authority("ROLE_USER");
/// assert_eq!(user.name(), Some("alice"));
/// assert!(user.has_any_authority(["ROLE_ADMIN", "ROLE_USER"]));
///
/// assert!(Principal::System.is_authenticated());
/// assert!(!Principal::Anonymous.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// An authenticated user.
    User {
        /// Stable identifier.
        id: PrincipalId,
        /// Login or display name. Used by ownership checks.
        name: String,
        /// Granted authorities (roles, scopes).
        authorities: BTreeSet<String>,
    },

    /// Internal system caller.
    System,

    /// Unauthenticated caller.
    Anonymous,
}

impl Principal {
    /// Creates a user principal with no authorities.
    #[must_use]
    pub fn user(id: PrincipalId, name: impl Into<String>) -> Self {
        Self::User {
            id,
            name: name.into(),
            authorities: BTreeSet::new(),
        }
    }

    /// Adds an authority. No-op for `System` and `Anonymous`.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        if let Self::User { authorities, .. } = &mut self {
            authorities.insert(authority.into());
        }
        self
    }

    /// Returns `true` unless this is [`Principal::Anonymous`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Returns `true` if this is [`Principal::System`].
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns the user's name, or `None` for non-user principals.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::User { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Iterates the granted authorities. Empty for non-user principals.
    pub fn authorities(&self) -> impl Iterator<Item = &str> {
        let granted = match self {
            Self::User { authorities, .. } => Some(authorities),
            _ => None,
        };
        granted.into_iter().flatten().map(String::as_str)
    }

    /// Returns the user's ID, or `None` for non-user principals.
    #[must_use]
    pub fn id(&self) -> Option<&PrincipalId> {
        match self {
            Self::User { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Returns `true` if the principal holds `authority`.
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        match self {
            Self::User { authorities, .. } => authorities.contains(authority),
            _ => false,
        }
    }

    /// Returns `true` if the principal holds at least one of `wanted`.
    pub fn has_any_authority<I, S>(&self, wanted: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        wanted.into_iter().any(|a| self.has_authority(a.as_ref()))
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User { name, .. } => write!(f, "user:{name}"),
            Self::System => write!(f, "system"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}
