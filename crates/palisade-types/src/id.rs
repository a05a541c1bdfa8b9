//! Identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic principal IDs (UUID v5).
const PALISADE_NAMESPACE: Uuid = uuid!("5b0e6f1c-2a47-4c1e-9d3a-8f61c0b7e2d4");

/// Identifier for an authenticated principal.
///
/// # UUID Strategy
///
/// - [`PrincipalId::new`]: random UUID v4 (interactive sessions, tests)
/// - [`PrincipalId::named`]: deterministic UUID v5 derived from a stable
///   external identifier (e.g. a login name), so the same user maps to the
///   same ID across processes
///
/// # Example
///
/// ```
/// use palisade_types::PrincipalId;
///
/// assert_ne!(PrincipalId::new(), PrincipalId::new());
/// assert_eq!(PrincipalId::named("alice"), PrincipalId::named("alice"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Creates a new random principal ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic principal ID from a stable external name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(Uuid::new_v5(&PALISADE_NAMESPACE, name.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}
