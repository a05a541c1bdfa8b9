//! Matchers: which checks apply to which operations.
//!
//! A [`Matcher`] is a pure predicate over an [`Operation`] descriptor. The
//! registry evaluates matchers once per distinct operation when it builds
//! the composed checks for that operation, never per call.
//!
//! # Operation patterns
//!
//! ```text
//! PATTERN := <namespace>::<name>
//! SEGMENT := "*" | <prefix>"*" | <exact>
//! ```
//!
//! Examples: `"docs::read"`, `"docs::*"`, `"*::delete"`, `"docs::get*"`.

use crate::AuthzError;
use palisade_types::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Predicate deciding whether a check applies to an operation.
///
/// Implementations must be pure and total: same descriptor, same answer,
/// no side effects, no panics.
///
/// Closures `Fn(&Operation) -> bool + Send + Sync` are matchers.
pub trait Matcher: Send + Sync {
    /// Returns `true` if the owning check applies to `operation`.
    fn matches(&self, operation: &Operation) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Operation) -> bool + Send + Sync,
{
    fn matches(&self, operation: &Operation) -> bool {
        self(operation)
    }
}

/// A single segment of an [`OperationPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternSegment {
    /// Matches exactly the given string.
    Exact(String),
    /// Matches any string starting with the given prefix.
    Prefix(String),
    /// Matches any string.
    Wildcard,
}

impl PatternSegment {
    /// Returns `true` if this segment matches `value`.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => s == value,
            Self::Prefix(p) => value.starts_with(p.as_str()),
            Self::Wildcard => true,
        }
    }

    fn parse(s: &str) -> Self {
        if s == "*" {
            Self::Wildcard
        } else if let Some(prefix) = s.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(s.to_string())
        }
    }
}

impl fmt::Display for PatternSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => f.write_str(s),
            Self::Prefix(p) => write!(f, "{p}*"),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// Parsed `namespace::name` pattern.
///
/// # Example
///
/// ```
/// use palisade_authz::{Matcher, OperationPattern};
/// use palisade_types::Operation;
///
/// let pattern = OperationPattern::parse("docs::get*").unwrap();
/// assert!(pattern.matches(&Operation::new("docs", "get_one")));
/// assert!(!pattern.matches(&Operation::new("docs", "delete")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationPattern {
    /// Namespace segment.
    pub namespace: PatternSegment,
    /// Operation name segment.
    pub name: PatternSegment,
}

impl OperationPattern {
    /// Parses a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidPattern`] if the string is empty, has no
    /// `::` separator, or either side of it is empty.
    pub fn parse(pattern: &str) -> Result<Self, AuthzError> {
        if pattern.is_empty() {
            return Err(AuthzError::InvalidPattern("empty pattern".into()));
        }

        let (namespace, name) = pattern.split_once("::").ok_or_else(|| {
            AuthzError::InvalidPattern(format!("missing '::' separator in '{pattern}'"))
        })?;

        if namespace.is_empty() {
            return Err(AuthzError::InvalidPattern("empty namespace".into()));
        }
        if name.is_empty() {
            return Err(AuthzError::InvalidPattern("empty operation name".into()));
        }

        Ok(Self {
            namespace: PatternSegment::parse(namespace),
            name: PatternSegment::parse(name),
        })
    }

    /// Pattern matching every operation (`*::*`).
    #[must_use]
    pub fn any() -> Self {
        Self {
            namespace: PatternSegment::Wildcard,
            name: PatternSegment::Wildcard,
        }
    }
}

impl Matcher for OperationPattern {
    fn matches(&self, operation: &Operation) -> bool {
        self.namespace.matches(&operation.namespace) && self.name.matches(&operation.name)
    }
}

impl FromStr for OperationPattern {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OperationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)
    }
}

/// Matches operations carrying a given tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatcher {
    tag: String,
}

impl TagMatcher {
    /// Creates a matcher for `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Matcher for TagMatcher {
    fn matches(&self, operation: &Operation) -> bool {
        operation.has_tag(&self.tag)
    }
}

/// Matches every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl Matcher for MatchAll {
    fn matches(&self, _operation: &Operation) -> bool {
        true
    }
}

/// Matches operations that satisfy both inner matchers.
///
/// Used by configuration when a definition constrains both a pattern and
/// a tag.
pub struct MatchBoth {
    left: Arc<dyn Matcher>,
    right: Arc<dyn Matcher>,
}

impl MatchBoth {
    /// Creates the conjunction of `left` and `right`.
    #[must_use]
    pub fn new(left: Arc<dyn Matcher>, right: Arc<dyn Matcher>) -> Self {
        Self { left, right }
    }
}

impl Matcher for MatchBoth {
    fn matches(&self, operation: &Operation) -> bool {
        self.left.matches(operation) && self.right.matches(operation)
    }
}

/// Logical OR over a non-empty set of matchers.
///
/// A composed check applies if any of its constituents would apply.
///
/// # Example
///
/// ```
/// use palisade_authz::{Matcher, MatcherUnion, TagMatcher};
/// use palisade_types::Operation;
/// use std::sync::Arc;
///
/// let union = MatcherUnion::new(vec![
///     Arc::new(TagMatcher::new("read")),
///     Arc::new(TagMatcher::new("write")),
/// ])
/// .unwrap();
///
/// assert!(union.matches(&Operation::new("docs", "get").with_tag("read")));
/// assert!(!union.matches(&Operation::new("docs", "drop").with_tag("delete")));
/// ```
#[derive(Clone)]
pub struct MatcherUnion {
    members: Vec<Arc<dyn Matcher>>,
}

impl MatcherUnion {
    /// Creates the union of `members`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::EmptyConfiguration`] if `members` is empty.
    pub fn new(members: Vec<Arc<dyn Matcher>>) -> Result<Self, AuthzError> {
        if members.is_empty() {
            return Err(AuthzError::EmptyConfiguration {
                composer: "matcher",
            });
        }
        Ok(Self { members })
    }

    /// Number of constituent matchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a union cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Matcher for MatcherUnion {
    fn matches(&self, operation: &Operation) -> bool {
        self.members.iter().any(|m| m.matches(operation))
    }
}

impl fmt::Debug for MatcherUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherUnion")
            .field("members", &self.members.len())
            .finish()
    }
}
