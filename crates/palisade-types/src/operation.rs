//! Protected operation descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Descriptor of a protected operation.
///
/// An operation is addressed as `namespace::name` (its FQN) and may carry
/// free-form tags such as `"read"` or `"write"` that matchers can select on.
///
/// The descriptor is what check applicability is decided on, and it is the
/// key under which per-operation composed checks are cached. It therefore
/// contains no invocation arguments.
///
/// # Example
///
/// ```
/// use palisade_types::Operation;
///
/// let op = Operation::new("billing", "refund").with_tag("write");
/// assert_eq!(op.fqn(), "billing::refund");
/// assert_eq!(op.to_string(), "billing::refund[write]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// Namespace (e.g. a service or module name).
    pub namespace: String,
    /// Operation name within the namespace.
    pub name: String,
    /// Tags describing the operation. Ordered for stable hashing and display.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Operation {
    /// Creates an untagged operation descriptor.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Returns the fully qualified name in `namespace::name` format.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    /// Returns `true` if the operation carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)?;
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            write!(f, "[{}]", tags.join(","))?;
        }
        Ok(())
    }
}
