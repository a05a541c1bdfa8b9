//! Operation context: data passed to every check of one call.

use palisade_types::Operation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Descriptor and arguments of one invocation of a protected operation.
///
/// Created by the caller of the engine once per call and handed by
/// reference to every check of that call. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationContext {
    /// Which operation is being invoked.
    pub operation: Operation,

    /// Invocation arguments.
    pub arguments: Value,

    /// Free-form per-call attributes (request ID, client address, ...).
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl OperationContext {
    /// Creates a context for `operation` with the given arguments.
    #[must_use]
    pub fn new(operation: Operation, arguments: Value) -> Self {
        Self {
            operation,
            arguments,
            metadata: HashMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the named argument if `arguments` is an object holding it.
    #[must_use]
    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Shorthand for `self.operation.fqn()`.
    #[must_use]
    pub fn fqn(&self) -> String {
        self.operation.fqn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_ctx() -> OperationContext {
        OperationContext::new(
            Operation::new("docs", "get").with_tag("read"),
            json!({"id": 7}),
        )
    }

    #[test]
    fn new_has_no_metadata() {
        let ctx = test_ctx();
        assert!(ctx.metadata.is_empty());
        assert_eq!(ctx.fqn(), "docs::get");
    }

    #[test]
    fn argument_lookup() {
        let ctx = test_ctx();
        assert_eq!(ctx.argument("id"), Some(&json!(7)));
        assert_eq!(ctx.argument("missing"), None);
    }

    #[test]
    fn argument_lookup_on_non_object() {
        let ctx = OperationContext::new(Operation::new("a", "b"), json!([1, 2]));
        assert_eq!(ctx.argument("id"), None);
    }

    #[test]
    fn with_metadata() {
        let ctx = test_ctx().with_metadata("request_id", json!("req-1"));
        assert_eq!(ctx.metadata.get("request_id"), Some(&json!("req-1")));
    }

    #[test]
    fn serde_roundtrip() {
        let ctx = test_ctx().with_metadata("k", json!(1));
        let json = serde_json::to_string(&ctx).expect("context should serialize");
        let restored: OperationContext =
            serde_json::from_str(&json).expect("context should deserialize");
        assert_eq!(restored, ctx);
    }
}
