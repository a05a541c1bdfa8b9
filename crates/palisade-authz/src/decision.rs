//! Decision types returned by checks.
//!
//! `Default` is intentionally not implemented for either type: a check must
//! state its outcome explicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identification of a denial: which check objected and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// ID of the denying check.
    pub check: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Denial {
    /// Creates a denial attributed to `check`.
    #[must_use]
    pub fn new(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a before-check.
///
/// # Composition
///
/// Under deny-overrides-grant, `Deny` is terminal and both `Grant` and
/// `Abstain` are non-blocking. `Abstain` exists so that a check which has
/// no opinion on a call can say so without being counted as approval.
///
/// # Example
///
/// ```
/// use palisade_authz::Decision;
///
/// assert!(Decision::Grant.is_grant());
/// assert!(Decision::deny("owner", "not the owner").is_deny());
/// assert_eq!(Decision::Abstain.status_str(), "abstain");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Explicit approval.
    Grant,
    /// Explicit refusal. Terminal.
    Deny(Denial),
    /// No opinion.
    Abstain,
}

impl Decision {
    /// Shorthand for `Decision::Deny(Denial::new(check, reason))`.
    #[must_use]
    pub fn deny(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deny(Denial::new(check, reason))
    }

    /// Maps a boolean verdict: `true` grants, `false` denies.
    #[must_use]
    pub fn from_granted(granted: bool, check: &str, reason: impl Into<String>) -> Self {
        if granted {
            Self::Grant
        } else {
            Self::deny(check, reason)
        }
    }

    /// Returns `true` for [`Decision::Grant`].
    #[must_use]
    pub fn is_grant(&self) -> bool {
        matches!(self, Self::Grant)
    }

    /// Returns `true` for [`Decision::Deny`].
    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// Returns `true` for [`Decision::Abstain`].
    #[must_use]
    pub fn is_abstain(&self) -> bool {
        matches!(self, Self::Abstain)
    }

    /// Returns the status as a string ("grant", "deny", "abstain").
    #[must_use]
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Deny(_) => "deny",
            Self::Abstain => "abstain",
        }
    }
}

/// Outcome of an after-check.
///
/// `Release` carries the value handed to the next stage of the pipeline
/// (or to the caller, after the last stage). A check that does not want to
/// alter the result releases the value it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultDecision {
    /// Pass this (possibly transformed) value on.
    Release(Value),
    /// Withhold the result. Terminal.
    Deny(Denial),
}

impl ResultDecision {
    /// Shorthand for `ResultDecision::Deny(Denial::new(check, reason))`.
    #[must_use]
    pub fn deny(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deny(Denial::new(check, reason))
    }

    /// Returns `true` for [`ResultDecision::Release`].
    #[must_use]
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release(_))
    }

    /// Returns `true` for [`ResultDecision::Deny`].
    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grant_helpers() {
        let d = Decision::Grant;
        assert!(d.is_grant());
        assert!(!d.is_deny());
        assert!(!d.is_abstain());
        assert_eq!(d.status_str(), "grant");
    }

    #[test]
    fn deny_helpers() {
        let d = Decision::deny("c1", "nope");
        assert!(d.is_deny());
        assert_eq!(d.status_str(), "deny");
        assert_eq!(d, Decision::Deny(Denial::new("c1", "nope")));
    }

    #[test]
    fn abstain_helpers() {
        let d = Decision::Abstain;
        assert!(d.is_abstain());
        assert!(!d.is_grant());
        assert_eq!(d.status_str(), "abstain");
    }

    #[test]
    fn from_granted() {
        assert!(Decision::from_granted(true, "c", "r").is_grant());
        assert_eq!(
            Decision::from_granted(false, "c", "r"),
            Decision::deny("c", "r")
        );
    }

    #[test]
    fn result_decision_helpers() {
        let r = ResultDecision::Release(json!([1, 2]));
        assert!(r.is_release());
        assert!(!r.is_deny());

        let d = ResultDecision::deny("owner", "not yours");
        assert!(d.is_deny());
        assert!(!d.is_release());
    }
}
