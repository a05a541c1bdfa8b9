//! Check configuration: declarative check definitions.
//!
//! Builds built-in checks from TOML and installs them into a
//! [`CheckRegistry`].
//!
//! # Example TOML
//!
//! ```toml
//! [[checks]]
//! id = "require-login"
//! pattern = "docs::*"
//! phase = "before"
//! kind = "authenticated"
//! priority = 10
//!
//! [[checks]]
//! id = "editors"
//! pattern = "docs::*"
//! tag = "write"
//! phase = "before"
//! kind = "has_any_authority"
//! authorities = ["ROLE_EDITOR", "ROLE_ADMIN"]
//!
//! [[checks]]
//! id = "owner-only"
//! pattern = "docs::get*"
//! phase = "after"
//! kind = "owner_matches"
//! field = "owner"
//! ```

use crate::{
    AuthzError, Authenticated, CheckAfter, CheckBefore, CheckRegistry, DenyAll, HasAnyAuthority,
    MatchBoth, Matcher, OperationPattern, OwnerMatches, PermitAll, Phase, RedactFields, TagMatcher,
    UnknownPhase,
};
use palisade_types::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Top-level checks configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChecksConfig {
    /// Declarative check definitions.
    pub checks: Vec<CheckDef>,
}

/// Which built-in check a definition instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// [`PermitAll`].
    PermitAll,
    /// [`DenyAll`].
    DenyAll,
    /// [`Authenticated`].
    Authenticated,
    /// [`HasAnyAuthority`]; needs `authorities`.
    HasAnyAuthority,
    /// [`OwnerMatches`]; needs `field`.
    OwnerMatches,
    /// [`RedactFields`]; needs `fields`, `authorities` exempt.
    RedactFields,
}

impl CheckKind {
    /// The phase this kind of check runs in.
    #[must_use]
    pub fn phase(self) -> Phase {
        match self {
            Self::PermitAll | Self::DenyAll | Self::Authenticated | Self::HasAnyAuthority => {
                Phase::Before
            }
            Self::OwnerMatches | Self::RedactFields => Phase::After,
        }
    }

    /// Returns the configuration name (e.g. `"has_any_authority"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PermitAll => "permit_all",
            Self::DenyAll => "deny_all",
            Self::Authenticated => "authenticated",
            Self::HasAnyAuthority => "has_any_authority",
            Self::OwnerMatches => "owner_matches",
            Self::RedactFields => "redact_fields",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declarative check definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckDef {
    /// Unique check ID. Generated from `"<phase>-<index>"` if not
    /// specified, with a numeric suffix when that ID is taken.
    pub id: Option<String>,

    /// Operation pattern: which operations this check targets.
    pub pattern: String,

    /// Additionally require this tag on the operation.
    pub tag: Option<String>,

    /// `"before"` or `"after"`.
    pub phase: String,

    /// Built-in check to instantiate.
    pub kind: CheckKind,

    /// Authorities for `has_any_authority`; exemptions for `redact_fields`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,

    /// Owner field for `owner_matches`.
    pub field: Option<String>,

    /// Fields removed by `redact_fields`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Priority (lower = earlier). Default: 100.
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Whether the check is enabled. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_priority() -> i32 {
    100
}

fn default_enabled() -> bool {
    true
}

/// Errors from validating a [`CheckDef`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckDefValidationError {
    /// Invalid operation pattern.
    #[error("check '{label}': {source}")]
    InvalidPattern { label: String, source: AuthzError },

    /// Invalid phase string.
    #[error("check '{label}': {source}")]
    InvalidPhase { label: String, source: UnknownPhase },

    /// The kind cannot run in the declared phase.
    #[error("check '{label}': kind '{kind}' runs in the {expected} phase, not {declared}")]
    PhaseMismatch {
        label: String,
        kind: CheckKind,
        expected: Phase,
        declared: Phase,
    },

    /// A parameter the kind needs is missing or empty.
    #[error("check '{label}': kind '{kind}' requires '{parameter}'")]
    MissingParameter {
        label: String,
        kind: CheckKind,
        parameter: &'static str,
    },

    /// The ID is declared twice, or is already registered.
    #[error("check '{id}': id is already in use")]
    DuplicateId { id: String },
}

impl ErrorCode for CheckDefValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "CONFIG_INVALID_PATTERN",
            Self::InvalidPhase { .. } => "CONFIG_INVALID_PHASE",
            Self::PhaseMismatch { .. } => "CONFIG_PHASE_MISMATCH",
            Self::MissingParameter { .. } => "CONFIG_MISSING_PARAMETER",
            Self::DuplicateId { .. } => "CONFIG_DUPLICATE_ID",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// A check built from a definition, ready to register.
enum BuiltCheck {
    Before(Arc<dyn CheckBefore>),
    After(Arc<dyn CheckAfter>),
}

impl CheckDef {
    /// Validates this check definition.
    ///
    /// Checks:
    /// - `pattern` is a valid operation pattern
    /// - `phase` is `"before"` or `"after"`
    /// - `kind` runs in `phase`
    /// - the parameters `kind` needs are present
    pub fn validate(&self) -> Result<(), CheckDefValidationError> {
        let label = self.id.as_deref().unwrap_or("<anonymous>");
        self.build(label).map(|_| ())
    }

    fn build(&self, id: &str) -> Result<BuiltCheck, CheckDefValidationError> {
        let label = self.id.as_deref().unwrap_or("<anonymous>").to_string();

        let pattern = OperationPattern::parse(&self.pattern).map_err(|source| {
            CheckDefValidationError::InvalidPattern {
                label: label.clone(),
                source,
            }
        })?;
        let declared = Phase::from_str(&self.phase).map_err(|source| {
            CheckDefValidationError::InvalidPhase {
                label: label.clone(),
                source,
            }
        })?;

        let expected = self.kind.phase();
        if declared != expected {
            return Err(CheckDefValidationError::PhaseMismatch {
                label,
                kind: self.kind,
                expected,
                declared,
            });
        }

        let missing = |parameter| CheckDefValidationError::MissingParameter {
            label: label.clone(),
            kind: self.kind,
            parameter,
        };

        let pattern: Arc<dyn Matcher> = Arc::new(pattern);
        let matcher = match &self.tag {
            Some(tag) => Arc::new(MatchBoth::new(pattern, Arc::new(TagMatcher::new(tag.clone()))))
                as Arc<dyn Matcher>,
            None => pattern,
        };

        let built = match self.kind {
            CheckKind::PermitAll => {
                BuiltCheck::Before(Arc::new(PermitAll::new().with_id(id).with_matcher(matcher)))
            }
            CheckKind::DenyAll => {
                BuiltCheck::Before(Arc::new(DenyAll::new().with_id(id).with_matcher(matcher)))
            }
            CheckKind::Authenticated => BuiltCheck::Before(Arc::new(
                Authenticated::new().with_id(id).with_matcher(matcher),
            )),
            CheckKind::HasAnyAuthority => {
                if self.authorities.is_empty() {
                    return Err(missing("authorities"));
                }
                BuiltCheck::Before(Arc::new(
                    HasAnyAuthority::new(self.authorities.iter().cloned())
                        .with_id(id)
                        .with_matcher(matcher),
                ))
            }
            CheckKind::OwnerMatches => {
                let field = self.field.as_deref().ok_or_else(|| missing("field"))?;
                BuiltCheck::After(Arc::new(
                    OwnerMatches::new(field).with_id(id).with_matcher(matcher),
                ))
            }
            CheckKind::RedactFields => {
                if self.fields.is_empty() {
                    return Err(missing("fields"));
                }
                BuiltCheck::After(Arc::new(
                    RedactFields::new(self.fields.iter().cloned())
                        .exempting(self.authorities.iter().cloned())
                        .with_id(id)
                        .with_matcher(matcher),
                ))
            }
        };
        Ok(built)
    }
}

impl ChecksConfig {
    /// Parses a configuration from TOML.
    ///
    /// Only the shape is checked here; call
    /// [`validate_all`](Self::validate_all) or [`install`](Self::install)
    /// for semantic validation.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Merges another config into this one.
    ///
    /// A definition in `other` whose `id` matches an existing one replaces
    /// it in place. New definitions (and anonymous ones) are appended.
    pub fn merge(&mut self, other: &Self) {
        for def in &other.checks {
            let existing = def.id.as_deref().and_then(|id| {
                self.checks
                    .iter_mut()
                    .find(|c| c.id.as_deref() == Some(id))
            });
            match existing {
                Some(slot) => *slot = def.clone(),
                None => self.checks.push(def.clone()),
            }
        }
    }

    /// Validates all check definitions in this config.
    ///
    /// Returns all validation errors (not just the first one), including
    /// one [`DuplicateId`](CheckDefValidationError::DuplicateId) per ID
    /// declared more than once.
    pub fn validate_all(&self) -> Vec<CheckDefValidationError> {
        let mut errors = self.duplicate_ids();
        errors.extend(self.checks.iter().filter_map(|c| c.validate().err()));
        errors
    }

    fn duplicate_ids(&self) -> Vec<CheckDefValidationError> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.checks
            .iter()
            .filter_map(|c| c.id.as_deref())
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .map(|id| CheckDefValidationError::DuplicateId { id: id.to_string() })
            .collect()
    }

    /// Registers every enabled definition into `registry`.
    ///
    /// Nothing is registered unless every definition (enabled or not)
    /// is valid, no ID is declared twice, and no enabled definition's ID
    /// is already registered. Anonymous definitions get IDs that clash
    /// with neither. Returns the number of checks registered.
    pub fn install(
        &self,
        registry: &mut CheckRegistry,
    ) -> Result<usize, Vec<CheckDefValidationError>> {
        let mut built = Vec::with_capacity(self.checks.len());
        let mut errors = self.duplicate_ids();
        let mut taken: HashSet<String> = self.checks.iter().filter_map(|c| c.id.clone()).collect();

        for (index, def) in self.checks.iter().enumerate() {
            let id = match &def.id {
                Some(id) => {
                    if def.enabled && registry.contains(id) {
                        errors.push(CheckDefValidationError::DuplicateId { id: id.clone() });
                    }
                    id.clone()
                }
                None => {
                    let id = fresh_id(&format!("{}-{index}", def.phase), |candidate| {
                        taken.contains(candidate) || registry.contains(candidate)
                    });
                    taken.insert(id.clone());
                    id
                }
            };
            match def.build(&id) {
                Ok(check) if def.enabled => built.push((check, def.priority)),
                Ok(_) => {}
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "check configuration rejected");
            return Err(errors);
        }

        let count = built.len();
        for (check, priority) in built {
            match check {
                BuiltCheck::Before(check) => registry.register_before(check, priority),
                BuiltCheck::After(check) => registry.register_after(check, priority),
            };
        }
        tracing::debug!(count, "installed configured checks");
        Ok(count)
    }
}

/// `base`, or `base-1`, `base-2`, ... whichever is first not `taken`.
fn fresh_id(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = base.to_string();
    let mut n = 0;
    while taken(&candidate) {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    candidate
}
