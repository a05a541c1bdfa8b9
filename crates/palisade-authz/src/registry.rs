//! Check registry: per-operation composers, built once and cached.
//!
//! Mutations take `&mut self`; resolution takes `&self` and fills an
//! internal cache behind a [`parking_lot::RwLock`], so a registry wrapped
//! in `Arc` can serve concurrent calls.

use crate::{AfterComposer, BeforeComposer, CheckAfter, CheckBefore, Phase};
use palisade_types::Operation;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Default bound on the number of cached operations.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// A registered check with metadata.
struct Registered<C: ?Sized> {
    check: Arc<C>,
    priority: i32,
    enabled: bool,
}

impl<C: ?Sized> Registered<C> {
    fn new(check: Arc<C>, priority: i32) -> Self {
        Self {
            check,
            priority,
            enabled: true,
        }
    }
}

/// Insert in priority order (stable: FIFO for same priority).
fn insert_sorted<C: ?Sized>(list: &mut Vec<Registered<C>>, entry: Registered<C>) {
    let pos = list
        .iter()
        .position(|r| r.priority > entry.priority)
        .unwrap_or(list.len());
    list.insert(pos, entry);
}

/// Composers applicable to one operation.
///
/// `None` means no check of that phase applies, and the phase is a no-op.
#[derive(Debug, Default)]
pub struct ResolvedChecks {
    /// Composed before-checks.
    pub before: Option<BeforeComposer>,
    /// Composed after-checks.
    pub after: Option<AfterComposer>,
}

impl ResolvedChecks {
    /// Returns `true` if no check of either phase applies.
    #[must_use]
    pub fn is_unguarded(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// Central registry for before- and after-checks.
///
/// Within each phase, checks are kept sorted by priority (ascending), ties
/// broken by registration order. That order is the evaluation order of
/// the composers built by [`resolve`](Self::resolve).
///
/// # Caching
///
/// Matchers are evaluated once per distinct [`Operation`]; the resulting
/// composers are cached and shared through `Arc`. Every mutation clears
/// the cache.
///
/// Operation descriptors are expected to come from a fixed set. The cache
/// holds at most [`DEFAULT_CACHE_CAPACITY`] operations (see
/// [`with_cache_capacity`](Self::with_cache_capacity)); once full,
/// operations not yet cached are resolved on every call.
pub struct CheckRegistry {
    before: Vec<Registered<dyn CheckBefore>>,
    after: Vec<Registered<dyn CheckAfter>>,
    cache: RwLock<HashMap<Operation, Arc<ResolvedChecks>>>,
    cache_capacity: usize,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            cache: RwLock::new(HashMap::new()),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Sets the maximum number of cached operations. `0` disables caching.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Registers a before-check. Returns the check's ID.
    pub fn register_before(&mut self, check: Arc<dyn CheckBefore>, priority: i32) -> String {
        let id = check.id().to_string();
        insert_sorted(&mut self.before, Registered::new(check, priority));
        self.invalidate();
        id
    }

    /// Registers an after-check. Returns the check's ID.
    pub fn register_after(&mut self, check: Arc<dyn CheckAfter>, priority: i32) -> String {
        let id = check.id().to_string();
        insert_sorted(&mut self.after, Registered::new(check, priority));
        self.invalidate();
        id
    }

    /// Unregisters every check (of either phase) with this ID. Returns
    /// `true` if any was removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.len();
        self.before.retain(|r| r.check.id() != id);
        self.after.retain(|r| r.check.id() != id);
        let found = self.len() < before;
        if found {
            self.invalidate();
        }
        found
    }

    /// Enables or disables every check with this ID. Returns `true` if
    /// any was found.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let mut found = false;
        for r in self.before.iter_mut().filter(|r| r.check.id() == id) {
            r.enabled = enabled;
            found = true;
        }
        for r in self.after.iter_mut().filter(|r| r.check.id() == id) {
            r.enabled = enabled;
            found = true;
        }
        if found {
            self.invalidate();
        }
        found
    }

    /// Returns `true` if a check (of either phase) with this ID is
    /// registered, enabled or not.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.before.iter().any(|r| r.check.id() == id)
            || self.after.iter().any(|r| r.check.id() == id)
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Returns `true` if no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of checks registered for `phase`.
    #[must_use]
    pub fn len_of(&self, phase: Phase) -> usize {
        match phase {
            Phase::Before => self.before.len(),
            Phase::After => self.after.len(),
        }
    }

    /// Returns the composers that apply to `operation`.
    ///
    /// Disabled checks and checks whose matcher rejects `operation` are
    /// left out. The result is cached until the next mutation, while the
    /// cache has room.
    pub fn resolve(&self, operation: &Operation) -> Arc<ResolvedChecks> {
        if let Some(hit) = self.cache.read().get(operation) {
            return Arc::clone(hit);
        }

        let resolved = Arc::new(self.build(operation));
        let mut cache = self.cache.write();
        // Another caller may have filled the slot in between.
        if let Some(hit) = cache.get(operation) {
            return Arc::clone(hit);
        }
        if cache.len() >= self.cache_capacity {
            tracing::trace!(operation = %operation, "composer cache full");
            return resolved;
        }
        cache.insert(operation.clone(), Arc::clone(&resolved));
        resolved
    }

    /// Number of operations with cached composers.
    #[must_use]
    pub fn cached_operations(&self) -> usize {
        self.cache.read().len()
    }

    fn build(&self, operation: &Operation) -> ResolvedChecks {
        let before: Vec<Arc<dyn CheckBefore>> = self
            .before
            .iter()
            .filter(|r| r.enabled && r.check.matcher().matches(operation))
            .map(|r| Arc::clone(&r.check))
            .collect();
        let after: Vec<Arc<dyn CheckAfter>> = self
            .after
            .iter()
            .filter(|r| r.enabled && r.check.matcher().matches(operation))
            .map(|r| Arc::clone(&r.check))
            .collect();

        tracing::debug!(
            operation = %operation,
            before = before.len(),
            after = after.len(),
            "built composers"
        );

        // Non-empty lists cannot fail to compose.
        ResolvedChecks {
            before: BeforeComposer::new(before).ok(),
            after: AfterComposer::new(after).ok(),
        }
    }

    fn invalidate(&mut self) {
        self.cache.get_mut().clear();
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids = |ids: Vec<&str>| ids.join(", ");
        f.debug_struct("CheckRegistry")
            .field(
                "before",
                &ids(self.before.iter().map(|r| r.check.id()).collect()),
            )
            .field(
                "after",
                &ids(self.after.iter().map(|r| r.check.id()).collect()),
            )
            .field("cached_operations", &self.cached_operations())
            .finish()
    }
}
