//! Observable ordered behavior list

use crate::behavior::{fold_behaviors, BehaviorRef};
use crate::event::{ChangeNotifier, SubscriptionId};
use parking_lot::RwLock;
use specimen_kernel::{BuilderRef, GraphError};
use std::fmt;
use std::sync::Arc;

/// The behavior list changed
#[derive(Debug, Clone)]
pub struct BehaviorsChanged {
    /// Behaviors after the change, in fold order
    pub behaviors: Vec<BehaviorRef>,
}

/// Live, ordered list of behaviors
///
/// Every mutation raises one [`BehaviorsChanged`] so owners can re-fold their
/// pipeline. Behaviors are compared by identity.
#[derive(Default)]
pub struct BehaviorList {
    items: RwLock<Vec<BehaviorRef>>,
    notifier: ChangeNotifier<BehaviorsChanged>,
}

impl BehaviorList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create list holding `behaviors`
    #[must_use]
    pub fn with_behaviors(behaviors: Vec<BehaviorRef>) -> Self {
        Self {
            items: RwLock::new(behaviors),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Current behaviors, in fold order
    #[must_use]
    pub fn snapshot(&self) -> Vec<BehaviorRef> {
        self.items.read().clone()
    }

    /// Number of behaviors
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check for no behaviors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Behavior at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BehaviorRef> {
        self.items.read().get(index).cloned()
    }

    /// Position of `behavior`
    #[must_use]
    pub fn index_of(&self, behavior: &BehaviorRef) -> Option<usize> {
        self.items
            .read()
            .iter()
            .position(|existing| Arc::ptr_eq(existing, behavior))
    }

    /// Check whether `behavior` is in the list
    #[must_use]
    pub fn contains(&self, behavior: &BehaviorRef) -> bool {
        self.index_of(behavior).is_some()
    }

    /// Append `behavior`, making it outermost
    pub fn add(&self, behavior: BehaviorRef) {
        let len = {
            let mut items = self.items.write();
            items.push(behavior);
            items.len()
        };
        self.changed("add", len);
    }

    /// Insert `behavior` before position `index`
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] when `index > len`.
    pub fn insert(&self, index: usize, behavior: BehaviorRef) -> Result<(), GraphError> {
        self.mutate("insert", |items| {
            if index > items.len() {
                return Err(GraphError::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.insert(index, behavior);
            Ok(())
        })
    }

    /// Remove the behavior at `index`, returning it
    ///
    /// # Errors
    /// Returns [`GraphError::IndexOutOfRange`] for a bad index.
    pub fn remove_at(&self, index: usize) -> Result<BehaviorRef, GraphError> {
        self.mutate("remove_at", |items| {
            if index >= items.len() {
                return Err(GraphError::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            Ok(items.remove(index))
        })
    }

    /// Remove `behavior` if present
    pub fn remove(&self, behavior: &BehaviorRef) -> bool {
        match self.index_of(behavior) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Keep only behaviors accepted by `keep`
    ///
    /// Fires no event when nothing was removed.
    pub fn retain<F>(&self, keep: F)
    where
        F: Fn(&BehaviorRef) -> bool,
    {
        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|behavior| keep(behavior));
            before - items.len()
        };
        if removed > 0 {
            self.changed("retain", self.len());
        }
    }

    /// Remove every behavior
    pub fn clear(&self) {
        self.items.write().clear();
        self.changed("clear", 0);
    }

    /// Fold the current behaviors over `base`
    #[must_use]
    pub fn apply(&self, base: BuilderRef) -> BuilderRef {
        fold_behaviors(base, &self.snapshot())
    }

    /// Observe changes
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&BehaviorsChanged) + Send + Sync + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Stop observing
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn mutate<R, F>(&self, operation: &'static str, change: F) -> Result<R, GraphError>
    where
        F: FnOnce(&mut Vec<BehaviorRef>) -> Result<R, GraphError>,
    {
        let (output, len) = {
            let mut items = self.items.write();
            let output = change(&mut items)?;
            (output, items.len())
        };
        self.changed(operation, len);
        Ok(output)
    }

    fn changed(&self, operation: &'static str, len: usize) {
        tracing::debug!(operation, behaviors = len, "behaviors changed");
        let event = BehaviorsChanged {
            behaviors: self.snapshot(),
        };
        self.notifier.notify(&event);
    }
}

impl fmt::Debug for BehaviorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.items.read().iter().map(|b| b.name()).collect();
        f.debug_struct("BehaviorList")
            .field("behaviors", &names)
            .finish()
    }
}
