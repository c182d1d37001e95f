//! Change notifications
//!
//! Observers are plain callbacks registered on a [`ChangeNotifier`]. A
//! [`GraphChanged`] notification carries the new root so holders of "the
//! current pipeline" can resynchronise without reading shared state again.

use parking_lot::RwLock;
use specimen_kernel::BuilderRef;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A structural edit produced a new root
#[derive(Debug, Clone)]
pub struct GraphChanged {
    /// Root after the edit
    pub graph: BuilderRef,
}

/// Callback invoked on every change
pub type ChangeObserver<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of observers for events of type `E`
pub struct ChangeNotifier<E = GraphChanged> {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, ChangeObserver<E>)>>,
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
        }
    }
}

impl<E> ChangeNotifier<E> {
    /// Create notifier with no observers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, Arc::new(observer)));
        id
    }

    /// Remove observer `id`
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Number of registered observers
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Check if nobody listens
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Deliver `event` to every observer, in registration order
    ///
    /// Observers are called outside the registry lock, so they may subscribe
    /// or trigger further edits.
    pub fn notify(&self, event: &E) {
        let observers: Vec<ChangeObserver<E>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(event);
        }
    }
}

impl<E> fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.len())
            .finish()
    }
}
