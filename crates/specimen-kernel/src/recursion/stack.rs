//! Per-call request stacks
//!
//! Stacks live in the [`crate::ResolutionContext`] of one top-level call and
//! are keyed by the guard that owns them, so a guard never stores request
//! state on itself.

use crate::recursion::comparer::RequestComparer;
use crate::request::Request;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

/// Identity of one recursion guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardId(pub Uuid);

impl GuardId {
    /// Fresh identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GuardId {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests currently being resolved under one guard, outermost first
pub type RequestStack = SmallVec<[Request; 8]>;

/// Request stacks of one resolution call
///
/// Interior mutability keeps the context shareable by reference through the
/// whole call chain; the tracker is never shared across calls or threads.
#[derive(Debug, Default)]
pub struct RequestTracker {
    stacks: RefCell<HashMap<GuardId, RequestStack>>,
}

impl RequestTracker {
    /// Empty tracker
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no guard has requests in flight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.borrow().values().all(SmallVec::is_empty)
    }

    /// Depth of the stack owned by `guard`
    #[must_use]
    pub fn depth(&self, guard: GuardId) -> usize {
        self.stacks.borrow().get(&guard).map_or(0, SmallVec::len)
    }

    /// Occurrences of `request` on `guard`'s stack under `comparer`
    #[must_use]
    pub fn occurrences(
        &self,
        guard: GuardId,
        request: &Request,
        comparer: &dyn RequestComparer,
    ) -> usize {
        self.stacks.borrow().get(&guard).map_or(0, |stack| {
            stack
                .iter()
                .filter(|seen| comparer.equals(seen, request))
                .count()
        })
    }

    /// Copy of `guard`'s stack
    #[must_use]
    pub fn snapshot(&self, guard: GuardId) -> Vec<Request> {
        self.stacks
            .borrow()
            .get(&guard)
            .map(|stack| stack.to_vec())
            .unwrap_or_default()
    }

    /// Push `request` for `guard`; the returned frame pops it when dropped
    #[must_use = "the request is popped as soon as the frame is dropped"]
    pub fn enter(&self, guard: GuardId, request: &Request) -> StackFrame<'_> {
        self.stacks
            .borrow_mut()
            .entry(guard)
            .or_default()
            .push(request.clone());
        StackFrame {
            tracker: self,
            guard,
        }
    }

    fn pop(&self, guard: GuardId) {
        let mut stacks = self.stacks.borrow_mut();
        if let Some(stack) = stacks.get_mut(&guard) {
            stack.pop();
            if stack.is_empty() {
                stacks.remove(&guard);
            }
        }
    }
}

/// Scope of one pushed request
#[derive(Debug)]
pub struct StackFrame<'a> {
    tracker: &'a RequestTracker,
    guard: GuardId,
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.tracker.pop(self.guard);
    }
}
