//! Behaviors: builder-to-builder transformations
//!
//! An ordered behavior list is folded left to right over a base builder, so
//! the last behavior ends up outermost.

use specimen_kernel::recursion::DefaultRequestComparer;
use specimen_kernel::{
    BuilderRef, NullRecursionHandler, RecursionGuard, RecursionHandler, RequestComparer,
    ThrowingRecursionHandler, DEFAULT_RECURSION_DEPTH,
};
use std::fmt::Debug;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Shared handle to a behavior
pub type BehaviorRef = Arc<dyn SpecimenBehavior>;

/// Transformation applied to a whole pipeline
///
/// Behaviors hold no tree state: `transform` must depend only on the
/// behavior's own configuration and the builder it is given.
pub trait SpecimenBehavior: Send + Sync + Debug {
    /// Wrap or replace `builder`
    fn transform(&self, builder: BuilderRef) -> BuilderRef;

    /// Name used in logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Apply `behaviors` to `base` in order
#[must_use]
pub fn fold_behaviors(base: BuilderRef, behaviors: &[BehaviorRef]) -> BuilderRef {
    behaviors.iter().fold(base, |builder, behavior| {
        tracing::trace!(behavior = behavior.name(), "applying behavior");
        behavior.transform(builder)
    })
}

/// Shared configuration of the recursion behaviors
#[derive(Debug, Clone)]
struct GuardSettings {
    depth: NonZeroUsize,
    comparer: Arc<dyn RequestComparer>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            depth: DEFAULT_RECURSION_DEPTH,
            comparer: Arc::new(DefaultRequestComparer),
        }
    }
}

impl GuardSettings {
    fn guard(&self, builder: BuilderRef, handler: Arc<dyn RecursionHandler>) -> BuilderRef {
        Arc::new(
            RecursionGuard::with_handler(builder, handler)
                .depth(self.depth)
                .comparer(self.comparer.clone()),
        )
    }
}

/// Wraps the pipeline in a guard that fails on recursion
#[derive(Debug, Clone, Default)]
pub struct ThrowingRecursionBehavior {
    settings: GuardSettings,
}

impl ThrowingRecursionBehavior {
    /// Create behavior with recursion depth `depth`
    #[inline]
    #[must_use]
    pub fn new(depth: NonZeroUsize) -> Self {
        Self {
            settings: GuardSettings {
                depth,
                ..GuardSettings::default()
            },
        }
    }

    /// Use `comparer` to decide request equality
    #[inline]
    #[must_use]
    pub fn with_comparer(mut self, comparer: Arc<dyn RequestComparer>) -> Self {
        self.settings.comparer = comparer;
        self
    }

    /// Configured depth
    #[inline]
    #[must_use]
    pub fn depth(&self) -> NonZeroUsize {
        self.settings.depth
    }
}

impl SpecimenBehavior for ThrowingRecursionBehavior {
    fn transform(&self, builder: BuilderRef) -> BuilderRef {
        self.settings
            .guard(builder, Arc::new(ThrowingRecursionHandler))
    }

    fn name(&self) -> &'static str {
        "throwing-recursion"
    }
}

/// Wraps the pipeline in a guard that resolves recursion to null
#[derive(Debug, Clone, Default)]
pub struct NullRecursionBehavior {
    settings: GuardSettings,
}

impl NullRecursionBehavior {
    /// Create behavior with recursion depth `depth`
    #[inline]
    #[must_use]
    pub fn new(depth: NonZeroUsize) -> Self {
        Self {
            settings: GuardSettings {
                depth,
                ..GuardSettings::default()
            },
        }
    }

    /// Use `comparer` to decide request equality
    #[inline]
    #[must_use]
    pub fn with_comparer(mut self, comparer: Arc<dyn RequestComparer>) -> Self {
        self.settings.comparer = comparer;
        self
    }

    /// Configured depth
    #[inline]
    #[must_use]
    pub fn depth(&self) -> NonZeroUsize {
        self.settings.depth
    }
}

impl SpecimenBehavior for NullRecursionBehavior {
    fn transform(&self, builder: BuilderRef) -> BuilderRef {
        self.settings.guard(builder, Arc::new(NullRecursionHandler))
    }

    fn name(&self) -> &'static str {
        "null-recursion"
    }
}

/// Wraps the pipeline in a guard with an application-supplied handler
#[derive(Debug, Clone)]
pub struct RecursionHandlingBehavior {
    settings: GuardSettings,
    handler: Arc<dyn RecursionHandler>,
}

impl RecursionHandlingBehavior {
    /// Create behavior delegating cycles to `handler`
    #[inline]
    #[must_use]
    pub fn new(handler: Arc<dyn RecursionHandler>) -> Self {
        Self {
            settings: GuardSettings::default(),
            handler,
        }
    }

    /// Tolerate `depth` occurrences before handling
    #[inline]
    #[must_use]
    pub fn with_depth(mut self, depth: NonZeroUsize) -> Self {
        self.settings.depth = depth;
        self
    }
}

impl SpecimenBehavior for RecursionHandlingBehavior {
    fn transform(&self, builder: BuilderRef) -> BuilderRef {
        self.settings.guard(builder, self.handler.clone())
    }

    fn name(&self) -> &'static str {
        "custom-recursion"
    }
}

/// Behavior backed by a closure
pub struct FnBehavior<F> {
    name: &'static str,
    transform: F,
}

impl<F> FnBehavior<F>
where
    F: Fn(BuilderRef) -> BuilderRef + Send + Sync,
{
    /// Create named closure behavior
    #[inline]
    #[must_use]
    pub fn new(name: &'static str, transform: F) -> Self {
        Self { name, transform }
    }
}

impl<F> Debug for FnBehavior<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBehavior").field("name", &self.name).finish()
    }
}

impl<F> SpecimenBehavior for FnBehavior<F>
where
    F: Fn(BuilderRef) -> BuilderRef + Send + Sync,
{
    fn transform(&self, builder: BuilderRef) -> BuilderRef {
        (self.transform)(builder)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
