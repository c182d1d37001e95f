//! Fixture: the composition root
//!
//! A [`Fixture`] owns the base graph, the list views over its marked
//! subtrees and the behavior list. Resolving folds the behaviors over the
//! current base graph; the folded pipeline is cached until the graph or the
//! behavior list changes.

use crate::config::FixtureConfig;
use crate::engine::{base_graph, is_auto_properties, with_auto_properties, RecordShapeBuilder};
use crate::error::{FixtureError, Result};
use parking_lot::RwLock;
use specimen_composition::{
    BehaviorList, BehaviorRef, NodeCollection, SharedGraph, ThrowingRecursionBehavior,
    TracingBehavior,
};
use specimen_kernel::graph;
use specimen_kernel::{
    BuilderRef, ExactTypeSpecification, FactoryBuilder, FilteringBuilder, FixedBuilder,
    GraphError, MarkerNode, MarkerTag, Outcome, Record, Request, ResolutionContext,
    ResolutionError, Seed, TypeName, Value, DEFAULT_RECURSION_DEPTH, DEFAULT_REPEAT_COUNT,
};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Folded pipeline, tagged with the generation it was built from
#[derive(Default)]
struct PipelineCache {
    generation: AtomicU64,
    cached: RwLock<Option<(u64, BuilderRef)>>,
}

impl PipelineCache {
    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.cached.write() = None;
    }

    fn get_or_compose<F>(&self, compose: F) -> BuilderRef
    where
        F: FnOnce() -> BuilderRef,
    {
        let generation = self.generation.load(Ordering::SeqCst);
        if let Some((built, pipeline)) = self.cached.read().as_ref() {
            if *built == generation {
                return pipeline.clone();
            }
        }

        let pipeline = compose();
        // a change during composition leaves the cache empty for the next call
        if self.generation.load(Ordering::SeqCst) == generation {
            *self.cached.write() = Some((generation, pipeline.clone()));
        }
        pipeline
    }
}

/// Composition root of the resolution engine
///
/// # Assembly
/// The base graph is one composite of customizations, engine (optionally
/// wrapped for auto-properties), residue collectors and a terminator. The
/// behavior list starts as `[ThrowingRecursionBehavior]`, so the folded
/// pipeline is that composite under a recursion guard. Request tracing adds
/// a [`TracingBehavior`] on the outside.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = Fixture::new();
/// fixture.inject("Currency", "EUR")?;
/// let currency = fixture.create(&Request::type_named("Currency"))?;
/// ```
pub struct Fixture {
    config: RwLock<FixtureConfig>,
    graph: Arc<SharedGraph>,
    behaviors: Arc<BehaviorList>,
    customizations: NodeCollection,
    engine: NodeCollection,
    residue_collectors: NodeCollection,
    cache: Arc<PipelineCache>,
}

impl Fixture {
    /// Create fixture with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(
            FixtureConfig::default(),
            DEFAULT_RECURSION_DEPTH,
            DEFAULT_REPEAT_COUNT,
        )
    }

    /// Create fixture from `config`
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] when the configuration is invalid.
    pub fn with_config(config: FixtureConfig) -> Result<Self> {
        let depth = config.depth()?;
        let repeat = config.repeat()?;
        Ok(Self::assemble(config, depth, repeat))
    }

    fn assemble(config: FixtureConfig, depth: NonZeroUsize, repeat: NonZeroUsize) -> Self {
        let graph = Arc::new(SharedGraph::new(base_graph(
            repeat,
            !config.omit_auto_properties,
        )));

        let mut defaults: Vec<BehaviorRef> =
            vec![Arc::new(ThrowingRecursionBehavior::new(depth))];
        if config.trace_requests {
            defaults.push(Arc::new(TracingBehavior));
        }
        let behaviors = Arc::new(BehaviorList::with_behaviors(defaults));

        let cache = Arc::new(PipelineCache::default());
        let on_graph = cache.clone();
        graph.subscribe(move |_| on_graph.invalidate());
        let on_behaviors = cache.clone();
        behaviors.subscribe(move |_| on_behaviors.invalidate());

        tracing::debug!(
            recursion_depth = depth.get(),
            repeat_count = repeat.get(),
            auto_properties = !config.omit_auto_properties,
            trace_requests = config.trace_requests,
            "fixture assembled"
        );

        Self {
            customizations: NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations),
            engine: NodeCollection::for_marker(graph.clone(), MarkerTag::Engine),
            residue_collectors: NodeCollection::for_marker(
                graph.clone(),
                MarkerTag::ResidueCollectors,
            ),
            config: RwLock::new(config),
            graph,
            behaviors,
            cache,
        }
    }

    /// Current settings
    ///
    /// Reflects runtime toggles such as
    /// [`Fixture::set_omit_auto_properties`].
    #[must_use]
    pub fn config(&self) -> FixtureConfig {
        self.config.read().clone()
    }

    /// Current base graph, before behaviors
    #[inline]
    #[must_use]
    pub fn graph(&self) -> BuilderRef {
        self.graph.current()
    }

    /// User overrides, tried first; index 0 wins
    #[inline]
    #[must_use]
    pub fn customizations(&self) -> &NodeCollection {
        &self.customizations
    }

    /// Built-in generators
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &NodeCollection {
        &self.engine
    }

    /// Fallbacks tried after the engine
    #[inline]
    #[must_use]
    pub fn residue_collectors(&self) -> &NodeCollection {
        &self.residue_collectors
    }

    /// Behaviors folded over the base graph, innermost first
    #[inline]
    #[must_use]
    pub fn behaviors(&self) -> &BehaviorList {
        &self.behaviors
    }

    /// Fold the current behaviors over the current base graph
    ///
    /// Pure: repeated calls with unchanged configuration return graph-equal
    /// trees.
    #[must_use]
    pub fn compose(&self) -> BuilderRef {
        let pipeline = self.behaviors.apply(self.graph.current());
        tracing::debug!(
            behaviors = self.behaviors.len(),
            nodes = graph::node_count(&pipeline),
            "pipeline composed"
        );
        pipeline
    }

    /// Folded pipeline, reused until something changes
    #[must_use]
    pub fn pipeline(&self) -> BuilderRef {
        self.cache.get_or_compose(|| self.compose())
    }

    /// Resolve `request`
    ///
    /// # Errors
    /// Returns [`FixtureError::Resolution`] when the pipeline fails and
    /// [`FixtureError::NoSpecimen`] when it declines.
    pub fn create(&self, request: &Request) -> Result<Value> {
        let pipeline = self.pipeline();
        match specimen_kernel::resolve(&pipeline, request)? {
            Outcome::Created(value) => Ok(value),
            Outcome::NoSpecimen(_) => {
                tracing::warn!(request = %request, "pipeline declined request");
                Err(FixtureError::NoSpecimen {
                    request: request.clone(),
                })
            }
        }
    }

    /// Resolve a value of `T`
    ///
    /// # Errors
    /// See [`Fixture::create`].
    pub fn create_type<T: ?Sized>(&self) -> Result<Value> {
        self.create(&Request::of::<T>())
    }

    /// Resolve several values for `request`
    ///
    /// # Errors
    /// See [`Fixture::create`]; also fails when a customization answers the
    /// multiple request with something other than a list.
    pub fn create_many(&self, request: &Request) -> Result<Vec<Value>> {
        let many = request.clone().many();
        match self.create(&many)? {
            Value::List(items) => Ok(items),
            _ => Err(
                ResolutionError::builder(&many, "multiple request did not produce a list").into(),
            ),
        }
    }

    /// Resolve `request` with a seed hint
    ///
    /// # Errors
    /// See [`Fixture::create`].
    pub fn create_seeded(&self, request: &Request, seed: impl Into<Seed>) -> Result<Value> {
        self.create(&request.clone().seeded(seed))
    }

    /// Insert `builder` as the highest-priority customization
    ///
    /// # Errors
    /// Returns [`FixtureError::Graph`] when the customization marker was
    /// removed from the graph.
    pub fn customize(&self, builder: BuilderRef) -> Result<()> {
        tracing::debug!(builder = builder.as_ref().type_name(), "customization added");
        self.customizations.insert(0, builder)?;
        Ok(())
    }

    /// Answer every request for `type_name` with `value`
    ///
    /// # Errors
    /// See [`Fixture::customize`].
    pub fn inject(&self, type_name: impl Into<TypeName>, value: impl Into<Value>) -> Result<()> {
        self.customize(Arc::new(FilteringBuilder::new(
            Arc::new(FixedBuilder::new(value)),
            Arc::new(ExactTypeSpecification::new(type_name)),
        )))
    }

    /// Answer every request for `type_name` by calling `factory`
    ///
    /// The factory resolves whatever it needs through the context it is
    /// given, so nested requests are guarded.
    ///
    /// # Errors
    /// See [`Fixture::customize`].
    pub fn register<F>(&self, type_name: impl Into<TypeName>, factory: F) -> Result<()>
    where
        F: Fn(&dyn ResolutionContext) -> std::result::Result<Value, ResolutionError>
            + Send
            + Sync
            + 'static,
    {
        let builder = FactoryBuilder::new(move |_request, context| {
            factory(context).map(Outcome::Created)
        });
        self.customize(Arc::new(FilteringBuilder::new(
            Arc::new(builder),
            Arc::new(ExactTypeSpecification::new(type_name)),
        )))
    }

    /// Teach the engine the shape of a record type
    ///
    /// Requests for the type produce the shape with `Null` fields, which
    /// auto-properties then fill.
    ///
    /// # Errors
    /// Returns [`FixtureError::Graph`] when the engine marker was removed.
    pub fn define(&self, shape: Record) -> Result<()> {
        self.engine.add(Arc::new(RecordShapeBuilder::new(shape)))?;
        Ok(())
    }

    /// Check whether created records get their fields filled
    ///
    /// # Errors
    /// Returns [`FixtureError::Graph`] when the engine marker cannot be
    /// located.
    pub fn auto_properties_enabled(&self) -> Result<bool> {
        let root = self.graph.current();
        let path = graph::locate(&root, &MarkerNode::locator(MarkerTag::Engine))?;
        match path.split_last() {
            Some((_, parent)) => {
                let parent = graph::node_at(&root, parent)?;
                Ok(is_auto_properties(parent.as_ref()))
            }
            None => Ok(false),
        }
    }

    /// Switch auto-properties off (`true`) or on (`false`)
    ///
    /// Rewrites the engine subtree: the engine marker is wrapped in, or
    /// unwrapped from, the auto-properties post-processor. Nothing happens
    /// when the graph already matches.
    ///
    /// # Errors
    /// Returns [`FixtureError::Graph`] when the engine marker cannot be
    /// located.
    pub fn set_omit_auto_properties(&self, omit: bool) -> Result<()> {
        if self.auto_properties_enabled()? != omit {
            self.config.write().omit_auto_properties = omit;
            return Ok(());
        }

        let root = self.graph.current();
        let path = graph::locate(&root, &MarkerNode::locator(MarkerTag::Engine))?;
        let engine = graph::node_at(&root, &path)?;

        let rebuilt = if omit {
            // enabled means the marker sits under the wrapper
            let (_, wrapper) = path.split_last().ok_or(GraphError::NodeNotFound)?;
            graph::replace(&root, wrapper, engine)?
        } else {
            graph::replace(&root, &path, with_auto_properties(engine))?
        };

        tracing::debug!(omit, "auto-properties toggled");
        self.config.write().omit_auto_properties = omit;
        self.graph.swap(rebuilt);
        Ok(())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("config", &*self.config.read())
            .field("behaviors", &self.behaviors)
            .finish_non_exhaustive()
    }
}
