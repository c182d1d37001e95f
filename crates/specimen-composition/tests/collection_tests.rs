use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specimen_composition::{GraphChanged, NodeCollection, SharedGraph};
use specimen_kernel::graph::{self, graph_equals, same_instance, same_kind};
use specimen_kernel::{
    BuilderRef, CompositeBuilder, FixedBuilder, GraphError, MarkerNode, MarkerTag,
    SpecimenBuilder, TerminatingBuilder,
};
use specimen_test_utils::init_test_tracing;
use std::sync::Arc;

fn leaf(v: i64) -> BuilderRef {
    Arc::new(FixedBuilder::new(v))
}

fn root_with(children: Vec<BuilderRef>) -> BuilderRef {
    Arc::new(CompositeBuilder::new(vec![
        Arc::new(MarkerNode::empty(MarkerTag::Engine)),
        Arc::new(CompositeBuilder::new(vec![Arc::new(MarkerNode::new(
            MarkerTag::Customizations,
            children,
        ))])),
        Arc::new(TerminatingBuilder),
    ]))
}

/// Nodes match by kind, leaves by identity
fn equivalent(a: &dyn SpecimenBuilder, b: &dyn SpecimenBuilder) -> bool {
    same_kind(a, b) && (a.as_node().is_some() || same_instance(a, b))
}

fn recorded_events(list: &NodeCollection) -> Arc<Mutex<Vec<BuilderRef>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    list.subscribe(move |event: &GraphChanged| sink.lock().push(event.graph.clone()));
    events
}

fn same_children(actual: &[BuilderRef], expected: &[BuilderRef]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| graph::ptr_eq(a, e))
}

#[test]
fn test_insert_then_remove_scenario() {
    init_test_tracing();
    let (x, y, z, w) = (leaf(1), leaf(2), leaf(3), leaf(4));
    let graph = Arc::new(SharedGraph::new(root_with(vec![x.clone(), y.clone(), z.clone()])));
    let list = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
    let events = recorded_events(&list);

    list.insert(1, w.clone()).unwrap();
    assert!(same_children(
        &list.to_vec().unwrap(),
        &[x.clone(), w.clone(), y.clone(), z.clone()]
    ));
    assert_eq!(events.lock().len(), 1);
    assert!(graph::ptr_eq(&events.lock()[0], &list.graph()));

    list.remove_at(0).unwrap();
    assert!(same_children(&list.to_vec().unwrap(), &[w, y, z]));
    assert_eq!(events.lock().len(), 2);
    assert!(graph::ptr_eq(&events.lock()[1], &graph.current()));
}

#[test]
fn test_old_roots_stay_valid() {
    let graph = Arc::new(SharedGraph::new(root_with(vec![leaf(1)])));
    let list = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
    let before = graph.current();

    list.clear().unwrap();

    let old_marker = graph::node_at(&before, &[1, 0]).unwrap();
    assert_eq!(old_marker.children().len(), 1);
    assert_eq!(list.len().unwrap(), 0);
}

#[test]
fn test_two_views_share_one_root() {
    let graph = Arc::new(SharedGraph::new(root_with(Vec::new())));
    let customizations = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
    let engine = NodeCollection::for_marker(graph.clone(), MarkerTag::Engine);

    customizations.add(leaf(1)).unwrap();
    engine.add(leaf(2)).unwrap();

    assert_eq!(customizations.len().unwrap(), 1);
    assert_eq!(engine.len().unwrap(), 1);
    assert_eq!(
        graph::locate(&graph.current(), &MarkerNode::locator(MarkerTag::Engine)),
        Ok(vec![0])
    );
}

#[test]
fn test_failed_edit_fires_no_event() {
    let graph = Arc::new(SharedGraph::new(root_with(vec![leaf(1)])));
    let list = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
    let events = recorded_events(&list);
    let before = graph.current();

    assert_eq!(
        list.remove_at(4).err(),
        Some(GraphError::IndexOutOfRange { index: 4, len: 1 })
    );
    assert!(events.lock().is_empty());
    assert!(graph::ptr_eq(&before, &graph.current()));
}

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, usize),
    Add(usize),
    Set(usize, usize),
    RemoveAt(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8usize, 0..6usize).prop_map(|(i, b)| Op::Insert(i, b)),
        (0..6usize).prop_map(Op::Add),
        (0..8usize, 0..6usize).prop_map(|(i, b)| Op::Set(i, b)),
        (0..8usize).prop_map(Op::RemoveAt),
        Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_edits_match_functional_replay(ops in proptest::collection::vec(op(), 0..24)) {
        let pool: Vec<BuilderRef> = (0..6).map(leaf).collect();
        let graph = Arc::new(SharedGraph::new(root_with(Vec::new())));
        let list = NodeCollection::for_marker(graph.clone(), MarkerTag::Customizations);
        let events = recorded_events(&list);

        let locator = MarkerNode::locator(MarkerTag::Customizations);
        let mut replayed = graph.current();
        let mut model: Vec<BuilderRef> = Vec::new();
        let mut expected_events = 0;

        for op in ops {
            let applied = match op {
                Op::Insert(i, b) => {
                    let ok = i <= model.len();
                    prop_assert_eq!(list.insert(i, pool[b].clone()).is_ok(), ok);
                    if ok { model.insert(i, pool[b].clone()); }
                    ok
                }
                Op::Add(b) => {
                    list.add(pool[b].clone()).unwrap();
                    model.push(pool[b].clone());
                    true
                }
                Op::Set(i, b) => {
                    let ok = i < model.len();
                    prop_assert_eq!(list.set(i, pool[b].clone()).is_ok(), ok);
                    if ok { model[i] = pool[b].clone(); }
                    ok
                }
                Op::RemoveAt(i) => {
                    let ok = i < model.len();
                    prop_assert_eq!(list.remove_at(i).is_ok(), ok);
                    if ok { model.remove(i); }
                    ok
                }
                Op::Clear => {
                    list.clear().unwrap();
                    model.clear();
                    true
                }
            };

            if applied {
                expected_events += 1;
                let path = graph::locate(&replayed, &locator).unwrap();
                let marker = graph::node_at(&replayed, &path).unwrap();
                let rebuilt = graph::as_node(&marker).unwrap().compose(model.clone());
                replayed = graph::replace(&replayed, &path, rebuilt).unwrap();
            }

            prop_assert!(graph_equals(&list.graph(), &replayed, &equivalent));
        }

        prop_assert_eq!(events.lock().len(), expected_events);
        prop_assert!(same_children(&list.to_vec().unwrap(), &model));
    }
}
