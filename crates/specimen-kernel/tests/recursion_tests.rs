use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specimen_kernel::recursion::{FnRecursionHandler, TypeOnlyComparer};
use specimen_kernel::{
    resolve, BuildResult, BuilderRef, FactoryBuilder, NullRecursionHandler, Outcome,
    RecursionGuard, Request, ResolutionError, Value,
};
use specimen_test_utils::named_requests;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Builder walking `path`: each call resolves the next key, the last key
/// resolves to itself
fn scripted(path: &'static [&'static str]) -> BuilderRef {
    let step = AtomicUsize::new(0);
    Arc::new(FactoryBuilder::new(move |req, ctx| {
        let index = step.fetch_add(1, Ordering::SeqCst);
        match path.get(index + 1) {
            Some(next) => ctx.resolve(&Request::named(next)),
            None => Ok(Outcome::created(format!("{req}"))),
        }
    }))
}

/// Builder that answers every named request by re-requesting it
fn self_loop(calls: Arc<AtomicUsize>) -> BuilderRef {
    Arc::new(FactoryBuilder::new(move |req, ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        ctx.resolve(req)
    }))
}

fn depth(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn test_depth_two_fires_on_third_occurrence() {
    const PATH: &[&str] = &["1", "2", "1", "3", "1", "4"];
    let guarded: BuilderRef = Arc::new(RecursionGuard::new(scripted(PATH)).depth(depth(2)));

    let err = resolve(&guarded, &Request::named("1")).unwrap_err();
    match err {
        ResolutionError::RecursiveRequest { request, stack } => {
            assert_eq!(request, Request::named("1"));
            assert_eq!(stack, named_requests(&["1", "2", "1", "3", "1"]));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_depth_three_lets_same_path_finish() {
    const PATH: &[&str] = &["1", "2", "1", "3", "1", "4"];
    let guarded: BuilderRef = Arc::new(RecursionGuard::new(scripted(PATH)).depth(depth(3)));

    let outcome = resolve(&guarded, &Request::named("1")).unwrap();
    assert_eq!(outcome, Outcome::created("named \"4\""));
}

#[test]
fn test_custom_handler_receives_snapshot() {
    let handler = FnRecursionHandler(|_: &Request, stack: &[Request]| -> BuildResult {
        Ok(Outcome::created(format!("cut after {}", stack.len())))
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let guarded: BuilderRef =
        Arc::new(RecursionGuard::with_handler(self_loop(calls), Arc::new(handler)));

    let outcome = resolve(&guarded, &Request::named("x")).unwrap();
    assert_eq!(outcome, Outcome::created("cut after 1"));
}

fn node_cycle(calls: Arc<AtomicUsize>) -> BuilderRef {
    Arc::new(FactoryBuilder::new(move |req, ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        match req {
            Request::Seeded { .. } => ctx.resolve(&Request::type_named("Node")),
            _ => ctx.resolve(&Request::type_named("Node").seeded("right")),
        }
    }))
}

#[test]
fn test_type_only_comparer_ignores_seed() {
    let seeded = Request::type_named("Node").seeded("left");

    let calls = Arc::new(AtomicUsize::new(0));
    let guarded: BuilderRef = Arc::new(
        RecursionGuard::with_handler(node_cycle(calls.clone()), Arc::new(NullRecursionHandler))
            .comparer(Arc::new(TypeOnlyComparer)),
    );
    let outcome = resolve(&guarded, &seeded).unwrap();
    assert_eq!(outcome, Outcome::Created(Value::Null));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // exact comparison only catches the cycle once a request truly repeats
    let calls = Arc::new(AtomicUsize::new(0));
    let guarded: BuilderRef = Arc::new(RecursionGuard::with_handler(
        node_cycle(calls.clone()),
        Arc::new(NullRecursionHandler),
    ));
    let outcome = resolve(&guarded, &seeded).unwrap();
    assert_eq!(outcome, Outcome::Created(Value::Null));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_resolutions_do_not_share_stacks() {
    const PATH: &[&str] = &["a", "b", "c"];
    let guarded: BuilderRef = Arc::new(RecursionGuard::new(Arc::new(FactoryBuilder::new(
        |req, ctx| match req {
            Request::Named(key) => match PATH.iter().position(|k| **k == **key) {
                Some(i) if i + 1 < PATH.len() => ctx.resolve(&Request::named(PATH[i + 1])),
                _ => Ok(Outcome::created(key.to_string())),
            },
            _ => Ok(Outcome::declined(req)),
        },
    ))));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = guarded.clone();
            std::thread::spawn(move || {
                (0..50)
                    .map(|_| resolve(&root, &Request::named("a")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for result in handle.join().unwrap() {
            assert_eq!(result.unwrap(), Outcome::created("c"));
        }
    }
}

proptest! {
    #[test]
    fn prop_builder_runs_depth_times_before_handler(d in 1usize..8) {
        let calls = Arc::new(AtomicUsize::new(0));
        let guarded: BuilderRef = Arc::new(
            RecursionGuard::with_handler(self_loop(calls.clone()), Arc::new(NullRecursionHandler))
                .depth(depth(d)),
        );

        let outcome = resolve(&guarded, &Request::named("x")).unwrap();
        prop_assert_eq!(outcome, Outcome::Created(Value::Null));
        prop_assert_eq!(calls.load(Ordering::SeqCst), d);
    }

    #[test]
    fn prop_throwing_stack_has_depth_plus_one_entries(d in 1usize..8) {
        let calls = Arc::new(AtomicUsize::new(0));
        let guarded: BuilderRef =
            Arc::new(RecursionGuard::new(self_loop(calls)).depth(depth(d)));

        let err = resolve(&guarded, &Request::named("x")).unwrap_err();
        match err {
            ResolutionError::RecursiveRequest { stack, .. } => prop_assert_eq!(stack.len(), d + 1),
            other => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
