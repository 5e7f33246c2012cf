use quadstore::{Quad, QuadStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn inverse(predicate: &str) -> Option<&'static str> {
    match predicate {
        "parent" => Some("child"),
        "child" => Some("parent"),
        _ => None,
    }
}

#[test]
fn test_on_add_runs_once_per_new_quad_after_insert() {
    let log: Arc<Mutex<Vec<(Quad, usize, bool)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut store = QuadStore::new();
    let sink = log.clone();
    store.set_on_add(move |store, quad| {
        let present = store.contains(quad.subject, quad.predicate, quad.object, quad.graph);
        sink.lock()
            .unwrap()
            .push((quad.into_owned(), store.len(), present));
    });

    assert!(store.add("a", "p", "b", "g"));
    assert!(!store.add("a", "p", "b", "g"));
    assert!(store.try_add("a", "p", "*", "g").is_err());
    assert!(store.add("a", "p", "c", "g"));

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            (Quad::from(["a", "p", "b", "g"]), 1, true),
            (Quad::from(["a", "p", "c", "g"]), 2, true),
        ]
    );
}

#[test]
fn test_on_add_may_add_reentrantly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut store = QuadStore::new();
    let counter = calls.clone();
    store.set_on_add(move |store, quad| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let (Some(inv), Some(object)) = (inverse(quad.predicate), quad.object.as_str()) {
            store.add(object, inv, quad.subject, quad.graph);
        }
    });

    assert!(store.add("alice", "parent", "bob", "family"));
    assert_eq!(store.len(), 2);
    assert!(store.contains("bob", "child", "alice", "family"));
    // the inverse's own hook tried to add the first quad back and found it present
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let bob = store.pool().lookup_text("bob").unwrap();
    assert_eq!(store.pool().ref_count(bob), 2);
}

#[test]
fn test_on_remove_sees_consistent_state() {
    let log: Arc<Mutex<Vec<(Quad, usize, bool)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut store = QuadStore::from_quads([["a", "p", "b", "g"], ["a", "p", "c", "g"]]);
    let sink = log.clone();
    store.set_on_remove(move |store, quad| {
        let still_there = store.contains(quad.subject, quad.predicate, quad.object, quad.graph);
        sink.lock()
            .unwrap()
            .push((quad.into_owned(), store.len(), still_there));
    });

    assert_eq!(store.remove("a", "p", "b", "g"), 1);
    assert_eq!(store.remove("a", "p", "b", "g"), 0);
    let log = log.lock().unwrap();
    assert_eq!(*log, vec![(Quad::from(["a", "p", "b", "g"]), 1, false)]);
}

#[test]
fn test_on_remove_may_remove_reentrantly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut store = QuadStore::from_quads([
        ["alice", "parent", "bob", "family"],
        ["bob", "child", "alice", "family"],
        ["carol", "knows", "dave", "friends"],
    ]);
    let counter = calls.clone();
    store.set_on_remove(move |store, quad| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let (Some(inv), Some(object)) = (inverse(quad.predicate), quad.object.as_str()) {
            store.remove(object, inv, quad.subject, quad.graph);
        }
    });

    // the inverse is removed by the hook, so the outer call only counts one
    assert_eq!(store.remove("*", "*", "*", "family"), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.graph_len("family"), 0);
    assert_eq!(store.find_graphs("*", "*", "*"), vec!["friends"]);
    assert_eq!(store.pool().lookup_text("alice"), None);
    assert_eq!(store.pool().lookup_text("parent"), None);
}

#[test]
fn test_on_remove_reentrant_across_graph_scope() {
    let mut store = QuadStore::from_quads([
        ["alice", "parent", "bob", "g1"],
        ["bob", "child", "alice", "g1"],
        ["erin", "parent", "frank", "g2"],
        ["frank", "child", "erin", "g2"],
    ]);
    store.set_on_remove(|store, quad| {
        if let (Some(inv), Some(object)) = (inverse(quad.predicate), quad.object.as_str()) {
            store.remove(object, inv, quad.subject, quad.graph);
        }
    });
    assert_eq!(store.remove("*", "*", "*", "*"), 2);
    assert!(store.is_empty());
    assert_eq!(store.graph_count(), 0);
    assert!(store.pool().is_empty());
}

#[test]
fn test_hooks_can_be_cleared() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut store = QuadStore::new();
    let on_add = calls.clone();
    store.set_on_add(move |_, _| {
        on_add.fetch_add(1, Ordering::SeqCst);
    });
    let on_remove = calls.clone();
    store.set_on_remove(move |_, _| {
        on_remove.fetch_add(10, Ordering::SeqCst);
    });

    store.add("s", "p", "o", "");
    store.remove("s", "p", "o", "");
    assert_eq!(calls.load(Ordering::SeqCst), 11);

    store.clear_on_add();
    store.clear_on_remove();
    store.add("s", "p", "o", "");
    store.remove("s", "p", "o", "");
    assert_eq!(calls.load(Ordering::SeqCst), 11);
}

#[test]
fn test_clear_does_not_fire_hooks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut store = QuadStore::from_quads([["s", "p", "o"]]);
    let counter = calls.clone();
    store.set_on_remove(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    store.clear();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty());
}
