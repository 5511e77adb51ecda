// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the thread confinement decorators.

mod common;

use common::raw;
use hexsettings::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_thread_bound_rejects_unbound_thread() {
    let base = Arc::new(ValueStore::new());
    base.put("k", raw(&["v"])).unwrap();
    let bound = ThreadBound::wrap(base).unwrap();
    assert_eq!(bound.get_string(None, &["k"]).unwrap(), "v");

    let shared = Arc::clone(&bound);
    let outcome = thread::Builder::new()
        .name("intruder".to_string())
        .spawn(move || shared.get_string(None, &["k"]))
        .unwrap()
        .join()
        .unwrap();

    match outcome {
        Err(ConfigError::ThreadAccessViolation { thread, .. }) => assert_eq!(thread, "intruder"),
        other => panic!("expected ThreadAccessViolation, got {:?}", other),
    }
}

#[test]
fn test_thread_bound_spawn_inherits_binding() {
    let bound = ThreadBound::wrap(Arc::new(ValueStore::new())).unwrap();
    bound.put("k", raw(&["1"])).unwrap();

    let child = Arc::clone(&bound);
    let value = bound
        .spawn(move || child.get_i32(None, &["k"]))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(value.unwrap(), 1);

    // The spawned thread's binding ended with it
    let late = Arc::clone(&bound);
    let outcome = thread::spawn(move || late.size()).join().unwrap();
    assert!(outcome.is_err());
}

#[test]
fn test_threads_convert_on_shared_plain_store() {
    let store = Arc::new(ValueStore::new());
    store.put("port", raw(&["8080"])).unwrap();
    store.put("ratio", raw(&["0.25"])).unwrap();
    store.put("hosts", raw(&["a.example", "b.example"])).unwrap();
    store.put("shade", raw(&["255"])).unwrap();
    let barrier = Barrier::new(2);

    thread::scope(|scope| {
        let numbers = scope.spawn(|| {
            barrier.wait();
            for _ in 0..200 {
                assert_eq!(store.get_i32(None, &["port"]).unwrap(), 8080);
                assert_eq!(store.get_f64(None, &["ratio"]).unwrap(), 0.25);
                assert_eq!(store.get_i64(None, &["shade"]).unwrap(), 255);
            }
        });
        let others = scope.spawn(|| {
            barrier.wait();
            for _ in 0..200 {
                let hosts: Vec<String> = store.get_as(&["hosts"]).unwrap();
                assert_eq!(hosts, vec!["a.example", "b.example"]);
                assert_eq!(store.get_as::<Color>(&["shade"]).unwrap(), Color::BLUE);
                assert_eq!(store.get_or(7i8, &["missing"]).unwrap(), 7);
            }
        });
        numbers.join().unwrap();
        others.join().unwrap();
    });

    assert!(store.unused_keys().unwrap().is_empty());
    assert_eq!(
        store.not_present_keys().unwrap(),
        std::collections::BTreeSet::from(["missing".to_string()])
    );
}

#[test]
fn test_thread_safe_copies_do_not_cross_talk() {
    let base = Arc::new(ValueStore::new());
    base.put("shared", raw(&["0"])).unwrap();
    let settings = ThreadSafe::wrap(base.clone()).unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (1..=2)
        .map(|n| {
            let settings = Arc::clone(&settings);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                settings.put("shared", vec![n.to_string()]).unwrap();
                barrier.wait();
                let seen = settings.get_i32(None, &["shared"]).unwrap();
                settings.release();
                seen
            })
        })
        .collect();

    let seen: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(seen, vec![1, 2]);

    // Neither thread wrote through to the shared base
    assert_eq!(base.peek("shared").unwrap(), Some(raw(&["0"])));
    assert_eq!(settings.get_i32(None, &["shared"]).unwrap(), 0);
}

#[test]
fn test_thread_safe_spawn_shares_copy() {
    let settings = ThreadSafe::wrap(Arc::new(ValueStore::new())).unwrap();
    settings.put("k", raw(&["parent"])).unwrap();

    let child = Arc::clone(&settings);
    let seen = settings
        .spawn(move || {
            let seen = child.get_string(None, &["k"]).unwrap();
            child.put("k", raw(&["child"])).unwrap();
            seen
        })
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(seen, "parent");
    assert_eq!(settings.get_string(None, &["k"]).unwrap(), "child");
    assert_eq!(settings.thread_count(), 1);
}
