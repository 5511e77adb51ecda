// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-isolating decorator.
//!
//! Every thread lineage works on its own copy of the inner entries. The copy is taken from the
//! inner chain the first time a thread touches the decorator; threads started through
//! [`ThreadSafe::spawn`] share their parent's copy. A thread's entry is dropped when the thread
//! exits. Writes never reach the inner chain, so nothing may be stacked above this decorator.

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::{Entries, Result, Settings, Value, ValueType};
use crate::service::ValueStore;
use dashmap::DashMap;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle, ThreadId};

type Copies = DashMap<ThreadId, Arc<ValueStore>>;

thread_local! {
    static HELD: RefCell<Vec<HeldCopy>> = const { RefCell::new(Vec::new()) };
}

/// A copy held by the current thread, dropped with the thread's locals.
struct HeldCopy {
    thread: ThreadId,
    copies: Weak<Copies>,
}

impl Drop for HeldCopy {
    fn drop(&mut self) {
        if let Some(copies) = self.copies.upgrade() {
            copies.remove(&self.thread);
        }
    }
}

/// Gives each thread lineage an isolated copy of the settings.
///
/// A copy lives until its thread exits or calls [`release`](ThreadSafe::release).
pub struct ThreadSafe {
    inner: Arc<dyn Settings>,
    copies: Arc<Copies>,
}

impl ThreadSafe {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Settings>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::ThreadSafe, |inner| Self {
            inner,
            copies: Arc::new(DashMap::new()),
        })
    }

    /// Starts a thread that shares the calling thread's copy.
    pub fn spawn<F, R>(self: &Arc<Self>, f: F) -> Result<JoinHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let copy = self.local()?;
        let this = Arc::clone(self);
        Ok(thread::spawn(move || {
            this.adopt(copy);
            let result = f();
            this.release();
            result
        }))
    }

    /// Drops the calling thread's copy, returning `true` if it had one.
    ///
    /// The next access from this thread starts from a fresh copy of the inner chain.
    pub fn release(&self) -> bool {
        self.copies.remove(&thread::current().id()).is_some()
    }

    /// The number of threads currently holding a copy.
    pub fn thread_count(&self) -> usize {
        self.copies.len()
    }

    fn adopt(&self, copy: Arc<ValueStore>) {
        let id = thread::current().id();
        self.hold(id);
        self.copies.insert(id, copy);
    }

    // Registers the copy with the thread's locals so it is removed when the thread exits
    fn hold(&self, thread: ThreadId) {
        let copies = Arc::downgrade(&self.copies);
        let registered = HELD.try_with(|held| {
            let mut held = held.borrow_mut();
            held.retain(|h| h.copies.strong_count() > 0);
            if !held.iter().any(|h| Weak::ptr_eq(&h.copies, &copies)) {
                held.push(HeldCopy { thread, copies });
            }
        });
        if registered.is_err() {
            tracing::debug!("Thread {:?} is exiting; its settings copy needs release()", thread);
        }
    }

    fn local(&self) -> Result<Arc<ValueStore>> {
        let id = thread::current().id();
        if let Some(copy) = self.copies.get(&id) {
            return Ok(Arc::clone(copy.value()));
        }

        let copy = Arc::new(ValueStore::from_entries(
            self.inner.id(),
            self.inner.snapshot()?,
        ));
        tracing::debug!("Created thread-local settings copy for {:?}", id);
        self.hold(id);
        Ok(Arc::clone(&self.copies.entry(id).or_insert(copy)))
    }
}

impl Settings for ThreadSafe {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::ThreadSafe)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.local()?.get(key)
    }

    fn peek(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.local()?.peek(key)
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        self.local()?.put(key, values)
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        self.local()?.put_all(entries)
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.local()?.remove(key)
    }

    fn clear(&self) -> Result<()> {
        self.local()?.clear()
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        self.local()?.contains_key(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.local()?.keys()
    }

    fn size(&self) -> Result<usize> {
        self.local()?.size()
    }

    fn snapshot(&self) -> Result<Entries> {
        self.local()?.snapshot()
    }

    fn resolve_key(&self, candidates: &[&str]) -> Result<Option<String>> {
        self.local()?.resolve_key(candidates)
    }

    fn unused_keys(&self) -> Result<BTreeSet<String>> {
        self.local()?.unused_keys()
    }

    fn not_present_keys(&self) -> Result<BTreeSet<String>> {
        self.local()?.not_present_keys()
    }

    fn lookup(&self, candidates: &[&str], target: ValueType, default: Option<Value>) -> Result<Value> {
        self.local()?.lookup(candidates, target, default)
    }
}
