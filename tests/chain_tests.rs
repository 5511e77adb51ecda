// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for decorator chain composition.

mod common;

use common::raw;
use hexsettings::domain::{SettingsVisitor, VisitTarget};
use hexsettings::prelude::*;
use std::sync::Arc;

fn base() -> Arc<dyn Settings> {
    Arc::new(ValueStore::with_id("base"))
}

#[test]
fn test_each_kind_once_per_chain() {
    let caching = Caching::wrap(base()).unwrap();
    let read_only = ReadOnly::wrap(caching).unwrap();

    match Caching::wrap(read_only) {
        Err(ConfigError::DuplicateDecorator { kind }) => assert_eq!(kind, "Caching"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("duplicate decorator accepted"),
    }
}

#[test]
fn test_hiding_is_order_dependent() {
    let bound = ThreadBound::wrap(base()).unwrap();
    assert!(matches!(
        Caching::wrap(bound),
        Err(ConfigError::InvalidComposition { .. })
    ));

    let caching = Caching::wrap(base()).unwrap();
    let bound = ThreadBound::wrap(caching).unwrap();
    let chain: Arc<dyn Settings> = bound;
    assert_eq!(
        chain.decorator_kinds(),
        vec![DecoratorKind::ThreadBound, DecoratorKind::Caching]
    );
}

#[test]
fn test_observable_hides_reloadable() {
    let observable = Observable::wrap(base()).unwrap();
    let source = common::MemorySource::default();
    assert!(matches!(
        Reloadable::wrap(observable, Box::new(source.clone())),
        Err(ConfigError::InvalidComposition { .. })
    ));

    let reloadable = Reloadable::wrap(base(), Box::new(source)).unwrap();
    assert!(Observable::wrap(reloadable).is_ok());
}

#[test]
fn test_thread_safe_is_terminal() {
    let thread_safe = ThreadSafe::wrap(base()).unwrap();
    assert!(matches!(
        ReadOnly::wrap(thread_safe),
        Err(ConfigError::InvalidComposition { .. })
    ));
}

#[test]
fn test_registry_tracks_outermost() {
    let store = base();
    let caching = Caching::wrap(store.clone()).unwrap();
    let read_only = ReadOnly::wrap(caching).unwrap();

    let registry = store.registry().unwrap();
    assert_eq!(
        registry.kinds(),
        vec![DecoratorKind::Caching, DecoratorKind::ReadOnly]
    );
    let outermost = registry.outermost().unwrap();
    assert_eq!(outermost.kind(), Some(DecoratorKind::ReadOnly));
    assert_eq!(outermost.id(), Some("base".to_string()));
    drop(read_only);
    drop(outermost);
    assert!(registry.outermost().is_none());
}

#[test]
fn test_custom_decorator_joins_chain() {
    struct Tracing {
        inner: Arc<dyn Settings>,
    }

    impl Settings for Tracing {
        fn kind(&self) -> Option<DecoratorKind> {
            Some(DecoratorKind::Custom("Tracing"))
        }

        fn inner(&self) -> Option<&dyn Settings> {
            Some(self.inner.as_ref())
        }
    }

    let traced =
        hexsettings::domain::chain::wrap(base(), DecoratorKind::Custom("Tracing"), |inner| {
            Tracing { inner }
        })
        .unwrap();
    traced.put("k", raw(&["v"])).unwrap();
    assert_eq!(traced.get_string(None, &["k"]).unwrap(), "v");

    let chain: Arc<dyn Settings> = traced;
    assert!(chain.has_decorator(DecoratorKind::Custom("Tracing")));
    assert!(hexsettings::domain::chain::wrap(chain, DecoratorKind::Custom("Tracing"), |inner| {
        Tracing { inner }
    })
    .is_err());
}

#[test]
fn test_visitor_sees_matching_nodes() {
    struct CacheFlusher {
        flushed: usize,
    }

    impl SettingsVisitor for CacheFlusher {
        fn target(&self) -> VisitTarget {
            VisitTarget::Kind(DecoratorKind::Caching)
        }

        fn visit(&mut self, node: &dyn Settings) {
            assert_eq!(node.kind(), Some(DecoratorKind::Caching));
            self.flushed += 1;
        }
    }

    struct BaseCounter {
        size: usize,
    }

    impl SettingsVisitor for BaseCounter {
        fn target(&self) -> VisitTarget {
            VisitTarget::Base
        }

        fn visit(&mut self, node: &dyn Settings) {
            self.size = node.size().unwrap();
        }
    }

    let store = base();
    store.put("a", raw(&["1"])).unwrap();
    let chain: Arc<dyn Settings> = ReadOnly::wrap(Caching::wrap(store).unwrap()).unwrap();

    let mut flusher = CacheFlusher { flushed: 0 };
    assert_eq!(chain.accept(&mut flusher), 1);
    assert_eq!(flusher.flushed, 1);

    let mut counter = BaseCounter { size: 0 };
    assert_eq!(chain.accept(&mut counter), 1);
    assert_eq!(counter.size, 1);

    struct ObservableFinder;
    impl SettingsVisitor for ObservableFinder {
        fn target(&self) -> VisitTarget {
            VisitTarget::Kind(DecoratorKind::Observable)
        }
        fn visit(&mut self, _: &dyn Settings) {}
    }
    assert_eq!(chain.accept(&mut ObservableFinder), 0);
}
