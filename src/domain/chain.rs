// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decorator kinds and the rules for stacking them.
//!
//! A chain is a base store wrapped by zero or more decorators, each adding one behavior. Each
//! kind may appear at most once per chain, and some pairs of kinds may not be stacked in a given
//! order. [`wrap`] enforces both rules before a decorator becomes reachable, and records the new
//! outermost node in the base's [`ChainRegistry`].

use crate::domain::errors::{ConfigError, Result};
use crate::domain::settings::Settings;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Identifies the behavior a decorator adds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    /// Rejects every mutation
    ReadOnly,
    /// Restricts access to bound threads
    ThreadBound,
    /// Gives each thread lineage its own copy
    ThreadSafe,
    /// Caches converted values
    Caching,
    /// Emits change events on mutation
    Observable,
    /// Refreshes entries from a source
    Reloadable,
    /// Fans operations out over several stores
    Multiplicity,
    /// Application-defined decorator
    Custom(&'static str),
}

// (lower, upper): `upper` may not be stacked anywhere above `lower`.
const HIDDEN: &[(DecoratorKind, DecoratorKind)] = &[
    (DecoratorKind::ThreadBound, DecoratorKind::Caching),
    (DecoratorKind::Observable, DecoratorKind::Reloadable),
];

impl DecoratorKind {
    /// Returns `true` if `upper` may not be stacked above this kind.
    pub fn hides(self, upper: DecoratorKind) -> bool {
        HIDDEN.contains(&(self, upper))
    }

    /// Returns `true` if nothing may be stacked above this kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, DecoratorKind::ThreadSafe)
    }

    /// A short name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            DecoratorKind::ReadOnly => "ReadOnly",
            DecoratorKind::ThreadBound => "ThreadBound",
            DecoratorKind::ThreadSafe => "ThreadSafe",
            DecoratorKind::Caching => "Caching",
            DecoratorKind::Observable => "Observable",
            DecoratorKind::Reloadable => "Reloadable",
            DecoratorKind::Multiplicity => "Multiplicity",
            DecoratorKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bookkeeping kept at the base of a chain.
///
/// Holds a weak reference to the most recently wrapped node, so inner decorators can route
/// writes through the full chain. The registered kinds are read from that node, so nodes that
/// were dropped (for example by a build that failed partway) never show up. When one base is
/// wrapped into two chains, the registry follows the later one.
#[derive(Default)]
pub struct ChainRegistry {
    outermost: RwLock<Option<Weak<dyn Settings>>>,
}

impl ChainRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The decorator kinds of the live chain, innermost first.
    pub fn kinds(&self) -> Vec<DecoratorKind> {
        let Some(outermost) = self.outermost() else {
            return Vec::new();
        };
        let mut kinds = Vec::new();
        let mut current: Option<&dyn Settings> = Some(outermost.as_ref());
        while let Some(node) = current {
            current = node.inner();
            if current.is_some() {
                kinds.extend(node.kind());
            }
        }
        kinds.reverse();
        kinds
    }

    /// The outermost node, if one was registered and is still alive.
    pub fn outermost(&self) -> Option<Arc<dyn Settings>> {
        self.outermost
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Records a node that now wraps the chain.
    pub fn register(&self, node: Weak<dyn Settings>) {
        *self.outermost.write().unwrap_or_else(PoisonError::into_inner) = Some(node);
    }
}

/// Which nodes a [`SettingsVisitor`] wants to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitTarget {
    /// Decorators of the given kind
    Kind(DecoratorKind),
    /// The node at the bottom of the chain
    Base,
}

/// Inspects the nodes of a chain.
pub trait SettingsVisitor {
    /// The nodes this visitor is interested in.
    fn target(&self) -> VisitTarget;

    /// Called once per matching node, outermost first.
    fn visit(&mut self, node: &dyn Settings);
}

/// Chain discovery from any node, concrete or type-erased.
///
/// ```rust
/// use hexsettings::prelude::*;
/// use std::sync::Arc;
///
/// let caching = Caching::wrap(Arc::new(ValueStore::new())).unwrap();
/// assert!(caching.has_decorator(DecoratorKind::Caching));
///
/// let chain: Arc<dyn Settings> = ReadOnly::wrap(caching).unwrap();
/// assert_eq!(
///     chain.decorator_kinds(),
///     vec![DecoratorKind::ReadOnly, DecoratorKind::Caching]
/// );
/// ```
pub trait ChainExt {
    /// Walks the chain from this node inward and hands every matching node to `visitor`.
    ///
    /// Returns the number of nodes visited.
    fn accept(&self, visitor: &mut dyn SettingsVisitor) -> usize;

    /// The kinds at or below this node, outermost first.
    fn decorator_kinds(&self) -> Vec<DecoratorKind>;

    /// Returns `true` if a decorator of `kind` is at or below this node.
    fn has_decorator(&self, kind: DecoratorKind) -> bool {
        self.decorator_kinds().contains(&kind)
    }
}

impl<S: Settings> ChainExt for S {
    fn accept(&self, visitor: &mut dyn SettingsVisitor) -> usize {
        accept_from(self, visitor)
    }

    fn decorator_kinds(&self) -> Vec<DecoratorKind> {
        kinds_from(self)
    }
}

impl ChainExt for dyn Settings + '_ {
    fn accept(&self, visitor: &mut dyn SettingsVisitor) -> usize {
        accept_from(self, visitor)
    }

    fn decorator_kinds(&self) -> Vec<DecoratorKind> {
        kinds_from(self)
    }
}

fn accept_from(start: &dyn Settings, visitor: &mut dyn SettingsVisitor) -> usize {
    let target = visitor.target();
    let mut visited = 0;
    let mut current = Some(start);
    while let Some(node) = current {
        let matches = match target {
            VisitTarget::Kind(kind) => node.kind() == Some(kind),
            VisitTarget::Base => node.inner().is_none(),
        };
        if matches {
            visitor.visit(node);
            visited += 1;
        }
        current = node.inner();
    }
    visited
}

fn kinds_from(start: &dyn Settings) -> Vec<DecoratorKind> {
    let mut kinds = Vec::new();
    let mut current = Some(start);
    while let Some(node) = current {
        kinds.extend(node.kind());
        current = node.inner();
    }
    kinds
}

/// Checks that a decorator of `kind` may wrap `inner`.
pub fn validate(inner: &dyn Settings, kind: DecoratorKind) -> Result<()> {
    for present in inner.decorator_kinds() {
        if present == kind {
            return Err(ConfigError::DuplicateDecorator {
                kind: kind.to_string(),
            });
        }
        if present.is_terminal() {
            return Err(ConfigError::InvalidComposition {
                outer: kind.to_string(),
                inner: present.to_string(),
                reason: format!("{present} must be the outermost decorator"),
            });
        }
        if present.hides(kind) {
            return Err(ConfigError::InvalidComposition {
                outer: kind.to_string(),
                inner: present.to_string(),
                reason: format!("{present} hides {kind}"),
            });
        }
    }
    Ok(())
}

/// Validates the composition, builds the decorator and registers it with the chain.
///
/// ```rust
/// use hexsettings::prelude::*;
/// use std::sync::Arc;
///
/// let base: Arc<dyn Settings> = Arc::new(ValueStore::new());
/// let read_only = ReadOnly::wrap(base).unwrap();
/// assert!(ReadOnly::wrap(read_only).is_err());
/// ```
pub fn wrap<D, F>(inner: Arc<dyn Settings>, kind: DecoratorKind, build: F) -> Result<Arc<D>>
where
    D: Settings + 'static,
    F: FnOnce(Arc<dyn Settings>) -> D,
{
    validate(inner.as_ref(), kind)?;

    let node = Arc::new(build(inner));
    let outermost: Arc<dyn Settings> = node.clone();
    match node.registry() {
        Some(registry) => registry.register(Arc::downgrade(&outermost)),
        None => tracing::warn!("Chain for {} has no registry at its base", kind),
    }
    tracing::debug!("Wrapped settings with {}", kind);
    Ok(node)
}
