// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent assembly of decorator chains.

use crate::domain::{ChangeObserver, Result, Settings};
use crate::ports::SettingsSource;
use crate::service::value_store::load_into;
use crate::service::{Caching, Observable, ReadOnly, Reloadable, ThreadBound, ThreadSafe};
use std::sync::Arc;

enum Layer {
    ReadOnly,
    ThreadBound,
    ThreadSafe,
    Caching,
    Observable(Vec<Arc<dyn ChangeObserver>>),
    Reloadable(Box<dyn SettingsSource>),
}

/// Builder for a decorated settings chain.
///
/// Decorators are applied in call order: the first call wraps the base store, the last one
/// becomes the outermost node. Composition errors are reported by [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
///
/// # fn main() -> Result<()> {
/// let settings = ValueStore::builder()
///     .caching()
///     .observe(|event: &ChangeEvent| -> Result<()> {
///         println!("changed: {:?}", event.changed);
///         Ok(())
///     })
///     .build()?;
///
/// settings.put("k", vec!["v".to_string()])?;
/// assert_eq!(
///     settings.decorator_kinds(),
///     vec![DecoratorKind::Observable, DecoratorKind::Caching]
/// );
/// # Ok(())
/// # }
/// ```
pub struct SettingsBuilder {
    base: Arc<dyn Settings>,
    sources: Vec<Box<dyn SettingsSource>>,
    layers: Vec<Layer>,
}

impl SettingsBuilder {
    /// Creates a builder around `base`.
    pub fn new<S: Settings + 'static>(base: S) -> Self {
        Self::from_arc(Arc::new(base))
    }

    /// Creates a builder around a shared base.
    pub fn from_arc(base: Arc<dyn Settings>) -> Self {
        Self {
            base,
            sources: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Loads `source` into the base store once, when the chain is built.
    pub fn with_source(mut self, source: Box<dyn SettingsSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds a properties or YAML file as a one-time source.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexsettings::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let settings = ValueStore::builder()
    ///     .with_file("/etc/myapp/settings.properties")?
    ///     .read_only()
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::FileSource;
        let source = FileSource::from_file(path)?;
        Ok(self.with_source(Box::new(source)))
    }

    /// Adds a [`ReadOnly`] layer.
    pub fn read_only(mut self) -> Self {
        self.layers.push(Layer::ReadOnly);
        self
    }

    /// Adds a [`ThreadBound`] layer bound to the building thread.
    pub fn thread_bound(mut self) -> Self {
        self.layers.push(Layer::ThreadBound);
        self
    }

    /// Adds a [`ThreadSafe`] layer. It must be the last layer.
    pub fn thread_safe(mut self) -> Self {
        self.layers.push(Layer::ThreadSafe);
        self
    }

    /// Adds a [`Caching`] layer.
    pub fn caching(mut self) -> Self {
        self.layers.push(Layer::Caching);
        self
    }

    /// Adds an [`Observable`] layer without observers.
    pub fn observable(mut self) -> Self {
        self.layers.push(Layer::Observable(Vec::new()));
        self
    }

    /// Registers an observer, adding an [`Observable`] layer unless the last layer is one.
    pub fn observe<O: ChangeObserver + 'static>(self, observer: O) -> Self {
        self.observe_arc(Arc::new(observer))
    }

    /// Registers a shared observer, adding an [`Observable`] layer unless the last layer is one.
    pub fn observe_arc(mut self, observer: Arc<dyn ChangeObserver>) -> Self {
        match self.layers.last_mut() {
            Some(Layer::Observable(observers)) => observers.push(observer),
            _ => self.layers.push(Layer::Observable(vec![observer])),
        }
        self
    }

    /// Adds a [`Reloadable`] layer; the source is loaded when the chain is built.
    pub fn reloadable(mut self, source: Box<dyn SettingsSource>) -> Self {
        self.layers.push(Layer::Reloadable(source));
        self
    }

    /// Loads the one-time sources and applies the layers in order.
    pub fn build(self) -> Result<Arc<dyn Settings>> {
        for source in &self.sources {
            load_into(self.base.as_ref(), source.as_ref())?;
        }

        let mut chain = self.base;
        for layer in self.layers {
            let next: Arc<dyn Settings> = match layer {
                Layer::ReadOnly => ReadOnly::wrap(chain)?,
                Layer::ThreadBound => ThreadBound::wrap(chain)?,
                Layer::ThreadSafe => ThreadSafe::wrap(chain)?,
                Layer::Caching => Caching::wrap(chain)?,
                Layer::Observable(observers) => {
                    let observable = Observable::wrap(chain)?;
                    for observer in observers {
                        observable.add_observer(observer)?;
                    }
                    observable
                }
                Layer::Reloadable(source) => Reloadable::wrap_loaded(chain, source)?,
            };
            chain = next;
        }
        Ok(chain)
    }
}
