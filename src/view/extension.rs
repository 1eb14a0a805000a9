// Copyright 2025 Cowboy AI, LLC.

//! Read-only wrappers for extensions
//!
//! Extensions are an open set, so the projection cannot enumerate them the
//! way it enumerates equipment kinds. Instead, a [`ExtensionViewRegistry`]
//! is assembled at construction time with one wrapper factory per extension
//! kind that should be projected read-only. Extensions without a registered
//! factory are passed through unwrapped, still mutable; callers that need a
//! fully sealed projection must register a factory for every extension kind
//! they attach.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::network::Extension;

/// Builds the read-only wrapper for one extension kind.
///
/// The factory receives the live extension and returns a wrapper that
/// implements [`Extension`] under the same kind name, exposing getters and
/// rejecting or omitting mutation.
pub type ExtensionViewFactory = Box<dyn Fn(Rc<dyn Extension>) -> Rc<dyn Extension>>;

struct Slot {
    source: Weak<dyn Extension>,
    view: Weak<dyn Extension>,
}

/// Registry of read-only extension wrappers, with a weak identity cache
///
/// Wrapping the same extension instance twice yields the same wrapper, and
/// the cache keeps neither the extension nor the wrapper alive.
#[derive(Default)]
pub struct ExtensionViewRegistry {
    factories: HashMap<&'static str, ExtensionViewFactory>,
    cache: RefCell<HashMap<usize, Slot>>,
}

impl ExtensionViewRegistry {
    /// Create an empty registry: every extension passes through unwrapped
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wrapper factory for the given extension kind name
    pub fn register(&mut self, name: &'static str, factory: ExtensionViewFactory) {
        self.factories.insert(name, factory);
    }

    /// Whether a factory is registered for the given kind name
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Wrap `extension` read-only if its kind has a registered factory.
    ///
    /// Without a factory the raw extension is returned as-is.
    pub fn wrap(&self, extension: Rc<dyn Extension>) -> Rc<dyn Extension> {
        let Some(factory) = self.factories.get(extension.name()) else {
            debug!(
                kind = extension.name(),
                "no read-only wrapper registered, passing extension through"
            );
            return extension;
        };
        let key = Rc::as_ptr(&extension) as *const () as usize;
        if let Some(view) = self.lookup(key, &extension) {
            trace!(kind = extension.name(), "extension wrapper cache hit");
            return view;
        }
        let view = factory(Rc::clone(&extension));
        debug!(kind = extension.name(), "built extension wrapper");
        let mut cache = self.cache.borrow_mut();
        cache.retain(|_, slot| slot.source.strong_count() > 0 && slot.view.strong_count() > 0);
        cache.insert(
            key,
            Slot {
                source: Rc::downgrade(&extension),
                view: Rc::downgrade(&view),
            },
        );
        view
    }

    fn lookup(&self, key: usize, extension: &Rc<dyn Extension>) -> Option<Rc<dyn Extension>> {
        let cache = self.cache.borrow();
        let slot = cache.get(&key)?;
        let live = slot.source.upgrade()?;
        // Address reuse after a drop must not resurrect a stale wrapper.
        if Rc::as_ptr(&live) as *const () != Rc::as_ptr(extension) as *const () {
            return None;
        }
        slot.view.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Droop {
        value: Cell<f64>,
    }

    impl Extension for Droop {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn name(&self) -> &'static str {
            "droop"
        }
    }

    /// Read-only face of [`Droop`].
    struct DroopView {
        inner: Rc<dyn Extension>,
    }

    impl Extension for DroopView {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn name(&self) -> &'static str {
            "droop"
        }
    }

    impl DroopView {
        fn value(&self) -> f64 {
            self.inner
                .as_any()
                .downcast_ref::<Droop>()
                .map(|d| d.value.get())
                .unwrap_or(f64::NAN)
        }
    }

    fn registry() -> ExtensionViewRegistry {
        let mut registry = ExtensionViewRegistry::new();
        registry.register("droop", Box::new(|inner| Rc::new(DroopView { inner })));
        registry
    }

    #[test]
    fn registered_kind_is_wrapped_and_identity_cached() {
        let registry = registry();
        let ext: Rc<dyn Extension> = Rc::new(Droop {
            value: Cell::new(4.0),
        });

        let a = registry.wrap(Rc::clone(&ext));
        let b = registry.wrap(Rc::clone(&ext));
        assert!(Rc::as_ptr(&a) as *const () == Rc::as_ptr(&b) as *const ());

        let view = a.as_any().downcast_ref::<DroopView>().unwrap();
        assert_eq!(view.value(), 4.0);
    }

    #[test]
    fn wrapper_sees_live_state() {
        let registry = registry();
        let droop = Rc::new(Droop {
            value: Cell::new(4.0),
        });
        let wrapped = registry.wrap(droop.clone() as Rc<dyn Extension>);
        droop.value.set(7.5);
        let view = wrapped.as_any().downcast_ref::<DroopView>().unwrap();
        assert_eq!(view.value(), 7.5);
    }

    #[test]
    fn unregistered_kind_passes_through() {
        let registry = ExtensionViewRegistry::new();
        let ext: Rc<dyn Extension> = Rc::new(Droop {
            value: Cell::new(1.0),
        });
        let out = registry.wrap(Rc::clone(&ext));
        assert!(Rc::as_ptr(&out) as *const () == Rc::as_ptr(&ext) as *const ());
    }
}
