// Copyright 2025 Cowboy AI, LLC.

//! Extension trait and storage for attaching plugin data to network elements

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Trait for extensions that can be attached to network elements
///
/// Extensions are an open, pluggable set of data objects that live outside
/// the core network schema. Each extension kind declares a stable name used
/// for lookup and for matching read-only wrappers in a
/// [`ExtensionViewRegistry`](crate::view::ExtensionViewRegistry).
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::cell::Cell;
/// use grid_model::Extension;
///
/// #[derive(Debug)]
/// struct ActivePowerControl {
///     droop: Cell<f64>,
/// }
///
/// impl Extension for ActivePowerControl {
///     fn as_any(&self) -> &dyn Any { self }
///     fn name(&self) -> &'static str { "activePowerControl" }
/// }
/// ```
pub trait Extension: Any {
    /// Get the extension as [`Any`] for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Stable name of this extension kind
    fn name(&self) -> &'static str;
}

/// Storage for the extensions attached to one network element
///
/// At most one extension per kind name can be attached. Extensions are stored
/// behind `Rc` so the same instance is observed by every holder of the
/// element's handle.
#[derive(Default)]
pub struct Extensions {
    by_name: IndexMap<&'static str, Rc<dyn Extension>>,
}

impl Extensions {
    /// Create an empty extension storage
    pub fn new() -> Self {
        Self {
            by_name: IndexMap::new(),
        }
    }

    /// Attach an extension, replacing any previous extension of the same kind
    pub fn add(&mut self, extension: Rc<dyn Extension>) {
        self.by_name.insert(extension.name(), extension);
    }

    /// Get an extension by kind name
    pub fn get(&self, name: &str) -> Option<Rc<dyn Extension>> {
        self.by_name.get(name).cloned()
    }

    /// Remove an extension by kind name, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<Rc<dyn Extension>> {
        self.by_name.shift_remove(name)
    }

    /// All attached extensions, in attachment order
    pub fn all(&self) -> Vec<Rc<dyn Extension>> {
        self.by_name.values().cloned().collect()
    }

    /// Number of attached extensions
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check if no extension is attached
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// Debug prints kind names only; extension payloads are arbitrary plugin data.
impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("kinds", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Marker {
        hits: Cell<u32>,
    }

    impl Extension for Marker {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn name(&self) -> &'static str {
            "marker"
        }
    }

    #[test]
    fn add_get_and_downcast() {
        let mut exts = Extensions::new();
        exts.add(Rc::new(Marker { hits: Cell::new(0) }));

        let ext = exts.get("marker").unwrap();
        let marker = ext.as_any().downcast_ref::<Marker>().unwrap();
        marker.hits.set(3);
        assert_eq!(marker.hits.get(), 3);
        assert_eq!(exts.len(), 1);
    }

    #[test]
    fn unknown_name_is_none() {
        let exts = Extensions::new();
        assert!(exts.get("nope").is_none());
        assert!(exts.is_empty());
    }
}
