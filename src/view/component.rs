// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of connected components

use std::rc::Rc;

use crate::network::Component;
use crate::view::bus::BusView;
use crate::view::cache::ViewCache;

/// Read-only view of a [`Component`]
///
/// Components are already immutable snapshots; the view exists so that
/// navigation from a component stays inside the projection.
pub struct ComponentView {
    component: Component,
    cache: Rc<ViewCache>,
}

impl ComponentView {
    /// Number of the component; zero is the main component
    pub fn num(&self) -> usize {
        self.component.num()
    }

    /// Number of buses in the component at computation time
    pub fn size(&self) -> usize {
        self.component.size()
    }

    /// Buses of the component that are still alive
    pub fn buses(&self) -> Vec<Rc<BusView>> {
        self.component
            .buses()
            .iter()
            .map(|bus| self.cache.bus_view(bus))
            .collect()
    }
}

impl ViewCache {
    pub(crate) fn component_view(self: &Rc<Self>, component: &Component) -> Rc<ComponentView> {
        self.components.get_or_insert(component.data(), || ComponentView {
            component: component.clone(),
            cache: Rc::clone(self),
        })
    }
}
