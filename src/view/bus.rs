// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of buses

use std::rc::Rc;

use crate::network::Bus;
use crate::view::cache::ViewCache;
use crate::view::component::ComponentView;
use crate::view::terminal::TerminalView;
use crate::view::voltage_level::VoltageLevelView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of a [`Bus`]
pub struct BusView {
    bus: Bus,
    cache: Rc<ViewCache>,
}

view_identifiable!(BusView, bus, "bus");

impl BusView {
    /// Voltage magnitude at the bus in kV
    pub fn v(&self) -> f64 {
        self.bus.v()
    }

    /// Voltage angle at the bus in degrees
    pub fn angle(&self) -> f64 {
        self.bus.angle()
    }

    /// The voltage level this bus belongs to
    pub fn voltage_level(&self) -> Option<Rc<VoltageLevelView>> {
        self.bus
            .voltage_level()
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// Terminals currently connected to this bus
    pub fn connected_terminals(&self) -> Vec<Rc<TerminalView>> {
        self.bus
            .connected_terminals()
            .iter()
            .map(|t| self.cache.terminal_view(t))
            .collect()
    }

    /// Number of terminals currently connected to this bus
    pub fn connected_terminal_count(&self) -> usize {
        self.bus.connected_terminal_count()
    }

    /// The connected component this bus belongs to
    pub fn connected_component(&self) -> Option<Rc<ComponentView>> {
        self.bus
            .connected_component()
            .map(|c| self.cache.component_view(&c))
    }

    reject_mutators! { "bus" =>
        fn set_v(_v: f64);
        fn set_angle(_angle: f64);
    }
}

impl ViewCache {
    pub(crate) fn bus_view(self: &Rc<Self>, bus: &Bus) -> Rc<BusView> {
        self.buses.get_or_insert(bus.data(), || BusView {
            bus: bus.clone(),
            cache: Rc::clone(self),
        })
    }
}
