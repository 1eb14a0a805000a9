// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of voltage levels and their topology views

use std::rc::Rc;

use crate::network::{TopologyKind, VoltageLevel};
use crate::view::bus::BusView;
use crate::view::cache::ViewCache;
use crate::view::dispatch::ConnectableView;
use crate::view::substation::SubstationView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of a [`VoltageLevel`]
pub struct VoltageLevelView {
    voltage_level: VoltageLevel,
    cache: Rc<ViewCache>,
}

view_identifiable!(VoltageLevelView, voltage_level, "voltage level");

impl VoltageLevelView {
    /// Nominal voltage in kV
    pub fn nominal_v(&self) -> f64 {
        self.voltage_level.nominal_v()
    }

    /// Low voltage limit in kV (`NaN` if undefined)
    pub fn low_voltage_limit(&self) -> f64 {
        self.voltage_level.low_voltage_limit()
    }

    /// High voltage limit in kV (`NaN` if undefined)
    pub fn high_voltage_limit(&self) -> f64 {
        self.voltage_level.high_voltage_limit()
    }

    /// Topology model of this voltage level
    pub fn topology_kind(&self) -> TopologyKind {
        self.voltage_level.topology_kind()
    }

    /// The substation containing this voltage level
    pub fn substation(&self) -> Option<Rc<SubstationView>> {
        self.voltage_level
            .substation()
            .map(|s| self.cache.substation_view(&s))
    }

    /// Equipment connected in this voltage level, in creation order
    pub fn connectables(&self) -> Vec<ConnectableView> {
        self.voltage_level
            .connectables()
            .iter()
            .map(|c| self.cache.wrap_connectable(c))
            .collect()
    }

    /// Number of pieces of equipment connected in this voltage level
    pub fn connectable_count(&self) -> usize {
        self.voltage_level.connectable_count()
    }

    /// Bus-breaker topology view: the configured buses
    pub fn bus_breaker_view(&self) -> VoltageLevelBusBreakerView {
        VoltageLevelBusBreakerView {
            voltage_level: self.voltage_level.clone(),
            cache: Rc::clone(&self.cache),
        }
    }

    /// Bus topology view: the electrical buses
    pub fn bus_view(&self) -> VoltageLevelBusView {
        VoltageLevelBusView {
            voltage_level: self.voltage_level.clone(),
            cache: Rc::clone(&self.cache),
        }
    }

    reject_mutators! { "voltage level" =>
        fn set_nominal_v(_nominal_v: f64);
        fn set_low_voltage_limit(_limit: f64);
        fn set_high_voltage_limit(_limit: f64);
        fn new_generator(_id: &str);
        fn new_load(_id: &str);
        fn new_shunt_compensator(_id: &str);
        fn new_dangling_line(_id: &str);
        fn new_static_var_compensator(_id: &str);
        fn new_busbar_section(_id: &str);
        fn new_lcc_converter_station(_id: &str);
        fn new_vsc_converter_station(_id: &str);
    }
}

/// Read-only bus-breaker topology view of a voltage level
pub struct VoltageLevelBusBreakerView {
    voltage_level: VoltageLevel,
    cache: Rc<ViewCache>,
}

impl VoltageLevelBusBreakerView {
    fn id(&self) -> String {
        self.voltage_level.id()
    }

    /// Configured buses, in creation order
    pub fn buses(&self) -> Vec<Rc<BusView>> {
        self.voltage_level
            .buses()
            .iter()
            .map(|bus| self.cache.bus_view(bus))
            .collect()
    }

    /// Configured bus with the given id
    pub fn bus(&self, id: &str) -> Option<Rc<BusView>> {
        self.voltage_level.bus(id).map(|bus| self.cache.bus_view(&bus))
    }

    /// Number of configured buses
    pub fn bus_count(&self) -> usize {
        self.voltage_level.bus_count()
    }

    reject_mutators! { "voltage level" =>
        fn new_bus(_id: &str);
        fn remove_bus(_id: &str);
    }
}

/// Read-only electrical bus view of a voltage level
///
/// The bus-breaker model carries no switches, so electrical buses coincide
/// with the configured buses.
pub struct VoltageLevelBusView {
    voltage_level: VoltageLevel,
    cache: Rc<ViewCache>,
}

impl VoltageLevelBusView {
    /// Electrical buses of this voltage level
    pub fn buses(&self) -> Vec<Rc<BusView>> {
        self.voltage_level
            .buses()
            .iter()
            .map(|bus| self.cache.bus_view(bus))
            .collect()
    }

    /// Electrical bus with the given id
    pub fn bus(&self, id: &str) -> Option<Rc<BusView>> {
        self.voltage_level.bus(id).map(|bus| self.cache.bus_view(&bus))
    }
}

impl ViewCache {
    pub(crate) fn voltage_level_view(
        self: &Rc<Self>,
        voltage_level: &VoltageLevel,
    ) -> Rc<VoltageLevelView> {
        self.voltage_levels
            .get_or_insert(voltage_level.data(), || VoltageLevelView {
                voltage_level: voltage_level.clone(),
                cache: Rc::clone(self),
            })
    }
}
