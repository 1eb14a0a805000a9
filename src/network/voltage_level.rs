// Copyright 2025 Cowboy AI, LLC.

//! Voltage levels and their bus-breaker topology

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::bus::Bus;
use crate::network::connectable::Connectable;
use crate::network::substation::{Substation, SubstationData};
use crate::network::{impl_identifiable, IdentifiableBase, Network, NetworkData};

/// Topology model of a voltage level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyKind {
    /// Buses and breakers
    BusBreaker,
    /// Nodes and breakers
    NodeBreaker,
}

pub(crate) struct VoltageLevelData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub substation: Weak<RefCell<SubstationData>>,
    pub nominal_v: f64,
    pub low_voltage_limit: f64,
    pub high_voltage_limit: f64,
    pub topology_kind: TopologyKind,
    pub buses: IndexMap<String, Bus>,
    pub connectables: Vec<Connectable>,
}

/// A voltage level inside a substation
///
/// Owns the buses of its bus-breaker topology and keeps track of the
/// equipment connected in it.
#[derive(Clone)]
pub struct VoltageLevel {
    data: Rc<RefCell<VoltageLevelData>>,
}

impl_identifiable!(VoltageLevel, VoltageLevelData, "VoltageLevel");

impl VoltageLevel {
    /// Nominal voltage in kV
    pub fn nominal_v(&self) -> f64 {
        self.data.borrow().nominal_v
    }

    /// Set the nominal voltage in kV
    pub fn set_nominal_v(&self, nominal_v: f64) -> NetworkResult<()> {
        if !(nominal_v > 0.0) {
            return Err(NetworkError::validation(
                self.id(),
                format!("nominal voltage must be > 0, got {nominal_v}"),
            ));
        }
        self.data.borrow_mut().nominal_v = nominal_v;
        Ok(())
    }

    /// Low voltage limit in kV (`NaN` if undefined)
    pub fn low_voltage_limit(&self) -> f64 {
        self.data.borrow().low_voltage_limit
    }

    /// Set the low voltage limit in kV
    pub fn set_low_voltage_limit(&self, limit: f64) {
        self.data.borrow_mut().low_voltage_limit = limit;
    }

    /// High voltage limit in kV (`NaN` if undefined)
    pub fn high_voltage_limit(&self) -> f64 {
        self.data.borrow().high_voltage_limit
    }

    /// Set the high voltage limit in kV
    pub fn set_high_voltage_limit(&self, limit: f64) {
        self.data.borrow_mut().high_voltage_limit = limit;
    }

    /// Topology model of this voltage level
    pub fn topology_kind(&self) -> TopologyKind {
        self.data.borrow().topology_kind
    }

    /// The substation containing this voltage level
    ///
    /// `None` once the substation has been removed from the network.
    pub fn substation(&self) -> Option<Substation> {
        self.data
            .borrow()
            .substation
            .upgrade()
            .map(Substation::from_data)
    }

    /// The network this voltage level belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Buses of the bus-breaker topology, in creation order
    pub fn buses(&self) -> Vec<Bus> {
        self.data.borrow().buses.values().cloned().collect()
    }

    /// Bus with the given id, if it belongs to this voltage level
    pub fn bus(&self, id: &str) -> Option<Bus> {
        self.data.borrow().buses.get(id).cloned()
    }

    /// Number of buses in this voltage level
    pub fn bus_count(&self) -> usize {
        self.data.borrow().buses.len()
    }

    /// Create a new bus in the bus-breaker topology
    pub fn new_bus(&self, id: &str) -> NetworkResult<Bus> {
        let network = self
            .network()
            .ok_or_else(|| NetworkError::Detached(self.id()))?;
        network.check_new_id(id)?;
        let bus = Bus::new(id, self);
        self.data
            .borrow_mut()
            .buses
            .insert(id.to_string(), bus.clone());
        network.register_bus(&bus);
        network.invalidate_components();
        Ok(bus)
    }

    /// Remove a bus from the bus-breaker topology.
    ///
    /// Fails if any terminal still uses the bus as its connectable bus.
    pub fn remove_bus(&self, id: &str) -> NetworkResult<()> {
        let bus = self.bus(id).ok_or(NetworkError::NotFound {
            kind: "bus",
            id: id.to_string(),
        })?;
        if bus.connected_terminal_count() > 0 {
            return Err(NetworkError::validation(
                id,
                "cannot remove a bus with connected terminals",
            ));
        }
        self.data.borrow_mut().buses.shift_remove(id);
        if let Some(network) = self.network() {
            network.unregister(id);
            network.invalidate_components();
        }
        Ok(())
    }

    /// Equipment connected in this voltage level, in creation order
    pub fn connectables(&self) -> Vec<Connectable> {
        self.data.borrow().connectables.clone()
    }

    /// Number of pieces of equipment connected in this voltage level
    pub fn connectable_count(&self) -> usize {
        self.data.borrow().connectables.len()
    }

    pub(crate) fn register_connectable(&self, connectable: Connectable) {
        self.data.borrow_mut().connectables.push(connectable);
    }

    pub(crate) fn unregister_connectable(&self, id: &str) {
        self.data
            .borrow_mut()
            .connectables
            .retain(|c| c.id() != id);
    }
}

/// Builder for a [`VoltageLevel`], obtained from
/// [`Substation::new_voltage_level`]
pub struct VoltageLevelAdder {
    pub(crate) substation: Substation,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) nominal_v: f64,
    pub(crate) low_voltage_limit: f64,
    pub(crate) high_voltage_limit: f64,
    pub(crate) topology_kind: TopologyKind,
}

impl VoltageLevelAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the nominal voltage in kV (required)
    pub fn nominal_v(mut self, nominal_v: f64) -> Self {
        self.nominal_v = nominal_v;
        self
    }

    /// Set the low voltage limit in kV
    pub fn low_voltage_limit(mut self, limit: f64) -> Self {
        self.low_voltage_limit = limit;
        self
    }

    /// Set the high voltage limit in kV
    pub fn high_voltage_limit(mut self, limit: f64) -> Self {
        self.high_voltage_limit = limit;
        self
    }

    /// Set the topology model (defaults to bus-breaker)
    pub fn topology_kind(mut self, kind: TopologyKind) -> Self {
        self.topology_kind = kind;
        self
    }

    /// Build the voltage level and attach it to the substation
    pub fn add(self) -> NetworkResult<VoltageLevel> {
        let network = self
            .substation
            .network()
            .ok_or_else(|| NetworkError::Detached(self.substation.id()))?;
        network.check_new_id(&self.id)?;
        if !(self.nominal_v > 0.0) {
            return Err(NetworkError::validation(
                &self.id,
                format!("nominal voltage must be > 0, got {}", self.nominal_v),
            ));
        }
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name;
        let voltage_level = VoltageLevel::from_data(Rc::new(RefCell::new(VoltageLevelData {
            base,
            network: Rc::downgrade(network.data()),
            substation: Rc::downgrade(self.substation.data()),
            nominal_v: self.nominal_v,
            low_voltage_limit: self.low_voltage_limit,
            high_voltage_limit: self.high_voltage_limit,
            topology_kind: self.topology_kind,
            buses: IndexMap::new(),
            connectables: Vec::new(),
        })));
        self.substation.attach_voltage_level(&voltage_level);
        network.register_voltage_level(&voltage_level);
        Ok(voltage_level)
    }
}
