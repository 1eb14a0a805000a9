// Copyright 2025 Cowboy AI, LLC.

//! Buses of the bus-breaker topology

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::network::component::Component;
use crate::network::{impl_identifiable, IdentifiableBase};
use crate::network::terminal::{Terminal, TerminalData};
use crate::network::voltage_level::{VoltageLevel, VoltageLevelData};

pub(crate) struct BusData {
    pub base: IdentifiableBase,
    pub voltage_level: Weak<RefCell<VoltageLevelData>>,
    pub terminals: Vec<Weak<RefCell<TerminalData>>>,
    pub v: f64,
    pub angle: f64,
    pub component: Option<Component>,
}

/// A bus of the bus-breaker topology of a voltage level
#[derive(Clone)]
pub struct Bus {
    data: Rc<RefCell<BusData>>,
}

impl_identifiable!(Bus, BusData, "Bus");

impl Bus {
    pub(crate) fn new(id: &str, voltage_level: &VoltageLevel) -> Self {
        Self {
            data: Rc::new(RefCell::new(BusData {
                base: IdentifiableBase::new(id),
                voltage_level: Rc::downgrade(voltage_level.data()),
                terminals: Vec::new(),
                v: f64::NAN,
                angle: f64::NAN,
                component: None,
            })),
        }
    }

    /// Voltage magnitude at the bus in kV
    pub fn v(&self) -> f64 {
        self.data.borrow().v
    }

    /// Set the voltage magnitude at the bus in kV
    pub fn set_v(&self, v: f64) {
        self.data.borrow_mut().v = v;
    }

    /// Voltage angle at the bus in degrees
    pub fn angle(&self) -> f64 {
        self.data.borrow().angle
    }

    /// Set the voltage angle at the bus in degrees
    pub fn set_angle(&self, angle: f64) {
        self.data.borrow_mut().angle = angle;
    }

    /// The voltage level this bus belongs to
    ///
    /// `None` once the voltage level has been removed from the network.
    pub fn voltage_level(&self) -> Option<VoltageLevel> {
        self.data
            .borrow()
            .voltage_level
            .upgrade()
            .map(VoltageLevel::from_data)
    }

    /// Terminals currently connected to this bus
    pub fn connected_terminals(&self) -> Vec<Terminal> {
        self.data
            .borrow()
            .terminals
            .iter()
            .filter_map(Weak::upgrade)
            .map(Terminal::from_data_rc)
            .collect()
    }

    /// Number of terminals currently connected to this bus
    pub fn connected_terminal_count(&self) -> usize {
        self.data
            .borrow()
            .terminals
            .iter()
            .filter(|t| t.strong_count() > 0)
            .count()
    }

    /// The connected component this bus belongs to
    ///
    /// Recomputes the network's components first if topology changed since
    /// the last computation. `None` for a bus detached from its network.
    pub fn connected_component(&self) -> Option<Component> {
        let network = self.voltage_level()?.network()?;
        network.connected_components();
        self.data.borrow().component.clone()
    }

    pub(crate) fn set_component(&self, component: Option<Component>) {
        self.data.borrow_mut().component = component;
    }

    pub(crate) fn attach_terminal(&self, terminal: &Terminal) {
        let mut data = self.data.borrow_mut();
        data.terminals.retain(|t| t.strong_count() > 0);
        data.terminals.push(Rc::downgrade(terminal.data()));
    }

    pub(crate) fn detach_terminal(&self, terminal: &Terminal) {
        let target = Rc::as_ptr(terminal.data());
        self.data
            .borrow_mut()
            .terminals
            .retain(|t| t.strong_count() > 0 && t.as_ptr() != target);
    }
}
