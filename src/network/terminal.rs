// Copyright 2025 Cowboy AI, LLC.

//! Terminals: the connection points between equipment and buses

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::network::bus::{Bus, BusData};
use crate::network::connectable::{Connectable, WeakConnectable};
use crate::network::voltage_level::{VoltageLevel, VoltageLevelData};

pub(crate) struct TerminalData {
    /// Back-reference to the owning equipment, set right after construction.
    pub owner: Option<WeakConnectable>,
    pub voltage_level: Weak<RefCell<VoltageLevelData>>,
    pub connectable_bus: Weak<RefCell<BusData>>,
    pub connected: bool,
    pub p: f64,
    pub q: f64,
}

/// A terminal of a piece of equipment
///
/// A terminal belongs to exactly one connectable and sits in one voltage
/// level. In bus-breaker topology it has a *connectable bus* (the bus it
/// would connect to) and a connected flag. Handles are cheap clones sharing
/// the same underlying terminal; equality is identity.
#[derive(Clone)]
pub struct Terminal {
    data: Rc<RefCell<TerminalData>>,
}

impl Terminal {
    pub(crate) fn new(voltage_level: &VoltageLevel, bus: &Bus, connected: bool) -> Self {
        let terminal = Self {
            data: Rc::new(RefCell::new(TerminalData {
                owner: None,
                voltage_level: Rc::downgrade(voltage_level.data()),
                connectable_bus: Rc::downgrade(bus.data()),
                connected,
                p: f64::NAN,
                q: f64::NAN,
            })),
        };
        if connected {
            bus.attach_terminal(&terminal);
        }
        terminal
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<TerminalData>> {
        &self.data
    }

    pub(crate) fn from_data_rc(data: Rc<RefCell<TerminalData>>) -> Self {
        Self { data }
    }

    pub(crate) fn set_owner(&self, owner: WeakConnectable) {
        self.data.borrow_mut().owner = Some(owner);
    }

    /// Active power in MW flowing at this terminal
    pub fn p(&self) -> f64 {
        self.data.borrow().p
    }

    /// Set the active power in MW flowing at this terminal
    pub fn set_p(&self, p: f64) {
        self.data.borrow_mut().p = p;
    }

    /// Reactive power in MVar flowing at this terminal
    pub fn q(&self) -> f64 {
        self.data.borrow().q
    }

    /// Set the reactive power in MVar flowing at this terminal
    pub fn set_q(&self, q: f64) {
        self.data.borrow_mut().q = q;
    }

    /// Whether the terminal is currently connected to its bus
    pub fn is_connected(&self) -> bool {
        self.data.borrow().connected
    }

    /// The bus this terminal is connected to, if connected
    pub fn bus(&self) -> Option<Bus> {
        let data = self.data.borrow();
        if !data.connected {
            return None;
        }
        data.connectable_bus.upgrade().map(Bus::from_data)
    }

    /// The bus this terminal connects to when closed, connected or not
    pub fn connectable_bus(&self) -> Option<Bus> {
        self.data.borrow().connectable_bus.upgrade().map(Bus::from_data)
    }

    /// The voltage level this terminal sits in
    ///
    /// `None` once the voltage level has been removed from the network.
    pub fn voltage_level(&self) -> Option<VoltageLevel> {
        self.data
            .borrow()
            .voltage_level
            .upgrade()
            .map(VoltageLevel::from_data)
    }

    /// The equipment this terminal belongs to
    ///
    /// `None` once the equipment has been removed from the network.
    pub fn connectable(&self) -> Option<Connectable> {
        self.data
            .borrow()
            .owner
            .as_ref()
            .and_then(WeakConnectable::upgrade)
    }

    /// Connect the terminal to its connectable bus.
    ///
    /// Returns `true` if the connection state changed.
    pub fn connect(&self) -> bool {
        let bus = {
            let mut data = self.data.borrow_mut();
            if data.connected {
                return false;
            }
            let Some(bus) = data.connectable_bus.upgrade() else {
                return false;
            };
            data.connected = true;
            Bus::from_data(bus)
        };
        bus.attach_terminal(self);
        self.invalidate_components();
        true
    }

    /// Disconnect the terminal from its bus.
    ///
    /// Returns `true` if the connection state changed.
    pub fn disconnect(&self) -> bool {
        let bus = {
            let mut data = self.data.borrow_mut();
            if !data.connected {
                return false;
            }
            data.connected = false;
            data.connectable_bus.upgrade().map(Bus::from_data)
        };
        if let Some(bus) = bus {
            bus.detach_terminal(self);
        }
        self.invalidate_components();
        true
    }

    /// Detach this terminal from its bus without touching the connected flag.
    /// Used when the owning equipment is removed from the network.
    pub(crate) fn unlink(&self) {
        let bus = {
            let data = self.data.borrow();
            if !data.connected {
                None
            } else {
                data.connectable_bus.upgrade().map(Bus::from_data)
            }
        };
        if let Some(bus) = bus {
            bus.detach_terminal(self);
        }
        self.invalidate_components();
    }

    fn invalidate_components(&self) {
        if let Some(vl) = self.voltage_level() {
            if let Some(network) = vl.network() {
                network.invalidate_components();
            }
        }
    }
}

impl PartialEq for Terminal {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Terminal {}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self
            .connectable()
            .map(|c| c.id())
            .unwrap_or_else(|| "<detached>".to_string());
        write!(f, "Terminal({owner})")
    }
}
