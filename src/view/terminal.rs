// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of terminals

use std::rc::Rc;

use crate::network::Terminal;
use crate::view::bus::BusView;
use crate::view::cache::ViewCache;
use crate::view::dispatch::ConnectableView;
use crate::view::reject_mutators;
use crate::view::voltage_level::VoltageLevelView;

/// Read-only view of a [`Terminal`]
pub struct TerminalView {
    terminal: Terminal,
    cache: Rc<ViewCache>,
}

impl TerminalView {
    // Terminals have no id of their own; rejections are reported under the
    // owning equipment's id.
    fn id(&self) -> String {
        self.terminal
            .connectable()
            .map(|c| c.id())
            .unwrap_or_else(|| "<detached>".to_string())
    }

    /// Active power in MW flowing at this terminal
    pub fn p(&self) -> f64 {
        self.terminal.p()
    }

    /// Reactive power in MVar flowing at this terminal
    pub fn q(&self) -> f64 {
        self.terminal.q()
    }

    /// Whether the terminal is currently connected to its bus
    pub fn is_connected(&self) -> bool {
        self.terminal.is_connected()
    }

    /// The bus this terminal is connected to, if connected
    pub fn bus(&self) -> Option<Rc<BusView>> {
        self.terminal.bus().map(|bus| self.cache.bus_view(&bus))
    }

    /// The bus this terminal connects to when closed, connected or not
    pub fn connectable_bus(&self) -> Option<Rc<BusView>> {
        self.terminal
            .connectable_bus()
            .map(|bus| self.cache.bus_view(&bus))
    }

    /// The voltage level this terminal sits in
    pub fn voltage_level(&self) -> Option<Rc<VoltageLevelView>> {
        self.terminal
            .voltage_level()
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// The equipment this terminal belongs to
    pub fn connectable(&self) -> Option<ConnectableView> {
        self.terminal
            .connectable()
            .map(|c| self.cache.wrap_connectable(&c))
    }

    reject_mutators! { "terminal" =>
        fn set_p(_p: f64);
        fn set_q(_q: f64);
        fn connect();
        fn disconnect();
    }
}

impl ViewCache {
    pub(crate) fn terminal_view(self: &Rc<Self>, terminal: &Terminal) -> Rc<TerminalView> {
        self.terminals.get_or_insert(terminal.data(), || TerminalView {
            terminal: terminal.clone(),
            cache: Rc::clone(self),
        })
    }
}
