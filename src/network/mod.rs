// Copyright 2025 Cowboy AI, LLC.

//! The mutable electrical network model
//!
//! A [`Network`] is an object graph of substations, voltage levels, buses and
//! equipment. Every element is exposed through a cheap-to-clone *handle*
//! (`Rc<RefCell<..>>` underneath): clones observe the same element, equality
//! is identity, and the graph owns its elements downward while back-references
//! go through `Weak`. The model is single-threaded; share it across threads by
//! message passing, not by sharing handles.
//!
//! New elements are created with builder-style adders (`new_substation`,
//! `new_line`, ...) that validate before touching the graph.

pub mod bus;
pub mod component;
pub mod connectable;
pub mod extension;
pub mod hvdc;
pub mod injection;
pub mod limits;
pub mod line;
pub mod substation;
pub mod tap_changer;
pub mod terminal;
pub mod transformer;
pub mod voltage_level;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::errors::{NetworkError, NetworkResult};

pub use bus::Bus;
pub use component::Component;
pub use connectable::{
    Branch, Connectable, ConnectableKind, HvdcConverterStation, HvdcConverterStationKind,
};
pub use extension::{Extension, Extensions};
pub use hvdc::{
    HvdcConvertersMode, HvdcLine, HvdcLineAdder, LccConverterStation, LccConverterStationAdder,
    VscConverterStation, VscConverterStationAdder,
};
pub use injection::{
    BusbarSection, BusbarSectionAdder, DanglingLine, DanglingLineAdder, EnergySource, Generator,
    GeneratorAdder, Load, LoadAdder, LoadKind, ShuntCompensator, ShuntCompensatorAdder,
    StaticVarCompensator, StaticVarCompensatorAdder, SvcRegulationMode,
};
pub use limits::{CurrentLimits, CurrentLimitsAdder, TemporaryLimit};
pub use line::{HalfLine, HalfLineSpec, Line, LineAdder, TieLineAdder};
pub use substation::{Substation, SubstationAdder};
pub use tap_changer::{
    PhaseRegulationMode, PhaseTapChanger, PhaseTapChangerAdder, PhaseTapChangerStep,
    RatioTapChanger, RatioTapChangerAdder, TapChangerStep,
};
pub use terminal::Terminal;
pub use transformer::{
    Leg, LegSpec, ThreeWindingsTransformer, ThreeWindingsTransformerAdder, TwoWindingsTransformer,
    TwoWindingsTransformerAdder,
};
pub use voltage_level::{TopologyKind, VoltageLevel, VoltageLevelAdder};

/// State shared by every identifiable element: id, optional name, free-form
/// properties and attached extensions.
pub(crate) struct IdentifiableBase {
    pub id: String,
    pub name: Option<String>,
    pub properties: IndexMap<String, String>,
    pub extensions: Extensions,
}

impl IdentifiableBase {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            properties: IndexMap::new(),
            extensions: Extensions::new(),
        }
    }
}

/// Generates the identifiable surface of a handle type: id, name, properties,
/// extensions, the data-cell plumbing, and identity-based equality. Expects
/// the handle to be `struct $handle { data: Rc<RefCell<$data>> }` with an
/// [`IdentifiableBase`] in the data's `base` field.
macro_rules! impl_identifiable {
    ($handle:ident, $data:ty, $kind:literal) => {
        impl $handle {
            /// Unique id of this element
            pub fn id(&self) -> String {
                self.data.borrow().base.id.clone()
            }

            /// Human-readable name, falling back to the id
            pub fn name(&self) -> String {
                let data = self.data.borrow();
                data.base
                    .name
                    .clone()
                    .unwrap_or_else(|| data.base.id.clone())
            }

            /// Whether a name distinct from the id is set
            pub fn has_name(&self) -> bool {
                self.data.borrow().base.name.is_some()
            }

            /// Free-form property attached to this element
            pub fn property(&self, key: &str) -> Option<String> {
                self.data.borrow().base.properties.get(key).cloned()
            }

            /// All properties, in insertion order
            pub fn properties(&self) -> indexmap::IndexMap<String, String> {
                self.data.borrow().base.properties.clone()
            }

            /// Set a property, returning the previous value
            pub fn set_property(&self, key: &str, value: &str) -> Option<String> {
                self.data
                    .borrow_mut()
                    .base
                    .properties
                    .insert(key.to_string(), value.to_string())
            }

            /// Attach an extension, replacing any previous one of the same kind
            pub fn add_extension(
                &self,
                extension: std::rc::Rc<dyn $crate::network::Extension>,
            ) {
                self.data.borrow_mut().base.extensions.add(extension);
            }

            /// Extension with the given kind name, if attached
            pub fn extension(
                &self,
                name: &str,
            ) -> Option<std::rc::Rc<dyn $crate::network::Extension>> {
                self.data.borrow().base.extensions.get(name)
            }

            /// All attached extensions, in attachment order
            pub fn extensions(&self) -> Vec<std::rc::Rc<dyn $crate::network::Extension>> {
                self.data.borrow().base.extensions.all()
            }

            /// Remove an extension by kind name, returning it if present
            pub fn remove_extension(
                &self,
                name: &str,
            ) -> Option<std::rc::Rc<dyn $crate::network::Extension>> {
                self.data.borrow_mut().base.extensions.remove(name)
            }

            pub(crate) fn from_data(data: std::rc::Rc<std::cell::RefCell<$data>>) -> Self {
                Self { data }
            }

            pub(crate) fn data(&self) -> &std::rc::Rc<std::cell::RefCell<$data>> {
                &self.data
            }

            pub(crate) fn downgrade(&self) -> std::rc::Weak<std::cell::RefCell<$data>> {
                std::rc::Rc::downgrade(&self.data)
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                std::rc::Rc::ptr_eq(&self.data, &other.data)
            }
        }

        impl Eq for $handle {}

        impl std::fmt::Debug for $handle {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($kind, "({})"), self.data.borrow().base.id)
            }
        }
    };
}
pub(crate) use impl_identifiable;

/// Generates the single-terminal equipment surface of a handle type:
/// terminal and container navigation, plus removal from the network.
/// Expects the data to carry `terminal` and `network` fields.
macro_rules! impl_injection {
    ($handle:ident, $kind:literal, $unregister:ident) => {
        impl $handle {
            /// The equipment's terminal
            pub fn terminal(&self) -> Terminal {
                self.data.borrow().terminal.clone()
            }

            /// The voltage level this equipment is connected in
            pub fn voltage_level(&self) -> Option<VoltageLevel> {
                self.terminal().voltage_level()
            }

            /// The network this equipment belongs to
            pub fn network(&self) -> Option<Network> {
                self.data.borrow().network.upgrade().map(Network::from_data)
            }

            /// Remove this equipment from the network
            pub fn remove(&self) {
                tracing::debug!(id = %self.id(), concat!("removing ", $kind));
                let terminal = self.terminal();
                terminal.unlink();
                if let Some(vl) = terminal.voltage_level() {
                    vl.unregister_connectable(&self.id());
                }
                if let Some(network) = self.network() {
                    network.$unregister(&self.id());
                    network.invalidate_components();
                }
            }
        }
    };
}
pub(crate) use impl_injection;

/// Any identifiable element of the network, as stored in the global id index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifiable {
    /// Substation
    Substation(Substation),
    /// Voltage level
    VoltageLevel(VoltageLevel),
    /// Bus of a bus-breaker topology
    Bus(Bus),
    /// AC line (possibly a tie line)
    Line(Line),
    /// Two-windings transformer
    TwoWindingsTransformer(TwoWindingsTransformer),
    /// Three-windings transformer
    ThreeWindingsTransformer(ThreeWindingsTransformer),
    /// Generator
    Generator(Generator),
    /// Load
    Load(Load),
    /// Shunt compensator
    ShuntCompensator(ShuntCompensator),
    /// Dangling (boundary) line
    DanglingLine(DanglingLine),
    /// Static VAR compensator
    StaticVarCompensator(StaticVarCompensator),
    /// Busbar section
    BusbarSection(BusbarSection),
    /// LCC converter station
    LccConverterStation(LccConverterStation),
    /// VSC converter station
    VscConverterStation(VscConverterStation),
    /// HVDC line
    HvdcLine(HvdcLine),
}

impl Identifiable {
    /// Unique id of the element
    pub fn id(&self) -> String {
        match self {
            Identifiable::Substation(x) => x.id(),
            Identifiable::VoltageLevel(x) => x.id(),
            Identifiable::Bus(x) => x.id(),
            Identifiable::Line(x) => x.id(),
            Identifiable::TwoWindingsTransformer(x) => x.id(),
            Identifiable::ThreeWindingsTransformer(x) => x.id(),
            Identifiable::Generator(x) => x.id(),
            Identifiable::Load(x) => x.id(),
            Identifiable::ShuntCompensator(x) => x.id(),
            Identifiable::DanglingLine(x) => x.id(),
            Identifiable::StaticVarCompensator(x) => x.id(),
            Identifiable::BusbarSection(x) => x.id(),
            Identifiable::LccConverterStation(x) => x.id(),
            Identifiable::VscConverterStation(x) => x.id(),
            Identifiable::HvdcLine(x) => x.id(),
        }
    }

    /// Human-readable name, falling back to the id
    pub fn name(&self) -> String {
        match self {
            Identifiable::Substation(x) => x.name(),
            Identifiable::VoltageLevel(x) => x.name(),
            Identifiable::Bus(x) => x.name(),
            Identifiable::Line(x) => x.name(),
            Identifiable::TwoWindingsTransformer(x) => x.name(),
            Identifiable::ThreeWindingsTransformer(x) => x.name(),
            Identifiable::Generator(x) => x.name(),
            Identifiable::Load(x) => x.name(),
            Identifiable::ShuntCompensator(x) => x.name(),
            Identifiable::DanglingLine(x) => x.name(),
            Identifiable::StaticVarCompensator(x) => x.name(),
            Identifiable::BusbarSection(x) => x.name(),
            Identifiable::LccConverterStation(x) => x.name(),
            Identifiable::VscConverterStation(x) => x.name(),
            Identifiable::HvdcLine(x) => x.name(),
        }
    }
}

pub(crate) struct NetworkData {
    pub base: IdentifiableBase,
    pub case_date: DateTime<Utc>,
    pub forecast_distance: i32,
    pub source_format: String,
    pub substations: IndexMap<String, Substation>,
    pub voltage_levels: IndexMap<String, VoltageLevel>,
    pub lines: IndexMap<String, Line>,
    pub two_windings_transformers: IndexMap<String, TwoWindingsTransformer>,
    pub three_windings_transformers: IndexMap<String, ThreeWindingsTransformer>,
    pub generators: IndexMap<String, Generator>,
    pub loads: IndexMap<String, Load>,
    pub shunt_compensators: IndexMap<String, ShuntCompensator>,
    pub dangling_lines: IndexMap<String, DanglingLine>,
    pub static_var_compensators: IndexMap<String, StaticVarCompensator>,
    pub busbar_sections: IndexMap<String, BusbarSection>,
    pub lcc_converter_stations: IndexMap<String, LccConverterStation>,
    pub vsc_converter_stations: IndexMap<String, VscConverterStation>,
    pub hvdc_lines: IndexMap<String, HvdcLine>,
    /// Every identifiable of the network, buses included.
    pub index: IndexMap<String, Identifiable>,
    pub components: Vec<Component>,
    pub components_valid: bool,
}

/// The root of the network model
///
/// Owns every element of the graph and maintains a global id index. Like all
/// handles it is a cheap clone over shared state.
#[derive(Clone)]
pub struct Network {
    data: Rc<RefCell<NetworkData>>,
}

impl_identifiable!(Network, NetworkData, "Network");

impl Network {
    /// Create an empty network
    pub fn new(id: &str, source_format: &str) -> Self {
        tracing::debug!(id, source_format, "creating network");
        Self {
            data: Rc::new(RefCell::new(NetworkData {
                base: IdentifiableBase::new(id),
                case_date: Utc::now(),
                forecast_distance: 0,
                source_format: source_format.to_string(),
                substations: IndexMap::new(),
                voltage_levels: IndexMap::new(),
                lines: IndexMap::new(),
                two_windings_transformers: IndexMap::new(),
                three_windings_transformers: IndexMap::new(),
                generators: IndexMap::new(),
                loads: IndexMap::new(),
                shunt_compensators: IndexMap::new(),
                dangling_lines: IndexMap::new(),
                static_var_compensators: IndexMap::new(),
                busbar_sections: IndexMap::new(),
                lcc_converter_stations: IndexMap::new(),
                vsc_converter_stations: IndexMap::new(),
                hvdc_lines: IndexMap::new(),
                index: IndexMap::new(),
                components: Vec::new(),
                components_valid: false,
            })),
        }
    }

    /// Date of the network case
    pub fn case_date(&self) -> DateTime<Utc> {
        self.data.borrow().case_date
    }

    /// Set the date of the network case
    pub fn set_case_date(&self, case_date: DateTime<Utc>) {
        self.data.borrow_mut().case_date = case_date;
    }

    /// Forecast distance in minutes; zero for a snapshot
    pub fn forecast_distance(&self) -> i32 {
        self.data.borrow().forecast_distance
    }

    /// Set the forecast distance in minutes
    pub fn set_forecast_distance(&self, minutes: i32) -> NetworkResult<()> {
        if minutes < 0 {
            return Err(NetworkError::validation(
                self.id(),
                format!("forecast distance must be >= 0, got {minutes}"),
            ));
        }
        self.data.borrow_mut().forecast_distance = minutes;
        Ok(())
    }

    /// Format the network was loaded from
    pub fn source_format(&self) -> String {
        self.data.borrow().source_format.clone()
    }

    /// Start building a new substation
    pub fn new_substation(&self, id: &str) -> SubstationAdder {
        SubstationAdder {
            network: self.clone(),
            id: id.to_string(),
            name: None,
            country: None,
            tso: None,
            geographical_tags: Vec::new(),
        }
    }

    /// Start building a new AC line
    pub fn new_line(&self, id: &str) -> LineAdder {
        LineAdder {
            network: self.clone(),
            id: id.to_string(),
            name: None,
            voltage_level1: None,
            bus1: None,
            voltage_level2: None,
            bus2: None,
            r: 0.0,
            x: 0.0,
            g1: 0.0,
            b1: 0.0,
            g2: 0.0,
            b2: 0.0,
        }
    }

    /// Start building a new tie line
    pub fn new_tie_line(&self, id: &str) -> TieLineAdder {
        TieLineAdder {
            network: self.clone(),
            id: id.to_string(),
            name: None,
            voltage_level1: None,
            bus1: None,
            voltage_level2: None,
            bus2: None,
            ucte_xnode_code: None,
            half1: None,
            half2: None,
        }
    }

    /// Start building a new HVDC line
    pub fn new_hvdc_line(&self, id: &str) -> HvdcLineAdder {
        HvdcLineAdder {
            network: self.clone(),
            id: id.to_string(),
            name: None,
            r: 0.0,
            nominal_v: f64::NAN,
            active_power_setpoint: f64::NAN,
            max_p: f64::NAN,
            converters_mode: HvdcConvertersMode::Side1RectifierSide2Inverter,
            converter_station1: None,
            converter_station2: None,
        }
    }

    /// Substations of the network, in creation order
    pub fn substations(&self) -> Vec<Substation> {
        self.data.borrow().substations.values().cloned().collect()
    }

    /// Substation with the given id
    pub fn substation(&self, id: &str) -> Option<Substation> {
        self.data.borrow().substations.get(id).cloned()
    }

    /// Number of substations
    pub fn substation_count(&self) -> usize {
        self.data.borrow().substations.len()
    }

    /// Voltage levels of the network, in creation order
    pub fn voltage_levels(&self) -> Vec<VoltageLevel> {
        self.data.borrow().voltage_levels.values().cloned().collect()
    }

    /// Voltage level with the given id
    pub fn voltage_level(&self, id: &str) -> Option<VoltageLevel> {
        self.data.borrow().voltage_levels.get(id).cloned()
    }

    /// Number of voltage levels
    pub fn voltage_level_count(&self) -> usize {
        self.data.borrow().voltage_levels.len()
    }

    /// Buses of the bus-breaker topology across the whole network
    pub fn buses(&self) -> Vec<Bus> {
        let voltage_levels = self.voltage_levels();
        voltage_levels.iter().flat_map(|vl| vl.buses()).collect()
    }

    /// Bus with the given id
    pub fn bus(&self, id: &str) -> Option<Bus> {
        match self.data.borrow().index.get(id) {
            Some(Identifiable::Bus(bus)) => Some(bus.clone()),
            _ => None,
        }
    }

    /// AC lines of the network (tie lines included), in creation order
    pub fn lines(&self) -> Vec<Line> {
        self.data.borrow().lines.values().cloned().collect()
    }

    /// AC line with the given id
    pub fn line(&self, id: &str) -> Option<Line> {
        self.data.borrow().lines.get(id).cloned()
    }

    /// Number of AC lines
    pub fn line_count(&self) -> usize {
        self.data.borrow().lines.len()
    }

    /// Two-windings transformers of the network, in creation order
    pub fn two_windings_transformers(&self) -> Vec<TwoWindingsTransformer> {
        self.data
            .borrow()
            .two_windings_transformers
            .values()
            .cloned()
            .collect()
    }

    /// Two-windings transformer with the given id
    pub fn two_windings_transformer(&self, id: &str) -> Option<TwoWindingsTransformer> {
        self.data.borrow().two_windings_transformers.get(id).cloned()
    }

    /// Number of two-windings transformers
    pub fn two_windings_transformer_count(&self) -> usize {
        self.data.borrow().two_windings_transformers.len()
    }

    /// Three-windings transformers of the network, in creation order
    pub fn three_windings_transformers(&self) -> Vec<ThreeWindingsTransformer> {
        self.data
            .borrow()
            .three_windings_transformers
            .values()
            .cloned()
            .collect()
    }

    /// Three-windings transformer with the given id
    pub fn three_windings_transformer(&self, id: &str) -> Option<ThreeWindingsTransformer> {
        self.data
            .borrow()
            .three_windings_transformers
            .get(id)
            .cloned()
    }

    /// Number of three-windings transformers
    pub fn three_windings_transformer_count(&self) -> usize {
        self.data.borrow().three_windings_transformers.len()
    }

    /// Generators of the network, in creation order
    pub fn generators(&self) -> Vec<Generator> {
        self.data.borrow().generators.values().cloned().collect()
    }

    /// Generator with the given id
    pub fn generator(&self, id: &str) -> Option<Generator> {
        self.data.borrow().generators.get(id).cloned()
    }

    /// Number of generators
    pub fn generator_count(&self) -> usize {
        self.data.borrow().generators.len()
    }

    /// Loads of the network, in creation order
    pub fn loads(&self) -> Vec<Load> {
        self.data.borrow().loads.values().cloned().collect()
    }

    /// Load with the given id
    pub fn load(&self, id: &str) -> Option<Load> {
        self.data.borrow().loads.get(id).cloned()
    }

    /// Number of loads
    pub fn load_count(&self) -> usize {
        self.data.borrow().loads.len()
    }

    /// Shunt compensators of the network, in creation order
    pub fn shunt_compensators(&self) -> Vec<ShuntCompensator> {
        self.data
            .borrow()
            .shunt_compensators
            .values()
            .cloned()
            .collect()
    }

    /// Shunt compensator with the given id
    pub fn shunt_compensator(&self, id: &str) -> Option<ShuntCompensator> {
        self.data.borrow().shunt_compensators.get(id).cloned()
    }

    /// Dangling lines of the network, in creation order
    pub fn dangling_lines(&self) -> Vec<DanglingLine> {
        self.data.borrow().dangling_lines.values().cloned().collect()
    }

    /// Dangling line with the given id
    pub fn dangling_line(&self, id: &str) -> Option<DanglingLine> {
        self.data.borrow().dangling_lines.get(id).cloned()
    }

    /// Static VAR compensators of the network, in creation order
    pub fn static_var_compensators(&self) -> Vec<StaticVarCompensator> {
        self.data
            .borrow()
            .static_var_compensators
            .values()
            .cloned()
            .collect()
    }

    /// Static VAR compensator with the given id
    pub fn static_var_compensator(&self, id: &str) -> Option<StaticVarCompensator> {
        self.data.borrow().static_var_compensators.get(id).cloned()
    }

    /// Busbar sections of the network, in creation order
    pub fn busbar_sections(&self) -> Vec<BusbarSection> {
        self.data.borrow().busbar_sections.values().cloned().collect()
    }

    /// Busbar section with the given id
    pub fn busbar_section(&self, id: &str) -> Option<BusbarSection> {
        self.data.borrow().busbar_sections.get(id).cloned()
    }

    /// LCC converter stations of the network, in creation order
    pub fn lcc_converter_stations(&self) -> Vec<LccConverterStation> {
        self.data
            .borrow()
            .lcc_converter_stations
            .values()
            .cloned()
            .collect()
    }

    /// VSC converter stations of the network, in creation order
    pub fn vsc_converter_stations(&self) -> Vec<VscConverterStation> {
        self.data
            .borrow()
            .vsc_converter_stations
            .values()
            .cloned()
            .collect()
    }

    /// HVDC converter station of either kind with the given id
    pub fn hvdc_converter_station(&self, id: &str) -> Option<HvdcConverterStation> {
        let data = self.data.borrow();
        if let Some(station) = data.lcc_converter_stations.get(id) {
            return Some(HvdcConverterStation::Lcc(station.clone()));
        }
        data.vsc_converter_stations
            .get(id)
            .map(|station| HvdcConverterStation::Vsc(station.clone()))
    }

    /// HVDC lines of the network, in creation order
    pub fn hvdc_lines(&self) -> Vec<HvdcLine> {
        self.data.borrow().hvdc_lines.values().cloned().collect()
    }

    /// HVDC line with the given id
    pub fn hvdc_line(&self, id: &str) -> Option<HvdcLine> {
        self.data.borrow().hvdc_lines.get(id).cloned()
    }

    /// Number of HVDC lines
    pub fn hvdc_line_count(&self) -> usize {
        self.data.borrow().hvdc_lines.len()
    }

    /// Two-terminal branches: AC lines and two-windings transformers
    pub fn branches(&self) -> Vec<Branch> {
        let data = self.data.borrow();
        data.lines
            .values()
            .cloned()
            .map(Branch::Line)
            .chain(
                data.two_windings_transformers
                    .values()
                    .cloned()
                    .map(Branch::TwoWindingsTransformer),
            )
            .collect()
    }

    /// Branch with the given id
    pub fn branch(&self, id: &str) -> Option<Branch> {
        let data = self.data.borrow();
        if let Some(line) = data.lines.get(id) {
            return Some(Branch::Line(line.clone()));
        }
        data.two_windings_transformers
            .get(id)
            .map(|t| Branch::TwoWindingsTransformer(t.clone()))
    }

    /// Number of branches
    pub fn branch_count(&self) -> usize {
        let data = self.data.borrow();
        data.lines.len() + data.two_windings_transformers.len()
    }

    /// Element with the given id, of any kind
    pub fn identifiable(&self, id: &str) -> Option<Identifiable> {
        self.data.borrow().index.get(id).cloned()
    }

    /// Every element of the network, in registration order
    pub fn identifiables(&self) -> Vec<Identifiable> {
        self.data.borrow().index.values().cloned().collect()
    }

    /// Connected components of the graph, largest first
    ///
    /// The result is cached and recomputed lazily after any change to the
    /// topology (bus creation, equipment addition or removal, terminal
    /// connection changes). HVDC lines couple their converter station buses,
    /// so a pure DC link joins its two sides into one component.
    pub fn connected_components(&self) -> Vec<Component> {
        if self.data.borrow().components_valid {
            return self.data.borrow().components.clone();
        }

        let buses = self.buses();
        let mut index_of: HashMap<usize, usize> = HashMap::with_capacity(buses.len());
        for (i, bus) in buses.iter().enumerate() {
            index_of.insert(Rc::as_ptr(bus.data()) as usize, i);
        }

        let mut edges: Vec<(Terminal, Terminal)> = Vec::new();
        {
            let data = self.data.borrow();
            for line in data.lines.values() {
                edges.push((line.terminal1(), line.terminal2()));
            }
            for transformer in data.two_windings_transformers.values() {
                edges.push((transformer.terminal1(), transformer.terminal2()));
            }
            for transformer in data.three_windings_transformers.values() {
                let legs = transformer.legs();
                for a in 0..legs.len() {
                    for b in a + 1..legs.len() {
                        edges.push((legs[a].terminal(), legs[b].terminal()));
                    }
                }
            }
            for line in data.hvdc_lines.values() {
                edges.push((
                    line.converter_station1().terminal(),
                    line.converter_station2().terminal(),
                ));
            }
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); buses.len()];
        for (t1, t2) in &edges {
            let (Some(bus1), Some(bus2)) = (t1.bus(), t2.bus()) else {
                continue;
            };
            let i = index_of.get(&(Rc::as_ptr(bus1.data()) as usize));
            let j = index_of.get(&(Rc::as_ptr(bus2.data()) as usize));
            if let (Some(&i), Some(&j)) = (i, j) {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }

        let mut assigned: Vec<bool> = vec![false; buses.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for start in 0..buses.len() {
            if assigned[start] {
                continue;
            }
            let mut group = vec![start];
            assigned[start] = true;
            let mut cursor = 0;
            while cursor < group.len() {
                let current = group[cursor];
                cursor += 1;
                for &next in &adjacency[current] {
                    if !assigned[next] {
                        assigned[next] = true;
                        group.push(next);
                    }
                }
            }
            groups.push(group);
        }

        // Stable sort keeps discovery order among equally sized components.
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        let components: Vec<Component> = groups
            .iter()
            .enumerate()
            .map(|(num, group)| {
                let members: Vec<&Bus> = group.iter().map(|&i| &buses[i]).collect();
                Component::new(num, members)
            })
            .collect();
        for (component, group) in components.iter().zip(&groups) {
            for &i in group {
                buses[i].set_component(Some(component.clone()));
            }
        }

        tracing::debug!(
            buses = buses.len(),
            components = components.len(),
            "recomputed connected components"
        );

        let mut data = self.data.borrow_mut();
        data.components = components.clone();
        data.components_valid = true;
        components
    }

    /// Reject `id` if an element with that id already exists
    pub(crate) fn check_new_id(&self, id: &str) -> NetworkResult<()> {
        if id.is_empty() {
            return Err(NetworkError::validation(id, "id must not be empty"));
        }
        if self.data.borrow().index.contains_key(id) {
            return Err(NetworkError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// Resolve a voltage level / bus pair named by an adder.
    pub(crate) fn resolve_bus(
        &self,
        owner_id: &str,
        voltage_level_id: Option<&str>,
        bus_id: Option<&str>,
    ) -> NetworkResult<(VoltageLevel, Bus)> {
        let voltage_level_id = voltage_level_id.ok_or_else(|| {
            NetworkError::validation(owner_id, "a voltage level is required on each side")
        })?;
        let bus_id = bus_id.ok_or_else(|| {
            NetworkError::validation(owner_id, "a connection bus is required on each side")
        })?;
        let voltage_level =
            self.voltage_level(voltage_level_id)
                .ok_or(NetworkError::NotFound {
                    kind: "voltage level",
                    id: voltage_level_id.to_string(),
                })?;
        let bus = voltage_level.bus(bus_id).ok_or(NetworkError::NotFound {
            kind: "bus",
            id: bus_id.to_string(),
        })?;
        Ok((voltage_level, bus))
    }

    pub(crate) fn invalidate_components(&self) {
        self.data.borrow_mut().components_valid = false;
    }

    pub(crate) fn register_substation(&self, substation: &Substation) {
        let mut data = self.data.borrow_mut();
        data.substations.insert(substation.id(), substation.clone());
        data.index
            .insert(substation.id(), Identifiable::Substation(substation.clone()));
    }

    pub(crate) fn register_voltage_level(&self, voltage_level: &VoltageLevel) {
        let mut data = self.data.borrow_mut();
        data.voltage_levels
            .insert(voltage_level.id(), voltage_level.clone());
        data.index.insert(
            voltage_level.id(),
            Identifiable::VoltageLevel(voltage_level.clone()),
        );
    }

    pub(crate) fn register_bus(&self, bus: &Bus) {
        self.data
            .borrow_mut()
            .index
            .insert(bus.id(), Identifiable::Bus(bus.clone()));
    }

    pub(crate) fn register_line(&self, line: &Line) {
        let mut data = self.data.borrow_mut();
        data.lines.insert(line.id(), line.clone());
        data.index.insert(line.id(), Identifiable::Line(line.clone()));
    }

    pub(crate) fn register_two_windings_transformer(&self, transformer: &TwoWindingsTransformer) {
        let mut data = self.data.borrow_mut();
        data.two_windings_transformers
            .insert(transformer.id(), transformer.clone());
        data.index.insert(
            transformer.id(),
            Identifiable::TwoWindingsTransformer(transformer.clone()),
        );
    }

    pub(crate) fn register_three_windings_transformer(
        &self,
        transformer: &ThreeWindingsTransformer,
    ) {
        let mut data = self.data.borrow_mut();
        data.three_windings_transformers
            .insert(transformer.id(), transformer.clone());
        data.index.insert(
            transformer.id(),
            Identifiable::ThreeWindingsTransformer(transformer.clone()),
        );
    }

    pub(crate) fn register_generator(&self, generator: &Generator) {
        let mut data = self.data.borrow_mut();
        data.generators.insert(generator.id(), generator.clone());
        data.index
            .insert(generator.id(), Identifiable::Generator(generator.clone()));
    }

    pub(crate) fn register_load(&self, load: &Load) {
        let mut data = self.data.borrow_mut();
        data.loads.insert(load.id(), load.clone());
        data.index.insert(load.id(), Identifiable::Load(load.clone()));
    }

    pub(crate) fn register_shunt_compensator(&self, shunt: &ShuntCompensator) {
        let mut data = self.data.borrow_mut();
        data.shunt_compensators.insert(shunt.id(), shunt.clone());
        data.index
            .insert(shunt.id(), Identifiable::ShuntCompensator(shunt.clone()));
    }

    pub(crate) fn register_dangling_line(&self, dangling_line: &DanglingLine) {
        let mut data = self.data.borrow_mut();
        data.dangling_lines
            .insert(dangling_line.id(), dangling_line.clone());
        data.index.insert(
            dangling_line.id(),
            Identifiable::DanglingLine(dangling_line.clone()),
        );
    }

    pub(crate) fn register_static_var_compensator(&self, svc: &StaticVarCompensator) {
        let mut data = self.data.borrow_mut();
        data.static_var_compensators.insert(svc.id(), svc.clone());
        data.index
            .insert(svc.id(), Identifiable::StaticVarCompensator(svc.clone()));
    }

    pub(crate) fn register_busbar_section(&self, busbar_section: &BusbarSection) {
        let mut data = self.data.borrow_mut();
        data.busbar_sections
            .insert(busbar_section.id(), busbar_section.clone());
        data.index.insert(
            busbar_section.id(),
            Identifiable::BusbarSection(busbar_section.clone()),
        );
    }

    pub(crate) fn register_lcc_converter_station(&self, station: &LccConverterStation) {
        let mut data = self.data.borrow_mut();
        data.lcc_converter_stations
            .insert(station.id(), station.clone());
        data.index.insert(
            station.id(),
            Identifiable::LccConverterStation(station.clone()),
        );
    }

    pub(crate) fn register_vsc_converter_station(&self, station: &VscConverterStation) {
        let mut data = self.data.borrow_mut();
        data.vsc_converter_stations
            .insert(station.id(), station.clone());
        data.index.insert(
            station.id(),
            Identifiable::VscConverterStation(station.clone()),
        );
    }

    pub(crate) fn register_hvdc_line(&self, line: &HvdcLine) {
        let mut data = self.data.borrow_mut();
        data.hvdc_lines.insert(line.id(), line.clone());
        data.index
            .insert(line.id(), Identifiable::HvdcLine(line.clone()));
    }

    /// Drop an element from the global index only (used for buses).
    pub(crate) fn unregister(&self, id: &str) {
        self.data.borrow_mut().index.shift_remove(id);
    }

    pub(crate) fn unregister_line(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.lines.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_two_windings_transformer(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.two_windings_transformers.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_three_windings_transformer(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.three_windings_transformers.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_generator(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.generators.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_load(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.loads.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_shunt_compensator(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.shunt_compensators.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_dangling_line(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.dangling_lines.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_static_var_compensator(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.static_var_compensators.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_busbar_section(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.busbar_sections.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_lcc_converter_station(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.lcc_converter_stations.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_vsc_converter_station(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.vsc_converter_stations.shift_remove(id);
        data.index.shift_remove(id);
    }

    pub(crate) fn unregister_hvdc_line(&self, id: &str) {
        let mut data = self.data.borrow_mut();
        data.hvdc_lines.shift_remove(id);
        data.index.shift_remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_bus_network() -> (Network, Bus, Bus) {
        let network = Network::new("test", "manual");
        let substation = network.new_substation("s1").country("FR").add().unwrap();
        let vl = substation
            .new_voltage_level("vl1")
            .nominal_v(400.0)
            .add()
            .unwrap();
        let b1 = vl.new_bus("b1").unwrap();
        let b2 = vl.new_bus("b2").unwrap();
        (network, b1, b2)
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let (network, _, _) = two_bus_network();
        let err = network.new_substation("b1").add().unwrap_err();
        assert_eq!(err, NetworkError::DuplicateId("b1".to_string()));
    }

    #[test]
    fn index_covers_every_kind() {
        let (network, _, _) = two_bus_network();
        assert!(matches!(
            network.identifiable("s1"),
            Some(Identifiable::Substation(_))
        ));
        assert!(matches!(
            network.identifiable("vl1"),
            Some(Identifiable::VoltageLevel(_))
        ));
        assert!(matches!(network.identifiable("b1"), Some(Identifiable::Bus(_))));
        assert!(network.identifiable("nope").is_none());
    }

    #[test]
    fn isolated_buses_form_singleton_components() {
        let (network, b1, b2) = two_bus_network();
        let components = network.connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].size(), 1);
        assert_ne!(b1.connected_component(), b2.connected_component());
    }

    #[test]
    fn a_line_merges_components() {
        let (network, b1, b2) = two_bus_network();
        let line = network
            .new_line("l1")
            .voltage_level1("vl1")
            .bus1("b1")
            .voltage_level2("vl1")
            .bus2("b2")
            .r(1.0)
            .x(10.0)
            .add()
            .unwrap();
        let components = network.connected_components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].size(), 2);
        assert_eq!(b1.connected_component(), b2.connected_component());

        line.terminal1().disconnect();
        assert_ne!(b1.connected_component(), b2.connected_component());

        line.terminal1().connect();
        assert_eq!(b1.connected_component(), b2.connected_component());
    }

    #[test]
    fn an_hvdc_line_merges_components() {
        let (network, b1, b2) = two_bus_network();
        let vl = network.voltage_level("vl1").unwrap();
        vl.new_vsc_converter_station("c1")
            .bus("b1")
            .loss_factor(1.1)
            .add()
            .unwrap();
        vl.new_vsc_converter_station("c2")
            .bus("b2")
            .loss_factor(1.1)
            .add()
            .unwrap();
        let line = network
            .new_hvdc_line("dc1")
            .r(1.0)
            .nominal_v(400.0)
            .active_power_setpoint(280.0)
            .max_p(300.0)
            .converter_station1("c1")
            .converter_station2("c2")
            .add()
            .unwrap();

        // Buses joined only by a DC link belong to one connected component.
        let components = network.connected_components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].size(), 2);
        assert_eq!(b1.connected_component(), b2.connected_component());

        line.remove();
        assert_eq!(network.connected_components().len(), 2);
        assert_ne!(b1.connected_component(), b2.connected_component());
    }

    #[test]
    fn converter_stations_of_different_kinds_can_be_paired() {
        let (network, _, _) = two_bus_network();
        let vl = network.voltage_level("vl1").unwrap();
        vl.new_lcc_converter_station("c1")
            .bus("b1")
            .loss_factor(1.1)
            .power_factor(0.9)
            .add()
            .unwrap();
        vl.new_vsc_converter_station("c2")
            .bus("b2")
            .loss_factor(1.1)
            .add()
            .unwrap();

        let line = network
            .new_hvdc_line("dc1")
            .r(1.0)
            .nominal_v(400.0)
            .active_power_setpoint(280.0)
            .max_p(300.0)
            .converter_station1("c1")
            .converter_station2("c2")
            .add()
            .unwrap();
        assert_eq!(
            line.converter_station1().kind(),
            HvdcConverterStationKind::Lcc
        );
        assert_eq!(
            line.converter_station2().kind(),
            HvdcConverterStationKind::Vsc
        );
    }

    #[test]
    fn removal_unregisters_everywhere() {
        let (network, _, _) = two_bus_network();
        let vl = network.voltage_level("vl1").unwrap();
        let load = vl
            .new_load("ld1")
            .bus("b1")
            .p0(120.0)
            .add()
            .unwrap();
        assert_eq!(network.load_count(), 1);
        assert_eq!(vl.connectable_count(), 1);

        load.remove();
        assert_eq!(network.load_count(), 0);
        assert_eq!(vl.connectable_count(), 0);
        assert!(network.identifiable("ld1").is_none());
    }
}
