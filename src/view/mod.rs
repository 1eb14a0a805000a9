// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection over a live network
//!
//! A [`NetworkView`] projects a [`Network`] without copying it: views
//! delegate every read to the live model, so mutations made through the
//! underlying handles are visible through the projection immediately. What
//! the projection removes is the ability to mutate: every mutating method on
//! a view returns [`NetworkError::UnmodifiableView`](crate::NetworkError)
//! instead of touching the graph.
//!
//! Views are identity-stable: asking twice for the view of the same element
//! returns the same `Rc`, backed by a weak identity cache that keeps neither
//! the model nor the views alive. Navigation between views stays inside the
//! projection; `None` results pass through unchanged.
//!
//! Like the model, the projection is built on `Rc` and is therefore neither
//! `Send` nor `Sync`. A view and its network belong to one thread.
//!
//! ```
//! use grid_model::{Network, NetworkView};
//!
//! let network = Network::new("sim", "manual");
//! let substation = network.new_substation("s1").country("BE").add()?;
//! let vl = substation.new_voltage_level("vl1").nominal_v(225.0).add()?;
//! vl.new_bus("b1")?;
//!
//! let view = NetworkView::new(&network);
//! let bus = view.bus_view().buses().into_iter().next().unwrap();
//! assert!(bus.set_v(400.0).is_err());
//! # Ok::<(), grid_model::NetworkError>(())
//! ```

pub mod bus;
pub mod cache;
pub mod component;
pub mod dispatch;
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

use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::network::Network;
use cache::ViewCache;

pub use bus::BusView;
pub use component::ComponentView;
pub use dispatch::{
    AnyLineView, BranchView, ConnectableView, HvdcConverterStationView, IdentifiableView,
};
pub use extension::{ExtensionViewFactory, ExtensionViewRegistry};
pub use hvdc::{HvdcLineView, LccConverterStationView, VscConverterStationView};
pub use injection::{
    DanglingLineView, GeneratorView, LoadView, ShuntCompensatorView, StaticVarCompensatorView,
};
pub use limits::CurrentLimitsView;
pub use line::{HalfLineView, LineView, TieLineView};
pub use substation::SubstationView;
pub use tap_changer::{PhaseTapChangerView, RatioTapChangerView};
pub use terminal::TerminalView;
pub use transformer::{LegView, ThreeWindingsTransformerView, TwoWindingsTransformerView};
pub use voltage_level::{VoltageLevelBusBreakerView, VoltageLevelBusView, VoltageLevelView};

/// Generates view methods that reject mutation.
///
/// Each generated method mirrors a mutator of the underlying element but
/// returns [`NetworkError::UnmodifiableView`](crate::NetworkError) carrying
/// the element kind, the operation name and the element id.
macro_rules! reject_mutators {
    ($element:literal => $( fn $name:ident($($arg:ident : $ty:ty),* $(,)?); )+ ) => {
        $(
            /// Always fails: this projection is read-only.
            pub fn $name(&self, $($arg: $ty),*) -> $crate::errors::NetworkResult<()> {
                Err($crate::errors::NetworkError::unmodifiable(
                    $element,
                    stringify!($name),
                    self.id(),
                ))
            }
        )+
    };
}
pub(crate) use reject_mutators;

/// Generates the identifiable read surface of a view type plus the rejected
/// property and extension mutators. Expects the view to hold the model
/// handle in `$field` and the shared cache in `cache`.
macro_rules! view_identifiable {
    ($view:ident, $field:ident, $element:literal) => {
        impl $view {
            /// Unique id of the underlying element
            pub fn id(&self) -> String {
                self.$field.id()
            }

            /// Human-readable name, falling back to the id
            pub fn name(&self) -> String {
                self.$field.name()
            }

            /// Whether a name distinct from the id is set
            pub fn has_name(&self) -> bool {
                self.$field.has_name()
            }

            /// Free-form property of the underlying element
            pub fn property(&self, key: &str) -> Option<String> {
                self.$field.property(key)
            }

            /// All properties, in insertion order
            pub fn properties(&self) -> indexmap::IndexMap<String, String> {
                self.$field.properties()
            }

            /// Extension with the given kind name, wrapped read-only when a
            /// wrapper factory is registered for it
            pub fn extension(
                &self,
                name: &str,
            ) -> Option<std::rc::Rc<dyn $crate::network::Extension>> {
                self.$field
                    .extension(name)
                    .map(|ext| self.cache.wrap_extension(ext))
            }

            /// All attached extensions, wrapped read-only where possible
            pub fn extensions(&self) -> Vec<std::rc::Rc<dyn $crate::network::Extension>> {
                self.$field
                    .extensions()
                    .into_iter()
                    .map(|ext| self.cache.wrap_extension(ext))
                    .collect()
            }

            $crate::view::reject_mutators! { $element =>
                fn set_property(_key: &str, _value: &str);
                fn add_extension(_extension: std::rc::Rc<dyn $crate::network::Extension>);
                fn remove_extension(_name: &str);
            }
        }
    };
}
pub(crate) use view_identifiable;

/// Read-only projection of a whole [`Network`]
///
/// The root of the projection: hands out views for every element of the
/// network and shares one identity cache with all of them.
pub struct NetworkView {
    network: Network,
    cache: Rc<ViewCache>,
}

view_identifiable!(NetworkView, network, "network");

impl NetworkView {
    /// Project `network` with no extension wrappers registered
    pub fn new(network: &Network) -> Self {
        Self::with_extensions(network, ExtensionViewRegistry::new())
    }

    /// Project `network`, wrapping extensions through the given registry
    pub fn with_extensions(network: &Network, extensions: ExtensionViewRegistry) -> Self {
        Self {
            network: network.clone(),
            cache: Rc::new(ViewCache::new(extensions)),
        }
    }

    /// Date of the network case
    pub fn case_date(&self) -> DateTime<Utc> {
        self.network.case_date()
    }

    /// Forecast distance in minutes; zero for a snapshot
    pub fn forecast_distance(&self) -> i32 {
        self.network.forecast_distance()
    }

    /// Format the network was loaded from
    pub fn source_format(&self) -> String {
        self.network.source_format()
    }

    /// Substations of the network, in creation order
    pub fn substations(&self) -> Vec<Rc<SubstationView>> {
        self.network
            .substations()
            .iter()
            .map(|s| self.cache.substation_view(s))
            .collect()
    }

    /// Substation with the given id
    pub fn substation(&self, id: &str) -> Option<Rc<SubstationView>> {
        self.network
            .substation(id)
            .map(|s| self.cache.substation_view(&s))
    }

    /// Number of substations
    pub fn substation_count(&self) -> usize {
        self.network.substation_count()
    }

    /// Voltage levels of the network, in creation order
    pub fn voltage_levels(&self) -> Vec<Rc<VoltageLevelView>> {
        self.network
            .voltage_levels()
            .iter()
            .map(|vl| self.cache.voltage_level_view(vl))
            .collect()
    }

    /// Voltage level with the given id
    pub fn voltage_level(&self, id: &str) -> Option<Rc<VoltageLevelView>> {
        self.network
            .voltage_level(id)
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// Number of voltage levels
    pub fn voltage_level_count(&self) -> usize {
        self.network.voltage_level_count()
    }

    /// AC lines of the network (tie lines included), in creation order
    pub fn lines(&self) -> Vec<AnyLineView> {
        self.network
            .lines()
            .iter()
            .map(|line| self.cache.wrap_line(line))
            .collect()
    }

    /// AC line with the given id
    pub fn line(&self, id: &str) -> Option<AnyLineView> {
        self.network.line(id).map(|line| self.cache.wrap_line(&line))
    }

    /// Number of AC lines
    pub fn line_count(&self) -> usize {
        self.network.line_count()
    }

    /// Two-windings transformers of the network, in creation order
    pub fn two_windings_transformers(&self) -> Vec<Rc<TwoWindingsTransformerView>> {
        self.network
            .two_windings_transformers()
            .iter()
            .map(|t| self.cache.two_windings_transformer_view(t))
            .collect()
    }

    /// Two-windings transformer with the given id
    pub fn two_windings_transformer(&self, id: &str) -> Option<Rc<TwoWindingsTransformerView>> {
        self.network
            .two_windings_transformer(id)
            .map(|t| self.cache.two_windings_transformer_view(&t))
    }

    /// Number of two-windings transformers
    pub fn two_windings_transformer_count(&self) -> usize {
        self.network.two_windings_transformer_count()
    }

    /// Three-windings transformers of the network, in creation order
    pub fn three_windings_transformers(&self) -> Vec<Rc<ThreeWindingsTransformerView>> {
        self.network
            .three_windings_transformers()
            .iter()
            .map(|t| self.cache.three_windings_transformer_view(t))
            .collect()
    }

    /// Three-windings transformer with the given id
    pub fn three_windings_transformer(
        &self,
        id: &str,
    ) -> Option<Rc<ThreeWindingsTransformerView>> {
        self.network
            .three_windings_transformer(id)
            .map(|t| self.cache.three_windings_transformer_view(&t))
    }

    /// Number of three-windings transformers
    pub fn three_windings_transformer_count(&self) -> usize {
        self.network.three_windings_transformer_count()
    }

    /// Generators of the network, in creation order
    pub fn generators(&self) -> Vec<Rc<GeneratorView>> {
        self.network
            .generators()
            .iter()
            .map(|g| self.cache.generator_view(g))
            .collect()
    }

    /// Generator with the given id
    pub fn generator(&self, id: &str) -> Option<Rc<GeneratorView>> {
        self.network
            .generator(id)
            .map(|g| self.cache.generator_view(&g))
    }

    /// Number of generators
    pub fn generator_count(&self) -> usize {
        self.network.generator_count()
    }

    /// Loads of the network, in creation order
    pub fn loads(&self) -> Vec<Rc<LoadView>> {
        self.network
            .loads()
            .iter()
            .map(|l| self.cache.load_view(l))
            .collect()
    }

    /// Load with the given id
    pub fn load(&self, id: &str) -> Option<Rc<LoadView>> {
        self.network.load(id).map(|l| self.cache.load_view(&l))
    }

    /// Number of loads
    pub fn load_count(&self) -> usize {
        self.network.load_count()
    }

    /// Shunt compensators of the network, in creation order
    pub fn shunt_compensators(&self) -> Vec<Rc<ShuntCompensatorView>> {
        self.network
            .shunt_compensators()
            .iter()
            .map(|s| self.cache.shunt_compensator_view(s))
            .collect()
    }

    /// Shunt compensator with the given id
    pub fn shunt_compensator(&self, id: &str) -> Option<Rc<ShuntCompensatorView>> {
        self.network
            .shunt_compensator(id)
            .map(|s| self.cache.shunt_compensator_view(&s))
    }

    /// Dangling lines of the network, in creation order
    pub fn dangling_lines(&self) -> Vec<Rc<DanglingLineView>> {
        self.network
            .dangling_lines()
            .iter()
            .map(|d| self.cache.dangling_line_view(d))
            .collect()
    }

    /// Dangling line with the given id
    pub fn dangling_line(&self, id: &str) -> Option<Rc<DanglingLineView>> {
        self.network
            .dangling_line(id)
            .map(|d| self.cache.dangling_line_view(&d))
    }

    /// Static VAR compensators of the network, in creation order
    pub fn static_var_compensators(&self) -> Vec<Rc<StaticVarCompensatorView>> {
        self.network
            .static_var_compensators()
            .iter()
            .map(|s| self.cache.static_var_compensator_view(s))
            .collect()
    }

    /// Static VAR compensator with the given id
    pub fn static_var_compensator(&self, id: &str) -> Option<Rc<StaticVarCompensatorView>> {
        self.network
            .static_var_compensator(id)
            .map(|s| self.cache.static_var_compensator_view(&s))
    }

    /// Busbar sections of the network, passed through unwrapped
    pub fn busbar_sections(&self) -> Vec<crate::network::BusbarSection> {
        self.network.busbar_sections()
    }

    /// Busbar section with the given id, passed through unwrapped
    pub fn busbar_section(&self, id: &str) -> Option<crate::network::BusbarSection> {
        self.network.busbar_section(id)
    }

    /// LCC converter stations of the network, in creation order
    pub fn lcc_converter_stations(&self) -> Vec<Rc<LccConverterStationView>> {
        self.network
            .lcc_converter_stations()
            .iter()
            .map(|s| self.cache.lcc_converter_station_view(s))
            .collect()
    }

    /// VSC converter stations of the network, in creation order
    pub fn vsc_converter_stations(&self) -> Vec<Rc<VscConverterStationView>> {
        self.network
            .vsc_converter_stations()
            .iter()
            .map(|s| self.cache.vsc_converter_station_view(s))
            .collect()
    }

    /// HVDC converter station of either kind with the given id
    pub fn hvdc_converter_station(&self, id: &str) -> Option<HvdcConverterStationView> {
        self.network
            .hvdc_converter_station(id)
            .map(|s| self.cache.wrap_station(&s))
    }

    /// HVDC lines of the network, in creation order
    pub fn hvdc_lines(&self) -> Vec<Rc<HvdcLineView>> {
        self.network
            .hvdc_lines()
            .iter()
            .map(|l| self.cache.hvdc_line_view(l))
            .collect()
    }

    /// HVDC line with the given id
    pub fn hvdc_line(&self, id: &str) -> Option<Rc<HvdcLineView>> {
        self.network
            .hvdc_line(id)
            .map(|l| self.cache.hvdc_line_view(&l))
    }

    /// Number of HVDC lines
    pub fn hvdc_line_count(&self) -> usize {
        self.network.hvdc_line_count()
    }

    /// Two-terminal branches: AC lines and two-windings transformers
    pub fn branches(&self) -> Vec<BranchView> {
        self.network
            .branches()
            .iter()
            .map(|b| self.cache.wrap_branch(b))
            .collect()
    }

    /// Branch with the given id
    pub fn branch(&self, id: &str) -> Option<BranchView> {
        self.network.branch(id).map(|b| self.cache.wrap_branch(&b))
    }

    /// Number of branches
    pub fn branch_count(&self) -> usize {
        self.network.branch_count()
    }

    /// Element with the given id, of any kind
    pub fn identifiable(&self, id: &str) -> Option<IdentifiableView> {
        self.network
            .identifiable(id)
            .map(|i| self.cache.wrap_identifiable(&i))
    }

    /// Every element of the network, in registration order
    pub fn identifiables(&self) -> Vec<IdentifiableView> {
        self.network
            .identifiables()
            .iter()
            .map(|i| self.cache.wrap_identifiable(i))
            .collect()
    }

    /// Network-wide bus topology view
    pub fn bus_view(&self) -> NetworkBusView {
        NetworkBusView {
            network: self.network.clone(),
            cache: Rc::clone(&self.cache),
        }
    }

    /// Connected components of the network graph, largest first
    pub fn connected_components(&self) -> Vec<Rc<ComponentView>> {
        self.network
            .connected_components()
            .iter()
            .map(|c| self.cache.component_view(c))
            .collect()
    }

    reject_mutators! { "network" =>
        fn set_case_date(_case_date: DateTime<Utc>);
        fn set_forecast_distance(_minutes: i32);
        fn new_substation(_id: &str);
        fn new_line(_id: &str);
        fn new_tie_line(_id: &str);
        fn new_hvdc_line(_id: &str);
    }
}

/// Network-wide read-only bus topology view
pub struct NetworkBusView {
    network: Network,
    cache: Rc<ViewCache>,
}

impl NetworkBusView {
    /// Buses of the whole network
    pub fn buses(&self) -> Vec<Rc<BusView>> {
        self.network
            .buses()
            .iter()
            .map(|bus| self.cache.bus_view(bus))
            .collect()
    }

    /// Bus with the given id
    pub fn bus(&self, id: &str) -> Option<Rc<BusView>> {
        self.network.bus(id).map(|bus| self.cache.bus_view(&bus))
    }

    /// Connected components of the network graph, largest first
    pub fn connected_components(&self) -> Vec<Rc<ComponentView>> {
        self.network
            .connected_components()
            .iter()
            .map(|c| self.cache.component_view(c))
            .collect()
    }
}
