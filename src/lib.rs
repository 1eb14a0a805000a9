// Copyright 2025 Cowboy AI, LLC.

//! Electrical network model with read-only projections
//!
//! `grid_model` models a transmission network as an object graph of
//! substations, voltage levels, buses and equipment, built through fluent
//! adders and navigated through cheap `Rc`-backed handles. On top of the
//! mutable graph, [`NetworkView`] projects the same live objects read-only:
//! reads always see the current state, while every mutating call fails with
//! [`NetworkError::UnmodifiableView`].
//!
//! The model is single-threaded. Handles are reference-counted with `Rc`
//! and are therefore neither `Send` nor `Sync`.
//!
//! ```
//! use grid_model::{Network, NetworkView};
//!
//! let network = Network::new("sim1", "manual");
//! let substation = network.new_substation("s1").country("FR").add()?;
//! let vl = substation
//!     .new_voltage_level("vl1")
//!     .nominal_v(380.0)
//!     .add()?;
//! let bus = vl.new_bus("b1")?;
//! bus.set_v(385.0);
//!
//! let view = NetworkView::new(&network);
//! let bus_view = view.bus_view().bus("b1").unwrap();
//! assert_eq!(bus_view.v(), 385.0);
//! assert!(bus_view.set_v(400.0).is_err());
//! # Ok::<(), grid_model::NetworkError>(())
//! ```

#![warn(missing_docs)]

pub mod errors;
pub mod network;
pub mod view;

pub use errors::{NetworkError, NetworkResult};
pub use network::{
    Branch, Bus, BusbarSection, Component, Connectable, ConnectableKind, CurrentLimits,
    CurrentLimitsAdder, DanglingLine, EnergySource, Extension, Extensions, Generator, HalfLine,
    HalfLineSpec, HvdcConverterStation, HvdcConverterStationKind, HvdcConvertersMode, HvdcLine,
    Identifiable, Leg, LegSpec, Line, Load, LoadKind, Network, PhaseRegulationMode,
    PhaseTapChanger, PhaseTapChangerStep, RatioTapChanger, ShuntCompensator, StaticVarCompensator,
    Substation, SvcRegulationMode, TapChangerStep, TemporaryLimit, Terminal,
    ThreeWindingsTransformer, TopologyKind, TwoWindingsTransformer, VoltageLevel,
};
pub use view::{
    AnyLineView, BranchView, BusView, ComponentView, ConnectableView, CurrentLimitsView,
    DanglingLineView, ExtensionViewFactory, ExtensionViewRegistry, GeneratorView, HalfLineView,
    HvdcConverterStationView, HvdcLineView, IdentifiableView, LccConverterStationView, LegView,
    LineView, LoadView, NetworkBusView, NetworkView, PhaseTapChangerView, RatioTapChangerView,
    ShuntCompensatorView, StaticVarCompensatorView, SubstationView, TerminalView,
    ThreeWindingsTransformerView, TieLineView, TwoWindingsTransformerView,
    VoltageLevelBusBreakerView, VoltageLevelBusView, VoltageLevelView, VscConverterStationView,
};
