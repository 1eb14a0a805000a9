// Copyright 2025 Cowboy AI, LLC.

//! Kind dispatch for the read-only projection
//!
//! The projection never downcasts: "what kind of element is this" is decided
//! by matching on the closed enums below. Because the equipment kinds form a
//! closed set, wrapping a kind the projection does not know about is not a
//! runtime error, it is unrepresentable.
//!
//! Busbar sections are the one deliberate hole: they expose nothing settable,
//! so the raw [`BusbarSection`] handle passes through unwrapped.

use std::fmt;
use std::rc::Rc;

use crate::network::{
    Branch, BusbarSection, Connectable, ConnectableKind, HvdcConverterStation,
    HvdcConverterStationKind, Identifiable, Line,
};
use crate::view::bus::BusView;
use crate::view::cache::ViewCache;
use crate::view::hvdc::{HvdcLineView, LccConverterStationView, VscConverterStationView};
use crate::view::injection::{
    DanglingLineView, GeneratorView, LoadView, ShuntCompensatorView, StaticVarCompensatorView,
};
use crate::view::line::{LineView, TieLineView};
use crate::view::substation::SubstationView;
use crate::view::transformer::{ThreeWindingsTransformerView, TwoWindingsTransformerView};
use crate::view::voltage_level::VoltageLevelView;

/// Read-only view of an AC line of either flavor
#[derive(Clone)]
pub enum AnyLineView {
    /// Plain line
    Plain(Rc<LineView>),
    /// Tie line
    Tie(Rc<TieLineView>),
}

impl AnyLineView {
    /// Unique id of the line
    pub fn id(&self) -> String {
        match self {
            AnyLineView::Plain(v) => v.id(),
            AnyLineView::Tie(v) => v.id(),
        }
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        match self {
            AnyLineView::Plain(v) => v.r(),
            AnyLineView::Tie(v) => v.r(),
        }
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        match self {
            AnyLineView::Plain(v) => v.x(),
            AnyLineView::Tie(v) => v.x(),
        }
    }
}

/// Read-only view of any connectable equipment
#[derive(Clone)]
pub enum ConnectableView {
    /// AC line (possibly a tie line)
    Line(AnyLineView),
    /// Two-windings transformer
    TwoWindingsTransformer(Rc<TwoWindingsTransformerView>),
    /// Three-windings transformer
    ThreeWindingsTransformer(Rc<ThreeWindingsTransformerView>),
    /// Generator
    Generator(Rc<GeneratorView>),
    /// Load
    Load(Rc<LoadView>),
    /// Shunt compensator
    ShuntCompensator(Rc<ShuntCompensatorView>),
    /// Dangling (boundary) line
    DanglingLine(Rc<DanglingLineView>),
    /// Static VAR compensator
    StaticVarCompensator(Rc<StaticVarCompensatorView>),
    /// Busbar section, passed through unwrapped: it exposes nothing settable
    BusbarSection(BusbarSection),
    /// LCC converter station
    LccConverterStation(Rc<LccConverterStationView>),
    /// VSC converter station
    VscConverterStation(Rc<VscConverterStationView>),
}

impl ConnectableView {
    /// Unique id of the equipment
    pub fn id(&self) -> String {
        match self {
            ConnectableView::Line(v) => v.id(),
            ConnectableView::TwoWindingsTransformer(v) => v.id(),
            ConnectableView::ThreeWindingsTransformer(v) => v.id(),
            ConnectableView::Generator(v) => v.id(),
            ConnectableView::Load(v) => v.id(),
            ConnectableView::ShuntCompensator(v) => v.id(),
            ConnectableView::DanglingLine(v) => v.id(),
            ConnectableView::StaticVarCompensator(v) => v.id(),
            ConnectableView::BusbarSection(b) => b.id(),
            ConnectableView::LccConverterStation(v) => v.id(),
            ConnectableView::VscConverterStation(v) => v.id(),
        }
    }

    /// Kind tag of the equipment
    pub fn kind(&self) -> ConnectableKind {
        match self {
            ConnectableView::Line(_) => ConnectableKind::Line,
            ConnectableView::TwoWindingsTransformer(_) => ConnectableKind::TwoWindingsTransformer,
            ConnectableView::ThreeWindingsTransformer(_) => {
                ConnectableKind::ThreeWindingsTransformer
            }
            ConnectableView::Generator(_) => ConnectableKind::Generator,
            ConnectableView::Load(_) => ConnectableKind::Load,
            ConnectableView::ShuntCompensator(_) => ConnectableKind::ShuntCompensator,
            ConnectableView::DanglingLine(_) => ConnectableKind::DanglingLine,
            ConnectableView::StaticVarCompensator(_) => ConnectableKind::StaticVarCompensator,
            ConnectableView::BusbarSection(_) => ConnectableKind::BusbarSection,
            ConnectableView::LccConverterStation(_) => ConnectableKind::LccConverterStation,
            ConnectableView::VscConverterStation(_) => ConnectableKind::VscConverterStation,
        }
    }
}

/// Read-only view of a two-terminal branch
#[derive(Clone)]
pub enum BranchView {
    /// AC line (possibly a tie line)
    Line(AnyLineView),
    /// Two-windings transformer
    TwoWindingsTransformer(Rc<TwoWindingsTransformerView>),
}

impl BranchView {
    /// Unique id of the branch
    pub fn id(&self) -> String {
        match self {
            BranchView::Line(v) => v.id(),
            BranchView::TwoWindingsTransformer(v) => v.id(),
        }
    }
}

/// Read-only view of either kind of HVDC converter station
#[derive(Clone)]
pub enum HvdcConverterStationView {
    /// Line-commutated converter station
    Lcc(Rc<LccConverterStationView>),
    /// Voltage-source converter station
    Vsc(Rc<VscConverterStationView>),
}

impl HvdcConverterStationView {
    /// Unique id of the station
    pub fn id(&self) -> String {
        match self {
            HvdcConverterStationView::Lcc(v) => v.id(),
            HvdcConverterStationView::Vsc(v) => v.id(),
        }
    }

    /// Kind tag of the station
    pub fn kind(&self) -> HvdcConverterStationKind {
        match self {
            HvdcConverterStationView::Lcc(_) => HvdcConverterStationKind::Lcc,
            HvdcConverterStationView::Vsc(_) => HvdcConverterStationKind::Vsc,
        }
    }

    /// Loss factor of the station, in percent
    pub fn loss_factor(&self) -> f64 {
        match self {
            HvdcConverterStationView::Lcc(v) => v.loss_factor(),
            HvdcConverterStationView::Vsc(v) => v.loss_factor(),
        }
    }
}

/// Read-only view of any identifiable element
#[derive(Clone)]
pub enum IdentifiableView {
    /// Substation
    Substation(Rc<SubstationView>),
    /// Voltage level
    VoltageLevel(Rc<VoltageLevelView>),
    /// Bus of a bus-breaker topology
    Bus(Rc<BusView>),
    /// AC line (possibly a tie line)
    Line(AnyLineView),
    /// Two-windings transformer
    TwoWindingsTransformer(Rc<TwoWindingsTransformerView>),
    /// Three-windings transformer
    ThreeWindingsTransformer(Rc<ThreeWindingsTransformerView>),
    /// Generator
    Generator(Rc<GeneratorView>),
    /// Load
    Load(Rc<LoadView>),
    /// Shunt compensator
    ShuntCompensator(Rc<ShuntCompensatorView>),
    /// Dangling (boundary) line
    DanglingLine(Rc<DanglingLineView>),
    /// Static VAR compensator
    StaticVarCompensator(Rc<StaticVarCompensatorView>),
    /// Busbar section, passed through unwrapped
    BusbarSection(BusbarSection),
    /// LCC converter station
    LccConverterStation(Rc<LccConverterStationView>),
    /// VSC converter station
    VscConverterStation(Rc<VscConverterStationView>),
    /// HVDC line
    HvdcLine(Rc<HvdcLineView>),
}

impl IdentifiableView {
    /// Unique id of the element
    pub fn id(&self) -> String {
        match self {
            IdentifiableView::Substation(v) => v.id(),
            IdentifiableView::VoltageLevel(v) => v.id(),
            IdentifiableView::Bus(v) => v.id(),
            IdentifiableView::Line(v) => v.id(),
            IdentifiableView::TwoWindingsTransformer(v) => v.id(),
            IdentifiableView::ThreeWindingsTransformer(v) => v.id(),
            IdentifiableView::Generator(v) => v.id(),
            IdentifiableView::Load(v) => v.id(),
            IdentifiableView::ShuntCompensator(v) => v.id(),
            IdentifiableView::DanglingLine(v) => v.id(),
            IdentifiableView::StaticVarCompensator(v) => v.id(),
            IdentifiableView::BusbarSection(b) => b.id(),
            IdentifiableView::LccConverterStation(v) => v.id(),
            IdentifiableView::VscConverterStation(v) => v.id(),
            IdentifiableView::HvdcLine(v) => v.id(),
        }
    }
}

impl fmt::Debug for AnyLineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyLineView::Plain(v) => write!(f, "LineView({})", v.id()),
            AnyLineView::Tie(v) => write!(f, "TieLineView({})", v.id()),
        }
    }
}

impl fmt::Debug for ConnectableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectableView({:?}, {})", self.kind(), self.id())
    }
}

impl fmt::Debug for BranchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BranchView({})", self.id())
    }
}

impl fmt::Debug for HvdcConverterStationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HvdcConverterStationView({:?}, {})", self.kind(), self.id())
    }
}

impl fmt::Debug for IdentifiableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentifiableView({})", self.id())
    }
}

impl ViewCache {
    /// Wrap a line as plain or tie, depending on its flavor.
    pub(crate) fn wrap_line(self: &Rc<Self>, line: &Line) -> AnyLineView {
        if line.is_tie() {
            AnyLineView::Tie(self.tie_line_view(line))
        } else {
            AnyLineView::Plain(self.line_view(line))
        }
    }

    pub(crate) fn wrap_connectable(self: &Rc<Self>, connectable: &Connectable) -> ConnectableView {
        match connectable {
            Connectable::Line(x) => ConnectableView::Line(self.wrap_line(x)),
            Connectable::TwoWindingsTransformer(x) => {
                ConnectableView::TwoWindingsTransformer(self.two_windings_transformer_view(x))
            }
            Connectable::ThreeWindingsTransformer(x) => {
                ConnectableView::ThreeWindingsTransformer(self.three_windings_transformer_view(x))
            }
            Connectable::Generator(x) => ConnectableView::Generator(self.generator_view(x)),
            Connectable::Load(x) => ConnectableView::Load(self.load_view(x)),
            Connectable::ShuntCompensator(x) => {
                ConnectableView::ShuntCompensator(self.shunt_compensator_view(x))
            }
            Connectable::DanglingLine(x) => {
                ConnectableView::DanglingLine(self.dangling_line_view(x))
            }
            Connectable::StaticVarCompensator(x) => {
                ConnectableView::StaticVarCompensator(self.static_var_compensator_view(x))
            }
            Connectable::BusbarSection(x) => ConnectableView::BusbarSection(x.clone()),
            Connectable::LccConverterStation(x) => {
                ConnectableView::LccConverterStation(self.lcc_converter_station_view(x))
            }
            Connectable::VscConverterStation(x) => {
                ConnectableView::VscConverterStation(self.vsc_converter_station_view(x))
            }
        }
    }

    pub(crate) fn wrap_branch(self: &Rc<Self>, branch: &Branch) -> BranchView {
        match branch {
            Branch::Line(x) => BranchView::Line(self.wrap_line(x)),
            Branch::TwoWindingsTransformer(x) => {
                BranchView::TwoWindingsTransformer(self.two_windings_transformer_view(x))
            }
        }
    }

    pub(crate) fn wrap_station(
        self: &Rc<Self>,
        station: &HvdcConverterStation,
    ) -> HvdcConverterStationView {
        match station {
            HvdcConverterStation::Lcc(x) => {
                HvdcConverterStationView::Lcc(self.lcc_converter_station_view(x))
            }
            HvdcConverterStation::Vsc(x) => {
                HvdcConverterStationView::Vsc(self.vsc_converter_station_view(x))
            }
        }
    }

    pub(crate) fn wrap_identifiable(
        self: &Rc<Self>,
        identifiable: &Identifiable,
    ) -> IdentifiableView {
        match identifiable {
            Identifiable::Substation(x) => IdentifiableView::Substation(self.substation_view(x)),
            Identifiable::VoltageLevel(x) => {
                IdentifiableView::VoltageLevel(self.voltage_level_view(x))
            }
            Identifiable::Bus(x) => IdentifiableView::Bus(self.bus_view(x)),
            Identifiable::Line(x) => IdentifiableView::Line(self.wrap_line(x)),
            Identifiable::TwoWindingsTransformer(x) => {
                IdentifiableView::TwoWindingsTransformer(self.two_windings_transformer_view(x))
            }
            Identifiable::ThreeWindingsTransformer(x) => {
                IdentifiableView::ThreeWindingsTransformer(
                    self.three_windings_transformer_view(x),
                )
            }
            Identifiable::Generator(x) => IdentifiableView::Generator(self.generator_view(x)),
            Identifiable::Load(x) => IdentifiableView::Load(self.load_view(x)),
            Identifiable::ShuntCompensator(x) => {
                IdentifiableView::ShuntCompensator(self.shunt_compensator_view(x))
            }
            Identifiable::DanglingLine(x) => {
                IdentifiableView::DanglingLine(self.dangling_line_view(x))
            }
            Identifiable::StaticVarCompensator(x) => {
                IdentifiableView::StaticVarCompensator(self.static_var_compensator_view(x))
            }
            Identifiable::BusbarSection(x) => IdentifiableView::BusbarSection(x.clone()),
            Identifiable::LccConverterStation(x) => {
                IdentifiableView::LccConverterStation(self.lcc_converter_station_view(x))
            }
            Identifiable::VscConverterStation(x) => {
                IdentifiableView::VscConverterStation(self.vsc_converter_station_view(x))
            }
            Identifiable::HvdcLine(x) => IdentifiableView::HvdcLine(self.hvdc_line_view(x)),
        }
    }
}
