// Copyright 2025 Cowboy AI, LLC.

//! Closed sum types over the equipment kinds of the network
//!
//! These enums are the single runtime representation of "what kind of node is
//! this": polymorphic navigation (terminal to owner, voltage level to its
//! equipment, branch lookup) always goes through them, and the read-only
//! projection dispatches on them with exhaustive matches.

use std::cell::RefCell;
use std::rc::Weak;

use serde::{Deserialize, Serialize};

use crate::network::hvdc::{
    LccConverterStation, LccConverterStationData, VscConverterStation, VscConverterStationData,
};
use crate::network::injection::{
    BusbarSection, BusbarSectionData, DanglingLine, DanglingLineData, Generator, GeneratorData,
    Load, LoadData, ShuntCompensator, ShuntCompensatorData, StaticVarCompensator,
    StaticVarCompensatorData,
};
use crate::network::limits::CurrentLimits;
use crate::network::line::{Line, LineData};
use crate::network::terminal::Terminal;
use crate::network::transformer::{
    ThreeWindingsTransformer, ThreeWindingsTransformerData, TwoWindingsTransformer,
    TwoWindingsTransformerData,
};

/// Kind tag of a connectable, used for reporting and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectableKind {
    /// AC line (possibly a tie line)
    Line,
    /// Two-windings transformer
    TwoWindingsTransformer,
    /// Three-windings transformer
    ThreeWindingsTransformer,
    /// Generator
    Generator,
    /// Load
    Load,
    /// Shunt compensator
    ShuntCompensator,
    /// Dangling (boundary) line
    DanglingLine,
    /// Static VAR compensator
    StaticVarCompensator,
    /// Busbar section
    BusbarSection,
    /// LCC converter station
    LccConverterStation,
    /// VSC converter station
    VscConverterStation,
}

/// Any piece of equipment that connects to buses through terminals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectable {
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
}

impl Connectable {
    /// Unique id of the equipment
    pub fn id(&self) -> String {
        match self {
            Connectable::Line(x) => x.id(),
            Connectable::TwoWindingsTransformer(x) => x.id(),
            Connectable::ThreeWindingsTransformer(x) => x.id(),
            Connectable::Generator(x) => x.id(),
            Connectable::Load(x) => x.id(),
            Connectable::ShuntCompensator(x) => x.id(),
            Connectable::DanglingLine(x) => x.id(),
            Connectable::StaticVarCompensator(x) => x.id(),
            Connectable::BusbarSection(x) => x.id(),
            Connectable::LccConverterStation(x) => x.id(),
            Connectable::VscConverterStation(x) => x.id(),
        }
    }

    /// Kind tag of the equipment
    pub fn kind(&self) -> ConnectableKind {
        match self {
            Connectable::Line(_) => ConnectableKind::Line,
            Connectable::TwoWindingsTransformer(_) => ConnectableKind::TwoWindingsTransformer,
            Connectable::ThreeWindingsTransformer(_) => ConnectableKind::ThreeWindingsTransformer,
            Connectable::Generator(_) => ConnectableKind::Generator,
            Connectable::Load(_) => ConnectableKind::Load,
            Connectable::ShuntCompensator(_) => ConnectableKind::ShuntCompensator,
            Connectable::DanglingLine(_) => ConnectableKind::DanglingLine,
            Connectable::StaticVarCompensator(_) => ConnectableKind::StaticVarCompensator,
            Connectable::BusbarSection(_) => ConnectableKind::BusbarSection,
            Connectable::LccConverterStation(_) => ConnectableKind::LccConverterStation,
            Connectable::VscConverterStation(_) => ConnectableKind::VscConverterStation,
        }
    }

    /// All terminals of the equipment
    pub fn terminals(&self) -> Vec<Terminal> {
        match self {
            Connectable::Line(x) => vec![x.terminal1(), x.terminal2()],
            Connectable::TwoWindingsTransformer(x) => vec![x.terminal1(), x.terminal2()],
            Connectable::ThreeWindingsTransformer(x) => {
                x.legs().iter().map(|leg| leg.terminal()).collect()
            }
            Connectable::Generator(x) => vec![x.terminal()],
            Connectable::Load(x) => vec![x.terminal()],
            Connectable::ShuntCompensator(x) => vec![x.terminal()],
            Connectable::DanglingLine(x) => vec![x.terminal()],
            Connectable::StaticVarCompensator(x) => vec![x.terminal()],
            Connectable::BusbarSection(x) => vec![x.terminal()],
            Connectable::LccConverterStation(x) => vec![x.terminal()],
            Connectable::VscConverterStation(x) => vec![x.terminal()],
        }
    }

    pub(crate) fn downgrade(&self) -> WeakConnectable {
        match self {
            Connectable::Line(x) => WeakConnectable::Line(x.downgrade()),
            Connectable::TwoWindingsTransformer(x) => {
                WeakConnectable::TwoWindingsTransformer(x.downgrade())
            }
            Connectable::ThreeWindingsTransformer(x) => {
                WeakConnectable::ThreeWindingsTransformer(x.downgrade())
            }
            Connectable::Generator(x) => WeakConnectable::Generator(x.downgrade()),
            Connectable::Load(x) => WeakConnectable::Load(x.downgrade()),
            Connectable::ShuntCompensator(x) => WeakConnectable::ShuntCompensator(x.downgrade()),
            Connectable::DanglingLine(x) => WeakConnectable::DanglingLine(x.downgrade()),
            Connectable::StaticVarCompensator(x) => {
                WeakConnectable::StaticVarCompensator(x.downgrade())
            }
            Connectable::BusbarSection(x) => WeakConnectable::BusbarSection(x.downgrade()),
            Connectable::LccConverterStation(x) => {
                WeakConnectable::LccConverterStation(x.downgrade())
            }
            Connectable::VscConverterStation(x) => {
                WeakConnectable::VscConverterStation(x.downgrade())
            }
        }
    }
}

/// Non-owning form of [`Connectable`], used for terminal back-references
pub(crate) enum WeakConnectable {
    Line(Weak<RefCell<LineData>>),
    TwoWindingsTransformer(Weak<RefCell<TwoWindingsTransformerData>>),
    ThreeWindingsTransformer(Weak<RefCell<ThreeWindingsTransformerData>>),
    Generator(Weak<RefCell<GeneratorData>>),
    Load(Weak<RefCell<LoadData>>),
    ShuntCompensator(Weak<RefCell<ShuntCompensatorData>>),
    DanglingLine(Weak<RefCell<DanglingLineData>>),
    StaticVarCompensator(Weak<RefCell<StaticVarCompensatorData>>),
    BusbarSection(Weak<RefCell<BusbarSectionData>>),
    LccConverterStation(Weak<RefCell<LccConverterStationData>>),
    VscConverterStation(Weak<RefCell<VscConverterStationData>>),
}

impl WeakConnectable {
    pub fn upgrade(&self) -> Option<Connectable> {
        match self {
            WeakConnectable::Line(w) => w.upgrade().map(Line::from_data).map(Connectable::Line),
            WeakConnectable::TwoWindingsTransformer(w) => w
                .upgrade()
                .map(TwoWindingsTransformer::from_data)
                .map(Connectable::TwoWindingsTransformer),
            WeakConnectable::ThreeWindingsTransformer(w) => w
                .upgrade()
                .map(ThreeWindingsTransformer::from_data)
                .map(Connectable::ThreeWindingsTransformer),
            WeakConnectable::Generator(w) => w
                .upgrade()
                .map(Generator::from_data)
                .map(Connectable::Generator),
            WeakConnectable::Load(w) => w.upgrade().map(Load::from_data).map(Connectable::Load),
            WeakConnectable::ShuntCompensator(w) => w
                .upgrade()
                .map(ShuntCompensator::from_data)
                .map(Connectable::ShuntCompensator),
            WeakConnectable::DanglingLine(w) => w
                .upgrade()
                .map(DanglingLine::from_data)
                .map(Connectable::DanglingLine),
            WeakConnectable::StaticVarCompensator(w) => w
                .upgrade()
                .map(StaticVarCompensator::from_data)
                .map(Connectable::StaticVarCompensator),
            WeakConnectable::BusbarSection(w) => w
                .upgrade()
                .map(BusbarSection::from_data)
                .map(Connectable::BusbarSection),
            WeakConnectable::LccConverterStation(w) => w
                .upgrade()
                .map(LccConverterStation::from_data)
                .map(Connectable::LccConverterStation),
            WeakConnectable::VscConverterStation(w) => w
                .upgrade()
                .map(VscConverterStation::from_data)
                .map(Connectable::VscConverterStation),
        }
    }
}

/// A two-terminal branch: an AC line or a two-windings transformer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// AC line (possibly a tie line)
    Line(Line),
    /// Two-windings transformer
    TwoWindingsTransformer(TwoWindingsTransformer),
}

impl Branch {
    /// Unique id of the branch
    pub fn id(&self) -> String {
        match self {
            Branch::Line(x) => x.id(),
            Branch::TwoWindingsTransformer(x) => x.id(),
        }
    }

    /// Terminal on side one
    pub fn terminal1(&self) -> Terminal {
        match self {
            Branch::Line(x) => x.terminal1(),
            Branch::TwoWindingsTransformer(x) => x.terminal1(),
        }
    }

    /// Terminal on side two
    pub fn terminal2(&self) -> Terminal {
        match self {
            Branch::Line(x) => x.terminal2(),
            Branch::TwoWindingsTransformer(x) => x.terminal2(),
        }
    }

    /// Current limits on side one, if defined
    pub fn current_limits1(&self) -> Option<CurrentLimits> {
        match self {
            Branch::Line(x) => x.current_limits1(),
            Branch::TwoWindingsTransformer(x) => x.current_limits1(),
        }
    }

    /// Current limits on side two, if defined
    pub fn current_limits2(&self) -> Option<CurrentLimits> {
        match self {
            Branch::Line(x) => x.current_limits2(),
            Branch::TwoWindingsTransformer(x) => x.current_limits2(),
        }
    }
}

/// Kind tag of an HVDC converter station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvdcConverterStationKind {
    /// Line-commutated converter
    Lcc,
    /// Voltage-source converter
    Vsc,
}

/// Either kind of HVDC converter station
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HvdcConverterStation {
    /// Line-commutated converter station
    Lcc(LccConverterStation),
    /// Voltage-source converter station
    Vsc(VscConverterStation),
}

impl HvdcConverterStation {
    /// Unique id of the station
    pub fn id(&self) -> String {
        match self {
            HvdcConverterStation::Lcc(x) => x.id(),
            HvdcConverterStation::Vsc(x) => x.id(),
        }
    }

    /// Kind tag of the station
    pub fn kind(&self) -> HvdcConverterStationKind {
        match self {
            HvdcConverterStation::Lcc(_) => HvdcConverterStationKind::Lcc,
            HvdcConverterStation::Vsc(_) => HvdcConverterStationKind::Vsc,
        }
    }

    /// The station's terminal
    pub fn terminal(&self) -> Terminal {
        match self {
            HvdcConverterStation::Lcc(x) => x.terminal(),
            HvdcConverterStation::Vsc(x) => x.terminal(),
        }
    }

    /// Loss factor of the station, in percent
    pub fn loss_factor(&self) -> f64 {
        match self {
            HvdcConverterStation::Lcc(x) => x.loss_factor(),
            HvdcConverterStation::Vsc(x) => x.loss_factor(),
        }
    }
}
