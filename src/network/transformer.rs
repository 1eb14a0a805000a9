// Copyright 2025 Cowboy AI, LLC.

//! Two- and three-windings transformers

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::connectable::Connectable;
use crate::network::limits::{CurrentLimits, CurrentLimitsAdder};
use crate::network::substation::{Substation, SubstationData};
use crate::network::tap_changer::{
    PhaseTapChanger, PhaseTapChangerAdder, RatioTapChanger, RatioTapChangerAdder,
};
use crate::network::terminal::Terminal;
use crate::network::{impl_identifiable, IdentifiableBase, Network, NetworkData};

pub(crate) struct TwoWindingsTransformerData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub substation: Weak<RefCell<SubstationData>>,
    pub r: f64,
    pub x: f64,
    pub g: f64,
    pub b: f64,
    pub rated_u1: f64,
    pub rated_u2: f64,
    pub terminal1: Terminal,
    pub terminal2: Terminal,
    pub limits1: Option<CurrentLimits>,
    pub limits2: Option<CurrentLimits>,
    pub ratio_tap_changer: Option<RatioTapChanger>,
    pub phase_tap_changer: Option<PhaseTapChanger>,
}

/// A two-windings transformer between two voltage levels of one substation
#[derive(Clone)]
pub struct TwoWindingsTransformer {
    data: Rc<RefCell<TwoWindingsTransformerData>>,
}

impl_identifiable!(
    TwoWindingsTransformer,
    TwoWindingsTransformerData,
    "TwoWindingsTransformer"
);

impl TwoWindingsTransformer {
    /// Series resistance in ohm, at the side-two voltage base
    pub fn r(&self) -> f64 {
        self.data.borrow().r
    }

    /// Set the series resistance in ohm
    pub fn set_r(&self, r: f64) {
        self.data.borrow_mut().r = r;
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.data.borrow().x
    }

    /// Set the series reactance in ohm
    pub fn set_x(&self, x: f64) {
        self.data.borrow_mut().x = x;
    }

    /// Magnetizing conductance in S
    pub fn g(&self) -> f64 {
        self.data.borrow().g
    }

    /// Set the magnetizing conductance in S
    pub fn set_g(&self, g: f64) {
        self.data.borrow_mut().g = g;
    }

    /// Magnetizing susceptance in S
    pub fn b(&self) -> f64 {
        self.data.borrow().b
    }

    /// Set the magnetizing susceptance in S
    pub fn set_b(&self, b: f64) {
        self.data.borrow_mut().b = b;
    }

    /// Rated voltage of winding one in kV
    pub fn rated_u1(&self) -> f64 {
        self.data.borrow().rated_u1
    }

    /// Set the rated voltage of winding one in kV
    pub fn set_rated_u1(&self, rated_u1: f64) {
        self.data.borrow_mut().rated_u1 = rated_u1;
    }

    /// Rated voltage of winding two in kV
    pub fn rated_u2(&self) -> f64 {
        self.data.borrow().rated_u2
    }

    /// Set the rated voltage of winding two in kV
    pub fn set_rated_u2(&self, rated_u2: f64) {
        self.data.borrow_mut().rated_u2 = rated_u2;
    }

    /// Terminal on side one
    pub fn terminal1(&self) -> Terminal {
        self.data.borrow().terminal1.clone()
    }

    /// Terminal on side two
    pub fn terminal2(&self) -> Terminal {
        self.data.borrow().terminal2.clone()
    }

    /// Current limits on side one, if defined
    pub fn current_limits1(&self) -> Option<CurrentLimits> {
        self.data.borrow().limits1.clone()
    }

    /// Current limits on side two, if defined
    pub fn current_limits2(&self) -> Option<CurrentLimits> {
        self.data.borrow().limits2.clone()
    }

    /// Start building current limits for side one
    pub fn new_current_limits1(&self) -> CurrentLimitsAdder {
        let transformer = self.clone();
        CurrentLimitsAdder::new(
            self.id(),
            Box::new(move |limits| transformer.data.borrow_mut().limits1 = Some(limits)),
        )
    }

    /// Start building current limits for side two
    pub fn new_current_limits2(&self) -> CurrentLimitsAdder {
        let transformer = self.clone();
        CurrentLimitsAdder::new(
            self.id(),
            Box::new(move |limits| transformer.data.borrow_mut().limits2 = Some(limits)),
        )
    }

    /// The ratio tap changer, if any
    pub fn ratio_tap_changer(&self) -> Option<RatioTapChanger> {
        self.data.borrow().ratio_tap_changer.clone()
    }

    /// Start building a ratio tap changer for this transformer
    pub fn new_ratio_tap_changer(&self) -> RatioTapChangerAdder {
        let install_target = self.clone();
        let detach_target = self.downgrade();
        RatioTapChangerAdder::new(
            self.id(),
            Box::new(move |tap_changer| {
                install_target.data.borrow_mut().ratio_tap_changer = Some(tap_changer);
            }),
            Box::new(move || {
                if let Some(data) = detach_target.upgrade() {
                    data.borrow_mut().ratio_tap_changer = None;
                }
            }),
        )
    }

    /// The phase tap changer, if any
    pub fn phase_tap_changer(&self) -> Option<PhaseTapChanger> {
        self.data.borrow().phase_tap_changer.clone()
    }

    /// Start building a phase tap changer for this transformer
    pub fn new_phase_tap_changer(&self) -> PhaseTapChangerAdder {
        let install_target = self.clone();
        let detach_target = self.downgrade();
        PhaseTapChangerAdder::new(
            self.id(),
            Box::new(move |tap_changer| {
                install_target.data.borrow_mut().phase_tap_changer = Some(tap_changer);
            }),
            Box::new(move || {
                if let Some(data) = detach_target.upgrade() {
                    data.borrow_mut().phase_tap_changer = None;
                }
            }),
        )
    }

    /// The substation containing this transformer
    pub fn substation(&self) -> Option<Substation> {
        self.data
            .borrow()
            .substation
            .upgrade()
            .map(Substation::from_data)
    }

    /// The network this transformer belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Remove this transformer from the network
    pub fn remove(&self) {
        let (terminal1, terminal2) = {
            let data = self.data.borrow();
            (data.terminal1.clone(), data.terminal2.clone())
        };
        for terminal in [&terminal1, &terminal2] {
            terminal.unlink();
            if let Some(vl) = terminal.voltage_level() {
                vl.unregister_connectable(&self.id());
            }
        }
        if let Some(substation) = self.substation() {
            substation.detach_two_windings_transformer(&self.id());
        }
        if let Some(network) = self.network() {
            network.unregister_two_windings_transformer(&self.id());
            network.invalidate_components();
        }
    }
}

/// Builder for a [`TwoWindingsTransformer`], obtained from
/// [`Substation::new_two_windings_transformer`]
pub struct TwoWindingsTransformerAdder {
    pub(crate) substation: Substation,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) voltage_level1: Option<String>,
    pub(crate) bus1: Option<String>,
    pub(crate) voltage_level2: Option<String>,
    pub(crate) bus2: Option<String>,
    pub(crate) r: f64,
    pub(crate) x: f64,
    pub(crate) g: f64,
    pub(crate) b: f64,
    pub(crate) rated_u1: f64,
    pub(crate) rated_u2: f64,
}

impl TwoWindingsTransformerAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the voltage level on side one (required, must belong to the substation)
    pub fn voltage_level1(mut self, id: &str) -> Self {
        self.voltage_level1 = Some(id.to_string());
        self
    }

    /// Set the connection bus on side one (required)
    pub fn bus1(mut self, id: &str) -> Self {
        self.bus1 = Some(id.to_string());
        self
    }

    /// Set the voltage level on side two (required, must belong to the substation)
    pub fn voltage_level2(mut self, id: &str) -> Self {
        self.voltage_level2 = Some(id.to_string());
        self
    }

    /// Set the connection bus on side two (required)
    pub fn bus2(mut self, id: &str) -> Self {
        self.bus2 = Some(id.to_string());
        self
    }

    /// Set the series resistance in ohm
    pub fn r(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    /// Set the series reactance in ohm
    pub fn x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Set the magnetizing conductance in S
    pub fn g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    /// Set the magnetizing susceptance in S
    pub fn b(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    /// Set the rated voltage of winding one in kV
    pub fn rated_u1(mut self, rated_u1: f64) -> Self {
        self.rated_u1 = rated_u1;
        self
    }

    /// Set the rated voltage of winding two in kV
    pub fn rated_u2(mut self, rated_u2: f64) -> Self {
        self.rated_u2 = rated_u2;
        self
    }

    /// Build the transformer and attach it to the substation and network
    pub fn add(self) -> NetworkResult<TwoWindingsTransformer> {
        let network = self
            .substation
            .network()
            .ok_or_else(|| NetworkError::Detached(self.substation.id()))?;
        network.check_new_id(&self.id)?;
        let (vl1, bus1) =
            network.resolve_bus(&self.id, self.voltage_level1.as_deref(), self.bus1.as_deref())?;
        let (vl2, bus2) =
            network.resolve_bus(&self.id, self.voltage_level2.as_deref(), self.bus2.as_deref())?;
        for vl in [&vl1, &vl2] {
            if vl.substation().as_ref() != Some(&self.substation) {
                return Err(NetworkError::validation(
                    &self.id,
                    format!(
                        "voltage level '{}' is not in substation '{}'",
                        vl.id(),
                        self.substation.id()
                    ),
                ));
            }
        }
        let terminal1 = Terminal::new(&vl1, &bus1, true);
        let terminal2 = Terminal::new(&vl2, &bus2, true);
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name;
        let transformer =
            TwoWindingsTransformer::from_data(Rc::new(RefCell::new(TwoWindingsTransformerData {
                base,
                network: Rc::downgrade(network.data()),
                substation: Rc::downgrade(self.substation.data()),
                r: self.r,
                x: self.x,
                g: self.g,
                b: self.b,
                rated_u1: self.rated_u1,
                rated_u2: self.rated_u2,
                terminal1: terminal1.clone(),
                terminal2: terminal2.clone(),
                limits1: None,
                limits2: None,
                ratio_tap_changer: None,
                phase_tap_changer: None,
            })));
        let connectable = Connectable::TwoWindingsTransformer(transformer.clone());
        terminal1.set_owner(connectable.downgrade());
        terminal2.set_owner(connectable.downgrade());
        vl1.register_connectable(connectable.clone());
        if vl2 != vl1 {
            vl2.register_connectable(connectable);
        }
        self.substation.attach_two_windings_transformer(&transformer);
        network.register_two_windings_transformer(&transformer);
        network.invalidate_components();
        Ok(transformer)
    }
}

pub(crate) struct LegData {
    pub owner_id: String,
    pub side: u8,
    pub r: f64,
    pub x: f64,
    pub g: f64,
    pub b: f64,
    pub rated_u: f64,
    pub terminal: Terminal,
    pub limits: Option<CurrentLimits>,
    pub ratio_tap_changer: Option<RatioTapChanger>,
}

/// One winding of a three-windings transformer
#[derive(Clone)]
pub struct Leg {
    data: Rc<RefCell<LegData>>,
}

impl Leg {
    pub(crate) fn data(&self) -> &Rc<RefCell<LegData>> {
        &self.data
    }

    /// Which winding this leg is (1, 2 or 3)
    pub fn side(&self) -> u8 {
        self.data.borrow().side
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.data.borrow().r
    }

    /// Set the series resistance in ohm
    pub fn set_r(&self, r: f64) {
        self.data.borrow_mut().r = r;
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.data.borrow().x
    }

    /// Set the series reactance in ohm
    pub fn set_x(&self, x: f64) {
        self.data.borrow_mut().x = x;
    }

    /// Magnetizing conductance in S
    pub fn g(&self) -> f64 {
        self.data.borrow().g
    }

    /// Set the magnetizing conductance in S
    pub fn set_g(&self, g: f64) {
        self.data.borrow_mut().g = g;
    }

    /// Magnetizing susceptance in S
    pub fn b(&self) -> f64 {
        self.data.borrow().b
    }

    /// Set the magnetizing susceptance in S
    pub fn set_b(&self, b: f64) {
        self.data.borrow_mut().b = b;
    }

    /// Rated voltage of this winding in kV
    pub fn rated_u(&self) -> f64 {
        self.data.borrow().rated_u
    }

    /// Set the rated voltage of this winding in kV
    pub fn set_rated_u(&self, rated_u: f64) {
        self.data.borrow_mut().rated_u = rated_u;
    }

    /// This winding's terminal
    pub fn terminal(&self) -> Terminal {
        self.data.borrow().terminal.clone()
    }

    /// Current limits of this winding, if defined
    pub fn current_limits(&self) -> Option<CurrentLimits> {
        self.data.borrow().limits.clone()
    }

    /// Start building current limits for this winding
    pub fn new_current_limits(&self) -> CurrentLimitsAdder {
        let leg = self.clone();
        let owner_id = self.data.borrow().owner_id.clone();
        CurrentLimitsAdder::new(
            owner_id,
            Box::new(move |limits| leg.data.borrow_mut().limits = Some(limits)),
        )
    }

    /// The ratio tap changer of this winding, if any
    pub fn ratio_tap_changer(&self) -> Option<RatioTapChanger> {
        self.data.borrow().ratio_tap_changer.clone()
    }

    /// Start building a ratio tap changer for this winding
    pub fn new_ratio_tap_changer(&self) -> RatioTapChangerAdder {
        let install_target = self.clone();
        let detach_target = Rc::downgrade(&self.data);
        let owner_id = self.data.borrow().owner_id.clone();
        RatioTapChangerAdder::new(
            owner_id,
            Box::new(move |tap_changer| {
                install_target.data.borrow_mut().ratio_tap_changer = Some(tap_changer);
            }),
            Box::new(move || {
                if let Some(data) = detach_target.upgrade() {
                    data.borrow_mut().ratio_tap_changer = None;
                }
            }),
        )
    }
}

pub(crate) struct ThreeWindingsTransformerData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub substation: Weak<RefCell<SubstationData>>,
    pub legs: [Leg; 3],
}

/// A three-windings transformer connecting three voltage levels
#[derive(Clone)]
pub struct ThreeWindingsTransformer {
    data: Rc<RefCell<ThreeWindingsTransformerData>>,
}

impl_identifiable!(
    ThreeWindingsTransformer,
    ThreeWindingsTransformerData,
    "ThreeWindingsTransformer"
);

impl ThreeWindingsTransformer {
    /// Winding one
    pub fn leg1(&self) -> Leg {
        self.data.borrow().legs[0].clone()
    }

    /// Winding two
    pub fn leg2(&self) -> Leg {
        self.data.borrow().legs[1].clone()
    }

    /// Winding three
    pub fn leg3(&self) -> Leg {
        self.data.borrow().legs[2].clone()
    }

    /// All three windings
    pub fn legs(&self) -> [Leg; 3] {
        self.data.borrow().legs.clone()
    }

    /// The substation containing this transformer
    pub fn substation(&self) -> Option<Substation> {
        self.data
            .borrow()
            .substation
            .upgrade()
            .map(Substation::from_data)
    }

    /// The network this transformer belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Remove this transformer from the network
    pub fn remove(&self) {
        for leg in self.legs() {
            let terminal = leg.terminal();
            terminal.unlink();
            if let Some(vl) = terminal.voltage_level() {
                vl.unregister_connectable(&self.id());
            }
        }
        if let Some(network) = self.network() {
            network.unregister_three_windings_transformer(&self.id());
            network.invalidate_components();
        }
    }
}

/// Description of one winding, consumed by [`ThreeWindingsTransformerAdder`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegSpec {
    /// Id of the voltage level the winding connects to
    pub voltage_level: String,
    /// Id of the connection bus
    pub bus: String,
    /// Series resistance in ohm
    pub r: f64,
    /// Series reactance in ohm
    pub x: f64,
    /// Magnetizing conductance in S
    pub g: f64,
    /// Magnetizing susceptance in S
    pub b: f64,
    /// Rated voltage in kV
    pub rated_u: f64,
}

/// Builder for a [`ThreeWindingsTransformer`], obtained from
/// [`Substation::new_three_windings_transformer`]
pub struct ThreeWindingsTransformerAdder {
    pub(crate) substation: Substation,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) legs: [Option<LegSpec>; 3],
}

impl ThreeWindingsTransformerAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Describe winding one (required)
    pub fn leg1(mut self, spec: LegSpec) -> Self {
        self.legs[0] = Some(spec);
        self
    }

    /// Describe winding two (required)
    pub fn leg2(mut self, spec: LegSpec) -> Self {
        self.legs[1] = Some(spec);
        self
    }

    /// Describe winding three (required)
    pub fn leg3(mut self, spec: LegSpec) -> Self {
        self.legs[2] = Some(spec);
        self
    }

    /// Build the transformer and attach it to the substation and network
    pub fn add(self) -> NetworkResult<ThreeWindingsTransformer> {
        let network = self
            .substation
            .network()
            .ok_or_else(|| NetworkError::Detached(self.substation.id()))?;
        network.check_new_id(&self.id)?;
        let mut built_legs = Vec::with_capacity(3);
        for (index, spec) in self.legs.iter().enumerate() {
            let side = index as u8 + 1;
            let spec = spec.as_ref().ok_or_else(|| {
                NetworkError::validation(&self.id, format!("leg {side} is missing"))
            })?;
            let (vl, bus) =
                network.resolve_bus(&self.id, Some(&spec.voltage_level), Some(&spec.bus))?;
            if vl.substation().as_ref() != Some(&self.substation) {
                return Err(NetworkError::validation(
                    &self.id,
                    format!(
                        "voltage level '{}' is not in substation '{}'",
                        vl.id(),
                        self.substation.id()
                    ),
                ));
            }
            let terminal = Terminal::new(&vl, &bus, true);
            built_legs.push((
                vl,
                Leg {
                    data: Rc::new(RefCell::new(LegData {
                        owner_id: self.id.clone(),
                        side,
                        r: spec.r,
                        x: spec.x,
                        g: spec.g,
                        b: spec.b,
                        rated_u: spec.rated_u,
                        terminal,
                        limits: None,
                        ratio_tap_changer: None,
                    })),
                },
            ));
        }
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name;
        let legs: [Leg; 3] = [
            built_legs[0].1.clone(),
            built_legs[1].1.clone(),
            built_legs[2].1.clone(),
        ];
        let transformer = ThreeWindingsTransformer::from_data(Rc::new(RefCell::new(
            ThreeWindingsTransformerData {
                base,
                network: Rc::downgrade(network.data()),
                substation: Rc::downgrade(self.substation.data()),
                legs,
            },
        )));
        let connectable = Connectable::ThreeWindingsTransformer(transformer.clone());
        let mut seen = Vec::new();
        for (vl, leg) in &built_legs {
            leg.terminal().set_owner(connectable.downgrade());
            if !seen.contains(vl) {
                vl.register_connectable(connectable.clone());
                seen.push(vl.clone());
            }
        }
        network.register_three_windings_transformer(&transformer);
        network.invalidate_components();
        Ok(transformer)
    }
}

impl Substation {
    /// Start building a new two-windings transformer in this substation
    pub fn new_two_windings_transformer(&self, id: &str) -> TwoWindingsTransformerAdder {
        TwoWindingsTransformerAdder {
            substation: self.clone(),
            id: id.to_string(),
            name: None,
            voltage_level1: None,
            bus1: None,
            voltage_level2: None,
            bus2: None,
            r: 0.0,
            x: 0.0,
            g: 0.0,
            b: 0.0,
            rated_u1: f64::NAN,
            rated_u2: f64::NAN,
        }
    }

    /// Start building a new three-windings transformer in this substation
    pub fn new_three_windings_transformer(&self, id: &str) -> ThreeWindingsTransformerAdder {
        ThreeWindingsTransformerAdder {
            substation: self.clone(),
            id: id.to_string(),
            name: None,
            legs: [None, None, None],
        }
    }
}
