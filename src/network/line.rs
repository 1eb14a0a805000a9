// Copyright 2025 Cowboy AI, LLC.

//! AC lines, including composite tie lines with their half lines

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::connectable::Connectable;
use crate::network::limits::{CurrentLimits, CurrentLimitsAdder};
use crate::network::terminal::Terminal;
use crate::network::{impl_identifiable, IdentifiableBase, Network, NetworkData};

pub(crate) struct HalfLineData {
    pub id: String,
    pub name: Option<String>,
    pub r: f64,
    pub x: f64,
    pub g: f64,
    pub b: f64,
    pub xnode_p: f64,
    pub xnode_q: f64,
}

/// One half of a tie line, from one side to the boundary node
#[derive(Clone)]
pub struct HalfLine {
    data: Rc<RefCell<HalfLineData>>,
}

impl HalfLine {
    pub(crate) fn from_data(data: Rc<RefCell<HalfLineData>>) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<HalfLineData>> {
        &self.data
    }

    /// Id of this half line
    pub fn id(&self) -> String {
        self.data.borrow().id.clone()
    }

    /// Optional human-readable name
    pub fn name(&self) -> Option<String> {
        self.data.borrow().name.clone()
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

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.data.borrow().g
    }

    /// Set the shunt conductance in S
    pub fn set_g(&self, g: f64) {
        self.data.borrow_mut().g = g;
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.data.borrow().b
    }

    /// Set the shunt susceptance in S
    pub fn set_b(&self, b: f64) {
        self.data.borrow_mut().b = b;
    }

    /// Active power at the boundary node in MW
    pub fn xnode_p(&self) -> f64 {
        self.data.borrow().xnode_p
    }

    /// Set the active power at the boundary node in MW
    pub fn set_xnode_p(&self, p: f64) {
        self.data.borrow_mut().xnode_p = p;
    }

    /// Reactive power at the boundary node in MVar
    pub fn xnode_q(&self) -> f64 {
        self.data.borrow().xnode_q
    }

    /// Set the reactive power at the boundary node in MVar
    pub fn set_xnode_q(&self, q: f64) {
        self.data.borrow_mut().xnode_q = q;
    }
}

/// Description of one half of a tie line, consumed by [`TieLineAdder`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfLineSpec {
    /// Id of the half line
    pub id: String,
    /// Optional human-readable name
    pub name: Option<String>,
    /// Series resistance in ohm
    pub r: f64,
    /// Series reactance in ohm
    pub x: f64,
    /// Shunt conductance in S
    pub g: f64,
    /// Shunt susceptance in S
    pub b: f64,
    /// Active power at the boundary node in MW
    pub xnode_p: f64,
    /// Reactive power at the boundary node in MVar
    pub xnode_q: f64,
}

impl HalfLineSpec {
    fn build(self) -> HalfLine {
        HalfLine::from_data(Rc::new(RefCell::new(HalfLineData {
            id: self.id,
            name: self.name,
            r: self.r,
            x: self.x,
            g: self.g,
            b: self.b,
            xnode_p: self.xnode_p,
            xnode_q: self.xnode_q,
        })))
    }
}

pub(crate) struct TieData {
    pub ucte_xnode_code: Option<String>,
    pub half1: HalfLine,
    pub half2: HalfLine,
}

pub(crate) struct LineData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub r: f64,
    pub x: f64,
    pub g1: f64,
    pub b1: f64,
    pub g2: f64,
    pub b2: f64,
    pub terminal1: Terminal,
    pub terminal2: Terminal,
    pub limits1: Option<CurrentLimits>,
    pub limits2: Option<CurrentLimits>,
    /// `Some` for tie lines.
    pub tie: Option<TieData>,
}

/// An AC line between two voltage levels
///
/// A line tagged as *tie* additionally carries a boundary node code and two
/// [`HalfLine`]s; [`Line::is_tie`] is the tag the projection layer dispatches
/// on.
#[derive(Clone)]
pub struct Line {
    data: Rc<RefCell<LineData>>,
}

impl_identifiable!(Line, LineData, "Line");

impl Line {
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

    /// Shunt conductance on side one in S
    pub fn g1(&self) -> f64 {
        self.data.borrow().g1
    }

    /// Set the shunt conductance on side one in S
    pub fn set_g1(&self, g1: f64) {
        self.data.borrow_mut().g1 = g1;
    }

    /// Shunt susceptance on side one in S
    pub fn b1(&self) -> f64 {
        self.data.borrow().b1
    }

    /// Set the shunt susceptance on side one in S
    pub fn set_b1(&self, b1: f64) {
        self.data.borrow_mut().b1 = b1;
    }

    /// Shunt conductance on side two in S
    pub fn g2(&self) -> f64 {
        self.data.borrow().g2
    }

    /// Set the shunt conductance on side two in S
    pub fn set_g2(&self, g2: f64) {
        self.data.borrow_mut().g2 = g2;
    }

    /// Shunt susceptance on side two in S
    pub fn b2(&self) -> f64 {
        self.data.borrow().b2
    }

    /// Set the shunt susceptance on side two in S
    pub fn set_b2(&self, b2: f64) {
        self.data.borrow_mut().b2 = b2;
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
        let line = self.clone();
        CurrentLimitsAdder::new(
            self.id(),
            Box::new(move |limits| line.data.borrow_mut().limits1 = Some(limits)),
        )
    }

    /// Start building current limits for side two
    pub fn new_current_limits2(&self) -> CurrentLimitsAdder {
        let line = self.clone();
        CurrentLimitsAdder::new(
            self.id(),
            Box::new(move |limits| line.data.borrow_mut().limits2 = Some(limits)),
        )
    }

    /// Whether this line is a composite tie line
    pub fn is_tie(&self) -> bool {
        self.data.borrow().tie.is_some()
    }

    /// UCTE code of the boundary node, for tie lines
    pub fn ucte_xnode_code(&self) -> Option<String> {
        self.data
            .borrow()
            .tie
            .as_ref()
            .and_then(|t| t.ucte_xnode_code.clone())
    }

    /// First half of a tie line
    pub fn half_line1(&self) -> Option<HalfLine> {
        self.data.borrow().tie.as_ref().map(|t| t.half1.clone())
    }

    /// Second half of a tie line
    pub fn half_line2(&self) -> Option<HalfLine> {
        self.data.borrow().tie.as_ref().map(|t| t.half2.clone())
    }

    /// The network this line belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Remove this line from the network
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
        if let Some(network) = self.network() {
            network.unregister_line(&self.id());
            network.invalidate_components();
        }
    }
}

/// Builder for a plain [`Line`], obtained from [`Network::new_line`]
pub struct LineAdder {
    pub(crate) network: Network,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) voltage_level1: Option<String>,
    pub(crate) bus1: Option<String>,
    pub(crate) voltage_level2: Option<String>,
    pub(crate) bus2: Option<String>,
    pub(crate) r: f64,
    pub(crate) x: f64,
    pub(crate) g1: f64,
    pub(crate) b1: f64,
    pub(crate) g2: f64,
    pub(crate) b2: f64,
}

impl LineAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the voltage level on side one (required)
    pub fn voltage_level1(mut self, id: &str) -> Self {
        self.voltage_level1 = Some(id.to_string());
        self
    }

    /// Set the connection bus on side one (required)
    pub fn bus1(mut self, id: &str) -> Self {
        self.bus1 = Some(id.to_string());
        self
    }

    /// Set the voltage level on side two (required)
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

    /// Set the shunt conductance on side one in S
    pub fn g1(mut self, g1: f64) -> Self {
        self.g1 = g1;
        self
    }

    /// Set the shunt susceptance on side one in S
    pub fn b1(mut self, b1: f64) -> Self {
        self.b1 = b1;
        self
    }

    /// Set the shunt conductance on side two in S
    pub fn g2(mut self, g2: f64) -> Self {
        self.g2 = g2;
        self
    }

    /// Set the shunt susceptance on side two in S
    pub fn b2(mut self, b2: f64) -> Self {
        self.b2 = b2;
        self
    }

    /// Build the line and attach it to the network
    pub fn add(self) -> NetworkResult<Line> {
        build_line(
            self.network,
            self.id,
            self.name,
            self.voltage_level1,
            self.bus1,
            self.voltage_level2,
            self.bus2,
            self.r,
            self.x,
            self.g1,
            self.b1,
            self.g2,
            self.b2,
            None,
        )
    }
}

/// Builder for a tie [`Line`], obtained from [`Network::new_tie_line`]
pub struct TieLineAdder {
    pub(crate) network: Network,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) voltage_level1: Option<String>,
    pub(crate) bus1: Option<String>,
    pub(crate) voltage_level2: Option<String>,
    pub(crate) bus2: Option<String>,
    pub(crate) ucte_xnode_code: Option<String>,
    pub(crate) half1: Option<HalfLineSpec>,
    pub(crate) half2: Option<HalfLineSpec>,
}

impl TieLineAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the voltage level on side one (required)
    pub fn voltage_level1(mut self, id: &str) -> Self {
        self.voltage_level1 = Some(id.to_string());
        self
    }

    /// Set the connection bus on side one (required)
    pub fn bus1(mut self, id: &str) -> Self {
        self.bus1 = Some(id.to_string());
        self
    }

    /// Set the voltage level on side two (required)
    pub fn voltage_level2(mut self, id: &str) -> Self {
        self.voltage_level2 = Some(id.to_string());
        self
    }

    /// Set the connection bus on side two (required)
    pub fn bus2(mut self, id: &str) -> Self {
        self.bus2 = Some(id.to_string());
        self
    }

    /// Set the UCTE code of the boundary node
    pub fn ucte_xnode_code(mut self, code: &str) -> Self {
        self.ucte_xnode_code = Some(code.to_string());
        self
    }

    /// Describe the first half line (required)
    pub fn half_line1(mut self, spec: HalfLineSpec) -> Self {
        self.half1 = Some(spec);
        self
    }

    /// Describe the second half line (required)
    pub fn half_line2(mut self, spec: HalfLineSpec) -> Self {
        self.half2 = Some(spec);
        self
    }

    /// Build the tie line and attach it to the network.
    ///
    /// Series characteristics are the sums over the two halves; each side's
    /// shunt characteristics come from its half.
    pub fn add(self) -> NetworkResult<Line> {
        let half1 = self.half1.ok_or_else(|| {
            NetworkError::validation(&self.id, "tie line requires half line 1")
        })?;
        let half2 = self.half2.ok_or_else(|| {
            NetworkError::validation(&self.id, "tie line requires half line 2")
        })?;
        build_line(
            self.network,
            self.id,
            self.name,
            self.voltage_level1,
            self.bus1,
            self.voltage_level2,
            self.bus2,
            half1.r + half2.r,
            half1.x + half2.x,
            half1.g,
            half1.b,
            half2.g,
            half2.b,
            Some(TieData {
                ucte_xnode_code: self.ucte_xnode_code,
                half1: half1.build(),
                half2: half2.build(),
            }),
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn build_line(
    network: Network,
    id: String,
    name: Option<String>,
    voltage_level1: Option<String>,
    bus1: Option<String>,
    voltage_level2: Option<String>,
    bus2: Option<String>,
    r: f64,
    x: f64,
    g1: f64,
    b1: f64,
    g2: f64,
    b2: f64,
    tie: Option<TieData>,
) -> NetworkResult<Line> {
    network.check_new_id(&id)?;
    if !r.is_finite() || !x.is_finite() {
        return Err(NetworkError::validation(
            &id,
            format!("r and x must be finite, got r={r}, x={x}"),
        ));
    }
    let (vl1, b1_bus) = network.resolve_bus(&id, voltage_level1.as_deref(), bus1.as_deref())?;
    let (vl2, b2_bus) = network.resolve_bus(&id, voltage_level2.as_deref(), bus2.as_deref())?;
    let terminal1 = Terminal::new(&vl1, &b1_bus, true);
    let terminal2 = Terminal::new(&vl2, &b2_bus, true);
    let mut base = IdentifiableBase::new(&id);
    base.name = name;
    let line = Line::from_data(Rc::new(RefCell::new(LineData {
        base,
        network: Rc::downgrade(network.data()),
        r,
        x,
        g1,
        b1,
        g2,
        b2,
        terminal1: terminal1.clone(),
        terminal2: terminal2.clone(),
        limits1: None,
        limits2: None,
        tie,
    })));
    let connectable = Connectable::Line(line.clone());
    terminal1.set_owner(connectable.downgrade());
    terminal2.set_owner(connectable.downgrade());
    vl1.register_connectable(connectable.clone());
    if vl2 != vl1 {
        vl2.register_connectable(connectable);
    }
    network.register_line(&line);
    network.invalidate_components();
    Ok(line)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::network::Network;

    fn two_ended_network() -> Network {
        let network = Network::new("n", "test");
        let s1 = network.new_substation("s1").add().unwrap();
        let vl1 = s1.new_voltage_level("vl1").nominal_v(380.0).add().unwrap();
        vl1.new_bus("b1").unwrap();
        let s2 = network.new_substation("s2").add().unwrap();
        let vl2 = s2.new_voltage_level("vl2").nominal_v(380.0).add().unwrap();
        vl2.new_bus("b2").unwrap();
        network
    }

    #[test]
    fn tie_line_carries_its_halves() {
        let network = two_ended_network();
        let line = network
            .new_tie_line("tl")
            .voltage_level1("vl1")
            .bus1("b1")
            .voltage_level2("vl2")
            .bus2("b2")
            .ucte_xnode_code("X1")
            .half_line1(HalfLineSpec {
                id: "tl_h1".into(),
                r: 1.0,
                x: 10.0,
                ..Default::default()
            })
            .half_line2(HalfLineSpec {
                id: "tl_h2".into(),
                r: 2.0,
                x: 12.0,
                ..Default::default()
            })
            .add()
            .unwrap();

        assert!(line.is_tie());
        assert_eq!(line.ucte_xnode_code().as_deref(), Some("X1"));
        // Electrical characteristics of a tie line are the sum of its halves.
        assert_eq!(line.r(), 3.0);
        assert_eq!(line.x(), 22.0);
        assert_eq!(line.half_line1().unwrap().id(), "tl_h1");
        assert_eq!(line.half_line2().unwrap().id(), "tl_h2");
    }

    #[test]
    fn plain_line_has_no_tie_parts() {
        let network = two_ended_network();
        let line = network
            .new_line("l")
            .voltage_level1("vl1")
            .bus1("b1")
            .voltage_level2("vl2")
            .bus2("b2")
            .r(3.0)
            .x(33.0)
            .add()
            .unwrap();

        assert!(!line.is_tie());
        assert!(line.half_line1().is_none());
        assert!(line.ucte_xnode_code().is_none());
    }

    #[test]
    fn tie_line_requires_both_halves() {
        let network = two_ended_network();
        let err = network
            .new_tie_line("tl")
            .voltage_level1("vl1")
            .bus1("b1")
            .voltage_level2("vl2")
            .bus2("b2")
            .half_line1(HalfLineSpec {
                id: "tl_h1".into(),
                ..Default::default()
            })
            .add()
            .unwrap_err();
        assert!(matches!(err, NetworkError::Validation { .. }));
    }

    #[test]
    fn half_line_specs_deserialize_with_defaults() {
        let spec: HalfLineSpec =
            serde_json::from_str(r#"{ "id": "h1", "r": 0.5, "x": 7.5 }"#).unwrap();
        assert_eq!(spec.id, "h1");
        assert_eq!(spec.r, 0.5);
        assert_eq!(spec.x, 7.5);
        assert_eq!(spec.g, 0.0);
        assert!(spec.name.is_none());
    }
}
