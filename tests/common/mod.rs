// Copyright 2025 Cowboy AI, LLC.

//! Shared fixtures for the projection integration tests

#![allow(dead_code)]

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use grid_model::{
    EnergySource, Extension, ExtensionViewRegistry, HalfLineSpec, LegSpec, Network,
    SvcRegulationMode, TapChangerStep,
};

fn ratio_step(rho: f64) -> TapChangerStep {
    TapChangerStep {
        rho,
        r: 0.0,
        x: 0.0,
        g: 0.0,
        b: 0.0,
    }
}

/// Builds a small two-substation network exercising every equipment kind.
///
/// Substation `s1` (FR) holds `vl1` (380 kV, bus `b1`), `vl2` (225 kV, bus
/// `b2`) and `vl4` (90 kV, bus `b4`), joined by the two-windings transformer
/// `t1` and the three-windings transformer `t3`. Substation `s2` (BE) holds
/// `vl3` (380 kV, bus `b3`). The line `l1` and the tie line `tl1` connect
/// `b1` to `b3`, and the HVDC line `hvdc1` links the converter stations
/// `lcc1` (on `b1`) and `vsc1` (on `b3`).
pub fn sample_network() -> Network {
    let network = Network::new("sim1", "test");

    let s1 = network
        .new_substation("s1")
        .country("FR")
        .tso("RTE")
        .geographical_tag("west")
        .add()
        .unwrap();
    let vl1 = s1
        .new_voltage_level("vl1")
        .nominal_v(380.0)
        .low_voltage_limit(360.0)
        .high_voltage_limit(400.0)
        .add()
        .unwrap();
    vl1.new_bus("b1").unwrap();
    let vl2 = s1.new_voltage_level("vl2").nominal_v(225.0).add().unwrap();
    vl2.new_bus("b2").unwrap();
    let vl4 = s1.new_voltage_level("vl4").nominal_v(90.0).add().unwrap();
    vl4.new_bus("b4").unwrap();

    let s2 = network.new_substation("s2").country("BE").add().unwrap();
    let vl3 = s2.new_voltage_level("vl3").nominal_v(380.0).add().unwrap();
    vl3.new_bus("b3").unwrap();

    let t1 = s1
        .new_two_windings_transformer("t1")
        .voltage_level1("vl1")
        .bus1("b1")
        .voltage_level2("vl2")
        .bus2("b2")
        .r(0.5)
        .x(12.0)
        .rated_u1(380.0)
        .rated_u2(225.0)
        .add()
        .unwrap();
    t1.new_current_limits1()
        .permanent_limit(1200.0)
        .temporary_limit("20'", 1400.0, 1200)
        .add()
        .unwrap();
    t1.new_ratio_tap_changer()
        .step(ratio_step(0.95))
        .step(ratio_step(1.0))
        .step(ratio_step(1.05))
        .low_tap_position(0)
        .tap_position(1)
        .regulating(false)
        .add()
        .unwrap();

    s1.new_three_windings_transformer("t3")
        .leg1(LegSpec {
            voltage_level: "vl1".into(),
            bus: "b1".into(),
            r: 0.3,
            x: 9.0,
            g: 0.0,
            b: 0.0,
            rated_u: 380.0,
        })
        .leg2(LegSpec {
            voltage_level: "vl2".into(),
            bus: "b2".into(),
            r: 0.2,
            x: 6.0,
            g: 0.0,
            b: 0.0,
            rated_u: 225.0,
        })
        .leg3(LegSpec {
            voltage_level: "vl4".into(),
            bus: "b4".into(),
            r: 0.1,
            x: 3.0,
            g: 0.0,
            b: 0.0,
            rated_u: 90.0,
        })
        .add()
        .unwrap();

    let l1 = network
        .new_line("l1")
        .voltage_level1("vl1")
        .bus1("b1")
        .voltage_level2("vl3")
        .bus2("b3")
        .r(3.0)
        .x(33.0)
        .b1(193e-6)
        .b2(193e-6)
        .add()
        .unwrap();
    l1.new_current_limits1().permanent_limit(1000.0).add().unwrap();

    network
        .new_tie_line("tl1")
        .voltage_level1("vl1")
        .bus1("b1")
        .voltage_level2("vl3")
        .bus2("b3")
        .ucte_xnode_code("XNODE1")
        .half_line1(HalfLineSpec {
            id: "tl1_half1".into(),
            r: 1.5,
            x: 16.0,
            ..Default::default()
        })
        .half_line2(HalfLineSpec {
            id: "tl1_half2".into(),
            r: 1.5,
            x: 17.0,
            ..Default::default()
        })
        .add()
        .unwrap();

    vl1.new_generator("gen1")
        .bus("b1")
        .energy_source(EnergySource::Nuclear)
        .min_p(0.0)
        .max_p(1000.0)
        .target_p(600.0)
        .target_v(385.0)
        .voltage_regulator_on(true)
        .add()
        .unwrap();
    vl3.new_load("load1")
        .bus("b3")
        .p0(600.0)
        .q0(200.0)
        .add()
        .unwrap();
    vl2.new_shunt_compensator("shunt1")
        .bus("b2")
        .b_per_section(1e-5)
        .maximum_section_count(10)
        .current_section_count(5)
        .add()
        .unwrap();
    let dl1 = vl3
        .new_dangling_line("dl1")
        .bus("b3")
        .p0(50.0)
        .q0(10.0)
        .r(2.0)
        .x(20.0)
        .ucte_xnode_code("XNODE2")
        .add()
        .unwrap();
    dl1.new_current_limits().permanent_limit(300.0).add().unwrap();
    vl2.new_static_var_compensator("svc1")
        .bus("b2")
        .b_min(-0.01)
        .b_max(0.01)
        .voltage_setpoint(225.0)
        .regulation_mode(SvcRegulationMode::Voltage)
        .add()
        .unwrap();
    vl1.new_busbar_section("bbs1").bus("b1").add().unwrap();

    vl1.new_lcc_converter_station("lcc1")
        .bus("b1")
        .loss_factor(1.1)
        .power_factor(0.9)
        .add()
        .unwrap();
    vl3.new_vsc_converter_station("vsc1")
        .bus("b3")
        .loss_factor(1.1)
        .voltage_regulator_on(true)
        .voltage_setpoint(380.0)
        .add()
        .unwrap();
    network
        .new_hvdc_line("hvdc1")
        .r(1.0)
        .nominal_v(400.0)
        .active_power_setpoint(300.0)
        .max_p(500.0)
        .converter_station1("lcc1")
        .converter_station2("vsc1")
        .add()
        .unwrap();

    network
}

/// Generator active power control extension used by the extension tests.
pub struct ActivePowerControl {
    pub droop: Cell<f64>,
    pub participate: Cell<bool>,
}

impl ActivePowerControl {
    pub const NAME: &'static str = "activePowerControl";

    pub fn new(droop: f64, participate: bool) -> Rc<Self> {
        Rc::new(Self {
            droop: Cell::new(droop),
            participate: Cell::new(participate),
        })
    }
}

impl Extension for ActivePowerControl {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Read-only wrapper over [`ActivePowerControl`]: exposes the live values
/// but none of the setters.
pub struct ActivePowerControlView {
    source: Rc<dyn Extension>,
}

impl ActivePowerControlView {
    fn source(&self) -> &ActivePowerControl {
        // The registry only hands this wrapper extensions of its own kind.
        self.source
            .as_any()
            .downcast_ref::<ActivePowerControl>()
            .unwrap()
    }

    pub fn droop(&self) -> f64 {
        self.source().droop.get()
    }

    pub fn participate(&self) -> bool {
        self.source().participate.get()
    }
}

impl Extension for ActivePowerControlView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &'static str {
        ActivePowerControl::NAME
    }
}

/// Registry wrapping [`ActivePowerControl`] read-only.
pub fn active_power_control_registry() -> ExtensionViewRegistry {
    let mut registry = ExtensionViewRegistry::new();
    registry.register(
        ActivePowerControl::NAME,
        Box::new(|source| Rc::new(ActivePowerControlView { source })),
    );
    registry
}
