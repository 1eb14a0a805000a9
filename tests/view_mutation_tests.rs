// Copyright 2025 Cowboy AI, LLC.

//! Every mutator on a view fails without touching the model

mod common;

use pretty_assertions::assert_eq;

use grid_model::{NetworkError, NetworkResult, NetworkView};

use common::{sample_network, ActivePowerControl};

fn assert_unmodifiable<T>(
    result: NetworkResult<T>,
    element: &str,
    operation: &str,
    id: &str,
) {
    match result {
        Err(NetworkError::UnmodifiableView {
            element: e,
            operation: o,
            id: i,
        }) => {
            assert_eq!(e, element);
            assert_eq!(o, operation);
            assert_eq!(i, id);
        }
        Err(other) => panic!("expected UnmodifiableView, got {other:?}"),
        Ok(_) => panic!("expected UnmodifiableView, got Ok"),
    }
}

#[test]
fn network_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    assert_unmodifiable(view.new_substation("s9"), "network", "new_substation", "sim1");
    assert_unmodifiable(view.new_line("l9"), "network", "new_line", "sim1");
    assert_unmodifiable(view.new_tie_line("tl9"), "network", "new_tie_line", "sim1");
    assert_unmodifiable(view.new_hvdc_line("h9"), "network", "new_hvdc_line", "sim1");
    assert_unmodifiable(
        view.set_forecast_distance(30),
        "network",
        "set_forecast_distance",
        "sim1",
    );
    assert_eq!(network.substation_count(), 2);
    assert_eq!(network.forecast_distance(), 0);
}

#[test]
fn substation_and_voltage_level_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    let substation = view.substation("s1").unwrap();

    assert_unmodifiable(
        substation.set_country(Some("DE")),
        "substation",
        "set_country",
        "s1",
    );
    assert_unmodifiable(
        substation.new_voltage_level("vl9"),
        "substation",
        "new_voltage_level",
        "s1",
    );
    assert_eq!(network.substation("s1").unwrap().country().as_deref(), Some("FR"));

    let vl = view.voltage_level("vl1").unwrap();
    assert_unmodifiable(vl.set_nominal_v(400.0), "voltage level", "set_nominal_v", "vl1");
    assert_unmodifiable(vl.new_generator("g9"), "voltage level", "new_generator", "vl1");
    assert_unmodifiable(
        vl.bus_breaker_view().new_bus("b9"),
        "voltage level",
        "new_bus",
        "vl1",
    );
    assert_eq!(network.voltage_level("vl1").unwrap().nominal_v(), 380.0);
    assert!(network.generator("g9").is_none());
}

#[test]
fn bus_and_terminal_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let bus = view.bus_view().bus("b1").unwrap();
    assert_unmodifiable(bus.set_v(400.0), "bus", "set_v", "b1");
    assert_unmodifiable(bus.set_angle(1.0), "bus", "set_angle", "b1");
    assert!(network.bus("b1").unwrap().v().is_nan());

    let terminal = view.generator("gen1").unwrap().terminal();
    assert_unmodifiable(terminal.disconnect(), "terminal", "disconnect", "gen1");
    assert_unmodifiable(terminal.set_p(1.0), "terminal", "set_p", "gen1");
    assert!(network.generator("gen1").unwrap().terminal().is_connected());
}

#[test]
fn equipment_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let generator = view.generator("gen1").unwrap();
    assert_unmodifiable(generator.set_target_p(0.0), "generator", "set_target_p", "gen1");
    assert_unmodifiable(generator.remove(), "generator", "remove", "gen1");
    assert_eq!(network.generator("gen1").unwrap().target_p(), 600.0);
    assert!(network.generator("gen1").is_some());

    let load = view.load("load1").unwrap();
    assert_unmodifiable(load.set_p0(0.0), "load", "set_p0", "load1");

    let shunt = view.shunt_compensator("shunt1").unwrap();
    assert_unmodifiable(
        shunt.set_current_section_count(1),
        "shunt compensator",
        "set_current_section_count",
        "shunt1",
    );
    assert_eq!(
        network.shunt_compensator("shunt1").unwrap().current_section_count(),
        5
    );

    let svc = view.static_var_compensator("svc1").unwrap();
    assert_unmodifiable(
        svc.set_voltage_setpoint(0.0),
        "static VAR compensator",
        "set_voltage_setpoint",
        "svc1",
    );

    let dangling = view.dangling_line("dl1").unwrap();
    assert_unmodifiable(dangling.set_p0(0.0), "dangling line", "set_p0", "dl1");
    assert_unmodifiable(
        dangling.new_current_limits(),
        "dangling line",
        "new_current_limits",
        "dl1",
    );
}

#[test]
fn branch_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let line = match view.line("l1").unwrap() {
        grid_model::AnyLineView::Plain(line) => line,
        other => panic!("expected a plain line, got {:?}", other.id()),
    };
    assert_unmodifiable(line.set_r(0.0), "line", "set_r", "l1");
    assert_unmodifiable(line.remove(), "line", "remove", "l1");
    assert_eq!(network.line("l1").unwrap().r(), 3.0);

    let transformer = view.two_windings_transformer("t1").unwrap();
    assert_unmodifiable(
        transformer.set_rated_u1(0.0),
        "two-windings transformer",
        "set_rated_u1",
        "t1",
    );

    let tap_changer = transformer.ratio_tap_changer().unwrap();
    assert_unmodifiable(
        tap_changer.set_tap_position(2),
        "ratio tap changer",
        "set_tap_position",
        "t1",
    );
    assert_eq!(
        network
            .two_windings_transformer("t1")
            .unwrap()
            .ratio_tap_changer()
            .unwrap()
            .tap_position(),
        1
    );

    let limits = transformer.current_limits1().unwrap();
    assert_unmodifiable(
        limits.set_permanent_limit(99.0),
        "current limits",
        "set_permanent_limit",
        "t1",
    );
    assert_eq!(
        network
            .two_windings_transformer("t1")
            .unwrap()
            .current_limits1()
            .unwrap()
            .permanent_limit(),
        1200.0
    );

    let leg = view.three_windings_transformer("t3").unwrap().leg2();
    assert_unmodifiable(leg.set_r(9.0), "transformer leg", "set_r", "t3");
}

#[test]
fn hvdc_mutators_are_rejected() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let hvdc = view.hvdc_line("hvdc1").unwrap();
    assert_unmodifiable(hvdc.set_max_p(0.0), "HVDC line", "set_max_p", "hvdc1");
    assert_eq!(network.hvdc_line("hvdc1").unwrap().max_p(), 500.0);

    match hvdc.converter_station1() {
        grid_model::HvdcConverterStationView::Lcc(lcc) => {
            assert_unmodifiable(
                lcc.set_loss_factor(0.0),
                "LCC converter station",
                "set_loss_factor",
                "lcc1",
            );
        }
        grid_model::HvdcConverterStationView::Vsc(_) => panic!("station one is an LCC"),
    }
}

#[test]
fn property_and_extension_mutators_are_rejected() {
    let network = sample_network();
    let model_generator = network.generator("gen1").unwrap();
    model_generator.set_property("operator", "A");

    let view = NetworkView::new(&network);
    let generator = view.generator("gen1").unwrap();
    assert_eq!(generator.property("operator").as_deref(), Some("A"));

    assert_unmodifiable(
        generator.set_property("operator", "B"),
        "generator",
        "set_property",
        "gen1",
    );
    assert_unmodifiable(
        generator.add_extension(ActivePowerControl::new(4.0, true)),
        "generator",
        "add_extension",
        "gen1",
    );
    assert_unmodifiable(
        generator.remove_extension(ActivePowerControl::NAME),
        "generator",
        "remove_extension",
        "gen1",
    );
    assert_eq!(model_generator.property("operator").as_deref(), Some("A"));
}
