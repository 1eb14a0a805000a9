// Copyright 2025 Cowboy AI, LLC.

//! Dispatch over the closed set of element kinds

mod common;

use pretty_assertions::assert_eq;
use test_case::test_case;

use grid_model::{
    AnyLineView, BranchView, ConnectableView, HvdcConverterStationView, IdentifiableView,
    NetworkView,
};

use common::sample_network;

#[test_case("s1" => matches IdentifiableView::Substation(_))]
#[test_case("vl1" => matches IdentifiableView::VoltageLevel(_))]
#[test_case("b1" => matches IdentifiableView::Bus(_))]
#[test_case("l1" => matches IdentifiableView::Line(AnyLineView::Plain(_)))]
#[test_case("tl1" => matches IdentifiableView::Line(AnyLineView::Tie(_)))]
#[test_case("t1" => matches IdentifiableView::TwoWindingsTransformer(_))]
#[test_case("t3" => matches IdentifiableView::ThreeWindingsTransformer(_))]
#[test_case("gen1" => matches IdentifiableView::Generator(_))]
#[test_case("load1" => matches IdentifiableView::Load(_))]
#[test_case("shunt1" => matches IdentifiableView::ShuntCompensator(_))]
#[test_case("dl1" => matches IdentifiableView::DanglingLine(_))]
#[test_case("svc1" => matches IdentifiableView::StaticVarCompensator(_))]
#[test_case("bbs1" => matches IdentifiableView::BusbarSection(_))]
#[test_case("lcc1" => matches IdentifiableView::LccConverterStation(_))]
#[test_case("vsc1" => matches IdentifiableView::VscConverterStation(_))]
#[test_case("hvdc1" => matches IdentifiableView::HvdcLine(_))]
fn identifiable_dispatch(id: &str) -> IdentifiableView {
    let network = sample_network();
    let view = NetworkView::new(&network);
    view.identifiable(id).unwrap()
}

#[test]
fn identifiable_ids_survive_dispatch() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    for element in view.identifiables() {
        assert!(view.identifiable(&element.id()).is_some());
    }
    assert_eq!(view.identifiables().len(), network.identifiables().len());
}

#[test]
fn lines_split_into_plain_and_tie() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let plain = match view.line("l1").unwrap() {
        AnyLineView::Plain(line) => line,
        AnyLineView::Tie(_) => panic!("l1 is not a tie line"),
    };
    assert_eq!(plain.id(), "l1");
    assert_eq!(plain.r(), 3.0);

    let tie = match view.line("tl1").unwrap() {
        AnyLineView::Tie(line) => line,
        AnyLineView::Plain(_) => panic!("tl1 is a tie line"),
    };
    assert_eq!(tie.ucte_xnode_code().as_deref(), Some("XNODE1"));
    let half = tie.half_line1().unwrap();
    assert_eq!(half.id(), "tl1_half1");
    assert_eq!(half.x(), 16.0);
}

#[test]
fn branches_cover_lines_and_transformers() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let ids: Vec<String> = view.branches().iter().map(BranchView::id).collect();
    assert_eq!(ids, vec!["l1", "tl1", "t1"]);

    assert!(matches!(
        view.branch("t1").unwrap(),
        BranchView::TwoWindingsTransformer(_)
    ));
    assert!(view.branch("t3").is_none());
    assert!(view.branch("gen1").is_none());
}

#[test]
fn voltage_level_lists_its_connectables() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    let vl = view.voltage_level("vl1").unwrap();

    let connectables = vl.connectables();
    let mut kinds = Vec::new();
    for connectable in &connectables {
        kinds.push(match connectable {
            ConnectableView::Line(_) => "line",
            ConnectableView::TwoWindingsTransformer(_) => "t2w",
            ConnectableView::ThreeWindingsTransformer(_) => "t3w",
            ConnectableView::Generator(_) => "generator",
            ConnectableView::BusbarSection(_) => "busbar",
            ConnectableView::LccConverterStation(_) => "lcc",
            other => panic!("unexpected connectable {}", other.id()),
        });
    }
    assert_eq!(
        kinds,
        vec!["t2w", "t3w", "line", "line", "generator", "busbar", "lcc"]
    );
}

#[test]
fn busbar_sections_pass_through_unwrapped() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    // Busbar sections are handed out as raw model handles; mutating through
    // one is the documented escape hatch, not an error.
    let IdentifiableView::BusbarSection(busbar) = view.identifiable("bbs1").unwrap() else {
        panic!("bbs1 is a busbar section");
    };
    assert_eq!(busbar.id(), "bbs1");
    busbar.set_property("color", "red");
    assert_eq!(
        network.busbar_section("bbs1").unwrap().property("color").as_deref(),
        Some("red")
    );
}

#[test]
fn hvdc_stations_dispatch_by_kind() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    assert!(matches!(
        view.hvdc_converter_station("lcc1").unwrap(),
        HvdcConverterStationView::Lcc(_)
    ));
    assert!(matches!(
        view.hvdc_converter_station("vsc1").unwrap(),
        HvdcConverterStationView::Vsc(_)
    ));
    assert!(view.hvdc_converter_station("gen1").is_none());

    let hvdc = view.hvdc_line("hvdc1").unwrap();
    match hvdc.converter_station2() {
        HvdcConverterStationView::Vsc(vsc) => {
            assert_eq!(vsc.id(), "vsc1");
            assert_eq!(vsc.hvdc_line().unwrap().id(), "hvdc1");
        }
        HvdcConverterStationView::Lcc(_) => panic!("station two is a VSC"),
    }
}
