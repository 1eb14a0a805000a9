// Copyright 2025 Cowboy AI, LLC.

//! Identity and read-through behavior of the projection

mod common;

use std::rc::Rc;

use pretty_assertions::assert_eq;

use grid_model::{AnyLineView, BranchView, NetworkView};

use common::sample_network;

#[test]
fn same_element_yields_same_view() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    let first = view.substation("s1").unwrap();
    let second = view.substation("s1").unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    let vl = view.voltage_level("vl1").unwrap();
    let via_substation = first
        .voltage_levels()
        .into_iter()
        .find(|v| v.id() == "vl1")
        .unwrap();
    assert!(Rc::ptr_eq(&vl, &via_substation));
}

#[test]
fn identity_holds_across_navigation_paths() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    // The bus reached directly and the bus reached through a generator
    // terminal are the same view object.
    let direct = view.bus_view().bus("b1").unwrap();
    let via_generator = view
        .generator("gen1")
        .unwrap()
        .terminal()
        .bus()
        .unwrap();
    assert!(Rc::ptr_eq(&direct, &via_generator));

    // Dispatch wrappers are thin: the line inside an `AnyLineView` and the
    // one inside a `BranchView` share the cached view.
    let AnyLineView::Plain(from_lines) = view.line("l1").unwrap() else {
        panic!("l1 is a plain line");
    };
    let BranchView::Line(AnyLineView::Plain(from_branches)) = view.branch("l1").unwrap() else {
        panic!("l1 is a plain line branch");
    };
    assert!(Rc::ptr_eq(&from_lines, &from_branches));
}

#[test]
fn separate_projections_have_separate_identities() {
    let network = sample_network();
    let view_a = NetworkView::new(&network);
    let view_b = NetworkView::new(&network);

    let bus_a = view_a.bus_view().bus("b1").unwrap();
    let bus_b = view_b.bus_view().bus("b1").unwrap();
    assert!(!Rc::ptr_eq(&bus_a, &bus_b));
    assert_eq!(bus_a.id(), bus_b.id());
}

#[test]
fn views_read_the_live_model() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    let bus = view.bus_view().bus("b1").unwrap();

    let model_bus = network.bus("b1").unwrap();
    model_bus.set_v(385.0);
    model_bus.set_angle(-2.5);

    assert_eq!(bus.v(), 385.0);
    assert_eq!(bus.angle(), -2.5);

    let generator = view.generator("gen1").unwrap();
    network.generator("gen1").unwrap().set_target_p(750.0);
    assert_eq!(generator.target_p(), 750.0);
}

#[test]
fn removed_elements_disappear_from_the_projection() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    assert!(view.line("l1").is_some());

    network.line("l1").unwrap().remove();

    assert!(view.line("l1").is_none());
    assert!(view.branch("l1").is_none());
    assert!(view.identifiable("l1").is_none());
}

#[test]
fn missing_ids_pass_through_as_none() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    assert!(view.substation("nope").is_none());
    assert!(view.generator("nope").is_none());
    assert!(view.bus_view().bus("nope").is_none());
    assert!(view.identifiable("nope").is_none());
}

#[test]
fn collection_counts_mirror_the_model() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    assert_eq!(view.two_windings_transformer_count(), 1);
    assert_eq!(view.three_windings_transformer_count(), 1);
    assert_eq!(view.generator_count(), 1);
    assert_eq!(view.load_count(), 1);
    assert_eq!(view.hvdc_line_count(), 1);
    assert_eq!(view.busbar_section("bbs1").unwrap().id(), "bbs1");
    assert!(view.busbar_section("nope").is_none());

    // Counts read the live model, same as the iterables.
    network.generator("gen1").unwrap().remove();
    assert_eq!(view.generator_count(), 0);
}

#[test]
fn disconnected_terminal_has_no_bus() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    let terminal = view.generator("gen1").unwrap().terminal();
    assert!(terminal.bus().is_some());

    network.generator("gen1").unwrap().terminal().disconnect();

    assert!(terminal.bus().is_none());
    // The configured bus stays known even while disconnected.
    assert!(terminal.connectable_bus().is_some());
}

#[test]
fn connected_components_project_through() {
    let network = sample_network();
    let view = NetworkView::new(&network);

    // b1 and b3 are tied together by l1 and tl1; b2 and b4 join through the
    // transformers, so everything is one component plus no stragglers.
    let components = view.bus_view().connected_components();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].num(), 0);
    assert_eq!(components[0].size(), 4);

    let b1 = view.bus_view().bus("b1").unwrap();
    let component = b1.connected_component().unwrap();
    assert!(Rc::ptr_eq(&component, &components[0]));
}

#[test]
fn component_splits_are_visible_through_old_views() {
    let network = sample_network();
    let view = NetworkView::new(&network);
    let b3 = view.bus_view().bus("b3").unwrap();
    assert_eq!(b3.connected_component().unwrap().size(), 4);

    // Cutting both AC paths is not enough: hvdc1 still couples b1 and b3
    // through its converter stations.
    network.line("l1").unwrap().terminal1().disconnect();
    network.line("tl1").unwrap().terminal1().disconnect();
    assert_eq!(b3.connected_component().unwrap().size(), 4);

    network.hvdc_line("hvdc1").unwrap().remove();

    let component = b3.connected_component().unwrap();
    assert_eq!(component.size(), 1);
    assert!(component.num() > 0);
}

mod component_properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        // Whatever subset of the edges gets cut, the projected components
        // partition the buses, are numbered contiguously and shrink in size.
        #[test]
        fn components_always_partition_the_buses(cuts in proptest::collection::vec(any::<bool>(), 5)) {
            let network = sample_network();
            if cuts[0] {
                network.line("l1").unwrap().terminal1().disconnect();
            }
            if cuts[1] {
                network.line("tl1").unwrap().terminal1().disconnect();
            }
            if cuts[2] {
                network.two_windings_transformer("t1").unwrap().terminal1().disconnect();
            }
            if cuts[3] {
                let t3 = network.three_windings_transformer("t3").unwrap();
                for leg in t3.legs() {
                    leg.terminal().disconnect();
                }
            }
            if cuts[4] {
                network.hvdc_converter_station("lcc1").unwrap().terminal().disconnect();
            }

            let view = NetworkView::new(&network);
            let components = view.bus_view().connected_components();
            let total: usize = components.iter().map(|c| c.size()).sum();
            prop_assert_eq!(total, 4);
            for (expected_num, component) in components.iter().enumerate() {
                prop_assert_eq!(component.num(), expected_num);
                if expected_num > 0 {
                    prop_assert!(component.size() <= components[expected_num - 1].size());
                }
            }
            for bus in view.bus_view().buses() {
                let component = bus.connected_component().unwrap();
                prop_assert!(components.iter().any(|c| Rc::ptr_eq(c, &component)));
            }
        }
    }
}
