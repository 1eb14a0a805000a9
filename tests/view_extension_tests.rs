// Copyright 2025 Cowboy AI, LLC.

//! Extension wrapping through the projection

mod common;

use std::rc::Rc;

use pretty_assertions::assert_eq;

use grid_model::NetworkView;

use common::{
    active_power_control_registry, sample_network, ActivePowerControl, ActivePowerControlView,
};

#[test]
fn registered_extensions_come_back_wrapped() {
    let network = sample_network();
    let generator = network.generator("gen1").unwrap();
    generator.add_extension(ActivePowerControl::new(4.0, true));

    let view = NetworkView::with_extensions(&network, active_power_control_registry());
    let extension = view
        .generator("gen1")
        .unwrap()
        .extension(ActivePowerControl::NAME)
        .unwrap();

    // The wrapper hides the mutable extension behind its read surface.
    assert!(extension
        .as_any()
        .downcast_ref::<ActivePowerControl>()
        .is_none());
    let wrapped = extension
        .as_any()
        .downcast_ref::<ActivePowerControlView>()
        .unwrap();
    assert_eq!(wrapped.droop(), 4.0);
    assert!(wrapped.participate());
}

#[test]
fn wrapped_extensions_read_the_live_state() {
    let network = sample_network();
    let generator = network.generator("gen1").unwrap();
    let control = ActivePowerControl::new(4.0, true);
    generator.add_extension(control.clone());

    let view = NetworkView::with_extensions(&network, active_power_control_registry());
    let generator_view = view.generator("gen1").unwrap();
    let extension = generator_view.extension(ActivePowerControl::NAME).unwrap();
    let wrapped = extension
        .as_any()
        .downcast_ref::<ActivePowerControlView>()
        .unwrap();

    control.droop.set(6.5);
    control.participate.set(false);
    assert_eq!(wrapped.droop(), 6.5);
    assert!(!wrapped.participate());
}

#[test]
fn wrappers_are_identity_cached() {
    let network = sample_network();
    let generator = network.generator("gen1").unwrap();
    generator.add_extension(ActivePowerControl::new(4.0, true));

    let view = NetworkView::with_extensions(&network, active_power_control_registry());
    let generator_view = view.generator("gen1").unwrap();

    let first = generator_view.extension(ActivePowerControl::NAME).unwrap();
    let second = generator_view.extension(ActivePowerControl::NAME).unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    let via_list = generator_view.extensions();
    assert_eq!(via_list.len(), 1);
    assert!(Rc::ptr_eq(&first, &via_list[0]));
}

#[test]
fn replacing_an_extension_yields_a_fresh_wrapper() {
    let network = sample_network();
    let generator = network.generator("gen1").unwrap();
    generator.add_extension(ActivePowerControl::new(4.0, true));

    let view = NetworkView::with_extensions(&network, active_power_control_registry());
    let generator_view = view.generator("gen1").unwrap();
    let old = generator_view.extension(ActivePowerControl::NAME).unwrap();

    // Adding an extension of the same kind replaces the previous one.
    generator.add_extension(ActivePowerControl::new(9.0, false));

    let new = generator_view.extension(ActivePowerControl::NAME).unwrap();
    assert!(!Rc::ptr_eq(&old, &new));
    let wrapped = new
        .as_any()
        .downcast_ref::<ActivePowerControlView>()
        .unwrap();
    assert_eq!(wrapped.droop(), 9.0);
}

#[test]
fn unregistered_extensions_pass_through_raw() {
    let network = sample_network();
    let generator = network.generator("gen1").unwrap();
    generator.add_extension(ActivePowerControl::new(4.0, true));

    // No wrapper factory registered: the raw extension comes back as-is.
    let view = NetworkView::new(&network);
    let extension = view
        .generator("gen1")
        .unwrap()
        .extension(ActivePowerControl::NAME)
        .unwrap();
    let raw = extension
        .as_any()
        .downcast_ref::<ActivePowerControl>()
        .unwrap();
    assert_eq!(raw.droop.get(), 4.0);
}

#[test]
fn missing_extensions_stay_missing() {
    let network = sample_network();
    let view = NetworkView::with_extensions(&network, active_power_control_registry());
    let generator_view = view.generator("gen1").unwrap();

    assert!(generator_view.extension(ActivePowerControl::NAME).is_none());
    assert!(generator_view.extensions().is_empty());
}
