// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of substations

use std::rc::Rc;

use crate::network::Substation;
use crate::view::cache::ViewCache;
use crate::view::transformer::TwoWindingsTransformerView;
use crate::view::voltage_level::VoltageLevelView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of a [`Substation`]
pub struct SubstationView {
    substation: Substation,
    cache: Rc<ViewCache>,
}

view_identifiable!(SubstationView, substation, "substation");

impl SubstationView {
    /// ISO country code of the substation, if known
    pub fn country(&self) -> Option<String> {
        self.substation.country()
    }

    /// Id of the transmission system operator, if known
    pub fn tso(&self) -> Option<String> {
        self.substation.tso()
    }

    /// Geographical tags attached to the substation
    pub fn geographical_tags(&self) -> Vec<String> {
        self.substation.geographical_tags()
    }

    /// Voltage levels of this substation, in creation order
    pub fn voltage_levels(&self) -> Vec<Rc<VoltageLevelView>> {
        self.substation
            .voltage_levels()
            .iter()
            .map(|vl| self.cache.voltage_level_view(vl))
            .collect()
    }

    /// Voltage level with the given id, if it belongs to this substation
    pub fn voltage_level(&self, id: &str) -> Option<Rc<VoltageLevelView>> {
        self.substation
            .voltage_level(id)
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// Number of voltage levels in this substation
    pub fn voltage_level_count(&self) -> usize {
        self.substation.voltage_level_count()
    }

    /// Two-windings transformers of this substation, in creation order
    pub fn two_windings_transformers(&self) -> Vec<Rc<TwoWindingsTransformerView>> {
        self.substation
            .two_windings_transformers()
            .iter()
            .map(|t| self.cache.two_windings_transformer_view(t))
            .collect()
    }

    /// Number of two-windings transformers in this substation
    pub fn two_windings_transformer_count(&self) -> usize {
        self.substation.two_windings_transformer_count()
    }

    reject_mutators! { "substation" =>
        fn set_country(_country: Option<&str>);
        fn set_tso(_tso: Option<&str>);
        fn add_geographical_tag(_tag: &str);
        fn new_voltage_level(_id: &str);
        fn new_two_windings_transformer(_id: &str);
        fn new_three_windings_transformer(_id: &str);
    }
}

impl ViewCache {
    pub(crate) fn substation_view(self: &Rc<Self>, substation: &Substation) -> Rc<SubstationView> {
        self.substations.get_or_insert(substation.data(), || SubstationView {
            substation: substation.clone(),
            cache: Rc::clone(self),
        })
    }
}
