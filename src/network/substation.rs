// Copyright 2025 Cowboy AI, LLC.

//! Substations: the geographical containers of voltage levels

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::errors::NetworkResult;
use crate::network::transformer::TwoWindingsTransformer;
use crate::network::voltage_level::{TopologyKind, VoltageLevel, VoltageLevelAdder};
use crate::network::{impl_identifiable, IdentifiableBase, Network, NetworkData};

pub(crate) struct SubstationData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub country: Option<String>,
    pub tso: Option<String>,
    pub geographical_tags: Vec<String>,
    pub voltage_levels: IndexMap<String, VoltageLevel>,
    pub two_windings_transformers: IndexMap<String, TwoWindingsTransformer>,
}

/// A substation, grouping voltage levels at one physical site
#[derive(Clone)]
pub struct Substation {
    data: Rc<RefCell<SubstationData>>,
}

impl_identifiable!(Substation, SubstationData, "Substation");

impl Substation {
    /// ISO country code of the substation, if known
    pub fn country(&self) -> Option<String> {
        self.data.borrow().country.clone()
    }

    /// Set the ISO country code
    pub fn set_country(&self, country: Option<&str>) {
        self.data.borrow_mut().country = country.map(str::to_string);
    }

    /// Id of the transmission system operator, if known
    pub fn tso(&self) -> Option<String> {
        self.data.borrow().tso.clone()
    }

    /// Set the transmission system operator id
    pub fn set_tso(&self, tso: Option<&str>) {
        self.data.borrow_mut().tso = tso.map(str::to_string);
    }

    /// Geographical tags attached to the substation
    pub fn geographical_tags(&self) -> Vec<String> {
        self.data.borrow().geographical_tags.clone()
    }

    /// Add a geographical tag
    pub fn add_geographical_tag(&self, tag: &str) {
        self.data
            .borrow_mut()
            .geographical_tags
            .push(tag.to_string());
    }

    /// The network this substation belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Voltage levels of this substation, in creation order
    pub fn voltage_levels(&self) -> Vec<VoltageLevel> {
        self.data.borrow().voltage_levels.values().cloned().collect()
    }

    /// Voltage level with the given id, if it belongs to this substation
    pub fn voltage_level(&self, id: &str) -> Option<VoltageLevel> {
        self.data.borrow().voltage_levels.get(id).cloned()
    }

    /// Number of voltage levels in this substation
    pub fn voltage_level_count(&self) -> usize {
        self.data.borrow().voltage_levels.len()
    }

    /// Start building a new voltage level in this substation
    pub fn new_voltage_level(&self, id: &str) -> VoltageLevelAdder {
        VoltageLevelAdder {
            substation: self.clone(),
            id: id.to_string(),
            name: None,
            nominal_v: f64::NAN,
            low_voltage_limit: f64::NAN,
            high_voltage_limit: f64::NAN,
            topology_kind: TopologyKind::BusBreaker,
        }
    }

    /// Two-windings transformers of this substation, in creation order
    pub fn two_windings_transformers(&self) -> Vec<TwoWindingsTransformer> {
        self.data
            .borrow()
            .two_windings_transformers
            .values()
            .cloned()
            .collect()
    }

    /// Number of two-windings transformers in this substation
    pub fn two_windings_transformer_count(&self) -> usize {
        self.data.borrow().two_windings_transformers.len()
    }

    pub(crate) fn attach_voltage_level(&self, voltage_level: &VoltageLevel) {
        self.data
            .borrow_mut()
            .voltage_levels
            .insert(voltage_level.id(), voltage_level.clone());
    }

    pub(crate) fn attach_two_windings_transformer(&self, transformer: &TwoWindingsTransformer) {
        self.data
            .borrow_mut()
            .two_windings_transformers
            .insert(transformer.id(), transformer.clone());
    }

    pub(crate) fn detach_two_windings_transformer(&self, id: &str) {
        self.data
            .borrow_mut()
            .two_windings_transformers
            .shift_remove(id);
    }
}

/// Builder for a [`Substation`], obtained from [`Network::new_substation`]
pub struct SubstationAdder {
    pub(crate) network: Network,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) country: Option<String>,
    pub(crate) tso: Option<String>,
    pub(crate) geographical_tags: Vec<String>,
}

impl SubstationAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the ISO country code
    pub fn country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    /// Set the transmission system operator id
    pub fn tso(mut self, tso: &str) -> Self {
        self.tso = Some(tso.to_string());
        self
    }

    /// Add a geographical tag
    pub fn geographical_tag(mut self, tag: &str) -> Self {
        self.geographical_tags.push(tag.to_string());
        self
    }

    /// Build the substation and attach it to the network
    pub fn add(self) -> NetworkResult<Substation> {
        self.network.check_new_id(&self.id)?;
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name;
        let substation = Substation::from_data(Rc::new(RefCell::new(SubstationData {
            base,
            network: Rc::downgrade(self.network.data()),
            country: self.country,
            tso: self.tso,
            geographical_tags: self.geographical_tags,
            voltage_levels: IndexMap::new(),
            two_windings_transformers: IndexMap::new(),
        })));
        self.network.register_substation(&substation);
        Ok(substation)
    }
}
