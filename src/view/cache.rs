// Copyright 2025 Cowboy AI, LLC.

//! Weak identity cache behind the read-only projection
//!
//! Every projected element gets at most one live view: wrapping the same
//! underlying element twice yields the same `Rc`, so view identity mirrors
//! element identity. The cache holds only `Weak` references on both sides,
//! so it keeps neither the model nor the views alive.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::network::bus::BusData;
use crate::network::component::ComponentData;
use crate::network::hvdc::{HvdcLineData, LccConverterStationData, VscConverterStationData};
use crate::network::injection::{
    DanglingLineData, GeneratorData, LoadData, ShuntCompensatorData, StaticVarCompensatorData,
};
use crate::network::line::{HalfLineData, LineData};
use crate::network::substation::SubstationData;
use crate::network::tap_changer::{PhaseTapChangerData, RatioTapChangerData};
use crate::network::terminal::TerminalData;
use crate::network::transformer::{
    LegData, ThreeWindingsTransformerData, TwoWindingsTransformerData,
};
use crate::network::voltage_level::VoltageLevelData;

use crate::view::bus::BusView;
use crate::view::component::ComponentView;
use crate::view::extension::ExtensionViewRegistry;
use crate::view::hvdc::{HvdcLineView, LccConverterStationView, VscConverterStationView};
use crate::view::injection::{
    DanglingLineView, GeneratorView, LoadView, ShuntCompensatorView, StaticVarCompensatorView,
};
use crate::view::line::{HalfLineView, LineView, TieLineView};
use crate::view::substation::SubstationView;
use crate::view::tap_changer::{PhaseTapChangerView, RatioTapChangerView};
use crate::view::terminal::TerminalView;
use crate::view::transformer::{
    LegView, ThreeWindingsTransformerView, TwoWindingsTransformerView,
};
use crate::view::voltage_level::VoltageLevelView;

/// Dead slots are swept once per this many cache misses.
const SWEEP_PERIOD: u32 = 64;

struct Slot<D, V> {
    node: Weak<RefCell<D>>,
    view: Weak<V>,
}

/// Identity cache for one kind of view, keyed by the address of the
/// underlying element's data cell.
pub(crate) struct KindCache<D, V> {
    kind: &'static str,
    slots: RefCell<HashMap<usize, Slot<D, V>>>,
    misses: Cell<u32>,
}

impl<D, V> KindCache<D, V> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: RefCell::new(HashMap::new()),
            misses: Cell::new(0),
        }
    }

    /// Return the live view for `node`, building and caching one on a miss.
    pub(crate) fn get_or_insert(
        &self,
        node: &Rc<RefCell<D>>,
        build: impl FnOnce() -> V,
    ) -> Rc<V> {
        let key = Rc::as_ptr(node) as usize;
        if let Some(view) = self.lookup(key, node) {
            trace!(kind = self.kind, "view cache hit");
            return view;
        }
        let misses = self.misses.get().wrapping_add(1);
        self.misses.set(misses);
        if misses % SWEEP_PERIOD == 0 {
            self.sweep();
        }
        let view = Rc::new(build());
        debug!(kind = self.kind, "built view");
        self.slots.borrow_mut().insert(
            key,
            Slot {
                node: Rc::downgrade(node),
                view: Rc::downgrade(&view),
            },
        );
        view
    }

    fn lookup(&self, key: usize, node: &Rc<RefCell<D>>) -> Option<Rc<V>> {
        let slots = self.slots.borrow();
        let slot = slots.get(&key)?;
        let live = slot.node.upgrade()?;
        // A slot whose element died may see its address reused by a new
        // allocation; the identity check rejects such stale entries.
        if !Rc::ptr_eq(&live, node) {
            return None;
        }
        slot.view.upgrade()
    }

    fn sweep(&self) {
        self.slots
            .borrow_mut()
            .retain(|_, slot| slot.node.strong_count() > 0 && slot.view.strong_count() > 0);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

/// All per-kind view caches of one [`NetworkView`](crate::view::NetworkView),
/// plus the extension wrapper registry.
///
/// Shared behind `Rc` by the root view and every view it hands out, so
/// navigation from any view goes through the same caches.
pub(crate) struct ViewCache {
    pub(crate) substations: KindCache<SubstationData, SubstationView>,
    pub(crate) voltage_levels: KindCache<VoltageLevelData, VoltageLevelView>,
    pub(crate) buses: KindCache<BusData, BusView>,
    pub(crate) terminals: KindCache<TerminalData, TerminalView>,
    pub(crate) lines: KindCache<LineData, LineView>,
    pub(crate) tie_lines: KindCache<LineData, TieLineView>,
    pub(crate) half_lines: KindCache<HalfLineData, HalfLineView>,
    pub(crate) two_windings_transformers:
        KindCache<TwoWindingsTransformerData, TwoWindingsTransformerView>,
    pub(crate) three_windings_transformers:
        KindCache<ThreeWindingsTransformerData, ThreeWindingsTransformerView>,
    pub(crate) legs: KindCache<LegData, LegView>,
    pub(crate) ratio_tap_changers: KindCache<RatioTapChangerData, RatioTapChangerView>,
    pub(crate) phase_tap_changers: KindCache<PhaseTapChangerData, PhaseTapChangerView>,
    pub(crate) generators: KindCache<GeneratorData, GeneratorView>,
    pub(crate) loads: KindCache<LoadData, LoadView>,
    pub(crate) shunt_compensators: KindCache<ShuntCompensatorData, ShuntCompensatorView>,
    pub(crate) dangling_lines: KindCache<DanglingLineData, DanglingLineView>,
    pub(crate) static_var_compensators:
        KindCache<StaticVarCompensatorData, StaticVarCompensatorView>,
    pub(crate) lcc_converter_stations:
        KindCache<LccConverterStationData, LccConverterStationView>,
    pub(crate) vsc_converter_stations:
        KindCache<VscConverterStationData, VscConverterStationView>,
    pub(crate) hvdc_lines: KindCache<HvdcLineData, HvdcLineView>,
    pub(crate) components: KindCache<ComponentData, ComponentView>,
    pub(crate) extensions: ExtensionViewRegistry,
}

impl ViewCache {
    pub(crate) fn new(extensions: ExtensionViewRegistry) -> Self {
        Self {
            substations: KindCache::new("substation"),
            voltage_levels: KindCache::new("voltage level"),
            buses: KindCache::new("bus"),
            terminals: KindCache::new("terminal"),
            lines: KindCache::new("line"),
            tie_lines: KindCache::new("tie line"),
            half_lines: KindCache::new("half line"),
            two_windings_transformers: KindCache::new("two-windings transformer"),
            three_windings_transformers: KindCache::new("three-windings transformer"),
            legs: KindCache::new("transformer leg"),
            ratio_tap_changers: KindCache::new("ratio tap changer"),
            phase_tap_changers: KindCache::new("phase tap changer"),
            generators: KindCache::new("generator"),
            loads: KindCache::new("load"),
            shunt_compensators: KindCache::new("shunt compensator"),
            dangling_lines: KindCache::new("dangling line"),
            static_var_compensators: KindCache::new("static VAR compensator"),
            lcc_converter_stations: KindCache::new("LCC converter station"),
            vsc_converter_stations: KindCache::new("VSC converter station"),
            hvdc_lines: KindCache::new("HVDC line"),
            components: KindCache::new("component"),
            extensions,
        }
    }

    /// Wrap an extension read-only if a wrapper factory is registered for
    /// its kind; otherwise pass the raw extension through.
    pub(crate) fn wrap_extension(
        &self,
        extension: Rc<dyn crate::network::Extension>,
    ) -> Rc<dyn crate::network::Extension> {
        self.extensions.wrap(extension)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Node(u32);
    struct View(u32);

    fn node(value: u32) -> Rc<RefCell<Node>> {
        Rc::new(RefCell::new(Node(value)))
    }

    #[test]
    fn hit_returns_the_same_view() {
        let cache: KindCache<Node, View> = KindCache::new("node");
        let n = node(1);
        let first = cache.get_or_insert(&n, || View(n.borrow().0));
        let second = cache.get_or_insert(&n, || panic!("must not rebuild"));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.0, 1);
    }

    #[test]
    fn cache_does_not_keep_views_alive() {
        let cache: KindCache<Node, View> = KindCache::new("node");
        let n = node(1);
        let view = cache.get_or_insert(&n, || View(1));
        let weak = Rc::downgrade(&view);
        drop(view);
        assert!(weak.upgrade().is_none());
        // The next access rebuilds instead of resurrecting the dead slot.
        let rebuilt = cache.get_or_insert(&n, || View(2));
        assert_eq!(rebuilt.0, 2);
    }

    #[test]
    fn address_reuse_does_not_alias_views() {
        let cache: KindCache<Node, View> = KindCache::new("node");
        let n1 = node(1);
        let v1 = cache.get_or_insert(&n1, || View(1));
        drop(n1);
        // Allocate until an address from the freed node may come back; even
        // if it does, the identity check must treat the new node as new.
        let nodes: Vec<_> = (0..32).map(node).collect();
        for n in &nodes {
            let v = cache.get_or_insert(n, || View(n.borrow().0));
            assert!(!Rc::ptr_eq(&v, &v1));
        }
    }

    #[test]
    fn sweep_drops_dead_slots() {
        let cache: KindCache<Node, View> = KindCache::new("node");
        {
            let n = node(0);
            let _v = cache.get_or_insert(&n, || View(0));
        }
        assert_eq!(cache.len(), 1);
        // Every slot built here dies immediately; each time the miss counter
        // crosses the sweep period the accumulated dead slots are dropped,
        // so the map never grows past one period plus the newest entries.
        for i in 0..SWEEP_PERIOD * 2 {
            let n = node(i);
            let _v = cache.get_or_insert(&n, || View(i));
        }
        assert!(cache.len() <= SWEEP_PERIOD as usize);
    }
}
