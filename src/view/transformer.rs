// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of transformers

use std::rc::Rc;

use crate::errors::{NetworkError, NetworkResult};
use crate::network::{Leg, ThreeWindingsTransformer, TwoWindingsTransformer};
use crate::view::cache::ViewCache;
use crate::view::limits::CurrentLimitsView;
use crate::view::substation::SubstationView;
use crate::view::tap_changer::{PhaseTapChangerView, RatioTapChangerView};
use crate::view::terminal::TerminalView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of a [`TwoWindingsTransformer`]
pub struct TwoWindingsTransformerView {
    transformer: TwoWindingsTransformer,
    cache: Rc<ViewCache>,
}

view_identifiable!(
    TwoWindingsTransformerView,
    transformer,
    "two-windings transformer"
);

impl TwoWindingsTransformerView {
    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.transformer.r()
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.transformer.x()
    }

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.transformer.g()
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.transformer.b()
    }

    /// Rated voltage on side one in kV
    pub fn rated_u1(&self) -> f64 {
        self.transformer.rated_u1()
    }

    /// Rated voltage on side two in kV
    pub fn rated_u2(&self) -> f64 {
        self.transformer.rated_u2()
    }

    /// Terminal on side one
    pub fn terminal1(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.transformer.terminal1())
    }

    /// Terminal on side two
    pub fn terminal2(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.transformer.terminal2())
    }

    /// Current limits on side one, if defined
    pub fn current_limits1(&self) -> Option<CurrentLimitsView> {
        self.transformer
            .current_limits1()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    /// Current limits on side two, if defined
    pub fn current_limits2(&self) -> Option<CurrentLimitsView> {
        self.transformer
            .current_limits2()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    /// Ratio tap changer, if fitted
    pub fn ratio_tap_changer(&self) -> Option<Rc<RatioTapChangerView>> {
        self.transformer
            .ratio_tap_changer()
            .map(|rtc| self.cache.ratio_tap_changer_view(&rtc, self.id()))
    }

    /// Phase tap changer, if fitted
    pub fn phase_tap_changer(&self) -> Option<Rc<PhaseTapChangerView>> {
        self.transformer
            .phase_tap_changer()
            .map(|ptc| self.cache.phase_tap_changer_view(&ptc, self.id()))
    }

    /// The substation containing this transformer
    pub fn substation(&self) -> Option<Rc<SubstationView>> {
        self.transformer
            .substation()
            .map(|s| self.cache.substation_view(&s))
    }

    reject_mutators! { "two-windings transformer" =>
        fn set_r(_r: f64);
        fn set_x(_x: f64);
        fn set_g(_g: f64);
        fn set_b(_b: f64);
        fn set_rated_u1(_rated_u1: f64);
        fn set_rated_u2(_rated_u2: f64);
        fn new_current_limits1();
        fn new_current_limits2();
        fn new_ratio_tap_changer();
        fn new_phase_tap_changer();
        fn remove();
    }
}

/// Read-only view of one winding of a three-windings transformer
pub struct LegView {
    leg: Leg,
    owner_id: String,
    cache: Rc<ViewCache>,
}

impl LegView {
    /// Which winding this leg is (1, 2 or 3)
    pub fn side(&self) -> u8 {
        self.leg.side()
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.leg.r()
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.leg.x()
    }

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.leg.g()
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.leg.b()
    }

    /// Rated voltage of this winding in kV
    pub fn rated_u(&self) -> f64 {
        self.leg.rated_u()
    }

    /// Terminal of this winding
    pub fn terminal(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.leg.terminal())
    }

    /// Current limits of this winding, if defined
    pub fn current_limits(&self) -> Option<CurrentLimitsView> {
        self.leg
            .current_limits()
            .map(|limits| CurrentLimitsView::new(limits, self.owner_id.clone()))
    }

    /// Ratio tap changer of this winding, if fitted
    pub fn ratio_tap_changer(&self) -> Option<Rc<RatioTapChangerView>> {
        self.leg
            .ratio_tap_changer()
            .map(|rtc| self.cache.ratio_tap_changer_view(&rtc, self.owner_id.clone()))
    }

    /// Always fails: this projection is read-only.
    pub fn set_r(&self, _r: f64) -> NetworkResult<()> {
        self.reject("set_r")
    }

    /// Always fails: this projection is read-only.
    pub fn set_x(&self, _x: f64) -> NetworkResult<()> {
        self.reject("set_x")
    }

    /// Always fails: this projection is read-only.
    pub fn set_rated_u(&self, _rated_u: f64) -> NetworkResult<()> {
        self.reject("set_rated_u")
    }

    /// Always fails: this projection is read-only.
    pub fn new_current_limits(&self) -> NetworkResult<()> {
        self.reject("new_current_limits")
    }

    /// Always fails: this projection is read-only.
    pub fn new_ratio_tap_changer(&self) -> NetworkResult<()> {
        self.reject("new_ratio_tap_changer")
    }

    fn reject(&self, operation: &'static str) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable(
            "transformer leg",
            operation,
            self.owner_id.clone(),
        ))
    }
}

/// Read-only view of a [`ThreeWindingsTransformer`]
pub struct ThreeWindingsTransformerView {
    transformer: ThreeWindingsTransformer,
    cache: Rc<ViewCache>,
}

view_identifiable!(
    ThreeWindingsTransformerView,
    transformer,
    "three-windings transformer"
);

impl ThreeWindingsTransformerView {
    /// Winding one
    pub fn leg1(&self) -> Rc<LegView> {
        self.leg_view(&self.transformer.leg1())
    }

    /// Winding two
    pub fn leg2(&self) -> Rc<LegView> {
        self.leg_view(&self.transformer.leg2())
    }

    /// Winding three
    pub fn leg3(&self) -> Rc<LegView> {
        self.leg_view(&self.transformer.leg3())
    }

    /// All three windings in side order
    pub fn legs(&self) -> [Rc<LegView>; 3] {
        let legs = self.transformer.legs();
        [
            self.leg_view(&legs[0]),
            self.leg_view(&legs[1]),
            self.leg_view(&legs[2]),
        ]
    }

    /// The substation containing this transformer
    pub fn substation(&self) -> Option<Rc<SubstationView>> {
        self.transformer
            .substation()
            .map(|s| self.cache.substation_view(&s))
    }

    fn leg_view(&self, leg: &Leg) -> Rc<LegView> {
        self.cache.leg_view(leg, self.id())
    }

    reject_mutators! { "three-windings transformer" =>
        fn remove();
    }
}

impl ViewCache {
    pub(crate) fn two_windings_transformer_view(
        self: &Rc<Self>,
        transformer: &TwoWindingsTransformer,
    ) -> Rc<TwoWindingsTransformerView> {
        self.two_windings_transformers
            .get_or_insert(transformer.data(), || TwoWindingsTransformerView {
                transformer: transformer.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn three_windings_transformer_view(
        self: &Rc<Self>,
        transformer: &ThreeWindingsTransformer,
    ) -> Rc<ThreeWindingsTransformerView> {
        self.three_windings_transformers
            .get_or_insert(transformer.data(), || ThreeWindingsTransformerView {
                transformer: transformer.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn leg_view(self: &Rc<Self>, leg: &Leg, owner_id: String) -> Rc<LegView> {
        self.legs.get_or_insert(leg.data(), || LegView {
            leg: leg.clone(),
            owner_id,
            cache: Rc::clone(self),
        })
    }
}
