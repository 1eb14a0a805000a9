// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of ratio and phase tap changers

use std::rc::Rc;

use crate::errors::{NetworkError, NetworkResult};
use crate::network::{
    PhaseRegulationMode, PhaseTapChanger, PhaseTapChangerStep, RatioTapChanger, TapChangerStep,
    Terminal,
};
use crate::view::cache::ViewCache;
use crate::view::terminal::TerminalView;

/// Read-only view of a [`RatioTapChanger`]
pub struct RatioTapChangerView {
    tap_changer: RatioTapChanger,
    owner_id: String,
    cache: Rc<ViewCache>,
}

impl RatioTapChangerView {
    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.tap_changer.step_count()
    }

    /// Lowest tap position
    pub fn low_tap_position(&self) -> i32 {
        self.tap_changer.low_tap_position()
    }

    /// Highest tap position
    pub fn high_tap_position(&self) -> i32 {
        self.tap_changer.high_tap_position()
    }

    /// Current tap position
    pub fn tap_position(&self) -> i32 {
        self.tap_changer.tap_position()
    }

    /// Step at the given tap position
    pub fn step(&self, position: i32) -> Option<TapChangerStep> {
        self.tap_changer.step(position)
    }

    /// Step at the current tap position
    pub fn current_step(&self) -> TapChangerStep {
        self.tap_changer.current_step()
    }

    /// Whether voltage regulation is active
    pub fn is_regulating(&self) -> bool {
        self.tap_changer.is_regulating()
    }

    /// Voltage target in kV
    pub fn target_v(&self) -> f64 {
        self.tap_changer.target_v()
    }

    /// Terminal whose voltage is regulated
    pub fn regulation_terminal(&self) -> Option<Rc<TerminalView>> {
        self.tap_changer
            .regulation_terminal()
            .map(|t| self.cache.terminal_view(&t))
    }

    /// Always fails: this projection is read-only.
    pub fn set_tap_position(&self, _position: i32) -> NetworkResult<()> {
        self.reject("set_tap_position")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulating(&self, _regulating: bool) -> NetworkResult<()> {
        self.reject("set_regulating")
    }

    /// Always fails: this projection is read-only.
    pub fn set_target_v(&self, _target_v: f64) -> NetworkResult<()> {
        self.reject("set_target_v")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulation_terminal(&self, _terminal: &Terminal) -> NetworkResult<()> {
        self.reject("set_regulation_terminal")
    }

    /// Always fails: this projection is read-only.
    pub fn remove(&self) -> NetworkResult<()> {
        self.reject("remove")
    }

    fn reject(&self, operation: &'static str) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable(
            "ratio tap changer",
            operation,
            self.owner_id.clone(),
        ))
    }
}

/// Read-only view of a [`PhaseTapChanger`]
pub struct PhaseTapChangerView {
    tap_changer: PhaseTapChanger,
    owner_id: String,
    cache: Rc<ViewCache>,
}

impl PhaseTapChangerView {
    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.tap_changer.step_count()
    }

    /// Lowest tap position
    pub fn low_tap_position(&self) -> i32 {
        self.tap_changer.low_tap_position()
    }

    /// Highest tap position
    pub fn high_tap_position(&self) -> i32 {
        self.tap_changer.high_tap_position()
    }

    /// Current tap position
    pub fn tap_position(&self) -> i32 {
        self.tap_changer.tap_position()
    }

    /// Step at the given tap position
    pub fn step(&self, position: i32) -> Option<PhaseTapChangerStep> {
        self.tap_changer.step(position)
    }

    /// Step at the current tap position
    pub fn current_step(&self) -> PhaseTapChangerStep {
        self.tap_changer.current_step()
    }

    /// Whether regulation is active
    pub fn is_regulating(&self) -> bool {
        self.tap_changer.is_regulating()
    }

    /// Regulation mode
    pub fn regulation_mode(&self) -> PhaseRegulationMode {
        self.tap_changer.regulation_mode()
    }

    /// Regulation value, interpreted per the regulation mode
    pub fn regulation_value(&self) -> f64 {
        self.tap_changer.regulation_value()
    }

    /// Terminal the regulation applies to
    pub fn regulation_terminal(&self) -> Option<Rc<TerminalView>> {
        self.tap_changer
            .regulation_terminal()
            .map(|t| self.cache.terminal_view(&t))
    }

    /// Always fails: this projection is read-only.
    pub fn set_tap_position(&self, _position: i32) -> NetworkResult<()> {
        self.reject("set_tap_position")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulating(&self, _regulating: bool) -> NetworkResult<()> {
        self.reject("set_regulating")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulation_mode(&self, _mode: PhaseRegulationMode) -> NetworkResult<()> {
        self.reject("set_regulation_mode")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulation_value(&self, _value: f64) -> NetworkResult<()> {
        self.reject("set_regulation_value")
    }

    /// Always fails: this projection is read-only.
    pub fn set_regulation_terminal(&self, _terminal: &Terminal) -> NetworkResult<()> {
        self.reject("set_regulation_terminal")
    }

    /// Always fails: this projection is read-only.
    pub fn remove(&self) -> NetworkResult<()> {
        self.reject("remove")
    }

    fn reject(&self, operation: &'static str) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable(
            "phase tap changer",
            operation,
            self.owner_id.clone(),
        ))
    }
}

impl ViewCache {
    pub(crate) fn ratio_tap_changer_view(
        self: &Rc<Self>,
        tap_changer: &RatioTapChanger,
        owner_id: String,
    ) -> Rc<RatioTapChangerView> {
        self.ratio_tap_changers
            .get_or_insert(tap_changer.data(), || RatioTapChangerView {
                tap_changer: tap_changer.clone(),
                owner_id,
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn phase_tap_changer_view(
        self: &Rc<Self>,
        tap_changer: &PhaseTapChanger,
        owner_id: String,
    ) -> Rc<PhaseTapChangerView> {
        self.phase_tap_changers
            .get_or_insert(tap_changer.data(), || PhaseTapChangerView {
                tap_changer: tap_changer.clone(),
                owner_id,
                cache: Rc::clone(self),
            })
    }
}
