// Copyright 2025 Cowboy AI, LLC.

//! Ratio and phase tap changers of transformers

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::terminal::Terminal;

/// One step of a ratio tap changer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapChangerStep {
    /// Voltage ratio in per unit
    pub rho: f64,
    /// Resistance deviation in percent
    pub r: f64,
    /// Reactance deviation in percent
    pub x: f64,
    /// Conductance deviation in percent
    pub g: f64,
    /// Susceptance deviation in percent
    pub b: f64,
}

impl Default for TapChangerStep {
    fn default() -> Self {
        Self {
            rho: 1.0,
            r: 0.0,
            x: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

/// One step of a phase tap changer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTapChangerStep {
    /// Phase shift in degrees
    pub alpha: f64,
    /// Voltage ratio in per unit
    pub rho: f64,
    /// Resistance deviation in percent
    pub r: f64,
    /// Reactance deviation in percent
    pub x: f64,
    /// Conductance deviation in percent
    pub g: f64,
    /// Susceptance deviation in percent
    pub b: f64,
}

impl Default for PhaseTapChangerStep {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            rho: 1.0,
            r: 0.0,
            x: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

/// Regulation mode of a phase tap changer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseRegulationMode {
    /// Limit the current through the transformer
    CurrentLimiter,
    /// Control the active power flow
    ActivePowerControl,
    /// No regulation, fixed tap
    FixedTap,
}

pub(crate) struct RatioTapChangerData {
    pub owner_id: String,
    pub steps: Vec<TapChangerStep>,
    pub low_tap_position: i32,
    pub tap_position: i32,
    pub regulating: bool,
    pub target_v: f64,
    pub regulation_terminal: Option<Terminal>,
    /// Clears the owner's slot; `None` once removed.
    pub detach: Option<Box<dyn Fn()>>,
}

/// A ratio tap changer of a transformer winding
#[derive(Clone)]
pub struct RatioTapChanger {
    data: Rc<RefCell<RatioTapChangerData>>,
}

impl RatioTapChanger {
    pub(crate) fn from_data(data: Rc<RefCell<RatioTapChangerData>>) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<RatioTapChangerData>> {
        &self.data
    }

    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.data.borrow().steps.len()
    }

    /// Lowest tap position
    pub fn low_tap_position(&self) -> i32 {
        self.data.borrow().low_tap_position
    }

    /// Highest tap position
    pub fn high_tap_position(&self) -> i32 {
        let data = self.data.borrow();
        data.low_tap_position + data.steps.len() as i32 - 1
    }

    /// Current tap position
    pub fn tap_position(&self) -> i32 {
        self.data.borrow().tap_position
    }

    /// Move the tap to the given position
    pub fn set_tap_position(&self, position: i32) -> NetworkResult<()> {
        let mut data = self.data.borrow_mut();
        let high = data.low_tap_position + data.steps.len() as i32 - 1;
        if position < data.low_tap_position || position > high {
            return Err(NetworkError::validation(
                &data.owner_id,
                format!(
                    "tap position {position} out of range [{}, {high}]",
                    data.low_tap_position
                ),
            ));
        }
        data.tap_position = position;
        Ok(())
    }

    /// Step at the given tap position
    pub fn step(&self, position: i32) -> Option<TapChangerStep> {
        let data = self.data.borrow();
        let index = position.checked_sub(data.low_tap_position)?;
        data.steps.get(usize::try_from(index).ok()?).cloned()
    }

    /// Step at the current tap position
    pub fn current_step(&self) -> TapChangerStep {
        let data = self.data.borrow();
        let index = (data.tap_position - data.low_tap_position) as usize;
        data.steps[index].clone()
    }

    /// Whether voltage regulation is active
    pub fn is_regulating(&self) -> bool {
        self.data.borrow().regulating
    }

    /// Enable or disable voltage regulation
    pub fn set_regulating(&self, regulating: bool) {
        self.data.borrow_mut().regulating = regulating;
    }

    /// Voltage target in kV
    pub fn target_v(&self) -> f64 {
        self.data.borrow().target_v
    }

    /// Set the voltage target in kV
    pub fn set_target_v(&self, target_v: f64) {
        self.data.borrow_mut().target_v = target_v;
    }

    /// Terminal whose voltage is regulated
    pub fn regulation_terminal(&self) -> Option<Terminal> {
        self.data.borrow().regulation_terminal.clone()
    }

    /// Set the terminal whose voltage is regulated
    pub fn set_regulation_terminal(&self, terminal: &Terminal) {
        self.data.borrow_mut().regulation_terminal = Some(terminal.clone());
    }

    /// Remove this tap changer from its transformer
    pub fn remove(&self) {
        let detach = self.data.borrow_mut().detach.take();
        if let Some(detach) = detach {
            detach();
        }
    }
}

/// Builder for a [`RatioTapChanger`]
pub struct RatioTapChangerAdder {
    owner_id: String,
    steps: Vec<TapChangerStep>,
    low_tap_position: i32,
    tap_position: Option<i32>,
    regulating: bool,
    target_v: f64,
    regulation_terminal: Option<Terminal>,
    install: Box<dyn FnOnce(RatioTapChanger)>,
    detach: Box<dyn Fn()>,
}

impl RatioTapChangerAdder {
    pub(crate) fn new(
        owner_id: String,
        install: Box<dyn FnOnce(RatioTapChanger)>,
        detach: Box<dyn Fn()>,
    ) -> Self {
        Self {
            owner_id,
            steps: Vec::new(),
            low_tap_position: 0,
            tap_position: None,
            regulating: false,
            target_v: f64::NAN,
            regulation_terminal: None,
            install,
            detach,
        }
    }

    /// Append a step to the step table
    pub fn step(mut self, step: TapChangerStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the lowest tap position (defaults to 0)
    pub fn low_tap_position(mut self, position: i32) -> Self {
        self.low_tap_position = position;
        self
    }

    /// Set the initial tap position (defaults to the lowest)
    pub fn tap_position(mut self, position: i32) -> Self {
        self.tap_position = Some(position);
        self
    }

    /// Enable voltage regulation
    pub fn regulating(mut self, regulating: bool) -> Self {
        self.regulating = regulating;
        self
    }

    /// Set the voltage target in kV
    pub fn target_v(mut self, target_v: f64) -> Self {
        self.target_v = target_v;
        self
    }

    /// Set the terminal whose voltage is regulated
    pub fn regulation_terminal(mut self, terminal: &Terminal) -> Self {
        self.regulation_terminal = Some(terminal.clone());
        self
    }

    /// Build the tap changer and install it on the transformer winding
    pub fn add(self) -> NetworkResult<RatioTapChanger> {
        if self.steps.is_empty() {
            return Err(NetworkError::validation(
                &self.owner_id,
                "a tap changer needs at least one step",
            ));
        }
        let tap_position = self.tap_position.unwrap_or(self.low_tap_position);
        let high = self.low_tap_position + self.steps.len() as i32 - 1;
        if tap_position < self.low_tap_position || tap_position > high {
            return Err(NetworkError::validation(
                &self.owner_id,
                format!(
                    "tap position {tap_position} out of range [{}, {high}]",
                    self.low_tap_position
                ),
            ));
        }
        let tap_changer = RatioTapChanger::from_data(Rc::new(RefCell::new(RatioTapChangerData {
            owner_id: self.owner_id,
            steps: self.steps,
            low_tap_position: self.low_tap_position,
            tap_position,
            regulating: self.regulating,
            target_v: self.target_v,
            regulation_terminal: self.regulation_terminal,
            detach: Some(self.detach),
        })));
        (self.install)(tap_changer.clone());
        Ok(tap_changer)
    }
}

pub(crate) struct PhaseTapChangerData {
    pub owner_id: String,
    pub steps: Vec<PhaseTapChangerStep>,
    pub low_tap_position: i32,
    pub tap_position: i32,
    pub regulating: bool,
    pub regulation_mode: PhaseRegulationMode,
    pub regulation_value: f64,
    pub regulation_terminal: Option<Terminal>,
    pub detach: Option<Box<dyn Fn()>>,
}

/// A phase tap changer of a transformer winding
#[derive(Clone)]
pub struct PhaseTapChanger {
    data: Rc<RefCell<PhaseTapChangerData>>,
}

impl PhaseTapChanger {
    pub(crate) fn from_data(data: Rc<RefCell<PhaseTapChangerData>>) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<PhaseTapChangerData>> {
        &self.data
    }

    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.data.borrow().steps.len()
    }

    /// Lowest tap position
    pub fn low_tap_position(&self) -> i32 {
        self.data.borrow().low_tap_position
    }

    /// Highest tap position
    pub fn high_tap_position(&self) -> i32 {
        let data = self.data.borrow();
        data.low_tap_position + data.steps.len() as i32 - 1
    }

    /// Current tap position
    pub fn tap_position(&self) -> i32 {
        self.data.borrow().tap_position
    }

    /// Move the tap to the given position
    pub fn set_tap_position(&self, position: i32) -> NetworkResult<()> {
        let mut data = self.data.borrow_mut();
        let high = data.low_tap_position + data.steps.len() as i32 - 1;
        if position < data.low_tap_position || position > high {
            return Err(NetworkError::validation(
                &data.owner_id,
                format!(
                    "tap position {position} out of range [{}, {high}]",
                    data.low_tap_position
                ),
            ));
        }
        data.tap_position = position;
        Ok(())
    }

    /// Step at the given tap position
    pub fn step(&self, position: i32) -> Option<PhaseTapChangerStep> {
        let data = self.data.borrow();
        let index = position.checked_sub(data.low_tap_position)?;
        data.steps.get(usize::try_from(index).ok()?).cloned()
    }

    /// Step at the current tap position
    pub fn current_step(&self) -> PhaseTapChangerStep {
        let data = self.data.borrow();
        let index = (data.tap_position - data.low_tap_position) as usize;
        data.steps[index].clone()
    }

    /// Whether regulation is active
    pub fn is_regulating(&self) -> bool {
        self.data.borrow().regulating
    }

    /// Enable or disable regulation
    pub fn set_regulating(&self, regulating: bool) {
        self.data.borrow_mut().regulating = regulating;
    }

    /// Regulation mode
    pub fn regulation_mode(&self) -> PhaseRegulationMode {
        self.data.borrow().regulation_mode
    }

    /// Set the regulation mode
    pub fn set_regulation_mode(&self, mode: PhaseRegulationMode) {
        self.data.borrow_mut().regulation_mode = mode;
    }

    /// Regulation value (A or MW depending on the mode)
    pub fn regulation_value(&self) -> f64 {
        self.data.borrow().regulation_value
    }

    /// Set the regulation value
    pub fn set_regulation_value(&self, value: f64) {
        self.data.borrow_mut().regulation_value = value;
    }

    /// Terminal the regulation applies to
    pub fn regulation_terminal(&self) -> Option<Terminal> {
        self.data.borrow().regulation_terminal.clone()
    }

    /// Set the terminal the regulation applies to
    pub fn set_regulation_terminal(&self, terminal: &Terminal) {
        self.data.borrow_mut().regulation_terminal = Some(terminal.clone());
    }

    /// Remove this tap changer from its transformer
    pub fn remove(&self) {
        let detach = self.data.borrow_mut().detach.take();
        if let Some(detach) = detach {
            detach();
        }
    }
}

/// Builder for a [`PhaseTapChanger`]
pub struct PhaseTapChangerAdder {
    owner_id: String,
    steps: Vec<PhaseTapChangerStep>,
    low_tap_position: i32,
    tap_position: Option<i32>,
    regulating: bool,
    regulation_mode: PhaseRegulationMode,
    regulation_value: f64,
    regulation_terminal: Option<Terminal>,
    install: Box<dyn FnOnce(PhaseTapChanger)>,
    detach: Box<dyn Fn()>,
}

impl PhaseTapChangerAdder {
    pub(crate) fn new(
        owner_id: String,
        install: Box<dyn FnOnce(PhaseTapChanger)>,
        detach: Box<dyn Fn()>,
    ) -> Self {
        Self {
            owner_id,
            steps: Vec::new(),
            low_tap_position: 0,
            tap_position: None,
            regulating: false,
            regulation_mode: PhaseRegulationMode::FixedTap,
            regulation_value: f64::NAN,
            regulation_terminal: None,
            install,
            detach,
        }
    }

    /// Append a step to the step table
    pub fn step(mut self, step: PhaseTapChangerStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the lowest tap position (defaults to 0)
    pub fn low_tap_position(mut self, position: i32) -> Self {
        self.low_tap_position = position;
        self
    }

    /// Set the initial tap position (defaults to the lowest)
    pub fn tap_position(mut self, position: i32) -> Self {
        self.tap_position = Some(position);
        self
    }

    /// Enable regulation
    pub fn regulating(mut self, regulating: bool) -> Self {
        self.regulating = regulating;
        self
    }

    /// Set the regulation mode (defaults to fixed tap)
    pub fn regulation_mode(mut self, mode: PhaseRegulationMode) -> Self {
        self.regulation_mode = mode;
        self
    }

    /// Set the regulation value (A or MW depending on the mode)
    pub fn regulation_value(mut self, value: f64) -> Self {
        self.regulation_value = value;
        self
    }

    /// Set the terminal the regulation applies to
    pub fn regulation_terminal(mut self, terminal: &Terminal) -> Self {
        self.regulation_terminal = Some(terminal.clone());
        self
    }

    /// Build the tap changer and install it on the transformer winding
    pub fn add(self) -> NetworkResult<PhaseTapChanger> {
        if self.steps.is_empty() {
            return Err(NetworkError::validation(
                &self.owner_id,
                "a tap changer needs at least one step",
            ));
        }
        let tap_position = self.tap_position.unwrap_or(self.low_tap_position);
        let high = self.low_tap_position + self.steps.len() as i32 - 1;
        if tap_position < self.low_tap_position || tap_position > high {
            return Err(NetworkError::validation(
                &self.owner_id,
                format!(
                    "tap position {tap_position} out of range [{}, {high}]",
                    self.low_tap_position
                ),
            ));
        }
        let tap_changer = PhaseTapChanger::from_data(Rc::new(RefCell::new(PhaseTapChangerData {
            owner_id: self.owner_id,
            steps: self.steps,
            low_tap_position: self.low_tap_position,
            tap_position,
            regulating: self.regulating,
            regulation_mode: self.regulation_mode,
            regulation_value: self.regulation_value,
            regulation_terminal: self.regulation_terminal,
            detach: Some(self.detach),
        })));
        (self.install)(tap_changer.clone());
        Ok(tap_changer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio() -> RatioTapChanger {
        RatioTapChangerAdder::new("T1".to_string(), Box::new(|_| {}), Box::new(|| {}))
            .low_tap_position(-1)
            .step(TapChangerStep {
                rho: 0.95,
                ..Default::default()
            })
            .step(TapChangerStep::default())
            .step(TapChangerStep {
                rho: 1.05,
                ..Default::default()
            })
            .tap_position(0)
            .add()
            .unwrap()
    }

    #[test]
    fn tap_positions_are_bounded() {
        let rtc = ratio();
        assert_eq!(rtc.low_tap_position(), -1);
        assert_eq!(rtc.high_tap_position(), 1);
        assert_eq!(rtc.current_step(), TapChangerStep::default());

        assert!(rtc.set_tap_position(2).is_err());
        assert_eq!(rtc.tap_position(), 0);
        rtc.set_tap_position(1).unwrap();
        assert_eq!(rtc.current_step().rho, 1.05);
    }

    #[test]
    fn empty_step_table_rejected() {
        let result = RatioTapChangerAdder::new("T1".to_string(), Box::new(|_| {}), Box::new(|| {}))
            .add();
        assert!(result.is_err());
    }
}
