// Copyright 2025 Cowboy AI, LLC.

//! HVDC converter stations and the DC lines between them

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::connectable::{Connectable, HvdcConverterStation};
use crate::network::injection::{injection_adder_setters, InjectionAdder};
use crate::network::terminal::Terminal;
use crate::network::voltage_level::VoltageLevel;
use crate::network::{impl_identifiable, impl_injection, IdentifiableBase, Network, NetworkData};

/// Direction of power flow on an HVDC line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HvdcConvertersMode {
    /// Station one rectifies, station two inverts
    Side1RectifierSide2Inverter,
    /// Station one inverts, station two rectifies
    Side1InverterSide2Rectifier,
}

pub(crate) struct LccConverterStationData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub loss_factor: f64,
    pub power_factor: f64,
    pub hvdc_line: Weak<RefCell<HvdcLineData>>,
}

/// A line-commutated HVDC converter station
#[derive(Clone)]
pub struct LccConverterStation {
    data: Rc<RefCell<LccConverterStationData>>,
}

impl_identifiable!(
    LccConverterStation,
    LccConverterStationData,
    "LccConverterStation"
);
impl_injection!(
    LccConverterStation,
    "LCC converter station",
    unregister_lcc_converter_station
);

impl LccConverterStation {
    /// Loss factor in percent
    pub fn loss_factor(&self) -> f64 {
        self.data.borrow().loss_factor
    }

    /// Set the loss factor in percent
    pub fn set_loss_factor(&self, loss_factor: f64) {
        self.data.borrow_mut().loss_factor = loss_factor;
    }

    /// Power factor of the converter
    pub fn power_factor(&self) -> f64 {
        self.data.borrow().power_factor
    }

    /// Set the power factor of the converter
    pub fn set_power_factor(&self, power_factor: f64) {
        self.data.borrow_mut().power_factor = power_factor;
    }

    /// The HVDC line this station is attached to, if any
    pub fn hvdc_line(&self) -> Option<HvdcLine> {
        self.data.borrow().hvdc_line.upgrade().map(HvdcLine::from_data)
    }

    pub(crate) fn set_hvdc_line(&self, line: Weak<RefCell<HvdcLineData>>) {
        self.data.borrow_mut().hvdc_line = line;
    }
}

pub(crate) struct VscConverterStationData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub loss_factor: f64,
    pub voltage_regulator_on: bool,
    pub voltage_setpoint: f64,
    pub reactive_power_setpoint: f64,
    pub hvdc_line: Weak<RefCell<HvdcLineData>>,
}

/// A voltage-source HVDC converter station
#[derive(Clone)]
pub struct VscConverterStation {
    data: Rc<RefCell<VscConverterStationData>>,
}

impl_identifiable!(
    VscConverterStation,
    VscConverterStationData,
    "VscConverterStation"
);
impl_injection!(
    VscConverterStation,
    "VSC converter station",
    unregister_vsc_converter_station
);

impl VscConverterStation {
    /// Loss factor in percent
    pub fn loss_factor(&self) -> f64 {
        self.data.borrow().loss_factor
    }

    /// Set the loss factor in percent
    pub fn set_loss_factor(&self, loss_factor: f64) {
        self.data.borrow_mut().loss_factor = loss_factor;
    }

    /// Whether the voltage regulator is on
    pub fn is_voltage_regulator_on(&self) -> bool {
        self.data.borrow().voltage_regulator_on
    }

    /// Switch the voltage regulator on or off
    pub fn set_voltage_regulator_on(&self, on: bool) {
        self.data.borrow_mut().voltage_regulator_on = on;
    }

    /// Voltage setpoint in kV
    pub fn voltage_setpoint(&self) -> f64 {
        self.data.borrow().voltage_setpoint
    }

    /// Set the voltage setpoint in kV
    pub fn set_voltage_setpoint(&self, setpoint: f64) {
        self.data.borrow_mut().voltage_setpoint = setpoint;
    }

    /// Reactive power setpoint in MVar
    pub fn reactive_power_setpoint(&self) -> f64 {
        self.data.borrow().reactive_power_setpoint
    }

    /// Set the reactive power setpoint in MVar
    pub fn set_reactive_power_setpoint(&self, setpoint: f64) {
        self.data.borrow_mut().reactive_power_setpoint = setpoint;
    }

    /// The HVDC line this station is attached to, if any
    pub fn hvdc_line(&self) -> Option<HvdcLine> {
        self.data.borrow().hvdc_line.upgrade().map(HvdcLine::from_data)
    }

    pub(crate) fn set_hvdc_line(&self, line: Weak<RefCell<HvdcLineData>>) {
        self.data.borrow_mut().hvdc_line = line;
    }
}

/// Builder for an [`LccConverterStation`], obtained from
/// [`VoltageLevel::new_lcc_converter_station`]
pub struct LccConverterStationAdder {
    base: InjectionAdder,
    loss_factor: f64,
    power_factor: f64,
}

impl LccConverterStationAdder {
    injection_adder_setters!();

    /// Set the loss factor in percent (required)
    pub fn loss_factor(mut self, loss_factor: f64) -> Self {
        self.loss_factor = loss_factor;
        self
    }

    /// Set the power factor of the converter (required)
    pub fn power_factor(mut self, power_factor: f64) -> Self {
        self.power_factor = power_factor;
        self
    }

    /// Build the station and attach it to the voltage level
    pub fn add(self) -> NetworkResult<LccConverterStation> {
        if !self.loss_factor.is_finite() || self.loss_factor < 0.0 {
            return Err(NetworkError::validation(
                &self.base.id,
                "loss factor must be a non-negative finite value",
            ));
        }
        if !(self.power_factor >= -1.0 && self.power_factor <= 1.0) {
            return Err(NetworkError::validation(
                &self.base.id,
                "power factor must be between -1 and 1",
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let station = LccConverterStation::from_data(Rc::new(RefCell::new(
            LccConverterStationData {
                base,
                network: Rc::downgrade(network.data()),
                terminal: terminal.clone(),
                loss_factor: self.loss_factor,
                power_factor: self.power_factor,
                hvdc_line: Weak::new(),
            },
        )));
        network.register_lcc_converter_station(&station);
        self.base.register(
            &network,
            &terminal,
            Connectable::LccConverterStation(station.clone()),
        );
        Ok(station)
    }
}

/// Builder for a [`VscConverterStation`], obtained from
/// [`VoltageLevel::new_vsc_converter_station`]
pub struct VscConverterStationAdder {
    base: InjectionAdder,
    loss_factor: f64,
    voltage_regulator_on: bool,
    voltage_setpoint: f64,
    reactive_power_setpoint: f64,
}

impl VscConverterStationAdder {
    injection_adder_setters!();

    /// Set the loss factor in percent (required)
    pub fn loss_factor(mut self, loss_factor: f64) -> Self {
        self.loss_factor = loss_factor;
        self
    }

    /// Switch the voltage regulator on
    pub fn voltage_regulator_on(mut self, on: bool) -> Self {
        self.voltage_regulator_on = on;
        self
    }

    /// Set the voltage setpoint in kV
    pub fn voltage_setpoint(mut self, setpoint: f64) -> Self {
        self.voltage_setpoint = setpoint;
        self
    }

    /// Set the reactive power setpoint in MVar
    pub fn reactive_power_setpoint(mut self, setpoint: f64) -> Self {
        self.reactive_power_setpoint = setpoint;
        self
    }

    /// Build the station and attach it to the voltage level
    pub fn add(self) -> NetworkResult<VscConverterStation> {
        if !self.loss_factor.is_finite() || self.loss_factor < 0.0 {
            return Err(NetworkError::validation(
                &self.base.id,
                "loss factor must be a non-negative finite value",
            ));
        }
        if self.voltage_regulator_on && !self.voltage_setpoint.is_finite() {
            return Err(NetworkError::validation(
                &self.base.id,
                "a finite voltage setpoint is required when the regulator is on",
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let station = VscConverterStation::from_data(Rc::new(RefCell::new(
            VscConverterStationData {
                base,
                network: Rc::downgrade(network.data()),
                terminal: terminal.clone(),
                loss_factor: self.loss_factor,
                voltage_regulator_on: self.voltage_regulator_on,
                voltage_setpoint: self.voltage_setpoint,
                reactive_power_setpoint: self.reactive_power_setpoint,
                hvdc_line: Weak::new(),
            },
        )));
        network.register_vsc_converter_station(&station);
        self.base.register(
            &network,
            &terminal,
            Connectable::VscConverterStation(station.clone()),
        );
        Ok(station)
    }
}

impl VoltageLevel {
    /// Start building a new LCC converter station in this voltage level
    pub fn new_lcc_converter_station(&self, id: &str) -> LccConverterStationAdder {
        LccConverterStationAdder {
            base: InjectionAdder::new(self, id),
            loss_factor: f64::NAN,
            power_factor: f64::NAN,
        }
    }

    /// Start building a new VSC converter station in this voltage level
    pub fn new_vsc_converter_station(&self, id: &str) -> VscConverterStationAdder {
        VscConverterStationAdder {
            base: InjectionAdder::new(self, id),
            loss_factor: f64::NAN,
            voltage_regulator_on: false,
            voltage_setpoint: f64::NAN,
            reactive_power_setpoint: f64::NAN,
        }
    }
}

pub(crate) struct HvdcLineData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub r: f64,
    pub nominal_v: f64,
    pub active_power_setpoint: f64,
    pub max_p: f64,
    pub converters_mode: HvdcConvertersMode,
    pub converter_station1: HvdcConverterStation,
    pub converter_station2: HvdcConverterStation,
}

/// A DC line between two HVDC converter stations
#[derive(Clone)]
pub struct HvdcLine {
    data: Rc<RefCell<HvdcLineData>>,
}

impl_identifiable!(HvdcLine, HvdcLineData, "HvdcLine");

impl HvdcLine {
    /// DC resistance in ohm
    pub fn r(&self) -> f64 {
        self.data.borrow().r
    }

    /// Set the DC resistance in ohm
    pub fn set_r(&self, r: f64) {
        self.data.borrow_mut().r = r;
    }

    /// Nominal DC voltage in kV
    pub fn nominal_v(&self) -> f64 {
        self.data.borrow().nominal_v
    }

    /// Set the nominal DC voltage in kV
    pub fn set_nominal_v(&self, nominal_v: f64) -> NetworkResult<()> {
        if !(nominal_v > 0.0) {
            return Err(NetworkError::validation(
                self.id(),
                format!("nominal voltage must be > 0, got {nominal_v}"),
            ));
        }
        self.data.borrow_mut().nominal_v = nominal_v;
        Ok(())
    }

    /// Active power setpoint in MW
    pub fn active_power_setpoint(&self) -> f64 {
        self.data.borrow().active_power_setpoint
    }

    /// Set the active power setpoint in MW
    pub fn set_active_power_setpoint(&self, setpoint: f64) {
        self.data.borrow_mut().active_power_setpoint = setpoint;
    }

    /// Maximum transferable active power in MW
    pub fn max_p(&self) -> f64 {
        self.data.borrow().max_p
    }

    /// Set the maximum transferable active power in MW
    pub fn set_max_p(&self, max_p: f64) {
        self.data.borrow_mut().max_p = max_p;
    }

    /// Direction of power flow
    pub fn converters_mode(&self) -> HvdcConvertersMode {
        self.data.borrow().converters_mode
    }

    /// Set the direction of power flow
    pub fn set_converters_mode(&self, mode: HvdcConvertersMode) {
        self.data.borrow_mut().converters_mode = mode;
    }

    /// Converter station on side one
    pub fn converter_station1(&self) -> HvdcConverterStation {
        self.data.borrow().converter_station1.clone()
    }

    /// Converter station on side two
    pub fn converter_station2(&self) -> HvdcConverterStation {
        self.data.borrow().converter_station2.clone()
    }

    /// The network this line belongs to
    pub fn network(&self) -> Option<Network> {
        self.data.borrow().network.upgrade().map(Network::from_data)
    }

    /// Remove this line from the network, detaching both stations
    pub fn remove(&self) {
        let (station1, station2) = {
            let data = self.data.borrow();
            (data.converter_station1.clone(), data.converter_station2.clone())
        };
        for station in [station1, station2] {
            match station {
                HvdcConverterStation::Lcc(s) => s.set_hvdc_line(Weak::new()),
                HvdcConverterStation::Vsc(s) => s.set_hvdc_line(Weak::new()),
            }
        }
        if let Some(network) = self.network() {
            network.unregister_hvdc_line(&self.id());
            network.invalidate_components();
        }
    }
}

/// Builder for an [`HvdcLine`], obtained from [`Network::new_hvdc_line`]
pub struct HvdcLineAdder {
    pub(crate) network: Network,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) r: f64,
    pub(crate) nominal_v: f64,
    pub(crate) active_power_setpoint: f64,
    pub(crate) max_p: f64,
    pub(crate) converters_mode: HvdcConvertersMode,
    pub(crate) converter_station1: Option<String>,
    pub(crate) converter_station2: Option<String>,
}

impl HvdcLineAdder {
    /// Set the human-readable name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the DC resistance in ohm
    pub fn r(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    /// Set the nominal DC voltage in kV (required)
    pub fn nominal_v(mut self, nominal_v: f64) -> Self {
        self.nominal_v = nominal_v;
        self
    }

    /// Set the active power setpoint in MW
    pub fn active_power_setpoint(mut self, setpoint: f64) -> Self {
        self.active_power_setpoint = setpoint;
        self
    }

    /// Set the maximum transferable active power in MW
    pub fn max_p(mut self, max_p: f64) -> Self {
        self.max_p = max_p;
        self
    }

    /// Set the direction of power flow
    pub fn converters_mode(mut self, mode: HvdcConvertersMode) -> Self {
        self.converters_mode = mode;
        self
    }

    /// Set the converter station on side one by id (required)
    pub fn converter_station1(mut self, id: &str) -> Self {
        self.converter_station1 = Some(id.to_string());
        self
    }

    /// Set the converter station on side two by id (required)
    pub fn converter_station2(mut self, id: &str) -> Self {
        self.converter_station2 = Some(id.to_string());
        self
    }

    fn resolve_station(&self, id: Option<&str>) -> NetworkResult<HvdcConverterStation> {
        let id = id.ok_or_else(|| {
            NetworkError::validation(&self.id, "both converter stations are required")
        })?;
        self.network
            .hvdc_converter_station(id)
            .ok_or(NetworkError::NotFound {
                kind: "HVDC converter station",
                id: id.to_string(),
            })
    }

    /// Build the line and attach it to the network
    pub fn add(self) -> NetworkResult<HvdcLine> {
        self.network.check_new_id(&self.id)?;
        if !(self.nominal_v > 0.0) {
            return Err(NetworkError::validation(
                &self.id,
                format!("nominal voltage must be > 0, got {}", self.nominal_v),
            ));
        }
        let station1 = self.resolve_station(self.converter_station1.as_deref())?;
        let station2 = self.resolve_station(self.converter_station2.as_deref())?;
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name;
        let line = HvdcLine::from_data(Rc::new(RefCell::new(HvdcLineData {
            base,
            network: Rc::downgrade(self.network.data()),
            r: self.r,
            nominal_v: self.nominal_v,
            active_power_setpoint: self.active_power_setpoint,
            max_p: self.max_p,
            converters_mode: self.converters_mode,
            converter_station1: station1.clone(),
            converter_station2: station2.clone(),
        })));
        for station in [&station1, &station2] {
            match station {
                HvdcConverterStation::Lcc(s) => s.set_hvdc_line(Rc::downgrade(line.data())),
                HvdcConverterStation::Vsc(s) => s.set_hvdc_line(Rc::downgrade(line.data())),
            }
        }
        self.network.register_hvdc_line(&line);
        self.network.invalidate_components();
        Ok(line)
    }
}
