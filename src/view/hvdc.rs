// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of HVDC converter stations and lines

use std::rc::Rc;

use crate::network::{
    HvdcConvertersMode, HvdcLine, LccConverterStation, VscConverterStation,
};
use crate::view::cache::ViewCache;
use crate::view::dispatch::HvdcConverterStationView;
use crate::view::terminal::TerminalView;
use crate::view::voltage_level::VoltageLevelView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of an [`LccConverterStation`]
pub struct LccConverterStationView {
    station: LccConverterStation,
    cache: Rc<ViewCache>,
}

view_identifiable!(LccConverterStationView, station, "LCC converter station");

impl LccConverterStationView {
    /// The station's terminal
    pub fn terminal(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.station.terminal())
    }

    /// The voltage level this station is connected in
    pub fn voltage_level(&self) -> Option<Rc<VoltageLevelView>> {
        self.station
            .voltage_level()
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// Loss factor in percent
    pub fn loss_factor(&self) -> f64 {
        self.station.loss_factor()
    }

    /// Power factor of the converter
    pub fn power_factor(&self) -> f64 {
        self.station.power_factor()
    }

    /// The HVDC line this station is attached to, if any
    pub fn hvdc_line(&self) -> Option<Rc<HvdcLineView>> {
        self.station
            .hvdc_line()
            .map(|line| self.cache.hvdc_line_view(&line))
    }

    reject_mutators! { "LCC converter station" =>
        fn set_loss_factor(_loss_factor: f64);
        fn set_power_factor(_power_factor: f64);
        fn remove();
    }
}

/// Read-only view of a [`VscConverterStation`]
pub struct VscConverterStationView {
    station: VscConverterStation,
    cache: Rc<ViewCache>,
}

view_identifiable!(VscConverterStationView, station, "VSC converter station");

impl VscConverterStationView {
    /// The station's terminal
    pub fn terminal(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.station.terminal())
    }

    /// The voltage level this station is connected in
    pub fn voltage_level(&self) -> Option<Rc<VoltageLevelView>> {
        self.station
            .voltage_level()
            .map(|vl| self.cache.voltage_level_view(&vl))
    }

    /// Loss factor in percent
    pub fn loss_factor(&self) -> f64 {
        self.station.loss_factor()
    }

    /// Whether the voltage regulator is on
    pub fn is_voltage_regulator_on(&self) -> bool {
        self.station.is_voltage_regulator_on()
    }

    /// Voltage setpoint in kV
    pub fn voltage_setpoint(&self) -> f64 {
        self.station.voltage_setpoint()
    }

    /// Reactive power setpoint in MVar
    pub fn reactive_power_setpoint(&self) -> f64 {
        self.station.reactive_power_setpoint()
    }

    /// The HVDC line this station is attached to, if any
    pub fn hvdc_line(&self) -> Option<Rc<HvdcLineView>> {
        self.station
            .hvdc_line()
            .map(|line| self.cache.hvdc_line_view(&line))
    }

    reject_mutators! { "VSC converter station" =>
        fn set_loss_factor(_loss_factor: f64);
        fn set_voltage_regulator_on(_on: bool);
        fn set_voltage_setpoint(_setpoint: f64);
        fn set_reactive_power_setpoint(_setpoint: f64);
        fn remove();
    }
}

/// Read-only view of an [`HvdcLine`]
pub struct HvdcLineView {
    line: HvdcLine,
    cache: Rc<ViewCache>,
}

view_identifiable!(HvdcLineView, line, "HVDC line");

impl HvdcLineView {
    /// DC resistance in ohm
    pub fn r(&self) -> f64 {
        self.line.r()
    }

    /// Nominal DC voltage in kV
    pub fn nominal_v(&self) -> f64 {
        self.line.nominal_v()
    }

    /// Active power setpoint in MW
    pub fn active_power_setpoint(&self) -> f64 {
        self.line.active_power_setpoint()
    }

    /// Maximum transferable active power in MW
    pub fn max_p(&self) -> f64 {
        self.line.max_p()
    }

    /// Direction of power flow
    pub fn converters_mode(&self) -> HvdcConvertersMode {
        self.line.converters_mode()
    }

    /// Converter station on side one
    pub fn converter_station1(&self) -> HvdcConverterStationView {
        self.cache.wrap_station(&self.line.converter_station1())
    }

    /// Converter station on side two
    pub fn converter_station2(&self) -> HvdcConverterStationView {
        self.cache.wrap_station(&self.line.converter_station2())
    }

    reject_mutators! { "HVDC line" =>
        fn set_r(_r: f64);
        fn set_nominal_v(_nominal_v: f64);
        fn set_active_power_setpoint(_setpoint: f64);
        fn set_max_p(_max_p: f64);
        fn set_converters_mode(_mode: HvdcConvertersMode);
        fn remove();
    }
}

impl ViewCache {
    pub(crate) fn lcc_converter_station_view(
        self: &Rc<Self>,
        station: &LccConverterStation,
    ) -> Rc<LccConverterStationView> {
        self.lcc_converter_stations
            .get_or_insert(station.data(), || LccConverterStationView {
                station: station.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn vsc_converter_station_view(
        self: &Rc<Self>,
        station: &VscConverterStation,
    ) -> Rc<VscConverterStationView> {
        self.vsc_converter_stations
            .get_or_insert(station.data(), || VscConverterStationView {
                station: station.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn hvdc_line_view(self: &Rc<Self>, line: &HvdcLine) -> Rc<HvdcLineView> {
        self.hvdc_lines.get_or_insert(line.data(), || HvdcLineView {
            line: line.clone(),
            cache: Rc::clone(self),
        })
    }
}
