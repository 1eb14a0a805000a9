// Copyright 2025 Cowboy AI, LLC.

//! Single-terminal equipment: generators, loads, shunt compensators,
//! dangling lines, static VAR compensators and busbar sections

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};
use crate::network::connectable::Connectable;
use crate::network::limits::{CurrentLimits, CurrentLimitsAdder};
use crate::network::terminal::Terminal;
use crate::network::voltage_level::VoltageLevel;
use crate::network::{impl_identifiable, impl_injection, IdentifiableBase, Network, NetworkData};

/// Primary energy source of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergySource {
    /// Hydraulic
    Hydro,
    /// Nuclear
    Nuclear,
    /// Wind
    Wind,
    /// Thermal
    Thermal,
    /// Solar
    Solar,
    /// Unspecified
    Other,
}

/// Kind of load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadKind {
    /// Ordinary consumption
    Undefined,
    /// Auxiliaries of a power plant
    Auxiliary,
    /// Fictitious load used for modeling
    Fictitious,
}

/// Regulation mode of a static VAR compensator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SvcRegulationMode {
    /// Regulate voltage
    Voltage,
    /// Regulate reactive power
    ReactivePower,
    /// No regulation
    Off,
}

pub(crate) struct GeneratorData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub energy_source: EnergySource,
    pub min_p: f64,
    pub max_p: f64,
    pub target_p: f64,
    pub target_q: f64,
    pub target_v: f64,
    pub voltage_regulator_on: bool,
    /// `None` means the generator regulates its own terminal.
    pub regulating_terminal: Option<Terminal>,
}

/// A generator
#[derive(Clone)]
pub struct Generator {
    data: Rc<RefCell<GeneratorData>>,
}

impl_identifiable!(Generator, GeneratorData, "Generator");
impl_injection!(Generator, "generator", unregister_generator);

impl Generator {
    /// Primary energy source
    pub fn energy_source(&self) -> EnergySource {
        self.data.borrow().energy_source
    }

    /// Set the primary energy source
    pub fn set_energy_source(&self, energy_source: EnergySource) {
        self.data.borrow_mut().energy_source = energy_source;
    }

    /// Minimum active power output in MW
    pub fn min_p(&self) -> f64 {
        self.data.borrow().min_p
    }

    /// Set the minimum active power output in MW
    pub fn set_min_p(&self, min_p: f64) {
        self.data.borrow_mut().min_p = min_p;
    }

    /// Maximum active power output in MW
    pub fn max_p(&self) -> f64 {
        self.data.borrow().max_p
    }

    /// Set the maximum active power output in MW
    pub fn set_max_p(&self, max_p: f64) {
        self.data.borrow_mut().max_p = max_p;
    }

    /// Active power target in MW
    pub fn target_p(&self) -> f64 {
        self.data.borrow().target_p
    }

    /// Set the active power target in MW
    pub fn set_target_p(&self, target_p: f64) {
        self.data.borrow_mut().target_p = target_p;
    }

    /// Reactive power target in MVar
    pub fn target_q(&self) -> f64 {
        self.data.borrow().target_q
    }

    /// Set the reactive power target in MVar
    pub fn set_target_q(&self, target_q: f64) {
        self.data.borrow_mut().target_q = target_q;
    }

    /// Voltage target in kV
    pub fn target_v(&self) -> f64 {
        self.data.borrow().target_v
    }

    /// Set the voltage target in kV
    pub fn set_target_v(&self, target_v: f64) {
        self.data.borrow_mut().target_v = target_v;
    }

    /// Whether the voltage regulator is on
    pub fn is_voltage_regulator_on(&self) -> bool {
        self.data.borrow().voltage_regulator_on
    }

    /// Switch the voltage regulator on or off
    pub fn set_voltage_regulator_on(&self, on: bool) {
        self.data.borrow_mut().voltage_regulator_on = on;
    }

    /// Terminal whose voltage is regulated (the generator's own terminal by
    /// default)
    pub fn regulating_terminal(&self) -> Terminal {
        let data = self.data.borrow();
        data.regulating_terminal
            .clone()
            .unwrap_or_else(|| data.terminal.clone())
    }

    /// Set the terminal whose voltage is regulated
    pub fn set_regulating_terminal(&self, terminal: &Terminal) {
        self.data.borrow_mut().regulating_terminal = Some(terminal.clone());
    }
}

pub(crate) struct LoadData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub load_kind: LoadKind,
    pub p0: f64,
    pub q0: f64,
}

/// A load
#[derive(Clone)]
pub struct Load {
    data: Rc<RefCell<LoadData>>,
}

impl_identifiable!(Load, LoadData, "Load");
impl_injection!(Load, "load", unregister_load);

impl Load {
    /// Kind of load
    pub fn load_kind(&self) -> LoadKind {
        self.data.borrow().load_kind
    }

    /// Constant active power setpoint in MW
    pub fn p0(&self) -> f64 {
        self.data.borrow().p0
    }

    /// Set the constant active power setpoint in MW
    pub fn set_p0(&self, p0: f64) {
        self.data.borrow_mut().p0 = p0;
    }

    /// Constant reactive power setpoint in MVar
    pub fn q0(&self) -> f64 {
        self.data.borrow().q0
    }

    /// Set the constant reactive power setpoint in MVar
    pub fn set_q0(&self, q0: f64) {
        self.data.borrow_mut().q0 = q0;
    }
}

pub(crate) struct ShuntCompensatorData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub b_per_section: f64,
    pub maximum_section_count: u32,
    pub current_section_count: u32,
}

/// A shunt compensator bank
#[derive(Clone)]
pub struct ShuntCompensator {
    data: Rc<RefCell<ShuntCompensatorData>>,
}

impl_identifiable!(ShuntCompensator, ShuntCompensatorData, "ShuntCompensator");
impl_injection!(ShuntCompensator, "shunt compensator", unregister_shunt_compensator);

impl ShuntCompensator {
    /// Susceptance of one section in S
    pub fn b_per_section(&self) -> f64 {
        self.data.borrow().b_per_section
    }

    /// Set the susceptance of one section in S
    pub fn set_b_per_section(&self, b: f64) {
        self.data.borrow_mut().b_per_section = b;
    }

    /// Number of sections in the bank
    pub fn maximum_section_count(&self) -> u32 {
        self.data.borrow().maximum_section_count
    }

    /// Number of sections currently switched in
    pub fn current_section_count(&self) -> u32 {
        self.data.borrow().current_section_count
    }

    /// Switch sections in or out
    pub fn set_current_section_count(&self, count: u32) -> NetworkResult<()> {
        let mut data = self.data.borrow_mut();
        if count > data.maximum_section_count {
            return Err(NetworkError::validation(
                &data.base.id,
                format!(
                    "section count {count} exceeds maximum {}",
                    data.maximum_section_count
                ),
            ));
        }
        data.current_section_count = count;
        Ok(())
    }

    /// Susceptance currently switched in, in S
    pub fn current_b(&self) -> f64 {
        let data = self.data.borrow();
        data.b_per_section * f64::from(data.current_section_count)
    }
}

pub(crate) struct DanglingLineData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub p0: f64,
    pub q0: f64,
    pub r: f64,
    pub x: f64,
    pub g: f64,
    pub b: f64,
    pub ucte_xnode_code: Option<String>,
    pub limits: Option<CurrentLimits>,
}

/// A dangling line: a line ending at a boundary node
#[derive(Clone)]
pub struct DanglingLine {
    data: Rc<RefCell<DanglingLineData>>,
}

impl_identifiable!(DanglingLine, DanglingLineData, "DanglingLine");
impl_injection!(DanglingLine, "dangling line", unregister_dangling_line);

impl DanglingLine {
    /// Constant active power at the boundary in MW
    pub fn p0(&self) -> f64 {
        self.data.borrow().p0
    }

    /// Set the constant active power at the boundary in MW
    pub fn set_p0(&self, p0: f64) {
        self.data.borrow_mut().p0 = p0;
    }

    /// Constant reactive power at the boundary in MVar
    pub fn q0(&self) -> f64 {
        self.data.borrow().q0
    }

    /// Set the constant reactive power at the boundary in MVar
    pub fn set_q0(&self, q0: f64) {
        self.data.borrow_mut().q0 = q0;
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.data.borrow().r
    }

    /// Set the series resistance in ohm
    pub fn set_r(&self, r: f64) {
        self.data.borrow_mut().r = r;
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.data.borrow().x
    }

    /// Set the series reactance in ohm
    pub fn set_x(&self, x: f64) {
        self.data.borrow_mut().x = x;
    }

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.data.borrow().g
    }

    /// Set the shunt conductance in S
    pub fn set_g(&self, g: f64) {
        self.data.borrow_mut().g = g;
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.data.borrow().b
    }

    /// Set the shunt susceptance in S
    pub fn set_b(&self, b: f64) {
        self.data.borrow_mut().b = b;
    }

    /// UCTE code of the boundary node
    pub fn ucte_xnode_code(&self) -> Option<String> {
        self.data.borrow().ucte_xnode_code.clone()
    }

    /// Current limits, if defined
    pub fn current_limits(&self) -> Option<CurrentLimits> {
        self.data.borrow().limits.clone()
    }

    /// Start building current limits for this dangling line
    pub fn new_current_limits(&self) -> CurrentLimitsAdder {
        let dangling_line = self.clone();
        CurrentLimitsAdder::new(
            self.id(),
            Box::new(move |limits| dangling_line.data.borrow_mut().limits = Some(limits)),
        )
    }
}

pub(crate) struct StaticVarCompensatorData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
    pub b_min: f64,
    pub b_max: f64,
    pub voltage_setpoint: f64,
    pub reactive_power_setpoint: f64,
    pub regulation_mode: SvcRegulationMode,
}

/// A static VAR compensator
#[derive(Clone)]
pub struct StaticVarCompensator {
    data: Rc<RefCell<StaticVarCompensatorData>>,
}

impl_identifiable!(
    StaticVarCompensator,
    StaticVarCompensatorData,
    "StaticVarCompensator"
);
impl_injection!(
    StaticVarCompensator,
    "static VAR compensator",
    unregister_static_var_compensator
);

impl StaticVarCompensator {
    /// Minimum susceptance in S
    pub fn b_min(&self) -> f64 {
        self.data.borrow().b_min
    }

    /// Set the minimum susceptance in S
    pub fn set_b_min(&self, b_min: f64) {
        self.data.borrow_mut().b_min = b_min;
    }

    /// Maximum susceptance in S
    pub fn b_max(&self) -> f64 {
        self.data.borrow().b_max
    }

    /// Set the maximum susceptance in S
    pub fn set_b_max(&self, b_max: f64) {
        self.data.borrow_mut().b_max = b_max;
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

    /// Regulation mode
    pub fn regulation_mode(&self) -> SvcRegulationMode {
        self.data.borrow().regulation_mode
    }

    /// Set the regulation mode
    pub fn set_regulation_mode(&self, mode: SvcRegulationMode) {
        self.data.borrow_mut().regulation_mode = mode;
    }
}

pub(crate) struct BusbarSectionData {
    pub base: IdentifiableBase,
    pub network: Weak<RefCell<NetworkData>>,
    pub terminal: Terminal,
}

/// A busbar section
///
/// Carries no settable electrical state of its own; voltage and angle are
/// read from the connected bus.
#[derive(Clone)]
pub struct BusbarSection {
    data: Rc<RefCell<BusbarSectionData>>,
}

impl_identifiable!(BusbarSection, BusbarSectionData, "BusbarSection");
impl_injection!(BusbarSection, "busbar section", unregister_busbar_section);

impl BusbarSection {
    /// Voltage magnitude at the busbar in kV
    pub fn v(&self) -> f64 {
        self.terminal()
            .bus()
            .map(|bus| bus.v())
            .unwrap_or(f64::NAN)
    }

    /// Voltage angle at the busbar in degrees
    pub fn angle(&self) -> f64 {
        self.terminal()
            .bus()
            .map(|bus| bus.angle())
            .unwrap_or(f64::NAN)
    }
}

/// Shared builder state for single-terminal equipment
pub(crate) struct InjectionAdder {
    pub(crate) voltage_level: VoltageLevel,
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) bus: Option<String>,
    pub(crate) connected: bool,
}

impl InjectionAdder {
    pub(crate) fn new(voltage_level: &VoltageLevel, id: &str) -> Self {
        Self {
            voltage_level: voltage_level.clone(),
            id: id.to_string(),
            name: None,
            bus: None,
            connected: true,
        }
    }

    /// Resolves the bus, checks the id, and creates the terminal.
    pub(crate) fn build(
        &self,
    ) -> NetworkResult<(Network, Terminal, IdentifiableBase)> {
        let network = self
            .voltage_level
            .network()
            .ok_or_else(|| NetworkError::Detached(self.voltage_level.id()))?;
        network.check_new_id(&self.id)?;
        let bus_id = self.bus.as_deref().ok_or_else(|| {
            NetworkError::validation(&self.id, "a connection bus is required")
        })?;
        let bus = self
            .voltage_level
            .bus(bus_id)
            .ok_or(NetworkError::NotFound {
                kind: "bus",
                id: bus_id.to_string(),
            })?;
        let terminal = Terminal::new(&self.voltage_level, &bus, self.connected);
        let mut base = IdentifiableBase::new(&self.id);
        base.name = self.name.clone();
        Ok((network, terminal, base))
    }

    /// Registers the finished equipment with its voltage level and network.
    pub(crate) fn register(
        &self,
        network: &Network,
        terminal: &Terminal,
        connectable: Connectable,
    ) {
        terminal.set_owner(connectable.downgrade());
        self.voltage_level.register_connectable(connectable);
        network.invalidate_components();
    }
}

/// Generates the builder setters shared by all single-terminal equipment.
macro_rules! injection_adder_setters {
    () => {
        /// Set the human-readable name
        pub fn name(mut self, name: &str) -> Self {
            self.base.name = Some(name.to_string());
            self
        }

        /// Set the connection bus (required)
        pub fn bus(mut self, id: &str) -> Self {
            self.base.bus = Some(id.to_string());
            self
        }

        /// Create the equipment disconnected from its bus
        pub fn disconnected(mut self) -> Self {
            self.base.connected = false;
            self
        }
    };
}
pub(crate) use injection_adder_setters;

/// Builder for a [`Generator`], obtained from [`VoltageLevel::new_generator`]
pub struct GeneratorAdder {
    base: InjectionAdder,
    energy_source: EnergySource,
    min_p: f64,
    max_p: f64,
    target_p: f64,
    target_q: f64,
    target_v: f64,
    voltage_regulator_on: bool,
}

impl GeneratorAdder {
    injection_adder_setters!();

    /// Set the primary energy source (defaults to [`EnergySource::Other`])
    pub fn energy_source(mut self, energy_source: EnergySource) -> Self {
        self.energy_source = energy_source;
        self
    }

    /// Set the minimum active power output in MW
    pub fn min_p(mut self, min_p: f64) -> Self {
        self.min_p = min_p;
        self
    }

    /// Set the maximum active power output in MW
    pub fn max_p(mut self, max_p: f64) -> Self {
        self.max_p = max_p;
        self
    }

    /// Set the active power target in MW (required)
    pub fn target_p(mut self, target_p: f64) -> Self {
        self.target_p = target_p;
        self
    }

    /// Set the reactive power target in MVar
    pub fn target_q(mut self, target_q: f64) -> Self {
        self.target_q = target_q;
        self
    }

    /// Set the voltage target in kV
    pub fn target_v(mut self, target_v: f64) -> Self {
        self.target_v = target_v;
        self
    }

    /// Switch the voltage regulator on
    pub fn voltage_regulator_on(mut self, on: bool) -> Self {
        self.voltage_regulator_on = on;
        self
    }

    /// Build the generator and attach it to the voltage level
    pub fn add(self) -> NetworkResult<Generator> {
        if !self.target_p.is_finite() {
            return Err(NetworkError::validation(
                &self.base.id,
                "target_p must be set to a finite value",
            ));
        }
        if self.min_p > self.max_p {
            return Err(NetworkError::validation(
                &self.base.id,
                format!("min_p {} is above max_p {}", self.min_p, self.max_p),
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let generator = Generator::from_data(Rc::new(RefCell::new(GeneratorData {
            base,
            network: Rc::downgrade(network.data()),
            terminal: terminal.clone(),
            energy_source: self.energy_source,
            min_p: self.min_p,
            max_p: self.max_p,
            target_p: self.target_p,
            target_q: self.target_q,
            target_v: self.target_v,
            voltage_regulator_on: self.voltage_regulator_on,
            regulating_terminal: None,
        })));
        network.register_generator(&generator);
        self.base
            .register(&network, &terminal, Connectable::Generator(generator.clone()));
        Ok(generator)
    }
}

/// Builder for a [`Load`], obtained from [`VoltageLevel::new_load`]
pub struct LoadAdder {
    base: InjectionAdder,
    load_kind: LoadKind,
    p0: f64,
    q0: f64,
}

impl LoadAdder {
    injection_adder_setters!();

    /// Set the kind of load (defaults to [`LoadKind::Undefined`])
    pub fn load_kind(mut self, kind: LoadKind) -> Self {
        self.load_kind = kind;
        self
    }

    /// Set the constant active power setpoint in MW (required)
    pub fn p0(mut self, p0: f64) -> Self {
        self.p0 = p0;
        self
    }

    /// Set the constant reactive power setpoint in MVar
    pub fn q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    /// Build the load and attach it to the voltage level
    pub fn add(self) -> NetworkResult<Load> {
        if !self.p0.is_finite() {
            return Err(NetworkError::validation(
                &self.base.id,
                "p0 must be set to a finite value",
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let load = Load::from_data(Rc::new(RefCell::new(LoadData {
            base,
            network: Rc::downgrade(network.data()),
            terminal: terminal.clone(),
            load_kind: self.load_kind,
            p0: self.p0,
            q0: self.q0,
        })));
        network.register_load(&load);
        self.base
            .register(&network, &terminal, Connectable::Load(load.clone()));
        Ok(load)
    }
}

/// Builder for a [`ShuntCompensator`], obtained from
/// [`VoltageLevel::new_shunt_compensator`]
pub struct ShuntCompensatorAdder {
    base: InjectionAdder,
    b_per_section: f64,
    maximum_section_count: u32,
    current_section_count: u32,
}

impl ShuntCompensatorAdder {
    injection_adder_setters!();

    /// Set the susceptance of one section in S (required)
    pub fn b_per_section(mut self, b: f64) -> Self {
        self.b_per_section = b;
        self
    }

    /// Set the number of sections in the bank (required)
    pub fn maximum_section_count(mut self, count: u32) -> Self {
        self.maximum_section_count = count;
        self
    }

    /// Set the number of sections initially switched in
    pub fn current_section_count(mut self, count: u32) -> Self {
        self.current_section_count = count;
        self
    }

    /// Build the shunt compensator and attach it to the voltage level
    pub fn add(self) -> NetworkResult<ShuntCompensator> {
        if !self.b_per_section.is_finite() || self.b_per_section == 0.0 {
            return Err(NetworkError::validation(
                &self.base.id,
                "b_per_section must be set to a non-zero finite value",
            ));
        }
        if self.maximum_section_count == 0 {
            return Err(NetworkError::validation(
                &self.base.id,
                "maximum_section_count must be at least 1",
            ));
        }
        if self.current_section_count > self.maximum_section_count {
            return Err(NetworkError::validation(
                &self.base.id,
                format!(
                    "section count {} exceeds maximum {}",
                    self.current_section_count, self.maximum_section_count
                ),
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let shunt = ShuntCompensator::from_data(Rc::new(RefCell::new(ShuntCompensatorData {
            base,
            network: Rc::downgrade(network.data()),
            terminal: terminal.clone(),
            b_per_section: self.b_per_section,
            maximum_section_count: self.maximum_section_count,
            current_section_count: self.current_section_count,
        })));
        network.register_shunt_compensator(&shunt);
        self.base.register(
            &network,
            &terminal,
            Connectable::ShuntCompensator(shunt.clone()),
        );
        Ok(shunt)
    }
}

/// Builder for a [`DanglingLine`], obtained from
/// [`VoltageLevel::new_dangling_line`]
pub struct DanglingLineAdder {
    base: InjectionAdder,
    p0: f64,
    q0: f64,
    r: f64,
    x: f64,
    g: f64,
    b: f64,
    ucte_xnode_code: Option<String>,
}

impl DanglingLineAdder {
    injection_adder_setters!();

    /// Set the constant active power at the boundary in MW (required)
    pub fn p0(mut self, p0: f64) -> Self {
        self.p0 = p0;
        self
    }

    /// Set the constant reactive power at the boundary in MVar
    pub fn q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    /// Set the series resistance in ohm
    pub fn r(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    /// Set the series reactance in ohm
    pub fn x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Set the shunt conductance in S
    pub fn g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    /// Set the shunt susceptance in S
    pub fn b(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    /// Set the UCTE code of the boundary node
    pub fn ucte_xnode_code(mut self, code: &str) -> Self {
        self.ucte_xnode_code = Some(code.to_string());
        self
    }

    /// Build the dangling line and attach it to the voltage level
    pub fn add(self) -> NetworkResult<DanglingLine> {
        if !self.p0.is_finite() {
            return Err(NetworkError::validation(
                &self.base.id,
                "p0 must be set to a finite value",
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let dangling_line = DanglingLine::from_data(Rc::new(RefCell::new(DanglingLineData {
            base,
            network: Rc::downgrade(network.data()),
            terminal: terminal.clone(),
            p0: self.p0,
            q0: self.q0,
            r: self.r,
            x: self.x,
            g: self.g,
            b: self.b,
            ucte_xnode_code: self.ucte_xnode_code,
            limits: None,
        })));
        network.register_dangling_line(&dangling_line);
        self.base.register(
            &network,
            &terminal,
            Connectable::DanglingLine(dangling_line.clone()),
        );
        Ok(dangling_line)
    }
}

/// Builder for a [`StaticVarCompensator`], obtained from
/// [`VoltageLevel::new_static_var_compensator`]
pub struct StaticVarCompensatorAdder {
    base: InjectionAdder,
    b_min: f64,
    b_max: f64,
    voltage_setpoint: f64,
    reactive_power_setpoint: f64,
    regulation_mode: SvcRegulationMode,
}

impl StaticVarCompensatorAdder {
    injection_adder_setters!();

    /// Set the minimum susceptance in S (required)
    pub fn b_min(mut self, b_min: f64) -> Self {
        self.b_min = b_min;
        self
    }

    /// Set the maximum susceptance in S (required)
    pub fn b_max(mut self, b_max: f64) -> Self {
        self.b_max = b_max;
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

    /// Set the regulation mode (defaults to [`SvcRegulationMode::Off`])
    pub fn regulation_mode(mut self, mode: SvcRegulationMode) -> Self {
        self.regulation_mode = mode;
        self
    }

    /// Build the static VAR compensator and attach it to the voltage level
    pub fn add(self) -> NetworkResult<StaticVarCompensator> {
        if !self.b_min.is_finite() || !self.b_max.is_finite() {
            return Err(NetworkError::validation(
                &self.base.id,
                "b_min and b_max must be set to finite values",
            ));
        }
        let (network, terminal, base) = self.base.build()?;
        let svc = StaticVarCompensator::from_data(Rc::new(RefCell::new(
            StaticVarCompensatorData {
                base,
                network: Rc::downgrade(network.data()),
                terminal: terminal.clone(),
                b_min: self.b_min,
                b_max: self.b_max,
                voltage_setpoint: self.voltage_setpoint,
                reactive_power_setpoint: self.reactive_power_setpoint,
                regulation_mode: self.regulation_mode,
            },
        )));
        network.register_static_var_compensator(&svc);
        self.base.register(
            &network,
            &terminal,
            Connectable::StaticVarCompensator(svc.clone()),
        );
        Ok(svc)
    }
}

/// Builder for a [`BusbarSection`], obtained from
/// [`VoltageLevel::new_busbar_section`]
pub struct BusbarSectionAdder {
    base: InjectionAdder,
}

impl BusbarSectionAdder {
    injection_adder_setters!();

    /// Build the busbar section and attach it to the voltage level
    pub fn add(self) -> NetworkResult<BusbarSection> {
        let (network, terminal, base) = self.base.build()?;
        let busbar_section = BusbarSection::from_data(Rc::new(RefCell::new(BusbarSectionData {
            base,
            network: Rc::downgrade(network.data()),
            terminal: terminal.clone(),
        })));
        network.register_busbar_section(&busbar_section);
        self.base.register(
            &network,
            &terminal,
            Connectable::BusbarSection(busbar_section.clone()),
        );
        Ok(busbar_section)
    }
}

impl VoltageLevel {
    /// Start building a new generator in this voltage level
    pub fn new_generator(&self, id: &str) -> GeneratorAdder {
        GeneratorAdder {
            base: InjectionAdder::new(self, id),
            energy_source: EnergySource::Other,
            min_p: f64::NEG_INFINITY,
            max_p: f64::INFINITY,
            target_p: f64::NAN,
            target_q: f64::NAN,
            target_v: f64::NAN,
            voltage_regulator_on: false,
        }
    }

    /// Start building a new load in this voltage level
    pub fn new_load(&self, id: &str) -> LoadAdder {
        LoadAdder {
            base: InjectionAdder::new(self, id),
            load_kind: LoadKind::Undefined,
            p0: f64::NAN,
            q0: 0.0,
        }
    }

    /// Start building a new shunt compensator in this voltage level
    pub fn new_shunt_compensator(&self, id: &str) -> ShuntCompensatorAdder {
        ShuntCompensatorAdder {
            base: InjectionAdder::new(self, id),
            b_per_section: f64::NAN,
            maximum_section_count: 0,
            current_section_count: 0,
        }
    }

    /// Start building a new dangling line in this voltage level
    pub fn new_dangling_line(&self, id: &str) -> DanglingLineAdder {
        DanglingLineAdder {
            base: InjectionAdder::new(self, id),
            p0: f64::NAN,
            q0: 0.0,
            r: 0.0,
            x: 0.0,
            g: 0.0,
            b: 0.0,
            ucte_xnode_code: None,
        }
    }

    /// Start building a new static VAR compensator in this voltage level
    pub fn new_static_var_compensator(&self, id: &str) -> StaticVarCompensatorAdder {
        StaticVarCompensatorAdder {
            base: InjectionAdder::new(self, id),
            b_min: f64::NAN,
            b_max: f64::NAN,
            voltage_setpoint: f64::NAN,
            reactive_power_setpoint: f64::NAN,
            regulation_mode: SvcRegulationMode::Off,
        }
    }

    /// Start building a new busbar section in this voltage level
    pub fn new_busbar_section(&self, id: &str) -> BusbarSectionAdder {
        BusbarSectionAdder {
            base: InjectionAdder::new(self, id),
        }
    }
}
