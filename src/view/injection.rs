// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of single-terminal equipment

use std::rc::Rc;

use crate::network::{
    DanglingLine, EnergySource, Generator, Load, LoadKind, ShuntCompensator, StaticVarCompensator,
    SvcRegulationMode, Terminal,
};
use crate::view::cache::ViewCache;
use crate::view::limits::CurrentLimitsView;
use crate::view::terminal::TerminalView;
use crate::view::voltage_level::VoltageLevelView;
use crate::view::{reject_mutators, view_identifiable};

/// Generates the shared read surface of single-terminal equipment views.
macro_rules! injection_view_accessors {
    ($field:ident) => {
        /// The equipment's terminal
        pub fn terminal(&self) -> Rc<TerminalView> {
            self.cache.terminal_view(&self.$field.terminal())
        }

        /// The voltage level this equipment is connected in
        pub fn voltage_level(&self) -> Option<Rc<VoltageLevelView>> {
            self.$field
                .voltage_level()
                .map(|vl| self.cache.voltage_level_view(&vl))
        }
    };
}

/// Read-only view of a [`Generator`]
pub struct GeneratorView {
    generator: Generator,
    cache: Rc<ViewCache>,
}

view_identifiable!(GeneratorView, generator, "generator");

impl GeneratorView {
    injection_view_accessors!(generator);

    /// Primary energy source
    pub fn energy_source(&self) -> EnergySource {
        self.generator.energy_source()
    }

    /// Minimum active power output in MW
    pub fn min_p(&self) -> f64 {
        self.generator.min_p()
    }

    /// Maximum active power output in MW
    pub fn max_p(&self) -> f64 {
        self.generator.max_p()
    }

    /// Active power target in MW
    pub fn target_p(&self) -> f64 {
        self.generator.target_p()
    }

    /// Reactive power target in MVar
    pub fn target_q(&self) -> f64 {
        self.generator.target_q()
    }

    /// Voltage target in kV
    pub fn target_v(&self) -> f64 {
        self.generator.target_v()
    }

    /// Whether the voltage regulator is on
    pub fn is_voltage_regulator_on(&self) -> bool {
        self.generator.is_voltage_regulator_on()
    }

    /// Terminal whose voltage is regulated
    pub fn regulating_terminal(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.generator.regulating_terminal())
    }

    reject_mutators! { "generator" =>
        fn set_energy_source(_energy_source: EnergySource);
        fn set_min_p(_min_p: f64);
        fn set_max_p(_max_p: f64);
        fn set_target_p(_target_p: f64);
        fn set_target_q(_target_q: f64);
        fn set_target_v(_target_v: f64);
        fn set_voltage_regulator_on(_on: bool);
        fn set_regulating_terminal(_terminal: &Terminal);
        fn remove();
    }
}

/// Read-only view of a [`Load`]
pub struct LoadView {
    load: Load,
    cache: Rc<ViewCache>,
}

view_identifiable!(LoadView, load, "load");

impl LoadView {
    injection_view_accessors!(load);

    /// Kind of load
    pub fn load_kind(&self) -> LoadKind {
        self.load.load_kind()
    }

    /// Constant active power setpoint in MW
    pub fn p0(&self) -> f64 {
        self.load.p0()
    }

    /// Constant reactive power setpoint in MVar
    pub fn q0(&self) -> f64 {
        self.load.q0()
    }

    reject_mutators! { "load" =>
        fn set_p0(_p0: f64);
        fn set_q0(_q0: f64);
        fn remove();
    }
}

/// Read-only view of a [`ShuntCompensator`]
pub struct ShuntCompensatorView {
    shunt: ShuntCompensator,
    cache: Rc<ViewCache>,
}

view_identifiable!(ShuntCompensatorView, shunt, "shunt compensator");

impl ShuntCompensatorView {
    injection_view_accessors!(shunt);

    /// Susceptance of one section in S
    pub fn b_per_section(&self) -> f64 {
        self.shunt.b_per_section()
    }

    /// Number of sections in the bank
    pub fn maximum_section_count(&self) -> u32 {
        self.shunt.maximum_section_count()
    }

    /// Number of sections currently switched in
    pub fn current_section_count(&self) -> u32 {
        self.shunt.current_section_count()
    }

    /// Susceptance currently switched in, in S
    pub fn current_b(&self) -> f64 {
        self.shunt.current_b()
    }

    reject_mutators! { "shunt compensator" =>
        fn set_b_per_section(_b: f64);
        fn set_current_section_count(_count: u32);
        fn remove();
    }
}

/// Read-only view of a [`DanglingLine`]
pub struct DanglingLineView {
    dangling_line: DanglingLine,
    cache: Rc<ViewCache>,
}

view_identifiable!(DanglingLineView, dangling_line, "dangling line");

impl DanglingLineView {
    injection_view_accessors!(dangling_line);

    /// Constant active power at the boundary in MW
    pub fn p0(&self) -> f64 {
        self.dangling_line.p0()
    }

    /// Constant reactive power at the boundary in MVar
    pub fn q0(&self) -> f64 {
        self.dangling_line.q0()
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.dangling_line.r()
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.dangling_line.x()
    }

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.dangling_line.g()
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.dangling_line.b()
    }

    /// UCTE code of the boundary node
    pub fn ucte_xnode_code(&self) -> Option<String> {
        self.dangling_line.ucte_xnode_code()
    }

    /// Current limits, if defined
    pub fn current_limits(&self) -> Option<CurrentLimitsView> {
        self.dangling_line
            .current_limits()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    reject_mutators! { "dangling line" =>
        fn set_p0(_p0: f64);
        fn set_q0(_q0: f64);
        fn set_r(_r: f64);
        fn set_x(_x: f64);
        fn set_g(_g: f64);
        fn set_b(_b: f64);
        fn new_current_limits();
        fn remove();
    }
}

/// Read-only view of a [`StaticVarCompensator`]
pub struct StaticVarCompensatorView {
    svc: StaticVarCompensator,
    cache: Rc<ViewCache>,
}

view_identifiable!(StaticVarCompensatorView, svc, "static VAR compensator");

impl StaticVarCompensatorView {
    injection_view_accessors!(svc);

    /// Minimum susceptance in S
    pub fn b_min(&self) -> f64 {
        self.svc.b_min()
    }

    /// Maximum susceptance in S
    pub fn b_max(&self) -> f64 {
        self.svc.b_max()
    }

    /// Voltage setpoint in kV
    pub fn voltage_setpoint(&self) -> f64 {
        self.svc.voltage_setpoint()
    }

    /// Reactive power setpoint in MVar
    pub fn reactive_power_setpoint(&self) -> f64 {
        self.svc.reactive_power_setpoint()
    }

    /// Regulation mode
    pub fn regulation_mode(&self) -> SvcRegulationMode {
        self.svc.regulation_mode()
    }

    reject_mutators! { "static VAR compensator" =>
        fn set_b_min(_b_min: f64);
        fn set_b_max(_b_max: f64);
        fn set_voltage_setpoint(_setpoint: f64);
        fn set_reactive_power_setpoint(_setpoint: f64);
        fn set_regulation_mode(_mode: SvcRegulationMode);
        fn remove();
    }
}

impl ViewCache {
    pub(crate) fn generator_view(self: &Rc<Self>, generator: &Generator) -> Rc<GeneratorView> {
        self.generators.get_or_insert(generator.data(), || GeneratorView {
            generator: generator.clone(),
            cache: Rc::clone(self),
        })
    }

    pub(crate) fn load_view(self: &Rc<Self>, load: &Load) -> Rc<LoadView> {
        self.loads.get_or_insert(load.data(), || LoadView {
            load: load.clone(),
            cache: Rc::clone(self),
        })
    }

    pub(crate) fn shunt_compensator_view(
        self: &Rc<Self>,
        shunt: &ShuntCompensator,
    ) -> Rc<ShuntCompensatorView> {
        self.shunt_compensators
            .get_or_insert(shunt.data(), || ShuntCompensatorView {
                shunt: shunt.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn dangling_line_view(
        self: &Rc<Self>,
        dangling_line: &DanglingLine,
    ) -> Rc<DanglingLineView> {
        self.dangling_lines
            .get_or_insert(dangling_line.data(), || DanglingLineView {
                dangling_line: dangling_line.clone(),
                cache: Rc::clone(self),
            })
    }

    pub(crate) fn static_var_compensator_view(
        self: &Rc<Self>,
        svc: &StaticVarCompensator,
    ) -> Rc<StaticVarCompensatorView> {
        self.static_var_compensators
            .get_or_insert(svc.data(), || StaticVarCompensatorView {
                svc: svc.clone(),
                cache: Rc::clone(self),
            })
    }
}
