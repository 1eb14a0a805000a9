// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of AC lines and tie lines

use std::rc::Rc;

use crate::errors::{NetworkError, NetworkResult};
use crate::network::{HalfLine, Line};
use crate::view::cache::ViewCache;
use crate::view::limits::CurrentLimitsView;
use crate::view::terminal::TerminalView;
use crate::view::{reject_mutators, view_identifiable};

/// Read-only view of a plain AC [`Line`]
pub struct LineView {
    line: Line,
    cache: Rc<ViewCache>,
}

view_identifiable!(LineView, line, "line");

impl LineView {
    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.line.r()
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.line.x()
    }

    /// Shunt conductance on side one in S
    pub fn g1(&self) -> f64 {
        self.line.g1()
    }

    /// Shunt susceptance on side one in S
    pub fn b1(&self) -> f64 {
        self.line.b1()
    }

    /// Shunt conductance on side two in S
    pub fn g2(&self) -> f64 {
        self.line.g2()
    }

    /// Shunt susceptance on side two in S
    pub fn b2(&self) -> f64 {
        self.line.b2()
    }

    /// Terminal on side one
    pub fn terminal1(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.line.terminal1())
    }

    /// Terminal on side two
    pub fn terminal2(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.line.terminal2())
    }

    /// Current limits on side one, if defined
    pub fn current_limits1(&self) -> Option<CurrentLimitsView> {
        self.line
            .current_limits1()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    /// Current limits on side two, if defined
    pub fn current_limits2(&self) -> Option<CurrentLimitsView> {
        self.line
            .current_limits2()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    reject_mutators! { "line" =>
        fn set_r(_r: f64);
        fn set_x(_x: f64);
        fn set_g1(_g1: f64);
        fn set_b1(_b1: f64);
        fn set_g2(_g2: f64);
        fn set_b2(_b2: f64);
        fn new_current_limits1();
        fn new_current_limits2();
        fn remove();
    }
}

/// Read-only view of a tie [`Line`]
///
/// Exposes the plain line surface plus the boundary-node data of the two
/// half lines.
pub struct TieLineView {
    line: Line,
    cache: Rc<ViewCache>,
}

view_identifiable!(TieLineView, line, "tie line");

impl TieLineView {
    /// Series resistance in ohm (sum of the two halves)
    pub fn r(&self) -> f64 {
        self.line.r()
    }

    /// Series reactance in ohm (sum of the two halves)
    pub fn x(&self) -> f64 {
        self.line.x()
    }

    /// Shunt conductance on side one in S
    pub fn g1(&self) -> f64 {
        self.line.g1()
    }

    /// Shunt susceptance on side one in S
    pub fn b1(&self) -> f64 {
        self.line.b1()
    }

    /// Shunt conductance on side two in S
    pub fn g2(&self) -> f64 {
        self.line.g2()
    }

    /// Shunt susceptance on side two in S
    pub fn b2(&self) -> f64 {
        self.line.b2()
    }

    /// Terminal on side one
    pub fn terminal1(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.line.terminal1())
    }

    /// Terminal on side two
    pub fn terminal2(&self) -> Rc<TerminalView> {
        self.cache.terminal_view(&self.line.terminal2())
    }

    /// Current limits on side one, if defined
    pub fn current_limits1(&self) -> Option<CurrentLimitsView> {
        self.line
            .current_limits1()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    /// Current limits on side two, if defined
    pub fn current_limits2(&self) -> Option<CurrentLimitsView> {
        self.line
            .current_limits2()
            .map(|limits| CurrentLimitsView::new(limits, self.id()))
    }

    /// UCTE code of the boundary node
    pub fn ucte_xnode_code(&self) -> Option<String> {
        self.line.ucte_xnode_code()
    }

    /// First half of the tie line
    pub fn half_line1(&self) -> Option<Rc<HalfLineView>> {
        self.line
            .half_line1()
            .map(|half| self.cache.half_line_view(&half))
    }

    /// Second half of the tie line
    pub fn half_line2(&self) -> Option<Rc<HalfLineView>> {
        self.line
            .half_line2()
            .map(|half| self.cache.half_line_view(&half))
    }

    reject_mutators! { "tie line" =>
        fn set_r(_r: f64);
        fn set_x(_x: f64);
        fn set_g1(_g1: f64);
        fn set_b1(_b1: f64);
        fn set_g2(_g2: f64);
        fn set_b2(_b2: f64);
        fn new_current_limits1();
        fn new_current_limits2();
        fn remove();
    }
}

/// Read-only view of one [`HalfLine`] of a tie line
pub struct HalfLineView {
    half: HalfLine,
}

impl HalfLineView {
    /// Id of this half line
    pub fn id(&self) -> String {
        self.half.id()
    }

    /// Optional human-readable name
    pub fn name(&self) -> Option<String> {
        self.half.name()
    }

    /// Series resistance in ohm
    pub fn r(&self) -> f64 {
        self.half.r()
    }

    /// Series reactance in ohm
    pub fn x(&self) -> f64 {
        self.half.x()
    }

    /// Shunt conductance in S
    pub fn g(&self) -> f64 {
        self.half.g()
    }

    /// Shunt susceptance in S
    pub fn b(&self) -> f64 {
        self.half.b()
    }

    /// Active power at the boundary node in MW
    pub fn xnode_p(&self) -> f64 {
        self.half.xnode_p()
    }

    /// Reactive power at the boundary node in MVar
    pub fn xnode_q(&self) -> f64 {
        self.half.xnode_q()
    }

    /// Always fails: this projection is read-only.
    pub fn set_xnode_p(&self, _p: f64) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable("half line", "set_xnode_p", self.id()))
    }

    /// Always fails: this projection is read-only.
    pub fn set_xnode_q(&self, _q: f64) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable("half line", "set_xnode_q", self.id()))
    }
}

impl ViewCache {
    pub(crate) fn line_view(self: &Rc<Self>, line: &Line) -> Rc<LineView> {
        self.lines.get_or_insert(line.data(), || LineView {
            line: line.clone(),
            cache: Rc::clone(self),
        })
    }

    pub(crate) fn tie_line_view(self: &Rc<Self>, line: &Line) -> Rc<TieLineView> {
        self.tie_lines.get_or_insert(line.data(), || TieLineView {
            line: line.clone(),
            cache: Rc::clone(self),
        })
    }

    pub(crate) fn half_line_view(self: &Rc<Self>, half: &HalfLine) -> Rc<HalfLineView> {
        self.half_lines
            .get_or_insert(half.data(), || HalfLineView { half: half.clone() })
    }
}
