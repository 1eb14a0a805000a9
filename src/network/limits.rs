// Copyright 2025 Cowboy AI, LLC.

//! Current limits attached to branch sides and dangling lines

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};

/// A temporary current limit, active below its acceptable duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryLimit {
    /// Name of the limit (e.g. `"20'"`)
    pub name: String,
    /// Limit value in A
    pub value: f64,
    /// Acceptable duration of the overload, in seconds
    pub acceptable_duration: u32,
    /// Whether the limit is fictitious (modeling artifact, not equipment)
    pub fictitious: bool,
}

#[derive(Debug)]
pub(crate) struct CurrentLimitsData {
    pub permanent_limit: f64,
    /// Sorted by decreasing acceptable duration.
    pub temporary_limits: Vec<TemporaryLimit>,
}

/// Current limits of one side of a branch
///
/// A shared handle: clones refer to the same underlying limit set. The
/// permanent limit can be retuned after creation; temporary limits are fixed
/// at build time.
#[derive(Clone)]
pub struct CurrentLimits {
    data: Rc<RefCell<CurrentLimitsData>>,
}

impl CurrentLimits {
    pub(crate) fn from_data(data: Rc<RefCell<CurrentLimitsData>>) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<CurrentLimitsData>> {
        &self.data
    }

    /// Permanent limit in A
    pub fn permanent_limit(&self) -> f64 {
        self.data.borrow().permanent_limit
    }

    /// Set the permanent limit in A
    pub fn set_permanent_limit(&self, value: f64) -> NetworkResult<()> {
        if !(value > 0.0) {
            return Err(NetworkError::validation(
                "current limits",
                format!("permanent limit must be > 0, got {value}"),
            ));
        }
        self.data.borrow_mut().permanent_limit = value;
        Ok(())
    }

    /// Temporary limits, sorted by decreasing acceptable duration
    pub fn temporary_limits(&self) -> Vec<TemporaryLimit> {
        self.data.borrow().temporary_limits.clone()
    }

    /// Temporary limit with the given acceptable duration, if any
    pub fn temporary_limit(&self, acceptable_duration: u32) -> Option<TemporaryLimit> {
        self.data
            .borrow()
            .temporary_limits
            .iter()
            .find(|t| t.acceptable_duration == acceptable_duration)
            .cloned()
    }
}

impl fmt::Debug for CurrentLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("CurrentLimits")
            .field("permanent_limit", &data.permanent_limit)
            .field("temporary_limits", &data.temporary_limits.len())
            .finish()
    }
}

/// Builder for a [`CurrentLimits`] set
///
/// Obtained from the owning element (e.g.
/// [`Line::new_current_limits1`](crate::Line::new_current_limits1)); the
/// closure passed at construction installs the built limits on that element.
pub struct CurrentLimitsAdder {
    owner_id: String,
    permanent_limit: f64,
    temporary_limits: Vec<TemporaryLimit>,
    install: Box<dyn FnOnce(CurrentLimits)>,
}

impl CurrentLimitsAdder {
    pub(crate) fn new(owner_id: String, install: Box<dyn FnOnce(CurrentLimits)>) -> Self {
        Self {
            owner_id,
            permanent_limit: f64::NAN,
            temporary_limits: Vec::new(),
            install,
        }
    }

    /// Set the permanent limit in A (required)
    pub fn permanent_limit(mut self, value: f64) -> Self {
        self.permanent_limit = value;
        self
    }

    /// Add a temporary limit
    pub fn temporary_limit(
        mut self,
        name: impl Into<String>,
        value: f64,
        acceptable_duration: u32,
    ) -> Self {
        self.temporary_limits.push(TemporaryLimit {
            name: name.into(),
            value,
            acceptable_duration,
            fictitious: false,
        });
        self
    }

    /// Build the limits and install them on the owning element
    pub fn add(self) -> NetworkResult<CurrentLimits> {
        if !(self.permanent_limit > 0.0) {
            return Err(NetworkError::validation(
                &self.owner_id,
                format!(
                    "permanent limit must be > 0, got {}",
                    self.permanent_limit
                ),
            ));
        }
        let mut temporary_limits = self.temporary_limits;
        temporary_limits.sort_by(|a, b| b.acceptable_duration.cmp(&a.acceptable_duration));
        let limits = CurrentLimits::from_data(Rc::new(RefCell::new(CurrentLimitsData {
            permanent_limit: self.permanent_limit,
            temporary_limits,
        })));
        (self.install)(limits.clone());
        Ok(limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(permanent: f64) -> NetworkResult<CurrentLimits> {
        CurrentLimitsAdder::new("L1".to_string(), Box::new(|_| {}))
            .permanent_limit(permanent)
            .temporary_limit("20'", 1200.0, 1200)
            .temporary_limit("1'", 1500.0, 60)
            .add()
    }

    #[test]
    fn temporary_limits_sorted_by_decreasing_duration() {
        let limits = build(1000.0).unwrap();
        let durations: Vec<u32> = limits
            .temporary_limits()
            .iter()
            .map(|t| t.acceptable_duration)
            .collect();
        assert_eq!(durations, vec![1200, 60]);
        assert_eq!(limits.temporary_limit(60).unwrap().value, 1500.0);
    }

    #[test]
    fn permanent_limit_must_be_positive() {
        assert!(build(-5.0).is_err());
        assert!(build(f64::NAN).is_err());
    }

    #[test]
    fn clones_share_state() {
        let limits = build(1000.0).unwrap();
        let alias = limits.clone();
        limits.set_permanent_limit(1100.0).unwrap();
        assert_eq!(alias.permanent_limit(), 1100.0);
    }
}
