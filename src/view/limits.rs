// Copyright 2025 Cowboy AI, LLC.

//! Read-only projection of current limits

use crate::errors::{NetworkError, NetworkResult};
use crate::network::{CurrentLimits, TemporaryLimit};

/// Read-only view of a [`CurrentLimits`] set
///
/// Limits are values hanging off one owning element and are never navigated
/// back to, so this view is built fresh on each access instead of going
/// through the identity cache.
pub struct CurrentLimitsView {
    limits: CurrentLimits,
    owner_id: String,
}

impl CurrentLimitsView {
    pub(crate) fn new(limits: CurrentLimits, owner_id: String) -> Self {
        Self { limits, owner_id }
    }

    /// Permanent limit in A
    pub fn permanent_limit(&self) -> f64 {
        self.limits.permanent_limit()
    }

    /// Temporary limits, sorted by decreasing acceptable duration
    pub fn temporary_limits(&self) -> Vec<TemporaryLimit> {
        self.limits.temporary_limits()
    }

    /// Temporary limit with the given acceptable duration, if any
    pub fn temporary_limit(&self, acceptable_duration: u32) -> Option<TemporaryLimit> {
        self.limits.temporary_limit(acceptable_duration)
    }

    /// Always fails: this projection is read-only.
    pub fn set_permanent_limit(&self, _value: f64) -> NetworkResult<()> {
        Err(NetworkError::unmodifiable(
            "current limits",
            "set_permanent_limit",
            self.owner_id.clone(),
        ))
    }
}
