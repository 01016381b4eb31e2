//! Booking engine configuration

use chrono_tz::Tz;

use crate::hierarchy::{HierarchyMode, TierHierarchy};
use crate::rules::EligibilityRules;

/// Booking engine configuration
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Club's civil timezone; the cutoff and all date windows use it
    pub timezone: Tz,
    /// Tier hierarchy reading in effect (see `HierarchyMode`)
    pub hierarchy_mode: HierarchyMode,
    /// Eligibility rule table, loaded at startup
    pub rules: EligibilityRules,
}

impl BookingConfig {
    /// Create a configuration with the default rule table
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            hierarchy_mode: HierarchyMode::Chain,
            rules: EligibilityRules::new(),
        }
    }

    /// Select the tier hierarchy reading
    pub fn with_hierarchy_mode(mut self, mode: HierarchyMode) -> Self {
        self.hierarchy_mode = mode;
        self
    }

    /// Install the eligibility rule table
    pub fn with_rules(mut self, rules: EligibilityRules) -> Self {
        self.rules = rules;
        self
    }

    /// The hierarchy table for the configured mode
    pub fn hierarchy(&self) -> TierHierarchy {
        TierHierarchy::for_mode(self.hierarchy_mode)
    }
}
