//! Eligibility rule table
//!
//! Static mapping from event category code to a booking policy. Loaded once
//! at process start; categories without an explicit entry fall back to the
//! default rule (subscription required, every tier allowed).

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use manta_types::Tier;

/// Booking policy for an event category
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Whether booking requires an ACTIVE subscription
    pub requires_active_subscription: bool,
    /// Tiers whose holders may book this category
    pub allowed_tiers: HashSet<Tier>,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            requires_active_subscription: true,
            allowed_tiers: Tier::ALL_TIERS.into_iter().collect(),
        }
    }
}

/// Config-file entry for one category rule
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    /// Category code the rule applies to
    pub category: String,
    /// Whether booking requires an ACTIVE subscription
    #[serde(default = "default_true")]
    pub requires_active_subscription: bool,
    /// Tiers whose holders may book this category
    pub allowed_tiers: Vec<Tier>,
}

fn default_true() -> bool {
    true
}

/// The eligibility rule table
#[derive(Debug, Clone, Default)]
pub struct EligibilityRules {
    rules: HashMap<String, CategoryRule>,
    default_rule: CategoryRule,
}

impl EligibilityRules {
    /// Empty table; every category gets the default rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from config entries
    pub fn from_entries(entries: impl IntoIterator<Item = RuleEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table = table.with_rule(
                entry.category,
                CategoryRule {
                    requires_active_subscription: entry.requires_active_subscription,
                    allowed_tiers: entry.allowed_tiers.into_iter().collect(),
                },
            );
        }
        table
    }

    /// Add an explicit rule for a category
    pub fn with_rule(mut self, category: impl Into<String>, rule: CategoryRule) -> Self {
        self.rules.insert(category.into(), rule);
        self
    }

    /// The rule for a category code, falling back to the default
    pub fn rule_for(&self, category: &str) -> &CategoryRule {
        self.rules.get(category).unwrap_or(&self.default_rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_gets_default() {
        let rules = EligibilityRules::new();
        let rule = rules.rule_for("yoga");
        assert!(rule.requires_active_subscription);
        assert_eq!(rule.allowed_tiers.len(), 4);
    }

    #[test]
    fn test_explicit_rule_wins() {
        let rules = EligibilityRules::new().with_rule(
            "depth_training",
            CategoryRule {
                requires_active_subscription: true,
                allowed_tiers: [Tier::Deep].into_iter().collect(),
            },
        );

        let rule = rules.rule_for("depth_training");
        assert_eq!(rule.allowed_tiers.len(), 1);
        assert!(rule.allowed_tiers.contains(&Tier::Deep));

        // other categories unaffected
        assert_eq!(rules.rule_for("pool_session").allowed_tiers.len(), 4);
    }

    #[test]
    fn test_from_entries() {
        let entries = vec![
            RuleEntry {
                category: "open_water".to_string(),
                requires_active_subscription: true,
                allowed_tiers: vec![Tier::Open, Tier::Advanced, Tier::Deep],
            },
            RuleEntry {
                category: "intro_session".to_string(),
                requires_active_subscription: false,
                allowed_tiers: vec![Tier::All],
            },
        ];

        let rules = EligibilityRules::from_entries(entries);
        assert!(!rules.rule_for("intro_session").requires_active_subscription);
        assert!(!rules
            .rule_for("open_water")
            .allowed_tiers
            .contains(&Tier::All));
    }
}
