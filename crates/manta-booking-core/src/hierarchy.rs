//! Tier hierarchy expansion
//!
//! A granted tier can subsume other tiers. The club's source data disagreed
//! across revisions on what DEEP implies, so the table is explicit, injected
//! configuration rather than a hard-coded rule: both readings are
//! constructible and the deployment picks one. Whatever the table, it is
//! total over `Tier` and every tier includes itself.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use manta_types::Tier;

/// Which expansion table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyMode {
    /// DEEP => ADVANCED => OPEN => ALL (higher tiers subsume lower ones)
    Chain,
    /// DEEP grants only DEEP and ALL; ADVANCED/OPEN chain as usual
    DeepIsolated,
}

impl FromStr for HierarchyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chain" => Ok(Self::Chain),
            "deep_isolated" => Ok(Self::DeepIsolated),
            other => Err(format!("invalid hierarchy mode: {other}")),
        }
    }
}

/// Tier expansion table: granted tier -> full set of tiers it confers
#[derive(Debug, Clone)]
pub struct TierHierarchy {
    table: HashMap<Tier, HashSet<Tier>>,
}

impl TierHierarchy {
    /// Subsumption chain: DEEP => ADVANCED => OPEN => ALL
    pub fn chain() -> Self {
        Self::from_entries([
            (Tier::All, vec![Tier::All]),
            (Tier::Open, vec![Tier::Open, Tier::All]),
            (Tier::Advanced, vec![Tier::Advanced, Tier::Open, Tier::All]),
            (
                Tier::Deep,
                vec![Tier::Deep, Tier::Advanced, Tier::Open, Tier::All],
            ),
        ])
    }

    /// Alternative reading: DEEP confers only DEEP and ALL
    pub fn deep_isolated() -> Self {
        Self::from_entries([
            (Tier::All, vec![Tier::All]),
            (Tier::Open, vec![Tier::Open, Tier::All]),
            (Tier::Advanced, vec![Tier::Advanced, Tier::Open, Tier::All]),
            (Tier::Deep, vec![Tier::Deep, Tier::All]),
        ])
    }

    /// Table for a configured mode
    pub fn for_mode(mode: HierarchyMode) -> Self {
        match mode {
            HierarchyMode::Chain => Self::chain(),
            HierarchyMode::DeepIsolated => Self::deep_isolated(),
        }
    }

    fn from_entries(entries: [(Tier, Vec<Tier>); 4]) -> Self {
        let mut table = HashMap::new();
        for (tier, grants) in entries {
            let mut set: HashSet<Tier> = grants.into_iter().collect();
            // every tier confers at least itself
            set.insert(tier);
            table.insert(tier, set);
        }
        Self { table }
    }

    /// Tiers conferred by a single granted tier
    pub fn expand(&self, tier: Tier) -> &HashSet<Tier> {
        // from_entries covers every variant; the table is total
        &self.table[&tier]
    }

    /// Union of the expansions of all granted tiers
    pub fn expand_all<I>(&self, granted: I) -> HashSet<Tier>
    where
        I: IntoIterator<Item = Tier>,
    {
        let mut out = HashSet::new();
        for tier in granted {
            out.extend(self.expand(tier).iter().copied());
        }
        out
    }
}

impl Default for TierHierarchy {
    fn default() -> Self {
        Self::chain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_deep_subsumes_everything() {
        let h = TierHierarchy::chain();
        let expanded = h.expand(Tier::Deep);
        for tier in Tier::ALL_TIERS {
            assert!(expanded.contains(&tier), "chain DEEP should include {tier}");
        }
    }

    #[test]
    fn test_deep_isolated_skips_middle_tiers() {
        let h = TierHierarchy::deep_isolated();
        let expanded = h.expand(Tier::Deep);
        assert!(expanded.contains(&Tier::Deep));
        assert!(expanded.contains(&Tier::All));
        assert!(!expanded.contains(&Tier::Advanced));
        assert!(!expanded.contains(&Tier::Open));
    }

    #[test]
    fn test_expand_all_unions() {
        let h = TierHierarchy::deep_isolated();
        let expanded = h.expand_all([Tier::Deep, Tier::Open]);
        assert!(expanded.contains(&Tier::Open));
        assert!(expanded.contains(&Tier::Deep));
        assert!(expanded.contains(&Tier::All));
        assert!(!expanded.contains(&Tier::Advanced));
    }

    #[test]
    fn test_empty_grant_expands_to_empty() {
        let h = TierHierarchy::chain();
        assert!(h.expand_all([]).is_empty());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("chain".parse::<HierarchyMode>().unwrap(), HierarchyMode::Chain);
        assert_eq!(
            "deep_isolated".parse::<HierarchyMode>().unwrap(),
            HierarchyMode::DeepIsolated
        );
        assert!("strict".parse::<HierarchyMode>().is_err());
    }
}
