//! Property-based tests for tier hierarchy expansion
//!
//! Whatever table is configured, expansion must be a total function that
//! includes the granted tier itself and never shrinks a grant set.

use std::collections::HashSet;

use manta_booking_core::{HierarchyMode, TierHierarchy};
use manta_types::Tier;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_tier() -> impl Strategy<Value = Tier> {
    prop_oneof![
        Just(Tier::All),
        Just(Tier::Open),
        Just(Tier::Advanced),
        Just(Tier::Deep),
    ]
}

fn arb_mode() -> impl Strategy<Value = HierarchyMode> {
    prop_oneof![Just(HierarchyMode::Chain), Just(HierarchyMode::DeepIsolated)]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: expansion is total and self-including for every tier in
    /// every configured table
    #[test]
    fn prop_expansion_total_and_self_including(mode in arb_mode(), tier in arb_tier()) {
        let h = TierHierarchy::for_mode(mode);
        let expanded = h.expand(tier);
        prop_assert!(!expanded.is_empty());
        prop_assert!(expanded.contains(&tier), "{tier} must include itself");
    }

    /// Property: the union expansion is a superset of the granted set
    #[test]
    fn prop_expand_all_superset(
        mode in arb_mode(),
        granted in prop::collection::hash_set(arb_tier(), 0..4)
    ) {
        let h = TierHierarchy::for_mode(mode);
        let expanded = h.expand_all(granted.iter().copied());
        for tier in &granted {
            prop_assert!(expanded.contains(tier));
        }
    }

    /// Property: adding a grant never removes tiers from the expansion
    #[test]
    fn prop_expansion_monotone(
        mode in arb_mode(),
        granted in prop::collection::hash_set(arb_tier(), 0..4),
        extra in arb_tier()
    ) {
        let h = TierHierarchy::for_mode(mode);
        let base = h.expand_all(granted.iter().copied());
        let mut wider: HashSet<Tier> = granted.clone();
        wider.insert(extra);
        let grown = h.expand_all(wider);
        prop_assert!(base.is_subset(&grown));
    }

    /// Property: in the chain table, expansions are nested by tier order
    #[test]
    fn prop_chain_is_nested(tier in arb_tier()) {
        let h = TierHierarchy::chain();
        let order = Tier::ALL_TIERS;
        let idx = order.iter().position(|t| *t == tier).unwrap();
        let expanded = h.expand(tier);
        for lower in &order[..=idx] {
            prop_assert!(expanded.contains(lower), "{tier} should subsume {lower}");
        }
    }
}
