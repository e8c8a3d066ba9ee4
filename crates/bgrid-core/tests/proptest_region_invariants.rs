#![forbid(unsafe_code)]

//! Property tests for [`Region`] overlap classification.
//!
//! Validates:
//! - Overlap is symmetric (Contains mirrors ContainedBy).
//! - Equal only for identical regions.
//! - Intersection exists exactly when the kind is not None.
//! - Union contains both inputs.

use bgrid_core::{OverlapKind, Region};
use proptest::prelude::*;

fn region_strategy() -> impl Strategy<Value = Region> {
    (0u32..40, 1u32..12, 0u32..40, 1u32..12)
        .prop_map(|(row, rows, col, cols)| Region::new(row, rows, col, cols))
}

fn mirror(kind: OverlapKind) -> OverlapKind {
    match kind {
        OverlapKind::Contains => OverlapKind::ContainedBy,
        OverlapKind::ContainedBy => OverlapKind::Contains,
        other => other,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn overlap_kind_is_symmetric(a in region_strategy(), b in region_strategy()) {
        prop_assert_eq!(a.overlap_kind(&b), mirror(b.overlap_kind(&a)));
    }

    #[test]
    fn equal_only_for_identical(a in region_strategy(), b in region_strategy()) {
        let kind = a.overlap_kind(&b);
        prop_assert_eq!(kind == OverlapKind::Equal, a.is_equal(&b));
    }

    #[test]
    fn intersection_matches_kind(a in region_strategy(), b in region_strategy()) {
        prop_assert_eq!(a.intersection(&b).is_some(), a.overlap_kind(&b).overlaps());
    }

    #[test]
    fn union_contains_both(a in region_strategy(), b in region_strategy()) {
        let union = a.union(&b);
        prop_assert!(union.contains(&a));
        prop_assert!(union.contains(&b));
    }
}
