use proptest::prelude::*;
use sandlot_game::{BaseLayout, HitKind, advance_runners, sacrifice_advance};

fn occupied(bases: &BaseLayout) -> u32 {
    bases.iter().map(|b| u32::from(*b)).sum()
}

fn arb_bases() -> impl Strategy<Value = BaseLayout> {
    any::<[bool; 3]>()
}

fn arb_kind() -> impl Strategy<Value = HitKind> {
    prop::sample::select(HitKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn runners_are_conserved(kind in arb_kind(), bases in arb_bases()) {
        let out = advance_runners(kind, &bases);
        let before = occupied(&bases) + 1;
        let after = out.runs + occupied(&out.bases);
        prop_assert!(after <= before);
        if kind == HitKind::HomeRun {
            prop_assert_eq!(after, before);
            prop_assert_eq!(out.bases, [false; 3]);
        }
    }

    #[test]
    fn batter_lands_on_the_right_base(kind in arb_kind(), bases in arb_bases()) {
        let out = advance_runners(kind, &bases);
        match kind {
            HitKind::Single | HitKind::Walk => prop_assert!(out.bases[0]),
            HitKind::Double => prop_assert!(out.bases[1]),
            HitKind::Triple => prop_assert!(out.bases[2]),
            HitKind::HomeRun => prop_assert!(out.runs >= 1),
        }
    }

    #[test]
    fn walks_only_score_with_bases_loaded(bases in arb_bases()) {
        let out = advance_runners(HitKind::Walk, &bases);
        let expected = u32::from(bases == [true; 3]);
        prop_assert_eq!(out.runs, expected);
        // nobody already on base is pushed off a base they held without force
        if !bases[0] {
            prop_assert_eq!(&out.bases[1..], &bases[1..]);
        }
    }

    #[test]
    fn sacrifice_never_places_batter(bases in arb_bases()) {
        let out = sacrifice_advance(&bases);
        prop_assert!(!out.bases[0]);
        prop_assert_eq!(out.runs + occupied(&out.bases), occupied(&bases));
    }
}

#[test]
fn every_occupancy_matches_table() {
    for mask in 0u8..8 {
        let bases = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0];
        let [first, second, third] = bases;
        let n = occupied(&bases);

        let triple = advance_runners(HitKind::Triple, &bases);
        assert_eq!((triple.bases, triple.runs), ([false, false, true], n));

        let double = advance_runners(HitKind::Double, &bases);
        assert_eq!(double.bases, [false, true, first]);
        assert_eq!(double.runs, u32::from(second) + u32::from(third));

        let single = advance_runners(HitKind::Single, &bases);
        assert_eq!(single.bases, [true, first, second]);
        assert_eq!(single.runs, u32::from(third));
    }
}
