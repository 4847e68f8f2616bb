use std::collections::{BTreeMap, BTreeSet};

use bracket_lens::data::filter::{Dimension, FilterReducer, FilterSpec, FilterState, evaluate};
use bracket_lens::data::model::{Record, WIN_PCT};
use bracket_lens::layout::{LayoutConfig, Viewport, item_radius};
use bracket_lens::select::SeedSelector;
use proptest::prelude::*;

fn record(i: usize, year: i32, seed: Option<u8>, win_pct: f64, efg: f64) -> Record {
    Record {
        team: format!("Team {i}"),
        year: Some(year),
        seed,
        conference: "ACC".to_string(),
        win_pct: Some(win_pct),
        win_pct_display: format!("{win_pct:.1}%"),
        metrics: BTreeMap::from([("EFG_O".to_string(), efg)]),
        postseason: None,
    }
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (2013i32..=2023, prop::option::of(1u8..=16), 0.0f64..100.0, 40.0f64..60.0),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (year, seed, win, efg))| record(i, year, seed, win, efg))
            .collect()
    })
}

fn arb_seeds() -> impl Strategy<Value = BTreeSet<u8>> {
    prop::collection::btree_set(1u8..=16, 0..6)
}

proptest! {
    #[test]
    fn empty_state_passes_every_record_in_order(records in arb_records()) {
        let out = evaluate(&records, &FilterState::new());
        prop_assert_eq!(out.len(), records.len());
        for (kept, original) in out.iter().zip(&records) {
            prop_assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn combined_filters_are_the_intersection(
        records in arb_records(),
        year in 2013i32..=2023,
        seeds in arb_seeds(),
        low in 0.0f64..100.0,
        high in 0.0f64..100.0,
    ) {
        let win = FilterSpec::range(WIN_PCT, low, high);
        let by_year = FilterState::new().apply(Dimension::Year, FilterSpec::SingleValue(year));
        let by_seed = FilterState::new().apply(Dimension::Seed, FilterSpec::Set(seeds.clone()));
        let by_win = FilterState::new().apply(Dimension::win_pct(), win.clone());
        let all = by_year
            .apply(Dimension::Seed, FilterSpec::Set(seeds))
            .apply(Dimension::win_pct(), win);

        for r in &records {
            let each = by_year.matches(r) && by_seed.matches(r) && by_win.matches(r);
            prop_assert_eq!(all.matches(r), each);
        }
    }

    #[test]
    fn reversed_range_selects_the_same_records(
        records in arb_records(),
        a in 40.0f64..60.0,
        b in 40.0f64..60.0,
    ) {
        let efg = Dimension::metric("EFG_O");
        let forward = FilterState::new().apply(efg.clone(), FilterSpec::range("EFG_O", a, b));
        let reverse = FilterState::new().apply(efg, FilterSpec::range("EFG_O", b, a));
        prop_assert_eq!(evaluate(&records, &forward), evaluate(&records, &reverse));
    }

    #[test]
    fn toggling_a_seed_twice_restores_the_result(
        records in arb_records(),
        initial in arb_seeds(),
        seed in 1u8..=16,
    ) {
        let mut selector = SeedSelector::new();
        let mut reducer = FilterReducer::new();
        for s in &initial {
            if let Some(event) = selector.toggle(*s) {
                reducer.dispatch(event);
            }
        }
        let before: Vec<Record> = reducer.evaluate(&records).into_iter().cloned().collect();
        for _ in 0..2 {
            if let Some(event) = selector.toggle(seed) {
                reducer.dispatch(event);
            }
        }
        let after: Vec<Record> = reducer.evaluate(&records).into_iter().cloned().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn radius_is_non_increasing_in_item_count(
        width in 100.0f32..1600.0,
        height in 100.0f32..1200.0,
        n in 1usize..2000,
    ) {
        let config = LayoutConfig::default();
        let viewport = Viewport::new(width, height, config.margin);
        prop_assert!(item_radius(n + 1, &viewport, &config) <= item_radius(n, &viewport, &config));
    }
}
