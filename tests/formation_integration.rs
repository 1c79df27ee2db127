//! Formation, strategy and tactic property tests

use std::sync::Arc;

use formation_clash::battle::{Formation, Strategy as BattleStrategy, StrategyKind, Tactic};
use formation_clash::combat::{Combatant, Fighter, FighterStats, Roster, StatKind};
use formation_clash::core::config::BattleConfig;
use formation_clash::core::error::ConstructionError;
use formation_clash::core::types::{Slot, GRID_COLS, GRID_ROWS, GRID_SLOTS};
use proptest::prelude::*;

fn is_permutation(order: &[usize]) -> bool {
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    sorted == (0..GRID_SLOTS).collect::<Vec<_>>()
}

fn permutation() -> impl Strategy<Value = Vec<usize>> {
    Just((0..GRID_SLOTS).collect::<Vec<_>>()).prop_shuffle()
}

/// Occupancy mask with at least one occupied slot
fn occupancy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), GRID_SLOTS).prop_filter("non-empty", |mask| mask.iter().any(|o| *o))
}

fn numbered_roster() -> Roster {
    Roster::from_stats((0..GRID_SLOTS).map(|i| FighterStats::new(format!("f{i}"), format!("F{i}")).with_health(10)))
        .unwrap()
}

fn formation_from_mask(mask: &[bool]) -> Formation {
    let placements: Vec<(Slot, Arc<dyn Combatant>)> = mask
        .iter()
        .enumerate()
        .filter(|(_, occupied)| **occupied)
        .filter_map(|(i, _)| {
            let slot = Slot::from_index(i)?;
            Some((slot, Fighter::shared(FighterStats::new(format!("f{i}"), format!("F{i}")).with_health(10))))
        })
        .collect();
    Formation::from_placements(placements).unwrap()
}

#[test]
fn test_canonical_generators_are_permutations() {
    for start in 0..GRID_COLS + 2 {
        assert!(is_permutation(Tactic::row_sweep(start).order()));
        assert!(is_permutation(Tactic::column_sweep(start).order()));
    }
    assert!(is_permutation(Tactic::concentrated().order()));
}

#[test]
fn test_documented_generator_orders() {
    assert_eq!(Tactic::row_sweep(0).order(), &[0, 1, 2, 3, 4, 5]);
    assert_eq!(Tactic::row_sweep(1).order(), &[1, 0, 2, 4, 3, 5]);
    assert_eq!(Tactic::row_sweep(2).order(), &[2, 1, 0, 5, 4, 3]);
    assert_eq!(Tactic::column_sweep(0).order(), &[0, 3, 1, 4, 2, 5]);
    assert_eq!(Tactic::concentrated().order(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_canonical_strategies_round_trip() {
    for kind in [StrategyKind::RowSweep, StrategyKind::ColumnSweep, StrategyKind::Concentrated] {
        let strategy = BattleStrategy::of_kind(kind).unwrap();
        let parsed: BattleStrategy = strategy.to_string().parse().unwrap();
        assert_eq!(parsed, strategy);
        assert_eq!(parsed.kind(), kind);
    }
    assert!(BattleStrategy::of_kind(StrategyKind::Custom).is_none());
}

#[test]
fn test_sample_data_files_load() {
    let roster = Roster::from_toml_str(include_str!("../data/roster.toml")).unwrap();
    assert_eq!(roster.len(), 12);
    let party1 = Formation::parse("a1,a2,a3/a4,a5,a6", &roster).unwrap();
    let party2 = Formation::parse("b1,b2,b3/b4,b5,b6", &roster).unwrap();
    assert_eq!(party1.size(), 6);
    assert_eq!(party2.size(), 6);

    let config = BattleConfig::from_toml_str(include_str!("../data/battle.toml")).unwrap();
    assert!(config.validate().is_ok());
}

proptest! {
    #[test]
    fn prop_tactic_round_trip(order in permutation()) {
        let tactic = Tactic::from_order(order).unwrap();
        let parsed: Tactic = tactic.to_string().parse().unwrap();
        prop_assert_eq!(parsed, tactic);
    }

    #[test]
    fn prop_non_permutations_rejected(order in prop::collection::vec(0usize..GRID_SLOTS + 2, 0..GRID_SLOTS + 3)) {
        prop_assume!(!(order.len() == GRID_SLOTS && is_permutation(&order)));
        let is_invalid_tactic = matches!(
            Tactic::from_order(order),
            Err(ConstructionError::InvalidTactic { .. })
        );
        prop_assert!(is_invalid_tactic);
    }

    #[test]
    fn prop_custom_strategy_round_trip(orders in prop::collection::vec(permutation(), GRID_SLOTS)) {
        let mut tactics = orders.into_iter().map(|o| Tactic::from_order(o).unwrap());
        let grid: Vec<Vec<Tactic>> = (0..GRID_ROWS)
            .map(|_| tactics.by_ref().take(GRID_COLS).collect())
            .collect();
        let strategy = BattleStrategy::custom(grid).unwrap();
        let parsed: BattleStrategy = strategy.to_string().parse().unwrap();
        prop_assert_eq!(parsed, strategy);
    }

    #[test]
    fn prop_formation_round_trip(mask in occupancy()) {
        let roster = numbered_roster();
        let text: Vec<String> = mask
            .chunks(GRID_COLS)
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, occupied)| if *occupied { format!("f{}", r * GRID_COLS + c) } else { "-".to_string() })
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        let formation = Formation::parse(&text.join("/"), &roster).unwrap();
        prop_assert_eq!(formation.size(), mask.iter().filter(|o| **o).count());
        let reparsed = Formation::parse(&formation.to_string(), &roster).unwrap();
        prop_assert_eq!(reparsed, formation);
    }

    #[test]
    fn prop_skipping_never_lands_on_defeated(order in permutation(), dead in prop::collection::vec(any::<bool>(), GRID_SLOTS)) {
        let mut tactic = Tactic::from_order(order).unwrap();
        match tactic.next_live_target(|slot| dead[slot]) {
            Some(slot) => {
                prop_assert!(!dead[slot]);
                let skipped = &tactic.order()[..tactic.cursor()];
                prop_assert!(skipped.iter().all(|s| dead[*s]));
            }
            None => prop_assert!(dead.iter().all(|d| *d)),
        }
    }

    #[test]
    fn prop_exhausted_tactic_means_formation_defeated(
        order in permutation(),
        mask in occupancy(),
        wounds in prop::collection::vec(any::<bool>(), GRID_SLOTS),
    ) {
        let formation = formation_from_mask(&mask);
        for (slot, combatant) in formation.occupants() {
            if let Some(index) = slot.index() {
                if wounds[index] {
                    combatant.apply_damage(10, StatKind::Health);
                }
            }
        }
        let mut tactic = Tactic::from_order(order).unwrap();
        let target = tactic.next_live_target(|index| formation.is_index_defeated(index));
        prop_assert_eq!(target.is_none(), formation.is_defeated());
    }
}
