//! Property tests over randomly populated boards.

use proptest::prelude::*;

use hero_tactics::board::{grid, BoardSet, SlotRef, Stat, Tile};
use hero_tactics::content::{BaseStats, EffectRegistry, HeroDefinition, HeroId, SpellRegistry};
use hero_tactics::core::{CoreConfig, DurationError, GameRng, NullSink, Side};
use hero_tactics::effects::{
    Duration, EffectDefinition, EffectInstance, EffectKind, EffectLedger, EffectRef, RawDuration, TargetingFlags,
};
use hero_tactics::spells::{BuildOptions, Formula, PayloadBuilder, SpellId, SpellSpec};
use hero_tactics::targeting::{Metric, Order, TargetDescriptor, TargetKind, TargetResolver};

/// Health, armor, speed and a state tag: 0 plain, 1 dead, 2 immune.
type Seat = Option<(i32, i32, i32, u8)>;

fn seats() -> impl Strategy<Value = Vec<Seat>> {
    prop::collection::vec(prop::option::of((1i32..30, 0i32..5, 1i32..6, 0u8..3)), 9)
}

fn occupant((health, armor, speed, state): (i32, i32, i32, u8), index: usize) -> Tile {
    let hero = HeroDefinition::new(HeroId::new(1), "Unit", BaseStats::new(health, armor, speed, 0, 0));
    let mut tile = Tile::spawn(&hero, index as u32);
    match state {
        1 => tile.dead = true,
        2 => {
            let ward = EffectDefinition::new("Ward", EffectKind::Buff, Duration::Rounds(2)).with_flags(TargetingFlags {
                single_target_immune: true,
                ..TargetingFlags::default()
            });
            tile.effects.push_back(EffectInstance::new(ward));
        }
        _ => {}
    }
    tile
}

fn arena(player: &[Seat], opponent: &[Seat], caster: usize) -> BoardSet {
    let mut boards = BoardSet::default();
    for (side, seats) in [(Side::Player, player), (Side::Opponent, opponent)] {
        for (index, seat) in seats.iter().enumerate() {
            if let Some(seat) = seat {
                boards.place(SlotRef::new(side, index), occupant(*seat, index)).unwrap();
            }
        }
    }
    boards.place(SlotRef::new(Side::Player, caster), occupant((10, 1, 3, 0), caster)).unwrap();
    boards
}

fn is_immune(tile: &Tile) -> bool {
    tile.has_flag(|f| f.single_target_immune)
}

fn every_kind() -> Vec<TargetKind> {
    vec![
        TargetKind::Board,
        TargetKind::Column { column: None },
        TargetKind::FrontTwoRows,
        TargetKind::BackRow,
        TargetKind::FrontmostRowWithHero,
        TargetKind::AdjacentToSelf,
        TargetKind::Nearest { count: 2 },
        TargetKind::highest(Metric::Speed),
        TargetKind::ranked(Metric::Health, Order::Lowest, 3),
        TargetKind::RowOf {
            metric: Metric::Armor,
            order: Order::Highest,
        },
        TargetKind::RowWithHighestSum { stat: Stat::Health },
        TargetKind::ReverseBook,
    ]
}

proptest! {
    /// Resolving the same descriptors twice, or against a snapshot, gives the same tokens.
    #[test]
    fn resolve_is_deterministic(player in seats(), opponent in seats(), caster in 0usize..9) {
        let boards = arena(&player, &opponent, caster);
        let snapshot = boards.snapshot();
        let caster = SlotRef::new(Side::Player, caster);

        for kind in every_kind() {
            let descriptors = [TargetDescriptor::enemy(kind.clone()), TargetDescriptor::ally(kind)];
            let first = TargetResolver::new(&boards, caster).resolve(&descriptors).unwrap();
            let second = TargetResolver::new(&boards, caster).resolve(&descriptors).unwrap();
            let third = TargetResolver::new(&snapshot, caster).resolve(&descriptors).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &third);
        }
    }

    /// Every resolved token is a living hero on a main slot.
    #[test]
    fn tokens_are_living_main_slots(player in seats(), opponent in seats(), caster in 0usize..9) {
        let boards = arena(&player, &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);

        for kind in every_kind() {
            let descriptors = [TargetDescriptor::enemy(kind.clone()), TargetDescriptor::ally(kind)];
            for target in TargetResolver::new(&boards, caster).resolve(&descriptors).unwrap() {
                prop_assert!(target.slot.is_main());
                prop_assert!(boards.tile(target.slot).is_some_and(|t| t.is_alive()));
            }
        }
    }

    /// Dead-ally picks only ever return fallen heroes on the caster's side.
    #[test]
    fn dead_ally_picks_are_dead(player in seats(), opponent in seats(), caster in 0usize..9, count in 1usize..4) {
        let boards = arena(&player, &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);
        let resolved = TargetResolver::new(&boards, caster)
            .resolve(&[TargetDescriptor::enemy(TargetKind::NearestDeadAlly { count })])
            .unwrap();

        prop_assert!(resolved.len() <= count);
        for target in resolved {
            prop_assert_eq!(target.slot.side, Side::Player);
            prop_assert!(boards.tile(target.slot).is_some_and(|t| !t.is_alive()));
        }
    }

    /// A single-target pick never lands on an immune hero, and only comes up
    /// empty when every living enemy is immune.
    #[test]
    fn single_target_respects_immunity(player in seats(), opponent in seats(), caster in 0usize..9) {
        let boards = arena(&player, &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);
        let resolved = TargetResolver::new(&boards, caster)
            .resolve(&[TargetDescriptor::enemy(TargetKind::Nearest { count: 1 })])
            .unwrap();

        let open = boards
            .book_iter(Side::Opponent)
            .any(|(_, tile)| tile.is_alive() && !is_immune(tile));
        prop_assert_eq!(resolved.is_empty(), !open);
        for target in resolved {
            prop_assert!(!boards.tile(target.slot).is_some_and(is_immune));
        }
    }

    /// With identical enemies, a lowest-health pick is the first living one in book order.
    #[test]
    fn ties_break_by_book_order(occupied in prop::collection::vec(any::<bool>(), 9), caster in 0usize..9) {
        let opponent: Vec<Seat> = occupied.iter().map(|&o| o.then_some((8, 1, 2, 0))).collect();
        let boards = arena(&[None; 9], &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);

        let resolved = TargetResolver::new(&boards, caster)
            .resolve(&[TargetDescriptor::enemy(TargetKind::lowest(Metric::Health))])
            .unwrap();
        let expected = grid::book_order(Side::Opponent)
            .iter()
            .copied()
            .find(|&index| occupied[index])
            .map(|index| SlotRef::new(Side::Opponent, index));

        prop_assert_eq!(resolved.first().map(|r| r.slot), expected);
    }

    /// Adjacent tokens are orthogonal neighbours of the previous token, on its board.
    #[test]
    fn adjacent_stays_next_to_anchor(player in seats(), opponent in seats(), caster in 0usize..9) {
        let boards = arena(&player, &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);
        let resolved = TargetResolver::new(&boards, caster)
            .resolve(&[
                TargetDescriptor::enemy(TargetKind::highest(Metric::Health)),
                TargetDescriptor::enemy(TargetKind::Adjacent),
            ])
            .unwrap();

        let anchor = resolved.iter().find(|r| r.descriptor == 0).map(|r| r.slot);
        for target in resolved.iter().filter(|r| r.descriptor == 1) {
            let anchor = anchor.unwrap();
            prop_assert_eq!(target.slot.side, anchor.side);
            prop_assert_eq!(target.slot.cell().unwrap().manhattan(anchor.cell().unwrap()), 1);
        }
    }

    /// The visible cap holds after every apply, and hidden effects are never evicted.
    #[test]
    fn visible_cap_holds(cap in 1usize..6, batches in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..5), 1..8)) {
        let mut registry = EffectRegistry::new();
        registry.register(EffectDefinition::new("Seen", EffectKind::Buff, Duration::Rounds(3)));
        registry.register(EffectDefinition::new("Veil", EffectKind::Neutral, Duration::Permanent).hidden());
        let config = CoreConfig::default().with_visible_effect_cap(cap);
        let ledger = EffectLedger::new(&registry, &config);
        let hero = HeroDefinition::new(HeroId::new(1), "Unit", BaseStats::new(10, 0, 2, 0, 0));
        let mut tile = Tile::spawn(&hero, 0);

        let mut hidden = 0;
        for batch in batches {
            let refs: Vec<EffectRef> = batch
                .iter()
                .map(|&h| EffectRef::named(if h { "Veil" } else { "Seen" }))
                .collect();
            hidden += batch.iter().filter(|&&h| h).count();
            ledger.apply(&mut tile, &refs, &mut NullSink, None);
            prop_assert!(tile.visible_effect_count() <= cap);
            prop_assert_eq!(tile.enhancement_count(), hidden);
        }
    }

    /// Positive round counts normalize to rounds, saturating at `u32::MAX`.
    #[test]
    fn positive_counts_are_rounds(n in 1i64..i64::MAX) {
        let expected = Duration::Rounds(u32::try_from(n).unwrap_or(u32::MAX));
        prop_assert_eq!(Duration::try_from(RawDuration::Count(n)), Ok(expected));
        prop_assert_eq!(Duration::try_from(RawDuration::Marker(n.to_string())), Ok(expected));
    }

    /// Zero and negative counts other than -1 are rejected.
    #[test]
    fn nonpositive_counts_are_rejected(n in i64::MIN..=0i64) {
        prop_assume!(n != -1);
        prop_assert_eq!(Duration::try_from(RawDuration::Count(n)), Err(DurationError::NotPositive(n)));
    }

    /// A seeded roll builds the same payload every time, within the die's range.
    #[test]
    fn seeded_roll_is_reproducible(seed in any::<u64>(), die in 1u32..21, opponent in seats(), caster in 0usize..9) {
        let boards = arena(&[None; 9], &opponent, caster);
        let caster = SlotRef::new(Side::Player, caster);
        let registry = SpellRegistry::new();
        let spell = SpellSpec::new(SpellId::new(1), "Dice", Formula::roll(die, 0))
            .targeting(TargetDescriptor::enemy(TargetKind::Board));
        let builder = PayloadBuilder::new(&registry);

        let first = builder
            .build(&spell, caster, &boards, None, &BuildOptions::default(), &mut GameRng::new(seed))
            .unwrap();
        let second = builder
            .build(&spell, caster, &boards, None, &BuildOptions::default(), &mut GameRng::new(seed))
            .unwrap();
        prop_assert_eq!(&first, &second);

        let die = i32::try_from(die).unwrap();
        for fragment in first.fragments() {
            prop_assert!((1..=die).contains(&fragment.value));
        }
    }
}
