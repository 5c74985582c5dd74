//! Payload Builder - from a spell and a board to per-target fragments.
//!
//! ## Build order
//!
//! 1. Look the spell up (an unknown id builds an empty payload)
//! 2. Evaluate the formula once into a base fragment
//! 3. Resolve targets
//! 4. Per target: drain branch, else ally heal, else base plus at most one
//!    per-target bonus; then the originating descriptor's extras
//! 5. Add the target-count bonus to every damage fragment

use smallvec::SmallVec;

use super::payload::{ActionFragment, Payload, PayloadEntry, RollDetail};
use super::spec::{Formula, SpellId, SpellSpec};
use crate::board::{BoardSet, SlotRef, Tile};
use crate::content::SpellRegistry;
use crate::core::{GameRng, ResolveError};
use crate::targeting::{ResolveOptions, TargetResolver};

/// A spell given by id or inline.
#[derive(Clone, Copy, Debug)]
pub enum SpellRef<'s> {
    Id(SpellId),
    Spec(&'s SpellSpec),
}

impl From<SpellId> for SpellRef<'_> {
    fn from(id: SpellId) -> Self {
        SpellRef::Id(id)
    }
}

impl<'s> From<&'s SpellSpec> for SpellRef<'s> {
    fn from(spec: &'s SpellSpec) -> Self {
        SpellRef::Spec(spec)
    }
}

/// Caller-side adjustments for one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Added to the caster's spell power.
    pub bonus_spell_power: i32,
    /// Added to `attackPower` and `roll` damage.
    pub bonus_damage: i32,
    pub resolve: ResolveOptions,
}

/// Builds payloads against a spell registry.
#[derive(Clone, Copy, Debug)]
pub struct PayloadBuilder<'r> {
    spells: &'r SpellRegistry,
}

impl<'r> PayloadBuilder<'r> {
    #[must_use]
    pub fn new(spells: &'r SpellRegistry) -> Self {
        Self { spells }
    }

    /// Build the payload of one cast.
    ///
    /// Randomness is drawn only for `roll` formulas.
    pub fn build<'s>(
        &self,
        spell: impl Into<SpellRef<'s>>,
        caster: SlotRef,
        boards: &BoardSet,
        owner: Option<SlotRef>,
        options: &BuildOptions,
        rng: &mut GameRng,
    ) -> Result<Payload, ResolveError> {
        let caster_tile = boards.caster(caster)?;
        if let Some(owner) = owner {
            boards.check_slot(owner)?;
        }

        let spec = match spell.into() {
            SpellRef::Spec(spec) => spec,
            SpellRef::Id(id) => match self.spells.get(id) {
                Some(spec) => spec,
                None => {
                    tracing::warn!("Unknown spell {} cast from {}", id, caster);
                    return Ok(Payload::empty());
                }
            },
        };

        let spell_power = caster_tile.spell_power.saturating_add(options.bonus_spell_power);
        let base = evaluate(&spec.formula, caster_tile, spell_power, options.bonus_damage, rng);

        let resolved = TargetResolver::new(boards, caster)
            .with_owner(owner)
            .with_options(options.resolve)
            .resolve(&spec.targets)?;

        let mut entries: SmallVec<[PayloadEntry; 4]> = SmallVec::with_capacity(resolved.len());
        for target in resolved {
            let mut fragment = match boards.tile(target.slot) {
                Some(target_tile) => per_target(spec, &base, caster, caster_tile, target.slot, target_tile, spell_power),
                None => base.clone(),
            };
            if let Some(extras) = spec.extras.get(target.descriptor) {
                fragment.merge(extras);
            }
            tracing::debug!(
                "{} -> {}: {:?} {}",
                spec.name,
                target.slot,
                fragment.action,
                fragment.value
            );
            entries.push(PayloadEntry { target, fragment });
        }

        if let Some(multiplier) = spec.target_count_multiplier {
            let count = i32::try_from(entries.len()).unwrap_or(i32::MAX);
            let bonus = count.saturating_mul(multiplier);
            for entry in entries.iter_mut().filter(|e| e.fragment.is_damage()) {
                entry.fragment.value = entry.fragment.value.saturating_add(bonus);
            }
        }

        Ok(Payload {
            spell: Some(spec.id),
            descriptors: spec.targets.clone(),
            entries,
            effects: spec.effects.clone(),
            post: spec.post.clone(),
        })
    }
}

/// Base fragment of a formula, before anything target-specific.
fn evaluate(formula: &Formula, caster: &Tile, spell_power: i32, bonus_damage: i32, rng: &mut GameRng) -> ActionFragment {
    match formula {
        Formula::AttackPower(ap) => {
            let mut value = ap.value;
            if !ap.ignore_spell_power {
                value = value.saturating_add(spell_power);
            }
            if ap.add_half_missing_health {
                value = value.saturating_add(caster.missing_health() / 2);
            }
            if ap.add_caster_armor {
                value = value.saturating_add(caster.armor);
            }
            ActionFragment {
                ignore_armor: ap.ignore_armor || caster.ignores_armor,
                armor_multiplier: ap.armor_multiplier,
                ..ActionFragment::damage(value.saturating_add(bonus_damage))
            }
        }
        Formula::Damage { value } => ActionFragment {
            ignore_armor: true,
            ..ActionFragment::damage(*value)
        },
        Formula::Roll {
            die,
            value,
            ignore_spell_power,
        } => {
            let rolled = rng.roll_die(*die);
            let sp = if *ignore_spell_power { 0 } else { spell_power };
            let total = rolled.saturating_add(*value).saturating_add(sp).saturating_add(bonus_damage);
            ActionFragment {
                ignore_armor: caster.ignores_armor,
                roll: Some(RollDetail {
                    die: *die,
                    rolled,
                    base: *value,
                    spell_power: sp,
                }),
                ..ActionFragment::damage(total)
            }
        }
        Formula::HealPower { value } => ActionFragment::heal(value.saturating_add(spell_power)),
        Formula::Heal { value } => ActionFragment::heal(*value),
        Formula::EffectOnly => ActionFragment::none(),
    }
}

/// Fragment for one target: drain, ally heal, or the base with its bonus.
fn per_target(
    spec: &SpellSpec,
    base: &ActionFragment,
    caster: SlotRef,
    caster_tile: &Tile,
    slot: SlotRef,
    target: &Tile,
    spell_power: i32,
) -> ActionFragment {
    if let Some(drain) = &spec.drain {
        let outcome = drain.outcome(caster_tile, target);
        return ActionFragment {
            ignore_armor: caster_tile.ignores_armor,
            self_heal: (outcome.self_heal != 0).then_some(outcome.self_heal),
            ..ActionFragment::damage(outcome.damage)
        };
    }

    if let Some(heal) = spec.ally_heal {
        if slot.side == caster.side {
            let value = if heal.flat {
                heal.value
            } else {
                heal.value.saturating_add(spell_power)
            };
            return ActionFragment::heal(value);
        }
    }

    let mut fragment = base.clone();
    if let Some(bonus) = spec.formula.per_target() {
        match bonus.apply(base.value, target) {
            Some(value) => fragment.value = value,
            None => tracing::warn!("{}: per-target bonus failed on {}, using base value", spec.name, slot),
        }
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BaseStats, HeroDefinition, HeroId};
    use crate::core::Side;
    use crate::spells::{AttackPower, PerTargetBonus};
    use crate::targeting::{Metric, TargetDescriptor, TargetKind};

    fn board_with(caster: BaseStats, enemies: &[(usize, i32)]) -> BoardSet {
        let mut boards = BoardSet::default();
        let mage = HeroDefinition::new(HeroId::new(1), "Mage", caster);
        boards.place(SlotRef::new(Side::Player, 1), Tile::spawn(&mage, 0)).unwrap();
        for &(index, health) in enemies {
            let grunt = HeroDefinition::new(HeroId::new(2), "Grunt", BaseStats::new(health, 0, 1, 0, 0));
            boards
                .place(SlotRef::new(Side::Opponent, index), Tile::spawn(&grunt, index as u32))
                .unwrap();
        }
        boards
    }

    fn caster() -> SlotRef {
        SlotRef::new(Side::Player, 1)
    }

    fn lowest_health() -> TargetDescriptor {
        TargetDescriptor::enemy(TargetKind::lowest(Metric::Health))
    }

    #[test]
    fn test_unknown_spell_is_empty() {
        let registry = SpellRegistry::new();
        let boards = board_with(BaseStats::new(10, 0, 1, 0, 0), &[(7, 5)]);
        let payload = PayloadBuilder::new(&registry)
            .build(SpellId::new(9), caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload, Payload::empty());
    }

    #[test]
    fn test_empty_caster_is_error() {
        let registry = SpellRegistry::new();
        let boards = BoardSet::default();
        let result = PayloadBuilder::new(&registry).build(
            SpellId::new(9),
            caster(),
            &boards,
            None,
            &BuildOptions::default(),
            &mut GameRng::new(1),
        );
        assert_eq!(result, Err(ResolveError::EmptyCaster { side: Side::Player, index: 1 }));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = SpellRegistry::new();
        registry.register(SpellSpec::new(SpellId::new(2), "Zap", Formula::damage(3)).targeting(lowest_health()));
        let boards = board_with(BaseStats::new(10, 0, 1, 0, 4), &[(7, 5)]);

        let payload = PayloadBuilder::new(&registry)
            .build(SpellId::new(2), caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload.spell, Some(SpellId::new(2)));
        let fragment = &payload.entries[0].fragment;
        assert_eq!(fragment.value, 3);
        assert!(fragment.ignore_armor);
    }

    #[test]
    fn test_bonus_options() {
        let registry = SpellRegistry::new();
        let boards = board_with(BaseStats::new(10, 0, 1, 0, 2), &[(7, 5)]);
        let options = BuildOptions {
            bonus_spell_power: 3,
            bonus_damage: 1,
            ..BuildOptions::default()
        };

        let strike = SpellSpec::new(SpellId::new(1), "Strike", Formula::attack_power(4)).targeting(lowest_health());
        let payload = PayloadBuilder::new(&registry)
            .build(&strike, caster(), &boards, None, &options, &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload.entries[0].fragment.value, 4 + 2 + 3 + 1);

        let zap = SpellSpec::new(SpellId::new(2), "Zap", Formula::damage(4)).targeting(lowest_health());
        let payload = PayloadBuilder::new(&registry)
            .build(&zap, caster(), &boards, None, &options, &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload.entries[0].fragment.value, 4);
    }

    #[test]
    fn test_roll_is_seeded() {
        let registry = SpellRegistry::new();
        let boards = board_with(BaseStats::new(10, 0, 1, 0, 2), &[(7, 5)]);
        let dice = SpellSpec::new(SpellId::new(1), "Dice", Formula::roll(6, 1)).targeting(lowest_health());
        let builder = PayloadBuilder::new(&registry);

        let a = builder
            .build(&dice, caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(42))
            .unwrap();
        let b = builder
            .build(&dice, caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(42))
            .unwrap();
        assert_eq!(a, b);

        let fragment = &a.entries[0].fragment;
        let roll = fragment.roll.unwrap();
        assert!((1..=6).contains(&roll.rolled));
        assert_eq!(fragment.value, roll.rolled + 1 + 2);
    }

    #[test]
    fn test_half_missing_health() {
        let registry = SpellRegistry::new();
        let mut boards = board_with(BaseStats::new(20, 0, 1, 0, 0), &[(7, 5)]);
        boards.tile_mut(caster()).unwrap().health = 13;
        let rage = SpellSpec::new(
            SpellId::new(1),
            "Rage",
            AttackPower::new(2).adding_half_missing_health().into(),
        )
        .targeting(lowest_health());

        let payload = PayloadBuilder::new(&registry)
            .build(&rage, caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload.entries[0].fragment.value, 2 + 3);
    }

    #[test]
    fn test_caster_ignores_armor() {
        let registry = SpellRegistry::new();
        let mut boards = board_with(BaseStats::new(20, 0, 1, 0, 0), &[(7, 5)]);
        boards.tile_mut(caster()).unwrap().ignores_armor = true;
        let strike = SpellSpec::new(SpellId::new(1), "Strike", Formula::attack_power(2)).targeting(lowest_health());

        let payload = PayloadBuilder::new(&registry)
            .build(&strike, caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(1))
            .unwrap();
        assert!(payload.entries[0].fragment.ignore_armor);
    }

    #[test]
    fn test_failed_bonus_falls_back() {
        let registry = SpellRegistry::new();
        let boards = board_with(BaseStats::new(20, 0, 1, 0, 0), &[(7, 5)]);
        let odd = SpellSpec::new(
            SpellId::new(1),
            "Odd",
            AttackPower::new(6)
                .per_target(PerTargetBonus::SpeedDivisor { divisor: 0, round_up: false })
                .into(),
        )
        .targeting(lowest_health());

        let payload = PayloadBuilder::new(&registry)
            .build(&odd, caster(), &boards, None, &BuildOptions::default(), &mut GameRng::new(1))
            .unwrap();
        assert_eq!(payload.entries[0].fragment.value, 6);
    }
}
