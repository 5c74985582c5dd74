//! Tiles - one combatant's mutable state on a board slot.
//!
//! A tile snapshots its hero's base stats when spawned. Armor, speed and
//! spell power are derived (base + effect modifiers) and rewritten by the
//! effect ledger; health and energy are resources the scheduler spends.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::content::{BaseStats, HeroDefinition, HeroId};
use crate::effects::{EffectInstance, EffectKind, TargetingFlags, TriggerEvent, TriggerHook};

/// A stat a descriptor can rank tiles by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Energy,
    Speed,
    Armor,
    Health,
    SpeedPlusArmor,
}

/// One combatant on a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Static hero this tile was spawned from.
    pub hero: HeroId,

    /// Stable id distinguishing copies of the same hero.
    pub instance: u32,

    /// Base stats captured at spawn.
    pub base: BaseStats,

    pub max_health: i32,
    pub health: i32,
    pub armor: i32,
    pub speed: i32,
    pub energy: i32,
    pub spell_power: i32,

    /// Active effects in application order, hidden ones included.
    #[serde(default)]
    pub effects: Vector<EffectInstance>,

    #[serde(default)]
    pub dead: bool,

    /// Augment: this tile's damage ignores armor.
    #[serde(default)]
    pub ignores_armor: bool,

    /// Hero may sit at zero or negative speed.
    #[serde(default)]
    pub allow_nonpositive_speed: bool,
}

impl Tile {
    /// Spawn a fresh tile from a hero definition.
    #[must_use]
    pub fn spawn(hero: &HeroDefinition, instance: u32) -> Self {
        let base = hero.base;
        Self {
            hero: hero.id,
            instance,
            base,
            max_health: base.health,
            health: base.health,
            armor: base.armor,
            speed: base.speed,
            energy: base.energy,
            spell_power: base.spell_power,
            effects: Vector::new(),
            dead: false,
            ignores_armor: false,
            allow_nonpositive_speed: hero.allow_nonpositive_speed,
        }
    }

    /// Alive tiles are the only valid targets (bar dead-ally revival).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    #[must_use]
    pub fn missing_health(&self) -> i32 {
        (self.max_health - self.health).max(0)
    }

    /// Current value of a rankable stat.
    #[must_use]
    pub fn stat(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Energy => self.energy,
            Stat::Speed => self.speed,
            Stat::Armor => self.armor,
            Stat::Health => self.health,
            Stat::SpeedPlusArmor => self.speed.saturating_add(self.armor),
        }
    }

    /// Effects that occupy a visible slot.
    pub fn visible_effects(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter().filter(|e| !e.hidden)
    }

    #[must_use]
    pub fn visible_effect_count(&self) -> usize {
        self.visible_effects().count()
    }

    /// Hidden effects, e.g. augment-granted enhancements.
    #[must_use]
    pub fn enhancement_count(&self) -> usize {
        self.effects.iter().filter(|e| e.hidden).count()
    }

    #[must_use]
    pub fn count_kind(&self, kind: EffectKind) -> usize {
        self.effects.iter().filter(|e| e.definition.kind == kind).count()
    }

    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.effects.iter().filter(|e| e.definition.name == name).count()
    }

    #[must_use]
    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.definition.name == name)
    }

    /// True if any active effect sets the selected targeting flag.
    #[must_use]
    pub fn has_flag(&self, flag: impl Fn(&TargetingFlags) -> bool) -> bool {
        self.effects.iter().any(|e| flag(&e.definition.flags))
    }

    /// Trigger hooks of every effect listening for `event`, in application order.
    pub fn hooks(&self, event: TriggerEvent) -> impl Iterator<Item = (&EffectInstance, &TriggerHook)> {
        self.effects
            .iter()
            .filter_map(move |e| e.definition.hooks.get(event).map(|hook| (e, hook)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Duration, EffectDefinition};

    fn knight() -> HeroDefinition {
        HeroDefinition::new(HeroId::new(1), "Knight", BaseStats::new(20, 3, 4, 0, 2))
    }

    #[test]
    fn test_spawn_copies_base_stats() {
        let tile = Tile::spawn(&knight(), 7);
        assert_eq!(tile.hero, HeroId::new(1));
        assert_eq!(tile.instance, 7);
        assert_eq!(tile.health, 20);
        assert_eq!(tile.max_health, 20);
        assert_eq!(tile.armor, 3);
        assert_eq!(tile.spell_power, 2);
        assert!(tile.is_alive());
        assert!(tile.effects.is_empty());
    }

    #[test]
    fn test_stat_lookup() {
        let mut tile = Tile::spawn(&knight(), 0);
        tile.health = 12;
        assert_eq!(tile.stat(Stat::Health), 12);
        assert_eq!(tile.stat(Stat::SpeedPlusArmor), 7);
        assert_eq!(tile.missing_health(), 8);
    }

    #[test]
    fn test_combined_stat_saturates() {
        let mut tile = Tile::spawn(&knight(), 0);
        tile.speed = i32::MAX;
        assert_eq!(tile.stat(Stat::SpeedPlusArmor), i32::MAX);
        tile.speed = i32::MIN;
        tile.armor = -1;
        assert_eq!(tile.stat(Stat::SpeedPlusArmor), i32::MIN);
    }

    #[test]
    fn test_effect_counts() {
        let mut tile = Tile::spawn(&knight(), 0);
        let ward = EffectDefinition::new("Ward", EffectKind::Buff, Duration::Rounds(2));
        let burn = EffectDefinition::new("Burn", EffectKind::Debuff, Duration::Rounds(3));
        let relic = EffectDefinition::new("Relic", EffectKind::Passive, Duration::Permanent);

        tile.effects.push_back(EffectInstance::new(ward.clone()));
        tile.effects.push_back(EffectInstance::new(ward));
        tile.effects.push_back(EffectInstance::new(burn));
        tile.effects.push_back(EffectInstance::new(relic));

        assert_eq!(tile.count_kind(EffectKind::Buff), 2);
        assert_eq!(tile.count_kind(EffectKind::Debuff), 1);
        assert_eq!(tile.count_named("Ward"), 2);
        assert!(tile.has_effect("Burn"));
        assert_eq!(tile.enhancement_count(), 1);
        assert_eq!(tile.visible_effect_count(), 3);
    }

    #[test]
    fn test_has_flag() {
        let mut tile = Tile::spawn(&knight(), 0);
        assert!(!tile.has_flag(|f| f.taunt));

        let provoke = EffectDefinition::new("Provoke", EffectKind::Buff, Duration::Rounds(1))
            .with_flags(TargetingFlags { taunt: true, ..TargetingFlags::default() });
        tile.effects.push_back(EffectInstance::new(provoke));

        assert!(tile.has_flag(|f| f.taunt));
        assert!(!tile.has_flag(|f| f.blocks_column));
    }
}
