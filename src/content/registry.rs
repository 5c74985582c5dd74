//! Content registries for definition lookup.
//!
//! Heroes and spells are keyed by numeric id, effects by name. Lookups
//! return `Option`; callers in the resolution core treat a miss as
//! "nothing to do" rather than an error.

use rustc_hash::FxHashMap;

use super::hero::{HeroDefinition, HeroId};
use crate::board::Tile;
use crate::effects::EffectDefinition;
use crate::spells::{SpellId, SpellSpec};

/// Registry of hero definitions.
///
/// ```
/// use hero_tactics::content::{BaseStats, HeroDefinition, HeroId, HeroRegistry};
///
/// let mut heroes = HeroRegistry::new();
/// heroes.register(HeroDefinition::new(HeroId::new(1), "Knight", BaseStats::new(20, 3, 2, 0, 0)));
///
/// assert_eq!(heroes.get(HeroId::new(1)).unwrap().name, "Knight");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeroRegistry {
    heroes: FxHashMap<HeroId, HeroDefinition>,
}

impl HeroRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hero definition.
    ///
    /// Panics if a hero with the same ID already exists.
    pub fn register(&mut self, hero: HeroDefinition) {
        if self.heroes.contains_key(&hero.id) {
            panic!("Hero with ID {:?} already registered", hero.id);
        }
        self.heroes.insert(hero.id, hero);
    }

    #[must_use]
    pub fn get(&self, id: HeroId) -> Option<&HeroDefinition> {
        self.heroes.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: HeroId) -> bool {
        self.heroes.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeroDefinition> {
        self.heroes.values()
    }

    /// Spawn a tile for a registered hero.
    #[must_use]
    pub fn spawn(&self, id: HeroId, instance: u32) -> Option<Tile> {
        self.get(id).map(|hero| Tile::spawn(hero, instance))
    }
}

/// Registry of spell specs.
#[derive(Clone, Debug, Default)]
pub struct SpellRegistry {
    spells: FxHashMap<SpellId, SpellSpec>,
}

impl SpellRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spell spec.
    ///
    /// Panics if a spell with the same ID already exists.
    pub fn register(&mut self, spell: SpellSpec) {
        if self.spells.contains_key(&spell.id) {
            panic!("Spell with ID {:?} already registered", spell.id);
        }
        self.spells.insert(spell.id, spell);
    }

    #[must_use]
    pub fn get(&self, id: SpellId) -> Option<&SpellSpec> {
        self.spells.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: SpellId) -> bool {
        self.spells.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellSpec> {
        self.spells.values()
    }
}

/// Registry of effect definitions, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    effects: FxHashMap<String, EffectDefinition>,
}

impl EffectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect definition.
    ///
    /// Panics if an effect with the same name already exists.
    pub fn register(&mut self, effect: EffectDefinition) {
        if self.effects.contains_key(&effect.name) {
            panic!("Effect {:?} already registered", effect.name);
        }
        self.effects.insert(effect.name.clone(), effect);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EffectDefinition> {
        self.effects.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }
}

/// All three registries, as handed to the core by the content loader.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub heroes: HeroRegistry,
    pub spells: SpellRegistry,
    pub effects: EffectRegistry,
}

impl Content {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BaseStats;
    use crate::effects::{Duration, EffectKind};
    use crate::spells::Formula;

    #[test]
    fn test_hero_register_and_spawn() {
        let mut heroes = HeroRegistry::new();
        heroes.register(HeroDefinition::new(HeroId::new(1), "Knight", BaseStats::new(20, 3, 2, 0, 1)));

        assert!(heroes.contains(HeroId::new(1)));
        assert_eq!(heroes.len(), 1);

        let tile = heroes.spawn(HeroId::new(1), 4).unwrap();
        assert_eq!(tile.instance, 4);
        assert_eq!(tile.armor, 3);

        assert!(heroes.spawn(HeroId::new(99), 0).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_hero_panics() {
        let mut heroes = HeroRegistry::new();
        heroes.register(HeroDefinition::new(HeroId::new(1), "A", BaseStats::default()));
        heroes.register(HeroDefinition::new(HeroId::new(1), "B", BaseStats::default()));
    }

    #[test]
    fn test_spell_lookup() {
        let mut spells = SpellRegistry::new();
        spells.register(SpellSpec::new(SpellId::new(3), "Jab", Formula::damage(2)));

        assert_eq!(spells.get(SpellId::new(3)).map(|s| s.name.as_str()), Some("Jab"));
        assert!(spells.get(SpellId::new(4)).is_none());
        assert!(!spells.is_empty());
    }

    #[test]
    fn test_effect_lookup_by_name() {
        let mut effects = EffectRegistry::new();
        effects.register(EffectDefinition::new("Burn", EffectKind::Debuff, Duration::Rounds(2)));

        assert!(effects.contains("Burn"));
        assert!(effects.get("burn").is_none());
        assert_eq!(effects.iter().count(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_effect_panics() {
        let mut effects = EffectRegistry::new();
        effects.register(EffectDefinition::new("Burn", EffectKind::Debuff, Duration::Rounds(2)));
        effects.register(EffectDefinition::new("Burn", EffectKind::Debuff, Duration::Rounds(3)));
    }
}
