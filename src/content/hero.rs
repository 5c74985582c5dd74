//! Hero definitions - static combatant data.
//!
//! `HeroDefinition` holds what never changes during a fight: base stats and
//! the spells a hero can cast. Per-fight state lives on `Tile`.

use serde::{Deserialize, Serialize};

use crate::spells::SpellId;

/// Unique identifier for a hero definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(pub u32);

impl HeroId {
    /// Create a new hero ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for HeroId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hero({})", self.0)
    }
}

/// Stats a tile starts from before effect modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseStats {
    pub health: i32,
    pub armor: i32,
    pub speed: i32,
    pub energy: i32,
    pub spell_power: i32,
}

impl BaseStats {
    #[must_use]
    pub const fn new(health: i32, armor: i32, speed: i32, energy: i32, spell_power: i32) -> Self {
        Self {
            health,
            armor,
            speed,
            energy,
            spell_power,
        }
    }
}

/// Static hero definition.
///
/// ```
/// use hero_tactics::content::{BaseStats, HeroDefinition, HeroId};
/// use hero_tactics::spells::SpellId;
///
/// let mage = HeroDefinition::new(HeroId::new(3), "Mage", BaseStats::new(12, 0, 3, 0, 4))
///     .with_spell(SpellId::new(10));
///
/// assert_eq!(mage.spells, vec![SpellId::new(10)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDefinition {
    pub id: HeroId,

    pub name: String,

    pub base: BaseStats,

    /// Spell slots in cast order.
    #[serde(default)]
    pub spells: Vec<SpellId>,

    /// Exempt from the speed floor.
    #[serde(default)]
    pub allow_nonpositive_speed: bool,
}

impl HeroDefinition {
    #[must_use]
    pub fn new(id: HeroId, name: impl Into<String>, base: BaseStats) -> Self {
        Self {
            id,
            name: name.into(),
            base,
            spells: Vec::new(),
            allow_nonpositive_speed: false,
        }
    }

    /// Add a spell slot (builder pattern).
    #[must_use]
    pub fn with_spell(mut self, spell: SpellId) -> Self {
        self.spells.push(spell);
        self
    }

    /// Let this hero's speed drop below the floor (builder pattern).
    #[must_use]
    pub fn allowing_nonpositive_speed(mut self) -> Self {
        self.allow_nonpositive_speed = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_id() {
        let id = HeroId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Hero(42)");
    }

    #[test]
    fn test_hero_definition_from_json() {
        let json = r#"{
            "id": 5,
            "name": "Sentinel",
            "base": { "health": 30, "armor": 4, "speed": 2 },
            "spells": [1, 2]
        }"#;
        let hero: HeroDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(hero.id, HeroId::new(5));
        assert_eq!(hero.base.health, 30);
        assert_eq!(hero.base.spell_power, 0);
        assert_eq!(hero.spells, vec![SpellId::new(1), SpellId::new(2)]);
        assert!(!hero.allow_nonpositive_speed);
    }
}
