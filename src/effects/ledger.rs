//! Effect Ledger - applying, evicting and expiring effects on a tile.
//!
//! The ledger is the only part of the core that mutates a tile. Every
//! mutation ends with [`recompute_modifiers`], so a tile's derived stats
//! always match its effect list when control returns to the caller.

use super::definition::{Duration, EffectDefinition, EffectKind, EffectRef};
use super::instance::{EffectInstance, Provenance};
use crate::board::Tile;
use crate::content::EffectRegistry;
use crate::core::{CoreConfig, DurationError, LogSink};

/// Why an entry in an apply batch was skipped.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("effect reference has an empty name")]
    EmptyName,

    #[error("unknown effect {0:?}")]
    UnknownEffect(String),

    #[error("effect {name:?} has a bad duration: {source}")]
    BadDuration { name: String, source: DurationError },

    #[error("effect {0:?} has no rounds left")]
    Expired(String),
}

/// What one `apply` call did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyReport {
    /// Names of applied effects, in order.
    pub applied: Vec<String>,
    /// Entries that were skipped.
    pub skipped: Vec<SkipReason>,
    /// Names of effects pushed out by the visible slot cap, in order.
    pub evicted: Vec<String>,
}

/// Applies effects against an effect registry under a core config.
///
/// ```
/// use hero_tactics::content::{BaseStats, EffectRegistry, HeroDefinition, HeroId};
/// use hero_tactics::core::{CoreConfig, NullSink};
/// use hero_tactics::effects::{Duration, EffectDefinition, EffectKind, EffectLedger, EffectRef, StatModifiers};
/// use hero_tactics::board::Tile;
///
/// let mut registry = EffectRegistry::new();
/// registry.register(
///     EffectDefinition::new("Bulwark", EffectKind::Buff, Duration::Rounds(2))
///         .with_modifiers(StatModifiers { armor: 3, ..StatModifiers::default() }),
/// );
/// let config = CoreConfig::default();
/// let ledger = EffectLedger::new(&registry, &config);
///
/// let hero = HeroDefinition::new(HeroId::new(1), "Knight", BaseStats::new(20, 2, 3, 0, 0));
/// let mut tile = Tile::spawn(&hero, 0);
/// ledger.apply(&mut tile, &[EffectRef::named("Bulwark")], &mut NullSink, None);
///
/// assert_eq!(tile.armor, 5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EffectLedger<'a> {
    registry: &'a EffectRegistry,
    config: &'a CoreConfig,
}

impl<'a> EffectLedger<'a> {
    #[must_use]
    pub fn new(registry: &'a EffectRegistry, config: &'a CoreConfig) -> Self {
        Self { registry, config }
    }

    /// Apply a batch of effects to a tile.
    ///
    /// Malformed entries are skipped and reported; the rest of the batch
    /// still applies. The visible slot cap is enforced after every append
    /// and derived stats are recomputed once the batch is done.
    pub fn apply(
        &self,
        tile: &mut Tile,
        effects: &[EffectRef],
        sink: &mut dyn LogSink,
        applier: Option<Provenance>,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for effect in effects {
            let mut instance = match self.instantiate(effect) {
                Ok(instance) => instance,
                Err(reason) => {
                    tracing::warn!("Skipping effect on {}: {}", tile.hero, reason);
                    sink.push(format!("Skipped effect: {}", reason));
                    report.skipped.push(reason);
                    continue;
                }
            };
            if let Some(stamp) = applier {
                instance.provenance = Some(stamp);
            }

            let name = instance.name().to_string();
            sink.push(format!("{} gains {} ({})", tile.hero, name, describe(instance.remaining)));
            tile.effects.push_back(instance);
            report.applied.push(name);

            report.evicted.extend(self.enforce_cap(tile, sink));
        }

        recompute_modifiers(tile, self.config);
        tracing::debug!(
            "Applied {} effect(s) to {} ({} skipped, {} evicted)",
            report.applied.len(),
            tile.hero,
            report.skipped.len(),
            report.evicted.len()
        );
        report
    }

    /// Count down every timed effect by one round and drop the ones that run
    /// out. Returns the names of expired effects.
    pub fn tick_durations(&self, tile: &mut Tile, sink: &mut dyn LogSink) -> Vec<String> {
        let mut expired = Vec::new();
        let mut kept = im::Vector::new();

        for mut instance in std::mem::take(&mut tile.effects) {
            match instance.remaining.tick() {
                Some(remaining) => {
                    instance.remaining = remaining;
                    kept.push_back(instance);
                }
                None => {
                    sink.push(format!("{} expired on {}", instance.name(), tile.hero));
                    expired.push(instance.definition.name);
                }
            }
        }

        tile.effects = kept;
        recompute_modifiers(tile, self.config);
        expired
    }

    /// Drop every effect of a dead tile. Returns how many were removed.
    pub fn clear_on_death(&self, tile: &mut Tile) -> usize {
        if tile.is_alive() {
            return 0;
        }
        let removed = tile.effects.len();
        tile.effects.clear();
        recompute_modifiers(tile, self.config);
        removed
    }

    fn instantiate(&self, effect: &EffectRef) -> Result<EffectInstance, SkipReason> {
        let (definition, hidden) = match effect {
            EffectRef::Name(name) => (self.lookup(name)?.clone(), None),
            EffectRef::Inline(definition) => {
                if definition.name.trim().is_empty() {
                    return Err(SkipReason::EmptyName);
                }
                (definition.as_ref().clone(), None)
            }
            EffectRef::Override(o) => {
                let mut definition = self.lookup(&o.name)?.clone();
                if let Some(raw) = &o.duration {
                    definition.duration =
                        Duration::try_from(raw.clone()).map_err(|source| SkipReason::BadDuration {
                            name: o.name.clone(),
                            source,
                        })?;
                }
                (definition, o.hidden)
            }
        };

        if !definition.duration.is_active() {
            return Err(SkipReason::Expired(definition.name));
        }

        let mut instance = EffectInstance::new(definition);
        if let Some(hidden) = hidden {
            instance.hidden = hidden || instance.definition.kind == EffectKind::Passive;
        }
        Ok(instance)
    }

    fn lookup(&self, name: &str) -> Result<&EffectDefinition, SkipReason> {
        if name.trim().is_empty() {
            return Err(SkipReason::EmptyName);
        }
        self.registry
            .get(name)
            .ok_or_else(|| SkipReason::UnknownEffect(name.to_string()))
    }

    /// Evict the oldest visible effects until the tile is back under the cap.
    fn enforce_cap(&self, tile: &mut Tile, sink: &mut dyn LogSink) -> Vec<String> {
        let mut evicted = Vec::new();
        while tile.visible_effect_count() > self.config.visible_effect_cap {
            let Some(oldest) = tile.effects.iter().position(|e| !e.hidden) else {
                break;
            };
            let instance = tile.effects.remove(oldest);
            sink.push(format!("{} was pushed off {}", instance.name(), tile.hero));
            tracing::debug!("Evicted {} from {}", instance.name(), tile.hero);
            evicted.push(instance.definition.name);
        }
        evicted
    }
}

/// Rewrite a tile's derived stats from its base stats and active effects.
///
/// Idempotent: calling it twice leaves the tile unchanged.
pub fn recompute_modifiers(tile: &mut Tile, config: &CoreConfig) {
    let (mut armor, mut speed, mut spell_power) = (tile.base.armor, tile.base.speed, tile.base.spell_power);
    for instance in tile.effects.iter().filter(|e| e.is_active()) {
        let m = instance.definition.modifiers;
        armor = armor.saturating_add(m.armor);
        speed = speed.saturating_add(m.speed);
        spell_power = spell_power.saturating_add(m.spell_power);
    }

    tile.armor = armor;
    tile.spell_power = spell_power;
    tile.speed = floor_speed(speed, tile.allow_nonpositive_speed, config.min_speed);
}

/// Clamp speed to `min` unless the hero may sit at or below zero.
#[must_use]
pub fn floor_speed(speed: i32, allow_nonpositive: bool, min: i32) -> i32 {
    if allow_nonpositive {
        speed
    } else {
        speed.max(min)
    }
}

fn describe(duration: Duration) -> String {
    match duration {
        Duration::Rounds(1) => "1 round".to_string(),
        Duration::Rounds(n) => format!("{} rounds", n),
        Duration::Permanent => "permanent".to_string(),
    }
}
