//! Effect definitions - static status-condition data.
//!
//! An `EffectDefinition` is registry content: what a condition does
//! (stat modifiers, a per-round pulse, trigger hooks, targeting flags) and
//! how long it lasts. Each application copies it into an `EffectInstance`.
//!
//! ## Durations
//!
//! Content authors write durations loosely: a round count, or one of
//! `"permanent"`, `"forever"`, `"infinite"`, `-1`, or an infinite float.
//! Every permanence marker normalizes to `Duration::Permanent`.

use serde::{Deserialize, Serialize};

use crate::board::Tile;
use crate::core::DurationError;
use crate::spells::SpellSpec;

/// How long an effect lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDuration", into = "RawDuration")]
pub enum Duration {
    /// Counted down once per round by the scheduler.
    Rounds(u32),
    /// Never expires on its own.
    Permanent,
}

impl Duration {
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, Duration::Permanent)
    }

    /// Still has at least one round left (or never ends).
    #[must_use]
    pub const fn is_active(self) -> bool {
        match self {
            Duration::Rounds(n) => n > 0,
            Duration::Permanent => true,
        }
    }

    /// Count down one round. `None` once the effect has run out.
    #[must_use]
    pub fn tick(self) -> Option<Duration> {
        match self {
            Duration::Rounds(n) if n > 1 => Some(Duration::Rounds(n - 1)),
            Duration::Rounds(_) => None,
            Duration::Permanent => Some(Duration::Permanent),
        }
    }
}

/// A duration as written in content, before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Count(i64),
    Real(f64),
    Marker(String),
}

impl TryFrom<RawDuration> for Duration {
    type Error = DurationError;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        match raw {
            RawDuration::Count(-1) => Ok(Duration::Permanent),
            RawDuration::Count(n) if n <= 0 => Err(DurationError::NotPositive(n)),
            RawDuration::Count(n) => Ok(Duration::Rounds(u32::try_from(n).unwrap_or(u32::MAX))),
            RawDuration::Real(f) if f.is_infinite() => Ok(Duration::Permanent),
            RawDuration::Real(f) if f.fract() != 0.0 || f.is_nan() => Err(DurationError::Fractional(f)),
            RawDuration::Real(f) => Duration::try_from(RawDuration::Count(f as i64)),
            RawDuration::Marker(text) => {
                let marker = text.trim().to_ascii_lowercase();
                match marker.as_str() {
                    "permanent" | "forever" | "infinite" | "infinity" | "inf" => Ok(Duration::Permanent),
                    _ => match marker.parse::<i64>() {
                        Ok(n) => Duration::try_from(RawDuration::Count(n)),
                        Err(_) => Err(DurationError::UnknownMarker(text)),
                    },
                }
            }
        }
    }
}

impl From<Duration> for RawDuration {
    fn from(duration: Duration) -> Self {
        match duration {
            Duration::Rounds(n) => RawDuration::Count(i64::from(n)),
            Duration::Permanent => RawDuration::Marker("permanent".to_string()),
        }
    }
}

/// Broad category of an effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Buff,
    Debuff,
    #[default]
    Neutral,
    /// Always hidden; never takes a visible slot.
    Passive,
}

/// Flat deltas added to a tile's base stats while the effect is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatModifiers {
    pub armor: i32,
    pub speed: i32,
    pub spell_power: i32,
}

impl StatModifiers {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PulseKind {
    Heal,
    Damage,
}

/// Where a pulse's magnitude comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum PulseSource {
    Flat { value: i32 },
    RoundNumber {
        #[serde(default = "one")]
        multiplier: i32,
    },
    CurrentArmor,
}

fn one() -> i32 {
    1
}

/// Periodic heal or damage applied by the scheduler at round start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pulse {
    pub kind: PulseKind,
    pub amount: PulseSource,
}

impl Pulse {
    /// Magnitude of this pulse for a host tile in a given round.
    #[must_use]
    pub fn amount(&self, host: &Tile, round: u32) -> i32 {
        match self.amount {
            PulseSource::Flat { value } => value,
            PulseSource::RoundNumber { multiplier } => {
                i32::try_from(round).unwrap_or(i32::MAX).saturating_mul(multiplier)
            }
            PulseSource::CurrentArmor => host.armor.max(0),
        }
    }
}

/// Events an effect can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerEvent {
    RoundStart,
    Damaged,
    Targeted,
    Death,
    Kill,
    AdjacentDamaged,
}

/// What an effect does when its event fires. Interpreted by the scheduler.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerHook {
    /// A mini spell cast by the host.
    pub spell: Option<Box<SpellSpec>>,
    /// Effects applied to the host.
    pub effects: Vec<EffectRef>,
    /// Heal sent back to whoever applied the effect.
    pub heal_applier: i32,
    /// Damage reflected to the attacker.
    pub reflect: i32,
}

/// Per-event hooks of an effect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerHooks {
    pub on_round_start: Option<TriggerHook>,
    pub on_damaged: Option<TriggerHook>,
    pub on_targeted: Option<TriggerHook>,
    pub on_death: Option<TriggerHook>,
    pub on_kill: Option<TriggerHook>,
    pub on_adjacent_damaged: Option<TriggerHook>,
}

impl TriggerHooks {
    #[must_use]
    pub fn get(&self, event: TriggerEvent) -> Option<&TriggerHook> {
        match event {
            TriggerEvent::RoundStart => self.on_round_start.as_ref(),
            TriggerEvent::Damaged => self.on_damaged.as_ref(),
            TriggerEvent::Targeted => self.on_targeted.as_ref(),
            TriggerEvent::Death => self.on_death.as_ref(),
            TriggerEvent::Kill => self.on_kill.as_ref(),
            TriggerEvent::AdjacentDamaged => self.on_adjacent_damaged.as_ref(),
        }
    }

    pub fn set(&mut self, event: TriggerEvent, hook: TriggerHook) {
        let slot = match event {
            TriggerEvent::RoundStart => &mut self.on_round_start,
            TriggerEvent::Damaged => &mut self.on_damaged,
            TriggerEvent::Targeted => &mut self.on_targeted,
            TriggerEvent::Death => &mut self.on_death,
            TriggerEvent::Kill => &mut self.on_kill,
            TriggerEvent::AdjacentDamaged => &mut self.on_adjacent_damaged,
        };
        *slot = Some(hook);
    }
}

/// Flags the target resolver reads off a tile's effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetingFlags {
    /// Cannot be the destination of a single-target spell.
    pub single_target_immune: bool,
    /// Single-target enemy spells must pick a taunting tile if one exists.
    pub taunt: bool,
    /// The carrier's single-target enemy spells pick the lowest armor.
    pub focus_lowest_armor: bool,
    /// Stops column traversal behind this tile.
    pub blocks_column: bool,
    /// Area spells aimed at this side land on this tile alone.
    pub draws_area: bool,
}

/// Static effect definition.
///
/// ```
/// use hero_tactics::effects::{Duration, EffectDefinition, EffectKind, StatModifiers};
///
/// let bulwark = EffectDefinition::new("Bulwark", EffectKind::Buff, Duration::Rounds(2))
///     .with_modifiers(StatModifiers { armor: 3, ..StatModifiers::default() });
///
/// assert_eq!(bulwark.modifiers.armor, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDefinition {
    pub name: String,

    pub kind: EffectKind,

    pub duration: Duration,

    #[serde(default, skip_serializing_if = "StatModifiers::is_zero")]
    pub modifiers: StatModifiers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse: Option<Pulse>,

    #[serde(default)]
    pub hooks: TriggerHooks,

    #[serde(default)]
    pub flags: TargetingFlags,

    /// Applied hidden: exempt from the visible slot cap.
    #[serde(default)]
    pub hidden: bool,
}

impl EffectDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: Duration) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            modifiers: StatModifiers::default(),
            pulse: None,
            hooks: TriggerHooks::default(),
            flags: TargetingFlags::default(),
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: StatModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = Some(pulse);
        self
    }

    #[must_use]
    pub fn with_hook(mut self, event: TriggerEvent, hook: TriggerHook) -> Self {
        self.hooks.set(event, hook);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TargetingFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A reference to an effect inside spell specs and trigger hooks.
///
/// Written in content as a bare name, a name with overrides, or a full
/// inline definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectRef {
    /// Registry lookup by name.
    Name(String),
    /// A one-off definition carried by the spell itself.
    Inline(Box<EffectDefinition>),
    /// Registry lookup with per-application overrides.
    Override(EffectOverride),
}

/// Per-application overrides of a registered effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectOverride {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<RawDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl EffectRef {
    /// Reference a registered effect by name.
    pub fn named(name: impl Into<String>) -> Self {
        EffectRef::Name(name.into())
    }

    /// Reference a registered effect with a different duration.
    pub fn with_duration(name: impl Into<String>, duration: RawDuration) -> Self {
        EffectRef::Override(EffectOverride {
            name: name.into(),
            duration: Some(duration),
            hidden: None,
        })
    }

    /// Carry a definition inline.
    pub fn inline(definition: EffectDefinition) -> Self {
        EffectRef::Inline(Box::new(definition))
    }

    /// Name of the referenced effect.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            EffectRef::Name(name) => name,
            EffectRef::Inline(definition) => &definition.name,
            EffectRef::Override(o) => &o.name,
        }
    }
}

impl From<&str> for EffectRef {
    fn from(name: &str) -> Self {
        EffectRef::named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BaseStats, HeroDefinition, HeroId};

    fn normalize(raw: RawDuration) -> Result<Duration, DurationError> {
        Duration::try_from(raw)
    }

    #[test]
    fn test_permanence_markers() {
        for raw in [
            RawDuration::Count(-1),
            RawDuration::Real(f64::INFINITY),
            RawDuration::Real(-1.0),
            RawDuration::Marker("permanent".into()),
            RawDuration::Marker("Forever".into()),
            RawDuration::Marker(" infinite ".into()),
        ] {
            assert_eq!(normalize(raw), Ok(Duration::Permanent));
        }
    }

    #[test]
    fn test_round_counts() {
        assert_eq!(normalize(RawDuration::Count(3)), Ok(Duration::Rounds(3)));
        assert_eq!(normalize(RawDuration::Real(2.0)), Ok(Duration::Rounds(2)));
        assert_eq!(normalize(RawDuration::Marker("4".into())), Ok(Duration::Rounds(4)));
    }

    #[test]
    fn test_malformed_durations() {
        assert_eq!(normalize(RawDuration::Count(0)), Err(DurationError::NotPositive(0)));
        assert_eq!(normalize(RawDuration::Count(-3)), Err(DurationError::NotPositive(-3)));
        assert!(matches!(normalize(RawDuration::Real(1.5)), Err(DurationError::Fractional(_))));
        assert!(matches!(normalize(RawDuration::Real(f64::NAN)), Err(DurationError::Fractional(_))));
        assert_eq!(
            normalize(RawDuration::Marker("soon".into())),
            Err(DurationError::UnknownMarker("soon".into()))
        );
    }

    #[test]
    fn test_duration_tick() {
        assert_eq!(Duration::Rounds(2).tick(), Some(Duration::Rounds(1)));
        assert_eq!(Duration::Rounds(1).tick(), None);
        assert_eq!(Duration::Permanent.tick(), Some(Duration::Permanent));
        assert!(!Duration::Rounds(0).is_active());
    }

    #[test]
    fn test_duration_json() {
        let d: Duration = serde_json::from_str("\"forever\"").unwrap();
        assert_eq!(d, Duration::Permanent);
        let d: Duration = serde_json::from_str("-1").unwrap();
        assert_eq!(d, Duration::Permanent);
        let d: Duration = serde_json::from_str("2").unwrap();
        assert_eq!(d, Duration::Rounds(2));
        assert!(serde_json::from_str::<Duration>("0").is_err());

        assert_eq!(serde_json::to_string(&Duration::Permanent).unwrap(), "\"permanent\"");
        assert_eq!(serde_json::to_string(&Duration::Rounds(3)).unwrap(), "3");
    }

    #[test]
    fn test_pulse_amounts() {
        let hero = HeroDefinition::new(HeroId::new(1), "Golem", BaseStats::new(30, 5, 1, 0, 0));
        let host = Tile::spawn(&hero, 0);

        let flat = Pulse { kind: PulseKind::Damage, amount: PulseSource::Flat { value: 2 } };
        let rising = Pulse { kind: PulseKind::Damage, amount: PulseSource::RoundNumber { multiplier: 2 } };
        let plated = Pulse { kind: PulseKind::Heal, amount: PulseSource::CurrentArmor };

        assert_eq!(flat.amount(&host, 9), 2);
        assert_eq!(rising.amount(&host, 3), 6);
        assert_eq!(plated.amount(&host, 1), 5);
    }

    #[test]
    fn test_effect_ref_forms() {
        let refs: Vec<EffectRef> = serde_json::from_str(
            r#"[
                "Burn",
                { "name": "Ward", "duration": "forever" },
                { "name": "Hex", "kind": "debuff", "duration": 2, "modifiers": { "armor": -2 } }
            ]"#,
        )
        .unwrap();

        assert_eq!(refs[0], EffectRef::named("Burn"));
        assert!(matches!(&refs[1], EffectRef::Override(o) if o.duration == Some(RawDuration::Marker("forever".into()))));
        match &refs[2] {
            EffectRef::Inline(def) => {
                assert_eq!(def.kind, EffectKind::Debuff);
                assert_eq!(def.modifiers.armor, -2);
            }
            other => panic!("Expected inline definition, got {:?}", other),
        }
        assert_eq!(refs[2].name(), "Hex");
    }

    #[test]
    fn test_definition_json_defaults() {
        let def: EffectDefinition = serde_json::from_str(
            r#"{ "name": "Stoneskin", "kind": "buff", "duration": "permanent",
                 "flags": { "singleTargetImmune": true } }"#,
        )
        .unwrap();

        assert_eq!(def.duration, Duration::Permanent);
        assert!(def.flags.single_target_immune);
        assert!(!def.flags.taunt);
        assert!(def.pulse.is_none());
        assert!(def.hooks.get(TriggerEvent::Death).is_none());
    }
}
