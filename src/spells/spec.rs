//! Spell specs - static, data-described spells.
//!
//! A spec pairs an ordered list of target descriptors with a formula that
//! produces one action fragment per resolved target. Everything else on
//! a spell spec adjusts those fragments or rides along for the scheduler.

use serde::{Deserialize, Serialize};

use super::payload::ActionKind;
use crate::board::Tile;
use crate::effects::EffectRef;
use crate::targeting::TargetDescriptor;

/// Unique identifier for a spell spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub u32);

impl SpellId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spell({})", self.0)
    }
}

/// Static spell definition.
///
/// ```
/// use hero_tactics::spells::{Formula, SpellId, SpellSpec};
/// use hero_tactics::targeting::{Metric, TargetDescriptor, TargetKind};
///
/// let spec: SpellSpec = serde_json::from_str(r#"{
///     "id": 4,
///     "name": "Cleave",
///     "targets": [{ "type": "extremal", "metric": "health", "order": "lowest" }],
///     "formula": { "type": "attackPower", "value": 5, "addCasterArmor": true }
/// }"#).unwrap();
///
/// assert_eq!(spec.id, SpellId::new(4));
/// assert_eq!(spec.targets[0], TargetDescriptor::enemy(TargetKind::lowest(Metric::Health)));
/// assert!(matches!(spec.formula, Formula::AttackPower(ref ap) if ap.add_caster_armor));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSpec {
    pub id: SpellId,

    pub name: String,

    /// Targeting intents, resolved in order.
    #[serde(default)]
    pub targets: Vec<TargetDescriptor>,

    pub formula: Formula,

    /// Effects the scheduler applies to every resolved target.
    #[serde(default)]
    pub effects: Vec<EffectRef>,

    /// Hints the scheduler runs after the cast lands.
    #[serde(default)]
    pub post: Vec<PostHook>,

    /// Fragment adjustments keyed by descriptor position.
    #[serde(default)]
    pub extras: Vec<FragmentExtras>,

    /// Heal allies instead of applying the base fragment to them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ally_heal: Option<AllyHeal>,

    /// Health-comparison branch that replaces the formula per target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain: Option<DrainBranch>,

    /// Every damage fragment gains `targets × multiplier`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count_multiplier: Option<i32>,
}

impl SpellSpec {
    #[must_use]
    pub fn new(id: SpellId, name: impl Into<String>, formula: Formula) -> Self {
        Self {
            id,
            name: name.into(),
            targets: Vec::new(),
            formula,
            effects: Vec::new(),
            post: Vec::new(),
            extras: Vec::new(),
            ally_heal: None,
            drain: None,
            target_count_multiplier: None,
        }
    }

    /// Append a target descriptor (builder pattern).
    #[must_use]
    pub fn targeting(mut self, descriptor: TargetDescriptor) -> Self {
        self.targets.push(descriptor);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<EffectRef>) -> Self {
        self.effects.push(effect.into());
        self
    }

    #[must_use]
    pub fn with_post(mut self, hook: PostHook) -> Self {
        self.post.push(hook);
        self
    }

    /// Set the extras of one descriptor position.
    #[must_use]
    pub fn with_extras(mut self, descriptor: usize, extras: FragmentExtras) -> Self {
        if self.extras.len() <= descriptor {
            self.extras.resize_with(descriptor + 1, FragmentExtras::default);
        }
        self.extras[descriptor] = extras;
        self
    }

    #[must_use]
    pub fn with_ally_heal(mut self, heal: AllyHeal) -> Self {
        self.ally_heal = Some(heal);
        self
    }

    #[must_use]
    pub fn with_drain(mut self, drain: DrainBranch) -> Self {
        self.drain = Some(drain);
        self
    }

    #[must_use]
    pub fn with_target_count_multiplier(mut self, multiplier: i32) -> Self {
        self.target_count_multiplier = Some(multiplier);
        self
    }
}

/// How a spell computes its base fragment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Formula {
    /// Weapon-style damage scaled by spell power.
    AttackPower(AttackPower),

    /// Fixed damage through armor, unaffected by spell power.
    Damage { value: i32 },

    /// `1..=die` plus a base, plus spell power unless ignored.
    Roll {
        die: u32,
        #[serde(default)]
        value: i32,
        #[serde(default)]
        ignore_spell_power: bool,
    },

    /// Heal scaled by spell power.
    HealPower { value: i32 },

    /// Flat heal.
    Heal { value: i32 },

    /// No damage or heal; the spell only carries effects.
    #[serde(rename = "none")]
    EffectOnly,
}

impl Formula {
    #[must_use]
    pub fn attack_power(value: i32) -> Self {
        Formula::AttackPower(AttackPower::new(value))
    }

    #[must_use]
    pub fn damage(value: i32) -> Self {
        Formula::Damage { value }
    }

    #[must_use]
    pub fn roll(die: u32, value: i32) -> Self {
        Formula::Roll {
            die,
            value,
            ignore_spell_power: false,
        }
    }

    #[must_use]
    pub fn heal_power(value: i32) -> Self {
        Formula::HealPower { value }
    }

    #[must_use]
    pub fn heal(value: i32) -> Self {
        Formula::Heal { value }
    }

    /// Per-target adjustment requested by the formula, if any.
    #[must_use]
    pub fn per_target(&self) -> Option<&PerTargetBonus> {
        match self {
            Formula::AttackPower(ap) => ap.per_target.as_ref(),
            _ => None,
        }
    }
}

/// Parameters of the `attackPower` formula.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackPower {
    pub value: i32,

    #[serde(default)]
    pub ignore_spell_power: bool,

    /// Add half the caster's missing health, rounded down.
    #[serde(default)]
    pub add_half_missing_health: bool,

    /// Add the caster's current armor.
    #[serde(default)]
    pub add_caster_armor: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_multiplier: Option<f32>,

    #[serde(default)]
    pub ignore_armor: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_target: Option<PerTargetBonus>,
}

impl AttackPower {
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ignoring_spell_power(mut self) -> Self {
        self.ignore_spell_power = true;
        self
    }

    #[must_use]
    pub fn adding_half_missing_health(mut self) -> Self {
        self.add_half_missing_health = true;
        self
    }

    #[must_use]
    pub fn adding_caster_armor(mut self) -> Self {
        self.add_caster_armor = true;
        self
    }

    #[must_use]
    pub fn with_armor_multiplier(mut self, multiplier: f32) -> Self {
        self.armor_multiplier = Some(multiplier);
        self
    }

    #[must_use]
    pub fn ignoring_armor(mut self) -> Self {
        self.ignore_armor = true;
        self
    }

    #[must_use]
    pub fn per_target(mut self, bonus: PerTargetBonus) -> Self {
        self.per_target = Some(bonus);
        self
    }
}

impl From<AttackPower> for Formula {
    fn from(ap: AttackPower) -> Self {
        Formula::AttackPower(ap)
    }
}

/// Adjustment to the base value that depends on the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PerTargetBonus {
    /// Add the target's missing health; `cap` bounds the resulting total.
    MissingHealth {
        #[serde(default)]
        cap: Option<i32>,
    },
    TargetArmor,
    TargetSpeed,
    /// Add the target's speed divided by `divisor`.
    SpeedDivisor {
        divisor: i32,
        #[serde(default)]
        round_up: bool,
    },
    /// Add stacks of a named effect times a multiplier.
    NamedEffectCount {
        name: String,
        #[serde(default = "one")]
        multiplier: i32,
    },
    /// Add hidden enhancement markers times a multiplier.
    EnhancementCount {
        #[serde(default = "one")]
        multiplier: i32,
    },
    /// Add buffs times a multiplier.
    BuffCount {
        #[serde(default = "one")]
        multiplier: i32,
    },
}

fn one() -> i32 {
    1
}

impl PerTargetBonus {
    /// The adjusted total, or `None` if it cannot be computed.
    #[must_use]
    pub fn apply(&self, base: i32, target: &Tile) -> Option<i32> {
        let count = |n: usize, multiplier: i32| i32::try_from(n).ok()?.checked_mul(multiplier);
        match self {
            PerTargetBonus::MissingHealth { cap } => {
                let total = base.checked_add(target.missing_health())?;
                Some(cap.map_or(total, |cap| total.min(cap)))
            }
            PerTargetBonus::TargetArmor => base.checked_add(target.armor),
            PerTargetBonus::TargetSpeed => base.checked_add(target.speed),
            PerTargetBonus::SpeedDivisor { divisor, round_up } => {
                base.checked_add(divide(target.speed, *divisor, *round_up)?)
            }
            PerTargetBonus::NamedEffectCount { name, multiplier } => {
                base.checked_add(count(target.count_named(name), *multiplier)?)
            }
            PerTargetBonus::EnhancementCount { multiplier } => {
                base.checked_add(count(target.enhancement_count(), *multiplier)?)
            }
            PerTargetBonus::BuffCount { multiplier } => {
                base.checked_add(count(target.count_kind(crate::effects::EffectKind::Buff), *multiplier)?)
            }
        }
    }
}

/// Floor or ceiling division; `None` for a zero divisor or overflow.
fn divide(dividend: i32, divisor: i32, round_up: bool) -> Option<i32> {
    let quotient = dividend.checked_div(divisor)?;
    let remainder = dividend.checked_rem(divisor)?;
    if remainder == 0 {
        return Some(quotient);
    }
    let positive = (remainder > 0) == (divisor > 0);
    match (round_up, positive) {
        (true, true) => quotient.checked_add(1),
        (false, false) => quotient.checked_sub(1),
        _ => Some(quotient),
    }
}

/// Heal substituted for the base fragment on the caster's own side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllyHeal {
    pub value: i32,
    /// Ignore spell power.
    #[serde(default)]
    pub flat: bool,
}

/// Two preset outcomes chosen by comparing caster and target health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainBranch {
    pub when: DrainCondition,
    pub then: DrainOutcome,
    pub otherwise: DrainOutcome,
}

impl DrainBranch {
    /// Outcome for one caster/target pair.
    #[must_use]
    pub fn outcome(&self, caster: &Tile, target: &Tile) -> DrainOutcome {
        let holds = match self.when {
            DrainCondition::CasterBelowTarget => caster.health < target.health,
            DrainCondition::CasterAboveTarget => caster.health > target.health,
        };
        if holds {
            self.then
        } else {
            self.otherwise
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrainCondition {
    CasterBelowTarget,
    CasterAboveTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainOutcome {
    pub damage: i32,
    /// Heal signalled back to the caster.
    #[serde(default)]
    pub self_heal: i32,
}

/// Post-cast hints; the scheduler decides when and how they run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PostHook {
    /// A follow-up heal for the caster or the effect owner.
    SecondaryHeal {
        value: i32,
        #[serde(default)]
        recipient: HealRecipient,
        #[serde(default)]
        flat: bool,
    },
    /// Effects applied to the caster.
    SelfEffects { effects: Vec<EffectRef> },
    /// Effects applied to the caster when a condition holds.
    Conditional { when: PostCondition, effects: Vec<EffectRef> },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealRecipient {
    #[default]
    Caster,
    Owner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostCondition {
    /// Any target died from the cast.
    TargetKilled,
    /// Every target survived.
    TargetSurvived,
    /// The caster is at or below half health after the cast.
    CasterBelowHalf,
}

/// Fragment adjustments for every target of one descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FragmentExtras {
    /// Replace the fragment's action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    /// Replace the fragment's value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    /// Add to the fragment's value.
    pub bonus: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_armor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor_multiplier: Option<f32>,
    /// Effects for these targets only.
    pub effects: Vec<EffectRef>,
}
