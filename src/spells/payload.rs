//! Payloads - what one cast intends to do.
//!
//! A payload is built fresh per cast and handed to the scheduler, which
//! applies the fragments and effects. Nothing here mutates a board.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::spec::{FragmentExtras, PostHook, SpellId};
use crate::board::SlotRef;
use crate::effects::EffectRef;
use crate::targeting::{ResolvedTarget, TargetDescriptor};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Damage,
    Heal,
    #[default]
    None,
}

/// Breakdown of a `roll` formula for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollDetail {
    pub die: u32,
    pub rolled: i32,
    pub base: i32,
    pub spell_power: i32,
}

/// One target's computed action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFragment {
    pub action: ActionKind,

    pub value: i32,

    #[serde(default)]
    pub ignore_armor: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_multiplier: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<RollDetail>,

    /// Heal the caster receives once this fragment lands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_heal: Option<i32>,

    /// Effects for this target only, on top of the payload's effects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectRef>,
}

impl ActionFragment {
    #[must_use]
    pub fn damage(value: i32) -> Self {
        Self {
            action: ActionKind::Damage,
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn heal(value: i32) -> Self {
        Self {
            action: ActionKind::Heal,
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_damage(&self) -> bool {
        self.action == ActionKind::Damage
    }

    /// Fold descriptor extras into this fragment.
    pub fn merge(&mut self, extras: &FragmentExtras) {
        if let Some(action) = extras.action {
            self.action = action;
        }
        if let Some(value) = extras.value {
            self.value = value;
        }
        self.value = self.value.saturating_add(extras.bonus);
        if let Some(ignore_armor) = extras.ignore_armor {
            self.ignore_armor = ignore_armor;
        }
        if extras.armor_multiplier.is_some() {
            self.armor_multiplier = extras.armor_multiplier;
        }
        self.effects.extend(extras.effects.iter().cloned());
    }
}

/// A resolved target and the fragment aimed at it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEntry {
    pub target: ResolvedTarget,
    pub fragment: ActionFragment,
}

/// The full result of building one cast.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// `None` when the spell could not be found.
    pub spell: Option<SpellId>,

    /// Descriptors as written on the spell.
    pub descriptors: Vec<TargetDescriptor>,

    /// One entry per resolved token, in resolution order.
    pub entries: SmallVec<[PayloadEntry; 4]>,

    /// Effects for every target.
    pub effects: Vec<EffectRef>,

    pub post: Vec<PostHook>,
}

impl Payload {
    /// A payload that does nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target tokens in resolution order.
    pub fn targets(&self) -> impl Iterator<Item = SlotRef> + '_ {
        self.entries.iter().map(|e| e.target.slot)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &ActionFragment> {
        self.entries.iter().map(|e| &e.fragment)
    }

    /// Entries produced by one descriptor.
    pub fn from_descriptor(&self, descriptor: usize) -> impl Iterator<Item = &PayloadEntry> {
        self.entries.iter().filter(move |e| e.target.descriptor == descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_extras() {
        let mut fragment = ActionFragment::damage(5);
        fragment.merge(&FragmentExtras {
            bonus: 2,
            ignore_armor: Some(true),
            effects: vec![EffectRef::named("Burn")],
            ..FragmentExtras::default()
        });
        assert_eq!(fragment.value, 7);
        assert!(fragment.ignore_armor);
        assert_eq!(fragment.effects, vec![EffectRef::named("Burn")]);

        fragment.merge(&FragmentExtras {
            action: Some(ActionKind::Heal),
            value: Some(1),
            armor_multiplier: Some(0.5),
            ..FragmentExtras::default()
        });
        assert_eq!(fragment.action, ActionKind::Heal);
        assert_eq!(fragment.value, 1);
        assert_eq!(fragment.armor_multiplier, Some(0.5));
        assert!(fragment.ignore_armor);
    }

    #[test]
    fn test_empty_payload() {
        let payload = Payload::empty();
        assert!(payload.is_empty());
        assert_eq!(payload.spell, None);
        assert_eq!(payload.targets().count(), 0);
    }
}
