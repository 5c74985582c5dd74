//! Effect instances - one application of a definition to a tile.

use serde::{Deserialize, Serialize};

use super::definition::{Duration, EffectDefinition, EffectKind};
use crate::board::{BoardSet, SlotRef, Tile};
use crate::content::HeroId;
use crate::core::Side;

/// Who applied an effect.
///
/// An indexed key, not a reference: the applier may have moved or died by
/// the time a trigger needs it. Use [`Provenance::locate`] to find it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub side: Side,
    pub index: usize,
    pub hero: HeroId,
    pub instance: u32,
}

impl Provenance {
    /// Stamp for the tile currently at `slot`.
    #[must_use]
    pub fn of(slot: SlotRef, tile: &Tile) -> Self {
        Self {
            side: slot.side,
            index: slot.index,
            hero: tile.hero,
            instance: tile.instance,
        }
    }

    /// Slot the applier occupied when the effect was applied.
    #[must_use]
    pub const fn slot(&self) -> SlotRef {
        SlotRef::new(self.side, self.index)
    }

    /// True if `tile` is the applier.
    #[must_use]
    pub fn matches(&self, tile: &Tile) -> bool {
        tile.hero == self.hero && tile.instance == self.instance
    }

    /// Current slot of the applier: the recorded slot if it still holds the
    /// same hero instance, otherwise the first match on the applier's side.
    #[must_use]
    pub fn locate(&self, boards: &BoardSet) -> Option<SlotRef> {
        let recorded = self.slot();
        if boards.tile(recorded).is_some_and(|tile| self.matches(tile)) {
            return Some(recorded);
        }
        let len = boards.board(self.side).len();
        (0..len)
            .map(|index| SlotRef::new(self.side, index))
            .find(|&slot| boards.tile(slot).is_some_and(|tile| self.matches(tile)))
    }
}

/// A live effect on a tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectInstance {
    pub definition: EffectDefinition,

    /// Rounds left, counted down by the scheduler.
    pub remaining: Duration,

    /// Exempt from the visible slot cap.
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl EffectInstance {
    /// Fresh instance with the definition's duration. Passive effects are
    /// always hidden.
    #[must_use]
    pub fn new(definition: EffectDefinition) -> Self {
        let hidden = definition.hidden || definition.kind == EffectKind::Passive;
        Self {
            remaining: definition.duration,
            hidden,
            provenance: None,
            definition,
        }
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining.is_active()
    }
}
