//! Target descriptors - data-described targeting intents.
//!
//! A descriptor is a closed enum of selection strategies plus the fields
//! every strategy shares (which side, whether to skip the caster). Content
//! writes them as tagged JSON:
//!
//! ```json
//! { "type": "extremal", "metric": "health", "order": "lowest", "max": 2 }
//! { "type": "column", "side": "enemy" }
//! { "type": "self" }
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{SlotRef, Stat, Tile};
use crate::core::Relation;
use crate::effects::EffectKind;

/// A resolved `{side, index}` pointer.
pub type TargetToken = SlotRef;

/// One targeting intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescriptor {
    #[serde(flatten)]
    pub kind: TargetKind,

    /// Side to search, relative to the caster.
    #[serde(default)]
    pub side: Relation,

    /// Drop the caster's own tile from the candidates.
    #[serde(default)]
    pub exclude_self: bool,
}

impl TargetDescriptor {
    #[must_use]
    pub fn enemy(kind: TargetKind) -> Self {
        Self {
            kind,
            side: Relation::Enemy,
            exclude_self: false,
        }
    }

    #[must_use]
    pub fn ally(kind: TargetKind) -> Self {
        Self {
            kind,
            side: Relation::Ally,
            exclude_self: false,
        }
    }

    /// The caster's own tile.
    #[must_use]
    pub fn caster() -> Self {
        Self::ally(TargetKind::Caster)
    }

    /// Skip the caster (builder pattern).
    #[must_use]
    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    #[must_use]
    pub fn is_self(&self) -> bool {
        matches!(self.kind, TargetKind::Caster)
    }

    /// A bulk shape over the board: whole board, a column, or rows.
    /// Positional kinds such as `adjacent` are not area kinds.
    #[must_use]
    pub fn is_area(&self) -> bool {
        matches!(
            self.kind,
            TargetKind::Board
                | TargetKind::Column { .. }
                | TargetKind::FrontTwoRows
                | TargetKind::BackRow
                | TargetKind::FrontmostRowWithHero
                | TargetKind::RowOf { .. }
                | TargetKind::RowWithHighestSum { .. }
        )
    }

    /// Picks exactly one tile from a pool; taunt and focus apply here.
    #[must_use]
    pub fn is_single_pick(&self) -> bool {
        match self.kind {
            TargetKind::Nearest { count } => count == 1,
            TargetKind::Extremal { max, .. } => max.map_or(true, |n| n == 1),
            TargetKind::ReverseBook => true,
            _ => false,
        }
    }
}

/// Selection strategy of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TargetKind {
    /// The caster's own tile.
    #[serde(rename = "self")]
    Caster,

    /// Every living tile on the side.
    Board,

    /// A caster-relative column, front to back. Defaults to the caster's
    /// own column.
    Column {
        #[serde(default)]
        column: Option<usize>,
    },

    FrontTwoRows,

    BackRow,

    /// The first row, front to back, with anyone alive in it.
    FrontmostRowWithHero,

    /// Tiles next to the most recently resolved target.
    Adjacent,

    /// Tiles next to the effect owner, or the caster without one.
    AdjacentToSelf,

    /// Closest tiles on the combined grid.
    Nearest {
        #[serde(default = "one")]
        count: usize,
    },

    /// Closest dead tiles on the caster's side.
    NearestDeadAlly {
        #[serde(default = "one")]
        count: usize,
    },

    /// Highest or lowest by a metric; `max` asks for several.
    Extremal {
        metric: Metric,
        order: Order,
        #[serde(default)]
        max: Option<usize>,
    },

    /// The whole row of the highest/lowest tile by a metric.
    RowOf { metric: Metric, order: Order },

    /// The row whose summed stat is highest.
    RowWithHighestSum { stat: Stat },

    /// The book-order-last tile.
    ReverseBook,

    /// An explicit slot.
    Direct { target: SlotRef },
}

fn one() -> usize {
    1
}

impl TargetKind {
    #[must_use]
    pub fn highest(metric: Metric) -> Self {
        TargetKind::Extremal {
            metric,
            order: Order::Highest,
            max: None,
        }
    }

    #[must_use]
    pub fn lowest(metric: Metric) -> Self {
        TargetKind::Extremal {
            metric,
            order: Order::Lowest,
            max: None,
        }
    }

    /// Several tiles ranked by a metric.
    #[must_use]
    pub fn ranked(metric: Metric, order: Order, max: usize) -> Self {
        TargetKind::Extremal {
            metric,
            order,
            max: Some(max),
        }
    }
}

/// What an extremal descriptor ranks tiles by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Energy,
    Speed,
    Armor,
    Health,
    SpeedPlusArmor,
    /// Number of buff effects.
    Buffs,
    /// Number of debuff effects.
    Debuffs,
    /// Stacks of one named effect.
    Effect(String),
}

impl Metric {
    #[must_use]
    pub fn value(&self, tile: &Tile) -> i64 {
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        match self {
            Metric::Energy => tile.stat(Stat::Energy).into(),
            Metric::Speed => tile.stat(Stat::Speed).into(),
            Metric::Armor => tile.stat(Stat::Armor).into(),
            Metric::Health => tile.stat(Stat::Health).into(),
            Metric::SpeedPlusArmor => i64::from(tile.speed) + i64::from(tile.armor),
            Metric::Buffs => count(tile.count_kind(EffectKind::Buff)),
            Metric::Debuffs => count(tile.count_kind(EffectKind::Debuff)),
            Metric::Effect(name) => count(tile.count_named(name)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Order {
    Highest,
    Lowest,
}

/// A token tagged with the descriptor that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTarget {
    pub slot: TargetToken,
    pub descriptor: usize,
}

/// More than one non-self descriptor, or any area descriptor.
///
/// A lone counted pick such as "the two lowest" stays single-target, so it
/// still honors single-target immunity.
#[must_use]
pub fn is_multi_target(descriptors: &[TargetDescriptor]) -> bool {
    descriptors.iter().filter(|d| !d.is_self()).count() > 1 || descriptors.iter().any(TargetDescriptor::is_area)
}
