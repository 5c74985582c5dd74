//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! The two facing halves of the battlefield. Descriptors speak in
//! `Relation` terms (ally/enemy) which are resolved against the caster's
//! side at resolution time.
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One half of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// Bottom half, facing up.
    Player,
    /// Top half, facing down.
    Opponent,
}

impl Side {
    /// Both sides in storage order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Opponent];

    /// The facing side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Storage index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    /// Resolve a caster-relative relation to a concrete side.
    ///
    /// ```
    /// use hero_tactics::core::{Relation, Side};
    ///
    /// assert_eq!(Side::Player.resolve(Relation::Ally), Side::Player);
    /// assert_eq!(Side::Player.resolve(Relation::Enemy), Side::Opponent);
    /// ```
    #[must_use]
    pub const fn resolve(self, relation: Relation) -> Side {
        match relation {
            Relation::Ally => self,
            Relation::Enemy => self.opposite(),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Side relative to the caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// The caster's own side.
    Ally,
    /// The facing side.
    #[default]
    Enemy,
}

/// Per-side data storage.
///
/// ```
/// use hero_tactics::core::{Side, SideMap};
///
/// let mut kills: SideMap<u32> = SideMap::with_value(0);
/// kills[Side::Opponent] += 2;
/// assert_eq!(kills[Side::Player], 0);
/// assert_eq!(kills[Side::Opponent], 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create from explicit per-side values.
    pub fn new(player: T, opponent: T) -> Self {
        Self { data: [player, opponent] }
    }

    /// Create with values from a factory function.
    pub fn from_fn(factory: impl Fn(Side) -> T) -> Self {
        Self::new(factory(Side::Player), factory(Side::Opponent))
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        &self.data[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.data[side.index()]
    }
}
