//! Boards and board sets.
//!
//! A `Board` is one side's 9 main slots plus its reserve. A `BoardSet`
//! pairs both sides and is the snapshot the resolver and builder read.
//! Slot storage is an `im::Vector`, so `snapshot()` is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::grid::{self, MAIN_SLOTS};
use super::tile::Tile;
use crate::core::{CoreConfig, ResolveError, Side, SideMap};

/// A `{side, index}` pointer into a board set.
///
/// Indices 0–8 address main slots, 9 and above address the reserve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotRef {
    pub side: Side,
    pub index: usize,
}

impl SlotRef {
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    /// True for slots on the 3×3 grid.
    #[must_use]
    pub const fn is_main(self) -> bool {
        self.index < MAIN_SLOTS
    }

    /// Logical grid cell, `None` for reserve slots.
    #[must_use]
    pub fn cell(self) -> Option<grid::Cell> {
        grid::cell(self.side, self.index)
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

/// One side's slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    slots: Vector<Option<Tile>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl Board {
    /// An empty board with the default reserve size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty board sized by configuration.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            slots: std::iter::repeat(None)
                .take(MAIN_SLOTS + config.reserve_slots)
                .collect(),
        }
    }

    /// Total slots including the reserve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Put a tile in a slot, returning the previous occupant.
    ///
    /// Returns the tile back as `Err` if the index is past the reserve.
    pub fn place(&mut self, index: usize, tile: Tile) -> Result<Option<Tile>, Tile> {
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot.replace(tile)),
            None => Err(tile),
        }
    }

    /// Empty a slot, returning its occupant.
    pub fn remove(&mut self, index: usize) -> Option<Tile> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Occupied main slots of `side` in book order, dead tiles included.
    pub fn book_iter(&self, side: Side) -> impl Iterator<Item = (usize, &Tile)> {
        grid::book_order(side)
            .iter()
            .filter_map(move |&index| self.get(index).map(|tile| (index, tile)))
    }
}

/// Both sides' boards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSet {
    boards: SideMap<Board>,
}

impl BoardSet {
    #[must_use]
    pub fn new(player: Board, opponent: Board) -> Self {
        Self {
            boards: SideMap::new(player, opponent),
        }
    }

    #[must_use]
    pub fn board(&self, side: Side) -> &Board {
        &self.boards[side]
    }

    pub fn board_mut(&mut self, side: Side) -> &mut Board {
        &mut self.boards[side]
    }

    #[must_use]
    pub fn tile(&self, slot: SlotRef) -> Option<&Tile> {
        self.boards[slot.side].get(slot.index)
    }

    pub fn tile_mut(&mut self, slot: SlotRef) -> Option<&mut Tile> {
        self.boards[slot.side].get_mut(slot.index)
    }

    /// Put a tile in a slot, returning the previous occupant.
    pub fn place(&mut self, slot: SlotRef, tile: Tile) -> Result<Option<Tile>, ResolveError> {
        self.boards[slot.side]
            .place(slot.index, tile)
            .map_err(|_| ResolveError::SlotOutOfRange {
                side: slot.side,
                index: slot.index,
            })
    }

    pub fn remove(&mut self, slot: SlotRef) -> Option<Tile> {
        self.boards[slot.side].remove(slot.index)
    }

    /// Check that a slot exists, without requiring an occupant.
    pub fn check_slot(&self, slot: SlotRef) -> Result<(), ResolveError> {
        if slot.index < self.boards[slot.side].len() {
            Ok(())
        } else {
            Err(ResolveError::SlotOutOfRange {
                side: slot.side,
                index: slot.index,
            })
        }
    }

    /// The tile casting a spell; the slot must exist and be occupied.
    pub fn caster(&self, slot: SlotRef) -> Result<&Tile, ResolveError> {
        self.check_slot(slot)?;
        self.tile(slot).ok_or(ResolveError::EmptyCaster {
            side: slot.side,
            index: slot.index,
        })
    }

    /// Occupied main slots of a side in book order, dead tiles included.
    pub fn book_iter(&self, side: Side) -> impl Iterator<Item = (SlotRef, &Tile)> {
        self.boards[side]
            .book_iter(side)
            .map(move |(index, tile)| (SlotRef::new(side, index), tile))
    }

    /// Cheap structural copy for the scheduler to keep between casts.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}
