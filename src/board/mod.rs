//! Board model: grid geometry, tiles, and per-side boards.
//!
//! - `grid`: index ↔ row/column mapping, book order, distances
//! - `Tile`: one combatant's mutable state
//! - `Board` / `BoardSet`: slot storage for one side / both sides
//! - `SlotRef`: a `{side, index}` pointer, also used as the resolved target token
//!
//! The resolver and builder only ever take `&BoardSet`. Mutation happens
//! through the effect ledger (`&mut Tile`) or the external scheduler.

pub mod grid;
mod set;
mod tile;

pub use grid::{Cell, GRID_WIDTH, MAIN_SLOTS};
pub use set::{Board, BoardSet, SlotRef};
pub use tile::{Stat, Tile};
