//! Board geometry.
//!
//! Each side owns a 3×3 grid addressed by index 0–8 in screen order
//! (`index / 3` is the screen row, `index % 3` the screen column). The two
//! grids face each other across the middle of the screen:
//!
//! ```text
//!   screen row 0   [0][1][2]   opponent back row
//!   screen row 1   [3][4][5]
//!   screen row 2   [6][7][8]   opponent front row
//!   ------------------------
//!   screen row 3   [0][1][2]   player front row
//!   screen row 4   [3][4][5]
//!   screen row 5   [6][7][8]   player back row
//! ```
//!
//! Logical coordinates are seen from each side's own seat: row 0 is the
//! front row, column 0 is the side's own left. The opponent therefore has
//! both axes flipped. **Book order** reads a side's logical grid front to
//! back, left to right, and breaks every selection tie.

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Width and height of a side's grid.
pub const GRID_WIDTH: usize = 3;

/// Number of main (targetable) slots per side.
pub const MAIN_SLOTS: usize = GRID_WIDTH * GRID_WIDTH;

const PLAYER_BOOK: [usize; MAIN_SLOTS] = [0, 1, 2, 3, 4, 5, 6, 7, 8];
const OPPONENT_BOOK: [usize; MAIN_SLOTS] = [8, 7, 6, 5, 4, 3, 2, 1, 0];

/// A logical grid position seen from the owning side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// 0 = front, 2 = back.
    pub row: usize,
    /// 0 = the side's own left.
    pub column: usize,
}

impl Cell {
    /// Manhattan distance between two cells of the same grid.
    #[must_use]
    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Logical cell of a main-slot index, `None` for reserve or out-of-range.
#[must_use]
pub fn cell(side: Side, index: usize) -> Option<Cell> {
    if index >= MAIN_SLOTS {
        return None;
    }
    let (row, column) = (index / GRID_WIDTH, index % GRID_WIDTH);
    Some(match side {
        Side::Player => Cell { row, column },
        Side::Opponent => Cell {
            row: GRID_WIDTH - 1 - row,
            column: GRID_WIDTH - 1 - column,
        },
    })
}

/// Main-slot index of a logical cell.
#[must_use]
pub fn index_of(side: Side, cell: Cell) -> usize {
    match side {
        Side::Player => cell.row * GRID_WIDTH + cell.column,
        Side::Opponent => {
            (GRID_WIDTH - 1 - cell.row) * GRID_WIDTH + (GRID_WIDTH - 1 - cell.column)
        }
    }
}

/// Every main-slot index of a side in book order.
#[must_use]
pub fn book_order(side: Side) -> &'static [usize; MAIN_SLOTS] {
    match side {
        Side::Player => &PLAYER_BOOK,
        Side::Opponent => &OPPONENT_BOOK,
    }
}

/// Position of an index within its side's book order.
#[must_use]
pub fn book_rank(side: Side, index: usize) -> usize {
    book_order(side)
        .iter()
        .position(|&i| i == index)
        .unwrap_or(MAIN_SLOTS)
}

/// Indices of one logical row, left to right.
#[must_use]
pub fn row_indices(side: Side, row: usize) -> [usize; GRID_WIDTH] {
    std::array::from_fn(|column| index_of(side, Cell { row, column }))
}

/// Indices of one logical column, front to back.
#[must_use]
pub fn column_indices(side: Side, column: usize) -> [usize; GRID_WIDTH] {
    std::array::from_fn(|row| index_of(side, Cell { row, column }))
}

/// Map a column seen from one side onto the facing side so the two line up.
#[must_use]
pub const fn mirror_column(column: usize) -> usize {
    GRID_WIDTH - 1 - column
}

/// Position on the combined screen grid spanning both boards, as (x, y).
#[must_use]
pub fn virtual_position(side: Side, index: usize) -> (usize, usize) {
    let (row, column) = (index / GRID_WIDTH, index % GRID_WIDTH);
    match side {
        Side::Opponent => (column, row),
        Side::Player => (column, row + GRID_WIDTH),
    }
}

/// Manhattan distance on the combined screen grid.
#[must_use]
pub fn virtual_distance(a: (Side, usize), b: (Side, usize)) -> usize {
    let (ax, ay) = virtual_position(a.0, a.1);
    let (bx, by) = virtual_position(b.0, b.1);
    ax.abs_diff(bx) + ay.abs_diff(by)
}
