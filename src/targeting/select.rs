//! Ranking helpers shared by the extremal and nearest strategies.
//!
//! Every pool handed in here is already in book order, so "first wins" and
//! stable sorts give the book-order tie-break for free.

use super::descriptor::{Metric, Order};
use crate::board::{SlotRef, Tile};

/// A candidate tile and where it sits.
pub(crate) type Candidate<'b> = (SlotRef, &'b Tile);

/// Book-order-first candidate with the extreme metric value.
pub(crate) fn extreme(pool: &[Candidate<'_>], metric: &Metric, order: Order) -> Option<SlotRef> {
    let mut best: Option<(SlotRef, i64)> = None;
    for &(slot, tile) in pool {
        let value = metric.value(tile);
        let better = match best {
            None => true,
            Some((_, current)) => match order {
                Order::Highest => value > current,
                Order::Lowest => value < current,
            },
        };
        if better {
            best = Some((slot, value));
        }
    }
    best.map(|(slot, _)| slot)
}

/// Up to `max` candidates by rank, book order breaking ties.
pub(crate) fn ranked(pool: &[Candidate<'_>], metric: &Metric, order: Order, max: usize) -> Vec<SlotRef> {
    let mut scored: Vec<(SlotRef, i64)> = pool.iter().map(|&(slot, tile)| (slot, metric.value(tile))).collect();
    match order {
        Order::Highest => scored.sort_by(|a, b| b.1.cmp(&a.1)),
        Order::Lowest => scored.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    scored.into_iter().take(max).map(|(slot, _)| slot).collect()
}

/// Up to `count` candidates closest by `distance`, book order breaking ties.
pub(crate) fn closest(pool: &[Candidate<'_>], count: usize, distance: impl Fn(SlotRef) -> usize) -> Vec<SlotRef> {
    let mut scored: Vec<(SlotRef, usize)> = pool.iter().map(|&(slot, _)| (slot, distance(slot))).collect();
    scored.sort_by_key(|&(_, d)| d);
    scored.into_iter().take(count).map(|(slot, _)| slot).collect()
}
