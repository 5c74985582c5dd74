//! Target resolution - descriptors to concrete tokens.
//!
//! Descriptors resolve in order into one accumulating list, so `adjacent`
//! can anchor on whatever the previous descriptor found. A descriptor with
//! no eligible candidates contributes nothing; it never stops the ones
//! after it.
//!
//! ## Protections
//!
//! Effects on tiles bend resolution through their targeting flags:
//!
//! - `singleTargetImmune`: skipped by single-target spells unless bypassed
//! - `taunt`: single-pick enemy descriptors must pick a taunting tile
//! - `focusLowestArmor` (on the caster): single-pick enemy descriptors
//!   resolve as lowest armor
//! - `blocksColumn`: column traversal stops after this tile
//! - `drawsArea`: every enemy-side pick of a multi-target spell lands on
//!   this tile alone unless bypassed

use super::descriptor::{is_multi_target, Metric, ResolvedTarget, TargetDescriptor, TargetKind};
use super::select::{self, Candidate};
use crate::board::{grid, BoardSet, SlotRef, Stat, Tile, GRID_WIDTH};
use crate::core::{Relation, ResolveError, Side};

/// Caller-side switches for one resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Ignore single-target immunity and area redirection (basic attacks).
    pub bypass_triggers: bool,

    /// Search this side for every side-relative descriptor.
    pub force_side: Option<Relation>,
}

impl ResolveOptions {
    #[must_use]
    pub fn bypassing_triggers(mut self) -> Self {
        self.bypass_triggers = true;
        self
    }

    #[must_use]
    pub fn force_enemy_side(mut self) -> Self {
        self.force_side = Some(Relation::Enemy);
        self
    }

    #[must_use]
    pub fn force_ally_side(mut self) -> Self {
        self.force_side = Some(Relation::Ally);
        self
    }
}

/// Per-call facts shared by every descriptor.
#[derive(Clone, Copy, Debug)]
struct Pass {
    /// The spell as a whole counts as multi-target.
    multi_target: bool,
    /// Skip single-target-immune candidates.
    protect: bool,
    /// The caster focuses the lowest-armor enemy.
    focus_lowest_armor: bool,
}

/// Resolves descriptors against a board set.
///
/// ```
/// use hero_tactics::board::{BoardSet, SlotRef, Tile};
/// use hero_tactics::content::{BaseStats, HeroDefinition, HeroId};
/// use hero_tactics::core::Side;
/// use hero_tactics::targeting::{Metric, TargetDescriptor, TargetKind, TargetResolver};
///
/// let hero = HeroDefinition::new(HeroId::new(1), "Pikeman", BaseStats::new(10, 1, 2, 0, 0));
/// let mut boards = BoardSet::default();
/// let caster = SlotRef::new(Side::Player, 1);
/// boards.place(caster, Tile::spawn(&hero, 0)).unwrap();
/// boards.place(SlotRef::new(Side::Opponent, 7), Tile::spawn(&hero, 1)).unwrap();
///
/// let targets = TargetResolver::new(&boards, caster)
///     .resolve(&[TargetDescriptor::enemy(TargetKind::lowest(Metric::Health))])
///     .unwrap();
///
/// assert_eq!(targets[0].slot, SlotRef::new(Side::Opponent, 7));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TargetResolver<'b> {
    boards: &'b BoardSet,
    caster: SlotRef,
    owner: Option<SlotRef>,
    options: ResolveOptions,
}

impl<'b> TargetResolver<'b> {
    #[must_use]
    pub fn new(boards: &'b BoardSet, caster: SlotRef) -> Self {
        Self {
            boards,
            caster,
            owner: None,
            options: ResolveOptions::default(),
        }
    }

    /// Effect owner for trigger-driven casts (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: Option<SlotRef>) -> Self {
        self.owner = owner;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve every descriptor in order.
    ///
    /// Fails only when the caster or owner reference is malformed.
    pub fn resolve(&self, descriptors: &[TargetDescriptor]) -> Result<Vec<ResolvedTarget>, ResolveError> {
        let caster = self.boards.caster(self.caster)?;
        if let Some(owner) = self.owner {
            self.boards.check_slot(owner)?;
        }

        let multi_target = is_multi_target(descriptors);
        let pass = Pass {
            multi_target,
            protect: !multi_target && !self.options.bypass_triggers,
            focus_lowest_armor: caster.has_flag(|f| f.focus_lowest_armor),
        };

        let mut resolved: Vec<ResolvedTarget> = Vec::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            let previous = resolved.last().map(|r| r.slot);
            let slots = self.resolve_one(descriptor, previous, pass);
            tracing::debug!(
                "Descriptor {} ({:?}) from {} resolved to {:?}",
                position,
                descriptor.kind,
                self.caster,
                slots
            );
            resolved.extend(slots.into_iter().map(|slot| ResolvedTarget {
                slot,
                descriptor: position,
            }));
        }
        Ok(resolved)
    }

    fn resolve_one(&self, descriptor: &TargetDescriptor, previous: Option<SlotRef>, pass: Pass) -> Vec<SlotRef> {
        let side = self.side_for(descriptor.side);
        let enemy_side = self.caster.side.opposite();

        let focused;
        let kind = if pass.focus_lowest_armor && side == enemy_side && descriptor.is_single_pick() {
            focused = TargetKind::lowest(Metric::Armor);
            &focused
        } else {
            &descriptor.kind
        };

        let slots = match kind {
            TargetKind::Caster => self
                .boards
                .tile(self.caster)
                .filter(|tile| tile.is_alive())
                .map(|_| vec![self.caster])
                .unwrap_or_default(),

            TargetKind::Board => slots_of(&self.pool(side, descriptor, pass)),

            TargetKind::Column { column } => self.column(side, *column, descriptor, pass),

            TargetKind::FrontTwoRows => self.rows_where(side, descriptor, pass, |row| row < 2),

            TargetKind::BackRow => self.rows_where(side, descriptor, pass, |row| row == GRID_WIDTH - 1),

            TargetKind::FrontmostRowWithHero => (0..GRID_WIDTH)
                .map(|row| self.rows_where(side, descriptor, pass, |r| r == row))
                .find(|slots| !slots.is_empty())
                .unwrap_or_default(),

            TargetKind::Adjacent => match previous {
                Some(anchor) => self.adjacent_to(anchor, descriptor, pass),
                None => Vec::new(),
            },

            TargetKind::AdjacentToSelf => self.adjacent_to(self.owner.unwrap_or(self.caster), descriptor, pass),

            TargetKind::Nearest { count } => {
                let pool = self.single_pick_pool(side, descriptor, pass);
                let origin = (self.caster.side, self.caster.index);
                select::closest(&pool, *count, |slot| grid::virtual_distance(origin, (slot.side, slot.index)))
            }

            TargetKind::NearestDeadAlly { count } => self.nearest_dead_ally(*count, descriptor),

            TargetKind::Extremal { metric, order, max } => {
                let pool = self.single_pick_pool(side, descriptor, pass);
                match max {
                    None => select::extreme(&pool, metric, *order).into_iter().collect(),
                    Some(n) => select::ranked(&pool, metric, *order, *n),
                }
            }

            TargetKind::RowOf { metric, order } => {
                let pool = self.pool(side, descriptor, pass);
                select::extreme(&pool, metric, *order)
                    .and_then(|slot| slot.cell())
                    .map(|cell| self.rows_where(side, descriptor, pass, |row| row == cell.row))
                    .unwrap_or_default()
            }

            TargetKind::RowWithHighestSum { stat } => self.row_with_highest_sum(side, *stat, descriptor, pass),

            TargetKind::ReverseBook => {
                let pool = self.single_pick_pool(side, descriptor, pass);
                pool.last().map(|&(slot, _)| vec![slot]).unwrap_or_default()
            }

            TargetKind::Direct { target } => self
                .boards
                .tile(*target)
                .filter(|tile| self.eligible(*target, tile, descriptor, pass))
                .map(|_| vec![*target])
                .unwrap_or_default(),
        };

        self.redirect_area(slots, pass)
    }

    /// Board side a relation points at, honoring a forced side.
    fn side_for(&self, relation: Relation) -> Side {
        self.caster.side.resolve(self.options.force_side.unwrap_or(relation))
    }

    fn eligible(&self, slot: SlotRef, tile: &Tile, descriptor: &TargetDescriptor, pass: Pass) -> bool {
        if !slot.is_main() || !tile.is_alive() {
            return false;
        }
        if descriptor.exclude_self && slot == self.caster {
            return false;
        }
        if pass.protect && tile.has_flag(|f| f.single_target_immune) {
            tracing::trace!("Skipping {}: immune to single-target spells", slot);
            return false;
        }
        true
    }

    /// Eligible tiles of a side in book order.
    fn pool(&self, side: Side, descriptor: &TargetDescriptor, pass: Pass) -> Vec<Candidate<'b>> {
        self.boards
            .book_iter(side)
            .filter(|&(slot, tile)| self.eligible(slot, tile, descriptor, pass))
            .collect()
    }

    /// Pool for a one-tile pick: taunting enemies crowd out everyone else.
    fn single_pick_pool(&self, side: Side, descriptor: &TargetDescriptor, pass: Pass) -> Vec<Candidate<'b>> {
        let pool = self.pool(side, descriptor, pass);
        if side != self.caster.side.opposite() || !descriptor.is_single_pick() {
            return pool;
        }
        let taunting: Vec<Candidate<'b>> = pool
            .iter()
            .copied()
            .filter(|(_, tile)| tile.has_flag(|f| f.taunt))
            .collect();
        if taunting.is_empty() {
            pool
        } else {
            tracing::trace!("Taunt narrows {} candidates to {}", pool.len(), taunting.len());
            taunting
        }
    }

    fn rows_where(
        &self,
        side: Side,
        descriptor: &TargetDescriptor,
        pass: Pass,
        keep: impl Fn(usize) -> bool,
    ) -> Vec<SlotRef> {
        self.pool(side, descriptor, pass)
            .into_iter()
            .filter(|(slot, _)| slot.cell().is_some_and(|cell| keep(cell.row)))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// A caster-relative column, front to back, stopping after a blocker.
    fn column(&self, side: Side, column: Option<usize>, descriptor: &TargetDescriptor, pass: Pass) -> Vec<SlotRef> {
        let own = column
            .or_else(|| self.caster.cell().map(|cell| cell.column))
            .unwrap_or(GRID_WIDTH / 2);
        if own >= GRID_WIDTH {
            return Vec::new();
        }
        let column = if side == self.caster.side {
            own
        } else {
            grid::mirror_column(own)
        };

        let mut slots = Vec::new();
        for index in grid::column_indices(side, column) {
            let slot = SlotRef::new(side, index);
            let Some(tile) = self.boards.tile(slot) else {
                continue;
            };
            if self.eligible(slot, tile, descriptor, pass) {
                slots.push(slot);
            }
            if tile.is_alive() && tile.has_flag(|f| f.blocks_column) {
                break;
            }
        }
        slots
    }

    /// Living tiles one step from `anchor` on the anchor's own grid.
    fn adjacent_to(&self, anchor: SlotRef, descriptor: &TargetDescriptor, pass: Pass) -> Vec<SlotRef> {
        let Some(center) = anchor.cell() else {
            return Vec::new();
        };
        self.pool(anchor.side, descriptor, pass)
            .into_iter()
            .filter(|(slot, _)| slot.cell().is_some_and(|cell| cell.manhattan(center) == 1))
            .map(|(slot, _)| slot)
            .collect()
    }

    fn nearest_dead_ally(&self, count: usize, descriptor: &TargetDescriptor) -> Vec<SlotRef> {
        let side = self.caster.side;
        let pool: Vec<Candidate<'b>> = self
            .boards
            .book_iter(side)
            .filter(|&(slot, tile)| !tile.is_alive() && !(descriptor.exclude_self && slot == self.caster))
            .collect();
        let origin = (self.caster.side, self.caster.index);
        select::closest(&pool, count, |slot| grid::virtual_distance(origin, (slot.side, slot.index)))
    }

    /// The row with the largest summed stat; earliest row wins ties. When no
    /// row sums above zero, the first row with anyone in it.
    fn row_with_highest_sum(&self, side: Side, stat: Stat, descriptor: &TargetDescriptor, pass: Pass) -> Vec<SlotRef> {
        let pool = self.pool(side, descriptor, pass);
        let rows: Vec<Vec<Candidate<'b>>> = (0..GRID_WIDTH)
            .map(|row| {
                pool.iter()
                    .copied()
                    .filter(|(slot, _)| slot.cell().is_some_and(|cell| cell.row == row))
                    .collect()
            })
            .collect();

        let mut best: Option<(usize, i64)> = None;
        for (row, members) in rows.iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let sum: i64 = members.iter().map(|(_, tile)| i64::from(tile.stat(stat))).sum();
            if best.map_or(true, |(_, top)| sum > top) {
                best = Some((row, sum));
            }
        }

        let row = match best {
            Some((row, sum)) if sum > 0 => Some(row),
            _ => rows.iter().position(|members| !members.is_empty()),
        };
        row.map(|row| rows[row].iter().map(|&(slot, _)| slot).collect())
            .unwrap_or_default()
    }

    /// Enemy picks of a multi-target spell collapse onto a `drawsArea` tile
    /// if one is standing.
    fn redirect_area(&self, slots: Vec<SlotRef>, pass: Pass) -> Vec<SlotRef> {
        let enemy_side = self.caster.side.opposite();
        let Some(side) = slots.first().map(|slot| slot.side) else {
            return slots;
        };
        if !pass.multi_target || self.options.bypass_triggers || side != enemy_side {
            return slots;
        }
        match self
            .boards
            .book_iter(side)
            .find(|(_, tile)| tile.is_alive() && tile.has_flag(|f| f.draws_area))
        {
            Some((absorber, _)) => {
                tracing::trace!("{} draws the area hit", absorber);
                vec![absorber]
            }
            None => slots,
        }
    }
}

fn slots_of(pool: &[Candidate<'_>]) -> Vec<SlotRef> {
    pool.iter().map(|&(slot, _)| slot).collect()
}
