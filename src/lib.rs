//! # hero-tactics
//!
//! Spell resolution core for a grid-based hero tactics game.
//!
//! Two sides field heroes on facing 3×3 grids. Each cast turns a
//! data-described spell into concrete targets and numbers; this crate
//! decides *what happens*, an external round scheduler decides *when*.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven**: Spells, effects and targeting intents are plain
//!    `serde` types. Content is authored as JSON and deserialized directly.
//!
//! 2. **Read-Only Resolution**: The resolver and builder take `&BoardSet`
//!    and return descriptions of intended changes. Only the effect ledger
//!    takes `&mut Tile`.
//!
//! 3. **Deterministic**: Every selection tie is broken by a fixed per-side
//!    book order. The `roll` formula is the only consumer of `GameRng`.
//!
//! 4. **Forgiving Content**: Unknown names, empty descriptors and broken
//!    per-target bonuses degrade to "nothing happens". Only malformed caller
//!    input surfaces as `ResolveError`.
//!
//! ## Pipeline
//!
//! ```text
//! scheduler ──► PayloadBuilder ──► TargetResolver ──► tokens
//!     ▲               │
//!     └── Payload ◄───┘   scheduler applies fragments, EffectLedger applies effects
//! ```
//!
//! ## Modules
//!
//! - `core`: sides, RNG, configuration, errors, log sink
//! - `board`: grid geometry, book order, tiles, boards
//! - `content`: hero definitions and registries
//! - `effects`: effect definitions, instances, the Effect Ledger
//! - `targeting`: descriptors and the Target Resolver
//! - `spells`: spell specs, payloads, the Payload Builder

pub mod core;
pub mod board;
pub mod content;
pub mod effects;
pub mod targeting;
pub mod spells;

// Re-export commonly used types
pub use crate::core::{
    CoreConfig, DurationError, GameRng, GameRngState, LogSink, NullSink, Relation, ResolveError, Side, SideMap,
};

pub use crate::board::{Board, BoardSet, SlotRef, Stat, Tile};

pub use crate::content::{BaseStats, Content, EffectRegistry, HeroDefinition, HeroId, HeroRegistry, SpellRegistry};

pub use crate::effects::{
    ApplyReport, Duration, EffectDefinition, EffectInstance, EffectKind, EffectLedger, EffectRef, Provenance,
    TargetingFlags,
};

pub use crate::targeting::{Metric, Order, ResolveOptions, ResolvedTarget, TargetDescriptor, TargetKind, TargetResolver};

pub use crate::spells::{
    ActionFragment, ActionKind, BuildOptions, Formula, Payload, PayloadBuilder, SpellId, SpellRef, SpellSpec,
};
