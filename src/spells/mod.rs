//! Spell specs and the Payload Builder.
//!
//! - `SpellSpec`: descriptors, a `Formula`, effects and post hooks
//! - `PayloadBuilder`: evaluates a spec against a board into a `Payload`
//! - `Payload`: one `ActionFragment` per resolved target, plus what the
//!   scheduler applies afterwards
//!
//! The builder only reads the board. Damage, healing and effect
//! application happen in the scheduler once it has the payload.

mod builder;
mod payload;
mod spec;

pub use builder::{BuildOptions, PayloadBuilder, SpellRef};
pub use payload::{ActionFragment, ActionKind, Payload, PayloadEntry, RollDetail};
pub use spec::{
    AllyHeal, AttackPower, DrainBranch, DrainCondition, DrainOutcome, FragmentExtras, Formula, HealRecipient,
    PerTargetBonus, PostCondition, PostHook, SpellId, SpellSpec,
};
