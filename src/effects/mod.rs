//! Status conditions and the Effect Ledger.
//!
//! - `EffectDefinition`: static registry content (kind, duration,
//!   modifiers, pulse, trigger hooks, targeting flags)
//! - `EffectRef`: how spells and hooks name an effect
//! - `EffectInstance`: one application on a tile, with `Provenance`
//! - `EffectLedger`: apply / evict / expire, then recompute derived stats
//!
//! ## Visible slots
//!
//! A tile shows at most `CoreConfig::visible_effect_cap` effects. Hidden
//! effects (passives, augment enhancements) never count toward the cap and
//! are never evicted by it.

mod definition;
mod instance;
mod ledger;

pub use definition::{
    Duration, EffectDefinition, EffectKind, EffectOverride, EffectRef, Pulse, PulseKind, PulseSource,
    RawDuration, StatModifiers, TargetingFlags, TriggerEvent, TriggerHook, TriggerHooks,
};
pub use instance::{EffectInstance, Provenance};
pub use ledger::{floor_speed, recompute_modifiers, ApplyReport, EffectLedger, SkipReason};
