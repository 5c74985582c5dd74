//! Static content: hero definitions and the registries the core consults.
//!
//! ## Key Types
//!
//! - `HeroId` / `HeroDefinition`: base stats and spell slots
//! - `HeroRegistry`, `SpellRegistry`, `EffectRegistry`: lookup tables
//! - `Content`: the three registries bundled together
//!
//! Loading content from disk is the caller's job; every definition type
//! derives `serde` so hand-authored JSON deserializes directly.

pub mod hero;
pub mod registry;

pub use hero::{BaseStats, HeroDefinition, HeroId};
pub use registry::{Content, EffectRegistry, HeroRegistry, SpellRegistry};
