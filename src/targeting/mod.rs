//! Target Resolver: abstract targeting intents to concrete board slots.
//!
//! - `TargetDescriptor` / `TargetKind`: what a spell wants to hit
//! - `TargetResolver`: resolves a descriptor list against a `BoardSet`
//! - `ResolvedTarget`: a token plus the index of the descriptor behind it
//!
//! Resolution is read-only and deterministic. Every tie between candidates
//! is broken by the side's book order (see `board::grid`).

mod descriptor;
mod resolver;
mod select;

pub use descriptor::{is_multi_target, Metric, Order, ResolvedTarget, TargetDescriptor, TargetKind, TargetToken};
pub use resolver::{ResolveOptions, TargetResolver};
