//! Errors surfaced to the scheduler.
//!
//! Content problems (unknown names, descriptors with no candidates, bad
//! per-target adjustments) are absorbed where they occur. Only malformed
//! caller input reaches these types.

use super::side::Side;

/// Failures of a resolve or build call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A slot reference points past the end of a board.
    #[error("slot {index} is out of range for the {side} board")]
    SlotOutOfRange { side: Side, index: usize },

    /// The caster reference points at an empty slot.
    #[error("no hero occupies caster slot {index} on the {side} board")]
    EmptyCaster { side: Side, index: usize },
}

/// An effect duration marker that could not be normalized.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DurationError {
    /// Zero or a negative count other than the `-1` permanence marker.
    #[error("duration {0} is not a positive round count")]
    NotPositive(i64),

    /// A fractional round count.
    #[error("duration {0} is not a whole number of rounds")]
    Fractional(f64),

    /// A text marker that is not one of the permanence words.
    #[error("unrecognized duration marker {0:?}")]
    UnknownMarker(String),
}
