//! Core types: sides, RNG, configuration, errors, log sink.
//!
//! These are shared by every other module and carry no game rules of
//! their own.

pub mod side;
pub mod rng;
pub mod config;
pub mod error;
pub mod log;

pub use side::{Relation, Side, SideMap};
pub use rng::{GameRng, GameRngState};
pub use config::CoreConfig;
pub use error::{DurationError, ResolveError};
pub use log::{LogSink, NullSink};
