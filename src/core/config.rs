//! Resolution core configuration.

use serde::{Deserialize, Serialize};

/// Tunable rules shared by the ledger, resolver and builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Maximum number of non-hidden effects a tile may carry.
    /// Applying past this evicts the oldest visible effect.
    pub visible_effect_cap: usize,

    /// Lowest speed a hero may sit at unless explicitly allowed lower.
    pub min_speed: i32,

    /// Reserve (bench) slots per side. Never targetable.
    pub reserve_slots: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            visible_effect_cap: 4,
            min_speed: 1,
            reserve_slots: 2,
        }
    }
}

impl CoreConfig {
    /// Override the visible effect cap.
    #[must_use]
    pub fn with_visible_effect_cap(mut self, cap: usize) -> Self {
        self.visible_effect_cap = cap;
        self
    }

    /// Override the speed floor.
    #[must_use]
    pub fn with_min_speed(mut self, min_speed: i32) -> Self {
        self.min_speed = min_speed;
        self
    }

    /// Override the reserve size.
    #[must_use]
    pub fn with_reserve_slots(mut self, slots: usize) -> Self {
        self.reserve_slots = slots;
        self
    }
}
