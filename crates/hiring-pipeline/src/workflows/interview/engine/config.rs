use serde::{Deserialize, Serialize};

pub const DEFAULT_RECENTLY_CLOSED_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_RANK_ASSIGNMENT_ATTEMPTS: u32 = 3;

/// Tunables for the derivation rules and the rank-assignment retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A closed process counts as recently closed while its end date is at most this many days old.
    pub recently_closed_window_days: u32,
    /// Attempts made to insert an auto-ranked interview before reporting a conflict.
    pub rank_assignment_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recently_closed_window_days: DEFAULT_RECENTLY_CLOSED_WINDOW_DAYS,
            rank_assignment_attempts: DEFAULT_RANK_ASSIGNMENT_ATTEMPTS,
        }
    }
}
