mod activity;
mod attention;
mod config;
mod state;

pub use activity::{is_active, is_late, is_recently_closed};
pub use attention::needs_attention;
pub use config::{
    EngineConfig, DEFAULT_RANK_ASSIGNMENT_ATTEMPTS, DEFAULT_RECENTLY_CLOSED_WINDOW_DAYS,
};
pub use state::{
    derive_state, next_action_display, next_action_responsible, NextActionResponsible,
    PICK_UP_NEXT_INTERVIEWER,
};

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Interview, InterviewNextState, Process};

/// Stateless evaluator applying the derivation rules to loaded processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessStateEngine {
    config: EngineConfig,
}

impl ProcessStateEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn assess(&self, process: &Process, today: NaiveDate) -> ProcessAssessment {
        ProcessAssessment {
            state: derive_state(process),
            next_action_display: next_action_display(process),
            next_action_responsible: next_action_responsible(process),
            is_active: is_active(process, today),
            is_late: is_late(process, today),
            is_recently_closed: is_recently_closed(
                process,
                today,
                self.config.recently_closed_window_days,
            ),
        }
    }

    pub fn needs_attention(&self, interview: &Interview, today: NaiveDate) -> bool {
        needs_attention(interview, today)
    }
}

/// Derived attributes of a process at a given evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessAssessment {
    pub state: Option<InterviewNextState>,
    pub next_action_display: &'static str,
    pub next_action_responsible: NextActionResponsible,
    pub is_active: bool,
    pub is_late: bool,
    pub is_recently_closed: bool,
}
