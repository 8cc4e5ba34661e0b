use serde::Serialize;

use super::super::domain::{ConsultantId, InterviewNextState, Process, SubsidiaryId};

pub const PICK_UP_NEXT_INTERVIEWER: &str = "Pick up next interviewer";

/// Party expected to move the process forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextActionResponsible {
    /// Interviewers assigned to the last interview.
    Interviewers { consultants: Vec<ConsultantId> },
    /// The subsidiary's designated responsible.
    Subsidiary {
        subsidiary: SubsidiaryId,
        consultant: ConsultantId,
    },
}

impl NextActionResponsible {
    pub fn consultants(&self) -> Vec<ConsultantId> {
        match self {
            Self::Interviewers { consultants } => consultants.clone(),
            Self::Subsidiary { consultant, .. } => vec![*consultant],
        }
    }
}

/// State declared by the highest-ranked interview, or `None` before the first one.
pub fn derive_state(process: &Process) -> Option<InterviewNextState> {
    process
        .last_interview()
        .map(|interview| interview.next_state)
}

pub fn next_action_display(process: &Process) -> &'static str {
    match derive_state(process) {
        Some(state) => state.label(),
        None => PICK_UP_NEXT_INTERVIEWER,
    }
}

pub fn next_action_responsible(process: &Process) -> NextActionResponsible {
    if let Some(last) = process.last_interview() {
        if last.next_state.is_pending() {
            return NextActionResponsible::Interviewers {
                consultants: last.interviewers(),
            };
        }
    }

    NextActionResponsible::Subsidiary {
        subsidiary: process.subsidiary.id,
        consultant: process.subsidiary.responsible,
    }
}
