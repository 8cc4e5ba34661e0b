//! Interview process tracking.
//!
//! A process's status is never stored: it is derived on demand from its ranked
//! interview history and an explicit evaluation date. Ranks are append-only and
//! unique per process; the service retries auto-assigned ranks that lose a race.

pub mod domain;
pub mod engine;
pub mod rank;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, ConsistencyError, ConsultantId, ContractTerms, ContractType,
    Interview, InterviewId, InterviewNextState, InterviewerAssignment, MinuteFormat,
    NotFoundError, Process, ProcessId, Rank, Source, Subsidiary, SubsidiaryId,
};
pub use engine::{
    derive_state, is_active, is_late, is_recently_closed, needs_attention, next_action_display,
    next_action_responsible, EngineConfig, NextActionResponsible, ProcessAssessment,
    ProcessStateEngine, PICK_UP_NEXT_INTERVIEWER,
};
pub use rank::next_rank;
pub use repository::{InMemoryPipelineRepository, PipelineRepository, RepositoryError};
pub use router::{pipeline_router, EvaluationDate};
pub use service::{
    InterviewDraft, InterviewProcessService, MinuteEntry, NewCandidate, NewSubsidiary,
    OpenProcessRequest, ProcessServiceError,
};
pub use views::{InterviewView, PipelineOverview, ProcessStatusView, ProcessSummaryEntry};
