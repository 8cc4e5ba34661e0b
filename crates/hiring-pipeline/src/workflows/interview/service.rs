use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::domain::{
    Candidate, CandidateId, ConsistencyError, ConsultantId, ContractTerms, Interview, InterviewId,
    InterviewNextState, MinuteFormat, NotFoundError, Process, ProcessId, Rank, Source,
    Subsidiary, SubsidiaryId,
};
use super::engine::{EngineConfig, ProcessStateEngine};
use super::rank::resolve_rank;
use super::repository::{PipelineRepository, RepositoryError};
use super::views::{InterviewView, PipelineOverview, ProcessStatusView};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubsidiary {
    pub name: String,
    pub responsible: ConsultantId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenProcessRequest {
    pub candidate: CandidateId,
    pub subsidiary: SubsidiaryId,
    #[serde(default)]
    pub contract: ContractTerms,
    #[serde(default)]
    pub source: Option<Source>,
}

/// Interview to create. Without a rank the next free one is assigned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewDraft {
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub planned_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub next_state: Option<InterviewNextState>,
    #[serde(default)]
    pub interviewers: Vec<ConsultantId>,
}

/// An interviewer's write-up together with the verdict it carries.
#[derive(Debug, Clone, Deserialize)]
pub struct MinuteEntry {
    pub interviewer: ConsultantId,
    pub minute: String,
    #[serde(default)]
    pub minute_format: MinuteFormat,
    #[serde(default)]
    pub suggested_interviewer: Option<ConsultantId>,
    pub next_state: InterviewNextState,
}

/// Service composing the repository, rank assignment and the state engine.
pub struct InterviewProcessService<R> {
    repository: Arc<R>,
    engine: ProcessStateEngine,
    candidate_sequence: AtomicU64,
    subsidiary_sequence: AtomicU64,
    process_sequence: AtomicU64,
    interview_sequence: AtomicU64,
}

impl<R> InterviewProcessService<R>
where
    R: PipelineRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            repository,
            engine: ProcessStateEngine::new(config),
            candidate_sequence: AtomicU64::new(1),
            subsidiary_sequence: AtomicU64::new(1),
            process_sequence: AtomicU64::new(1),
            interview_sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &ProcessStateEngine {
        &self.engine
    }

    pub fn register_candidate(
        &self,
        candidate: NewCandidate,
    ) -> Result<Candidate, ProcessServiceError> {
        let id = CandidateId(self.candidate_sequence.fetch_add(1, Ordering::Relaxed));
        let stored = self.repository.insert_candidate(Candidate {
            id,
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
        })?;
        debug!(candidate = %stored.id, "candidate registered");
        Ok(stored)
    }

    pub fn register_subsidiary(
        &self,
        subsidiary: NewSubsidiary,
    ) -> Result<Subsidiary, ProcessServiceError> {
        let id = SubsidiaryId(self.subsidiary_sequence.fetch_add(1, Ordering::Relaxed));
        let stored = self.repository.insert_subsidiary(Subsidiary {
            id,
            name: subsidiary.name,
            responsible: subsidiary.responsible,
        })?;
        debug!(subsidiary = %stored.id, "subsidiary registered");
        Ok(stored)
    }

    /// Open a process starting on `today`.
    pub fn open_process(
        &self,
        request: OpenProcessRequest,
        today: NaiveDate,
    ) -> Result<Process, ProcessServiceError> {
        let candidate = self
            .repository
            .candidate(request.candidate)?
            .ok_or(NotFoundError::Candidate(request.candidate))?;
        let subsidiary = self
            .repository
            .subsidiary(request.subsidiary)?
            .ok_or(NotFoundError::Subsidiary(request.subsidiary))?;

        let id = ProcessId(self.process_sequence.fetch_add(1, Ordering::Relaxed));
        let mut process = Process::new(id, candidate, subsidiary, today);
        process.contract = request.contract;
        process.source = request.source;

        let stored = self.repository.insert_process(process)?;
        info!(process = %stored.id, title = %stored, "process opened");
        Ok(stored)
    }

    /// Create an interview, assigning the next rank when the draft has none.
    ///
    /// A colliding auto-assigned rank means another writer got there first; the
    /// history is reloaded and the insert retried up to the configured attempts.
    /// A colliding explicit rank aborts immediately.
    pub fn schedule_interview(
        &self,
        process_id: ProcessId,
        draft: InterviewDraft,
    ) -> Result<Interview, ProcessServiceError> {
        let id = InterviewId(self.interview_sequence.fetch_add(1, Ordering::Relaxed));
        let attempts = self.engine.config().rank_assignment_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let process = self.load_process(process_id)?;
            let rank = resolve_rank(&process, draft.rank)?;

            let mut interview = Interview {
                id,
                process: process_id,
                rank,
                planned_date: draft.planned_date,
                next_state: draft.next_state.unwrap_or_default(),
                assignments: Vec::new(),
            };
            for interviewer in &draft.interviewers {
                interview.assign(*interviewer)?;
            }

            match self.repository.insert_interview(interview) {
                Ok(stored) => {
                    info!(
                        process = %process_id,
                        interview = %stored.id,
                        rank = %stored.rank,
                        "interview scheduled"
                    );
                    return Ok(stored);
                }
                Err(RepositoryError::Conflict) if draft.rank.is_none() && attempt < attempts => {
                    warn!(process = %process_id, %rank, attempt, "rank taken concurrently, retrying");
                }
                Err(RepositoryError::Conflict) => {
                    return Err(ConsistencyError::DuplicateRank {
                        process: process_id,
                        rank,
                    }
                    .into());
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// Set the planned date and mark the interview as planned.
    pub fn plan_interview(
        &self,
        interview_id: InterviewId,
        planned_date: NaiveDateTime,
    ) -> Result<Interview, ProcessServiceError> {
        self.modify_interview(interview_id, |interview| {
            interview.planned_date = Some(planned_date);
            interview.next_state = InterviewNextState::Planned;
            Ok(())
        })
    }

    pub fn assign_interviewer(
        &self,
        interview_id: InterviewId,
        interviewer: ConsultantId,
    ) -> Result<Interview, ProcessServiceError> {
        self.modify_interview(interview_id, |interview| {
            interview.assign(interviewer)?;
            Ok(())
        })
    }

    /// Store an interviewer's minute and the verdict it declares.
    ///
    /// A minute closes the interviewer's side, so it can only leave the interview
    /// at GO, NO_GO or NEED_PLANIFICATION.
    pub fn record_minute(
        &self,
        interview_id: InterviewId,
        entry: MinuteEntry,
    ) -> Result<Interview, ProcessServiceError> {
        if !entry.next_state.is_minute_outcome() {
            return Err(ConsistencyError::MinuteOutcome {
                interview: interview_id,
                state: entry.next_state,
            }
            .into());
        }

        self.modify_interview(interview_id, |interview| {
            let assignment = interview.assignment_mut(entry.interviewer).ok_or(
                NotFoundError::Assignment {
                    interview: interview_id,
                    interviewer: entry.interviewer,
                },
            )?;
            assignment.minute = entry.minute;
            assignment.minute_format = entry.minute_format;
            assignment.suggested_interviewer = entry.suggested_interviewer;
            interview.next_state = entry.next_state;
            Ok(())
        })
    }

    /// Remove an interview and its assignments. Its rank stays retired.
    pub fn delete_interview(
        &self,
        interview_id: InterviewId,
    ) -> Result<Interview, ProcessServiceError> {
        let removed = self
            .repository
            .delete_interview(interview_id)
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    ProcessServiceError::NotFound(NotFoundError::Interview(interview_id))
                }
                other => other.into(),
            })?;
        info!(interview = %interview_id, rank = %removed.rank, "interview deleted");
        Ok(removed)
    }

    pub fn close_process(
        &self,
        process_id: ProcessId,
        end_date: NaiveDate,
    ) -> Result<Process, ProcessServiceError> {
        let mut process = self.load_process(process_id)?;
        process.end_date = Some(end_date);
        self.repository.update_process(process.clone())?;
        info!(process = %process_id, %end_date, "process closed");
        Ok(process)
    }

    pub fn process(&self, process_id: ProcessId) -> Result<Process, ProcessServiceError> {
        self.load_process(process_id)
    }

    pub fn process_status(
        &self,
        process_id: ProcessId,
        today: NaiveDate,
    ) -> Result<ProcessStatusView, ProcessServiceError> {
        let process = self.load_process(process_id)?;
        Ok(ProcessStatusView::build(&self.engine, &process, today))
    }

    pub fn interview_status(
        &self,
        interview_id: InterviewId,
        today: NaiveDate,
    ) -> Result<InterviewView, ProcessServiceError> {
        let process = self
            .repository
            .process_of_interview(interview_id)?
            .ok_or(NotFoundError::Interview(interview_id))?;
        let interview = process
            .interview(interview_id)
            .ok_or(NotFoundError::Interview(interview_id))?;
        Ok(InterviewView::build(&process, interview, today))
    }

    pub fn overview(&self, today: NaiveDate) -> Result<PipelineOverview, ProcessServiceError> {
        let processes = self.repository.processes()?;
        Ok(PipelineOverview::build(&self.engine, &processes, today))
    }

    fn load_process(&self, process_id: ProcessId) -> Result<Process, ProcessServiceError> {
        let process = self
            .repository
            .fetch_process(process_id)?
            .ok_or(NotFoundError::Process(process_id))?;
        Ok(process)
    }

    fn modify_interview<F>(
        &self,
        interview_id: InterviewId,
        change: F,
    ) -> Result<Interview, ProcessServiceError>
    where
        F: FnOnce(&mut Interview) -> Result<(), ProcessServiceError>,
    {
        let interview = self
            .repository
            .modify_interview(interview_id, change)
            .map_err(|err| match err {
                ProcessServiceError::Repository(RepositoryError::NotFound) => {
                    ProcessServiceError::NotFound(NotFoundError::Interview(interview_id))
                }
                other => other,
            })?;
        debug!(
            interview = %interview_id,
            state = interview.next_state.code(),
            "interview updated"
        );
        Ok(interview)
    }
}

/// Error raised by the process service.
#[derive(Debug, thiserror::Error)]
pub enum ProcessServiceError {
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
