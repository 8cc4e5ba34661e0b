use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::workflows::interview::domain::{
    Candidate, CandidateId, ConsultantId, Interview, InterviewId, InterviewNextState,
    InterviewerAssignment, MinuteFormat, Process, ProcessId, Rank, Subsidiary, SubsidiaryId,
};
use crate::workflows::interview::engine::EngineConfig;
use crate::workflows::interview::repository::{
    InMemoryPipelineRepository, PipelineRepository, RepositoryError,
};
use crate::workflows::interview::service::{
    InterviewProcessService, NewCandidate, NewSubsidiary, OpenProcessRequest,
};

pub(super) const RESPONSIBLE: ConsultantId = ConsultantId(100);
pub(super) const ALICE: ConsultantId = ConsultantId(201);
pub(super) const BOB: ConsultantId = ConsultantId(202);

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date")
}

pub(super) fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub(super) fn at_ten(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"))
}

pub(super) fn rank(value: u32) -> Rank {
    Rank::new(value).expect("positive rank")
}

pub(super) fn candidate() -> Candidate {
    Candidate {
        id: CandidateId(1),
        name: "Ada Lovelace".to_string(),
        email: Some("ada@example.org".to_string()),
        phone: None,
    }
}

pub(super) fn subsidiary() -> Subsidiary {
    Subsidiary {
        id: SubsidiaryId(7),
        name: "Lyon".to_string(),
        responsible: RESPONSIBLE,
    }
}

pub(super) fn empty_process() -> Process {
    Process::new(ProcessId(1), candidate(), subsidiary(), days_from_today(-30))
}

pub(super) fn assignment(interviewer: ConsultantId, minute: &str) -> InterviewerAssignment {
    InterviewerAssignment {
        interviewer,
        minute: minute.to_string(),
        minute_format: MinuteFormat::Markdown,
        suggested_interviewer: None,
    }
}

pub(super) fn interview(
    id: u64,
    rank_value: u32,
    next_state: InterviewNextState,
    planned_date: Option<NaiveDateTime>,
    assignments: Vec<InterviewerAssignment>,
) -> Interview {
    Interview {
        id: InterviewId(id),
        process: ProcessId(1),
        rank: rank(rank_value),
        planned_date,
        next_state,
        assignments,
    }
}

pub(super) fn process_with(interviews: Vec<Interview>) -> Process {
    let mut process = empty_process();
    process.interviews = interviews;
    process.last_issued_rank = process.interviews.iter().map(|itw| itw.rank).max();
    process
}

pub(super) fn build_service() -> (
    InterviewProcessService<InMemoryPipelineRepository>,
    Arc<InMemoryPipelineRepository>,
) {
    let repository = Arc::new(InMemoryPipelineRepository::default());
    let service = InterviewProcessService::new(repository.clone(), EngineConfig::default());
    (service, repository)
}

/// Register a candidate and subsidiary, then open a process for them on `today()`.
pub(super) fn open_seeded_process<R>(service: &InterviewProcessService<R>) -> Process
where
    R: PipelineRepository + 'static,
{
    let candidate = service
        .register_candidate(NewCandidate {
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.org".to_string()),
            phone: None,
        })
        .expect("candidate registered");
    let subsidiary = service
        .register_subsidiary(NewSubsidiary {
            name: "Lyon".to_string(),
            responsible: RESPONSIBLE,
        })
        .expect("subsidiary registered");

    service
        .open_process(
            OpenProcessRequest {
                candidate: candidate.id,
                subsidiary: subsidiary.id,
                contract: Default::default(),
                source: None,
            },
            today(),
        )
        .expect("process opened")
}

/// Repository that lets a competing writer grab the computed rank before each of
/// the first `conflicts` interview inserts lands.
pub(super) struct ContendedRepository {
    pub(super) inner: InMemoryPipelineRepository,
    conflicts: Mutex<u32>,
    next_competitor: Mutex<u64>,
}

impl ContendedRepository {
    pub(super) fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryPipelineRepository::default(),
            conflicts: Mutex::new(conflicts),
            next_competitor: Mutex::new(9_000),
        }
    }
}

impl PipelineRepository for ContendedRepository {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert_candidate(candidate)
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.candidate(id)
    }

    fn insert_subsidiary(&self, subsidiary: Subsidiary) -> Result<Subsidiary, RepositoryError> {
        self.inner.insert_subsidiary(subsidiary)
    }

    fn subsidiary(&self, id: SubsidiaryId) -> Result<Option<Subsidiary>, RepositoryError> {
        self.inner.subsidiary(id)
    }

    fn insert_process(&self, process: Process) -> Result<Process, RepositoryError> {
        self.inner.insert_process(process)
    }

    fn update_process(&self, process: Process) -> Result<(), RepositoryError> {
        self.inner.update_process(process)
    }

    fn fetch_process(&self, id: ProcessId) -> Result<Option<Process>, RepositoryError> {
        self.inner.fetch_process(id)
    }

    fn processes(&self) -> Result<Vec<Process>, RepositoryError> {
        self.inner.processes()
    }

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut conflicts = self.conflicts.lock().expect("conflict mutex poisoned");
        if *conflicts > 0 {
            *conflicts -= 1;
            let mut competitor_id = self.next_competitor.lock().expect("id mutex poisoned");
            *competitor_id += 1;
            let competitor = Interview {
                id: InterviewId(*competitor_id),
                assignments: Vec::new(),
                ..interview.clone()
            };
            self.inner.insert_interview(competitor)?;
        }
        drop(conflicts);
        self.inner.insert_interview(interview)
    }

    fn modify_interview<F, E>(&self, id: InterviewId, change: F) -> Result<Interview, E>
    where
        F: FnOnce(&mut Interview) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        self.inner.modify_interview(id, change)
    }

    fn delete_interview(&self, id: InterviewId) -> Result<Interview, RepositoryError> {
        self.inner.delete_interview(id)
    }

    fn process_of_interview(&self, id: InterviewId) -> Result<Option<Process>, RepositoryError> {
        self.inner.process_of_interview(id)
    }
}

/// Repository that holds every interview edit until `parties` of them are in flight,
/// so concurrent writers reach the store together.
pub(super) struct RendezvousRepository {
    pub(super) inner: InMemoryPipelineRepository,
    barrier: Barrier,
}

impl RendezvousRepository {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: InMemoryPipelineRepository::default(),
            barrier: Barrier::new(parties),
        }
    }
}

impl PipelineRepository for RendezvousRepository {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert_candidate(candidate)
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.candidate(id)
    }

    fn insert_subsidiary(&self, subsidiary: Subsidiary) -> Result<Subsidiary, RepositoryError> {
        self.inner.insert_subsidiary(subsidiary)
    }

    fn subsidiary(&self, id: SubsidiaryId) -> Result<Option<Subsidiary>, RepositoryError> {
        self.inner.subsidiary(id)
    }

    fn insert_process(&self, process: Process) -> Result<Process, RepositoryError> {
        self.inner.insert_process(process)
    }

    fn update_process(&self, process: Process) -> Result<(), RepositoryError> {
        self.inner.update_process(process)
    }

    fn fetch_process(&self, id: ProcessId) -> Result<Option<Process>, RepositoryError> {
        self.inner.fetch_process(id)
    }

    fn processes(&self) -> Result<Vec<Process>, RepositoryError> {
        self.inner.processes()
    }

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.inner.insert_interview(interview)
    }

    fn modify_interview<F, E>(&self, id: InterviewId, change: F) -> Result<Interview, E>
    where
        F: FnOnce(&mut Interview) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        self.barrier.wait();
        self.inner.modify_interview(id, change)
    }

    fn delete_interview(&self, id: InterviewId) -> Result<Interview, RepositoryError> {
        self.inner.delete_interview(id)
    }

    fn process_of_interview(&self, id: InterviewId) -> Result<Option<Process>, RepositoryError> {
        self.inner.process_of_interview(id)
    }
}

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn insert_candidate(&self, _candidate: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn candidate(&self, _id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_subsidiary(&self, _subsidiary: Subsidiary) -> Result<Subsidiary, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn subsidiary(&self, _id: SubsidiaryId) -> Result<Option<Subsidiary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_process(&self, _process: Process) -> Result<Process, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_process(&self, _process: Process) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_process(&self, _id: ProcessId) -> Result<Option<Process>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn processes(&self) -> Result<Vec<Process>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_interview(&self, _interview: Interview) -> Result<Interview, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify_interview<F, E>(&self, _id: InterviewId, _change: F) -> Result<Interview, E>
    where
        F: FnOnce(&mut Interview) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn delete_interview(&self, _id: InterviewId) -> Result<Interview, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn process_of_interview(&self, _id: InterviewId) -> Result<Option<Process>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
