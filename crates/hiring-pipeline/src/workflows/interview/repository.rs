use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Candidate, CandidateId, Interview, InterviewId, Process, ProcessId, Subsidiary, SubsidiaryId,
};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `insert_interview` must check `(process, rank)` uniqueness and write in one
/// atomic step, returning [`RepositoryError::Conflict`] when the rank is taken.
/// `modify_interview` must apply the change to the current stored record under the
/// same isolation, so concurrent edits of one interview never overwrite each other.
pub trait PipelineRepository: Send + Sync {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn insert_subsidiary(&self, subsidiary: Subsidiary) -> Result<Subsidiary, RepositoryError>;
    fn subsidiary(&self, id: SubsidiaryId) -> Result<Option<Subsidiary>, RepositoryError>;

    fn insert_process(&self, process: Process) -> Result<Process, RepositoryError>;
    /// Replace the process header. Interviews are written through the interview methods only.
    fn update_process(&self, process: Process) -> Result<(), RepositoryError>;
    fn fetch_process(&self, id: ProcessId) -> Result<Option<Process>, RepositoryError>;
    fn processes(&self) -> Result<Vec<Process>, RepositoryError>;

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    /// Apply `change` to the stored interview and persist the result atomically.
    ///
    /// Nothing is written when `change` fails. Changing the id, rank or owning
    /// process is refused with [`RepositoryError::Conflict`].
    fn modify_interview<F, E>(&self, id: InterviewId, change: F) -> Result<Interview, E>
    where
        F: FnOnce(&mut Interview) -> Result<(), E>,
        E: From<RepositoryError>;
    fn delete_interview(&self, id: InterviewId) -> Result<Interview, RepositoryError>;
    /// Process owning the interview, with its full interview history loaded.
    fn process_of_interview(&self, id: InterviewId) -> Result<Option<Process>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct PipelineStore {
    candidates: HashMap<CandidateId, Candidate>,
    subsidiaries: HashMap<SubsidiaryId, Subsidiary>,
    processes: BTreeMap<ProcessId, Process>,
    interview_index: HashMap<InterviewId, ProcessId>,
}

/// Mutex-guarded repository keeping every aggregate in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPipelineRepository {
    store: Arc<Mutex<PipelineStore>>,
}

impl InMemoryPipelineRepository {
    fn lock(&self) -> Result<MutexGuard<'_, PipelineStore>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("pipeline store poisoned".to_string()))
    }
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut store = self.lock()?;
        if store.candidates.contains_key(&candidate.id) {
            return Err(RepositoryError::Conflict);
        }
        store.candidates.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.lock()?.candidates.get(&id).cloned())
    }

    fn insert_subsidiary(&self, subsidiary: Subsidiary) -> Result<Subsidiary, RepositoryError> {
        let mut store = self.lock()?;
        if store.subsidiaries.contains_key(&subsidiary.id) {
            return Err(RepositoryError::Conflict);
        }
        store.subsidiaries.insert(subsidiary.id, subsidiary.clone());
        Ok(subsidiary)
    }

    fn subsidiary(&self, id: SubsidiaryId) -> Result<Option<Subsidiary>, RepositoryError> {
        Ok(self.lock()?.subsidiaries.get(&id).cloned())
    }

    fn insert_process(&self, process: Process) -> Result<Process, RepositoryError> {
        let mut store = self.lock()?;
        if store.processes.contains_key(&process.id) {
            return Err(RepositoryError::Conflict);
        }
        for interview in &process.interviews {
            store.interview_index.insert(interview.id, process.id);
        }
        store.processes.insert(process.id, process.clone());
        Ok(process)
    }

    fn update_process(&self, process: Process) -> Result<(), RepositoryError> {
        let mut store = self.lock()?;
        let slot = store
            .processes
            .get_mut(&process.id)
            .ok_or(RepositoryError::NotFound)?;

        let interviews = std::mem::take(&mut slot.interviews);
        let last_issued_rank = slot.last_issued_rank.max(process.last_issued_rank);
        *slot = Process {
            interviews,
            last_issued_rank,
            ..process
        };
        Ok(())
    }

    fn fetch_process(&self, id: ProcessId) -> Result<Option<Process>, RepositoryError> {
        Ok(self.lock()?.processes.get(&id).cloned())
    }

    fn processes(&self) -> Result<Vec<Process>, RepositoryError> {
        Ok(self.lock()?.processes.values().cloned().collect())
    }

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut store = self.lock()?;
        if store.interview_index.contains_key(&interview.id) {
            return Err(RepositoryError::Conflict);
        }

        let process_id = interview.process;
        let process = store
            .processes
            .get_mut(&process_id)
            .ok_or(RepositoryError::NotFound)?;
        process
            .attach_interview(interview.clone())
            .map_err(|_| RepositoryError::Conflict)?;

        store.interview_index.insert(interview.id, process_id);
        Ok(interview)
    }

    fn modify_interview<F, E>(&self, id: InterviewId, change: F) -> Result<Interview, E>
    where
        F: FnOnce(&mut Interview) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut store = self.lock()?;
        let process_id = *store
            .interview_index
            .get(&id)
            .ok_or(RepositoryError::NotFound)?;
        let slot = store
            .processes
            .get_mut(&process_id)
            .and_then(|process| process.interview_mut(id))
            .ok_or(RepositoryError::NotFound)?;

        let mut draft = slot.clone();
        change(&mut draft)?;
        if draft.id != slot.id || draft.rank != slot.rank || draft.process != slot.process {
            return Err(RepositoryError::Conflict.into());
        }
        *slot = draft.clone();
        Ok(draft)
    }

    fn delete_interview(&self, id: InterviewId) -> Result<Interview, RepositoryError> {
        let mut store = self.lock()?;
        let process_id = store
            .interview_index
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        store
            .processes
            .get_mut(&process_id)
            .and_then(|process| process.detach_interview(id))
            .ok_or(RepositoryError::NotFound)
    }

    fn process_of_interview(&self, id: InterviewId) -> Result<Option<Process>, RepositoryError> {
        let store = self.lock()?;
        Ok(store
            .interview_index
            .get(&id)
            .and_then(|process_id| store.processes.get(process_id))
            .cloned())
    }
}
