use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

identifier!(
    /// Identifier wrapper for applicants.
    CandidateId,
    "candidate"
);
identifier!(
    /// Identifier wrapper for hiring subsidiaries.
    SubsidiaryId,
    "subsidiary"
);
identifier!(
    /// Identifier wrapper for consultants acting as interviewers or subsidiary owners.
    ConsultantId,
    "consultant"
);
identifier!(
    /// Identifier wrapper for hiring processes.
    ProcessId,
    "process"
);
identifier!(
    /// Identifier wrapper for interview records.
    InterviewId,
    "interview"
);

/// 1-based ordering key of an interview within its process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rank(u32);

impl Rank {
    pub const FIRST: Rank = Rank(1);

    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Following rank, or `None` once `u32::MAX` is reached.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl TryFrom<u32> for Rank {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Rank::new(value).ok_or_else(|| "rank must be a positive integer".to_string())
    }
}

impl From<Rank> for u32 {
    fn from(value: Rank) -> Self {
        value.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome an interview declares for its process once it is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewNextState {
    #[default]
    NeedPlanification,
    Planned,
    Go,
    NoGo,
}

impl InterviewNextState {
    pub const fn ordered() -> [Self; 4] {
        [Self::NeedPlanification, Self::Planned, Self::Go, Self::NoGo]
    }

    /// Short storage code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NeedPlanification => "NP",
            Self::Planned => "PL",
            Self::Go => "GO",
            Self::NoGo => "NO",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedPlanification => "NEED PLANIFICATION",
            Self::Planned => "PLANIFIED",
            Self::Go => "GO",
            Self::NoGo => "NO",
        }
    }

    /// Whether the interview is still pending on the interviewers' side.
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::NeedPlanification | Self::Planned)
    }

    /// States an interviewer may declare when writing up a minute.
    pub const fn is_minute_outcome(self) -> bool {
        !matches!(self, Self::Planned)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|state| state.code().eq_ignore_ascii_case(code.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinuteFormat {
    #[default]
    Markdown,
    PlainText,
}

impl MinuteFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::PlainText => "Plain text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Hiring entity; its responsible consultant owns processes between interviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsidiary {
    pub id: SubsidiaryId,
    pub name: String,
    pub responsible: ConsultantId,
}

impl fmt::Display for Subsidiary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractType {
    pub name: String,
    #[serde(default)]
    pub has_duration: bool,
}

/// Channel through which the candidate reached the subsidiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// Yearly salary expectation in k€.
    #[serde(default)]
    pub salary_expectation: Option<u32>,
    /// Contract duration in months.
    #[serde(default)]
    pub contract_duration: Option<u32>,
    #[serde(default)]
    pub contract_start_date: Option<NaiveDate>,
}

/// One interviewer taking part in an interview, with their private write-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerAssignment {
    pub interviewer: ConsultantId,
    #[serde(default)]
    pub minute: String,
    #[serde(default)]
    pub minute_format: MinuteFormat,
    #[serde(default)]
    pub suggested_interviewer: Option<ConsultantId>,
}

impl InterviewerAssignment {
    pub fn new(interviewer: ConsultantId) -> Self {
        Self {
            interviewer,
            minute: String::new(),
            minute_format: MinuteFormat::default(),
            suggested_interviewer: None,
        }
    }

    pub fn has_minute(&self) -> bool {
        !self.minute.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub process: ProcessId,
    pub rank: Rank,
    pub planned_date: Option<NaiveDateTime>,
    pub next_state: InterviewNextState,
    pub assignments: Vec<InterviewerAssignment>,
}

impl Interview {
    pub fn interviewers(&self) -> Vec<ConsultantId> {
        self.assignments
            .iter()
            .map(|assignment| assignment.interviewer)
            .collect()
    }

    pub fn assignment(&self, interviewer: ConsultantId) -> Option<&InterviewerAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.interviewer == interviewer)
    }

    pub fn assignment_mut(
        &mut self,
        interviewer: ConsultantId,
    ) -> Option<&mut InterviewerAssignment> {
        self.assignments
            .iter_mut()
            .find(|assignment| assignment.interviewer == interviewer)
    }

    /// Add an interviewer, rejecting a second assignment for the same consultant.
    pub fn assign(&mut self, interviewer: ConsultantId) -> Result<(), ConsistencyError> {
        if self.assignment(interviewer).is_some() {
            return Err(ConsistencyError::DuplicateInterviewer {
                interview: self.id,
                interviewer,
            });
        }
        self.assignments.push(InterviewerAssignment::new(interviewer));
        Ok(())
    }

    pub fn planned_day(&self) -> Option<NaiveDate> {
        self.planned_date.map(|planned| planned.date())
    }

    pub fn minutes_recorded(&self) -> usize {
        self.assignments
            .iter()
            .filter(|assignment| assignment.has_minute())
            .count()
    }

    pub fn title(&self, process: &Process) -> String {
        format!("#{} - {}", self.rank, process)
    }
}

/// Hiring pipeline for one candidate at one subsidiary.
///
/// Interviews are kept sorted by rank. `last_issued_rank` is the highest rank ever
/// attached, so deleting the last interview never frees its rank for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub candidate: Candidate,
    pub subsidiary: Subsidiary,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub contract: ContractTerms,
    pub source: Option<Source>,
    pub interviews: Vec<Interview>,
    pub last_issued_rank: Option<Rank>,
}

impl Process {
    pub fn new(
        id: ProcessId,
        candidate: Candidate,
        subsidiary: Subsidiary,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            candidate,
            subsidiary,
            start_date,
            end_date: None,
            contract: ContractTerms::default(),
            source: None,
            interviews: Vec::new(),
            last_issued_rank: None,
        }
    }

    /// Interview with the greatest rank, independent of insertion order.
    pub fn last_interview(&self) -> Option<&Interview> {
        self.interviews.iter().max_by_key(|interview| interview.rank)
    }

    pub fn interview(&self, id: InterviewId) -> Option<&Interview> {
        self.interviews.iter().find(|interview| interview.id == id)
    }

    pub fn interview_mut(&mut self, id: InterviewId) -> Option<&mut Interview> {
        self.interviews.iter_mut().find(|interview| interview.id == id)
    }

    pub fn has_rank(&self, rank: Rank) -> bool {
        self.interviews.iter().any(|interview| interview.rank == rank)
    }

    /// Attach an interview, enforcing `(process, rank)` uniqueness.
    pub fn attach_interview(&mut self, interview: Interview) -> Result<(), ConsistencyError> {
        if interview.process != self.id {
            return Err(ConsistencyError::ForeignInterview {
                process: self.id,
                interview: interview.id,
            });
        }
        if self.has_rank(interview.rank) {
            return Err(ConsistencyError::DuplicateRank {
                process: self.id,
                rank: interview.rank,
            });
        }

        self.last_issued_rank = self.last_issued_rank.max(Some(interview.rank));
        let position = self
            .interviews
            .partition_point(|existing| existing.rank < interview.rank);
        self.interviews.insert(position, interview);
        Ok(())
    }

    /// Remove an interview together with its assignments.
    pub fn detach_interview(&mut self, id: InterviewId) -> Option<Interview> {
        let position = self
            .interviews
            .iter()
            .position(|interview| interview.id == id)?;
        Some(self.interviews.remove(position))
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for subsidiary {}", self.candidate, self.subsidiary)
    }
}

/// A write would break an invariant of the interview history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("rank {rank} is already taken in {process}")]
    DuplicateRank { process: ProcessId, rank: Rank },
    #[error("{interviewer} is already assigned to {interview}")]
    DuplicateInterviewer {
        interview: InterviewId,
        interviewer: ConsultantId,
    },
    #[error("{interview} does not belong to {process}")]
    ForeignInterview {
        process: ProcessId,
        interview: InterviewId,
    },
    #[error("no rank left after {last} in {process}")]
    RanksExhausted { process: ProcessId, last: Rank },
    #[error("a minute cannot move {interview} to {}", .state.label())]
    MinuteOutcome {
        interview: InterviewId,
        state: InterviewNextState,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("{0} not found")]
    Process(ProcessId),
    #[error("{0} not found")]
    Interview(InterviewId),
    #[error("{0} not found")]
    Candidate(CandidateId),
    #[error("{0} not found")]
    Subsidiary(SubsidiaryId),
    #[error("{interviewer} is not assigned to {interview}")]
    Assignment {
        interview: InterviewId,
        interviewer: ConsultantId,
    },
}
