use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{
    ConsultantId, Interview, InterviewId, InterviewNextState, Process, ProcessId, Rank,
};
use super::engine::{needs_attention, NextActionResponsible, ProcessStateEngine};

#[derive(Debug, Clone, Serialize)]
pub struct InterviewView {
    pub interview_id: InterviewId,
    pub process_id: ProcessId,
    pub rank: Rank,
    pub title: String,
    pub planned_date: Option<NaiveDateTime>,
    pub next_state: InterviewNextState,
    pub next_state_label: &'static str,
    pub interviewers: Vec<ConsultantId>,
    pub minutes_recorded: usize,
    pub needs_attention: bool,
}

impl InterviewView {
    pub fn build(process: &Process, interview: &Interview, today: NaiveDate) -> Self {
        Self {
            interview_id: interview.id,
            process_id: process.id,
            rank: interview.rank,
            title: interview.title(process),
            planned_date: interview.planned_date,
            next_state: interview.next_state,
            next_state_label: interview.next_state.label(),
            interviewers: interview.interviewers(),
            minutes_recorded: interview.minutes_recorded(),
            needs_attention: needs_attention(interview, today),
        }
    }
}

/// Sanitized representation of a process and everything derived from its history.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessStatusView {
    pub process_id: ProcessId,
    pub title: String,
    pub candidate: String,
    pub subsidiary: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub state: Option<InterviewNextState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_label: Option<&'static str>,
    pub next_action_display: &'static str,
    pub next_action_responsible: NextActionResponsible,
    pub is_active: bool,
    pub is_late: bool,
    pub is_recently_closed: bool,
    pub interviews: Vec<InterviewView>,
}

impl ProcessStatusView {
    pub fn build(engine: &ProcessStateEngine, process: &Process, today: NaiveDate) -> Self {
        let assessment = engine.assess(process, today);
        let interviews = process
            .interviews
            .iter()
            .map(|interview| InterviewView::build(process, interview, today))
            .collect();

        Self {
            process_id: process.id,
            title: process.to_string(),
            candidate: process.candidate.name.clone(),
            subsidiary: process.subsidiary.name.clone(),
            start_date: process.start_date,
            end_date: process.end_date,
            state: assessment.state,
            state_label: assessment.state.map(InterviewNextState::label),
            next_action_display: assessment.next_action_display,
            next_action_responsible: assessment.next_action_responsible,
            is_active: assessment.is_active,
            is_late: assessment.is_late,
            is_recently_closed: assessment.is_recently_closed,
            interviews,
        }
    }

    pub fn summary(&self) -> ProcessSummaryEntry {
        ProcessSummaryEntry {
            process_id: self.process_id,
            title: self.title.clone(),
            next_action_display: self.next_action_display,
            responsible: self.next_action_responsible.consultants(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessSummaryEntry {
    pub process_id: ProcessId,
    pub title: String,
    pub next_action_display: &'static str,
    pub responsible: Vec<ConsultantId>,
}

/// Dashboard buckets computed for one evaluation date.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOverview {
    pub today: NaiveDate,
    pub active: Vec<ProcessSummaryEntry>,
    pub late: Vec<ProcessSummaryEntry>,
    pub recently_closed: Vec<ProcessSummaryEntry>,
    pub interviews_needing_attention: Vec<InterviewView>,
}

impl PipelineOverview {
    pub fn build(engine: &ProcessStateEngine, processes: &[Process], today: NaiveDate) -> Self {
        let mut overview = PipelineOverview {
            today,
            active: Vec::new(),
            late: Vec::new(),
            recently_closed: Vec::new(),
            interviews_needing_attention: Vec::new(),
        };

        for process in processes {
            let status = ProcessStatusView::build(engine, process, today);
            if status.is_active {
                overview.active.push(status.summary());
            }
            if status.is_late {
                overview.late.push(status.summary());
            }
            if status.is_recently_closed {
                overview.recently_closed.push(status.summary());
            }
            overview.interviews_needing_attention.extend(
                status
                    .interviews
                    .into_iter()
                    .filter(|interview| interview.needs_attention),
            );
        }

        overview
            .interviews_needing_attention
            .sort_by(|a, b| a.planned_date.cmp(&b.planned_date));

        overview
    }
}
