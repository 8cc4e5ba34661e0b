use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Candidate, ConsultantId, InterviewId, ProcessId, Subsidiary};
use super::repository::{PipelineRepository, RepositoryError};
use super::service::{
    InterviewDraft, InterviewProcessService, MinuteEntry, NewCandidate, NewSubsidiary,
    OpenProcessRequest, ProcessServiceError,
};
use super::views::{InterviewView, PipelineOverview, ProcessStatusView};

type SharedService<R> = Arc<InterviewProcessService<R>>;

/// Evaluation date for derived attributes; defaults to the local calendar day.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluationDate {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl EvaluationDate {
    pub fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Deserialize)]
pub struct CloseProcessRequest {
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PlanInterviewRequest {
    pub planned_date: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AssignInterviewerRequest {
    pub interviewer: ConsultantId,
}

/// Router builder exposing the process tracking endpoints.
pub fn pipeline_router<R>(service: SharedService<R>) -> Router
where
    R: PipelineRepository + 'static,
{
    Router::new()
        .route("/api/v1/candidates", post(register_candidate_handler::<R>))
        .route("/api/v1/subsidiaries", post(register_subsidiary_handler::<R>))
        .route("/api/v1/processes", post(open_process_handler::<R>))
        .route(
            "/api/v1/processes/:process_id",
            get(process_status_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/interviews",
            post(schedule_interview_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/close",
            post(close_process_handler::<R>),
        )
        .route(
            "/api/v1/interviews/:interview_id",
            get(interview_status_handler::<R>).delete(delete_interview_handler::<R>),
        )
        .route(
            "/api/v1/interviews/:interview_id/plan",
            post(plan_interview_handler::<R>),
        )
        .route(
            "/api/v1/interviews/:interview_id/interviewers",
            post(assign_interviewer_handler::<R>),
        )
        .route(
            "/api/v1/interviews/:interview_id/minutes",
            post(record_minute_handler::<R>),
        )
        .route("/api/v1/overview", get(overview_handler::<R>))
        .with_state(service)
}

impl IntoResponse for ProcessServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProcessServiceError::NotFound(_)
            | ProcessServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ProcessServiceError::Consistency(_)
            | ProcessServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ProcessServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

pub(crate) async fn register_candidate_handler<R>(
    State(service): State<SharedService<R>>,
    Json(candidate): Json<NewCandidate>,
) -> Result<(StatusCode, Json<Candidate>), ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let candidate = service.register_candidate(candidate)?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub(crate) async fn register_subsidiary_handler<R>(
    State(service): State<SharedService<R>>,
    Json(subsidiary): Json<NewSubsidiary>,
) -> Result<(StatusCode, Json<Subsidiary>), ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let subsidiary = service.register_subsidiary(subsidiary)?;
    Ok((StatusCode::CREATED, Json(subsidiary)))
}

pub(crate) async fn open_process_handler<R>(
    State(service): State<SharedService<R>>,
    Query(date): Query<EvaluationDate>,
    Json(request): Json<OpenProcessRequest>,
) -> Result<(StatusCode, Json<ProcessStatusView>), ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let today = date.resolve();
    let process = service.open_process(request, today)?;
    let view = ProcessStatusView::build(service.engine(), &process, today);
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn process_status_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
) -> Result<Json<ProcessStatusView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let view = service.process_status(ProcessId(process_id), date.resolve())?;
    Ok(Json(view))
}

pub(crate) async fn schedule_interview_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
    Json(draft): Json<InterviewDraft>,
) -> Result<(StatusCode, Json<InterviewView>), ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let interview = service.schedule_interview(ProcessId(process_id), draft)?;
    let view = service.interview_status(interview.id, date.resolve())?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn close_process_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
    Json(request): Json<CloseProcessRequest>,
) -> Result<Json<ProcessStatusView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let process = service.close_process(ProcessId(process_id), request.end_date)?;
    let view = ProcessStatusView::build(service.engine(), &process, date.resolve());
    Ok(Json(view))
}

pub(crate) async fn interview_status_handler<R>(
    State(service): State<SharedService<R>>,
    Path(interview_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
) -> Result<Json<InterviewView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let view = service.interview_status(InterviewId(interview_id), date.resolve())?;
    Ok(Json(view))
}

pub(crate) async fn delete_interview_handler<R>(
    State(service): State<SharedService<R>>,
    Path(interview_id): Path<u64>,
) -> Result<StatusCode, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    service.delete_interview(InterviewId(interview_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn plan_interview_handler<R>(
    State(service): State<SharedService<R>>,
    Path(interview_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
    Json(request): Json<PlanInterviewRequest>,
) -> Result<Json<InterviewView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let id = InterviewId(interview_id);
    service.plan_interview(id, request.planned_date)?;
    Ok(Json(service.interview_status(id, date.resolve())?))
}

pub(crate) async fn assign_interviewer_handler<R>(
    State(service): State<SharedService<R>>,
    Path(interview_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
    Json(request): Json<AssignInterviewerRequest>,
) -> Result<Json<InterviewView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let id = InterviewId(interview_id);
    service.assign_interviewer(id, request.interviewer)?;
    Ok(Json(service.interview_status(id, date.resolve())?))
}

pub(crate) async fn record_minute_handler<R>(
    State(service): State<SharedService<R>>,
    Path(interview_id): Path<u64>,
    Query(date): Query<EvaluationDate>,
    Json(entry): Json<MinuteEntry>,
) -> Result<Json<InterviewView>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    let id = InterviewId(interview_id);
    service.record_minute(id, entry)?;
    Ok(Json(service.interview_status(id, date.resolve())?))
}

pub(crate) async fn overview_handler<R>(
    State(service): State<SharedService<R>>,
    Query(date): Query<EvaluationDate>,
) -> Result<Json<PipelineOverview>, ProcessServiceError>
where
    R: PipelineRepository + 'static,
{
    Ok(Json(service.overview(date.resolve())?))
}
