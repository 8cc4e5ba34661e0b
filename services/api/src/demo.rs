use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use hiring_pipeline::error::AppError;
use hiring_pipeline::workflows::interview::{
    ConsultantId, ContractTerms, EngineConfig, InMemoryPipelineRepository, InterviewDraft,
    InterviewNextState, InterviewProcessService, MinuteEntry, MinuteFormat, NewCandidate,
    NewSubsidiary, OpenProcessRequest, PipelineOverview, Process, ProcessServiceError, Source,
};
use std::sync::Arc;

const LYON_RESPONSIBLE: ConsultantId = ConsultantId(1);
const TECH_LEAD: ConsultantId = ConsultantId(11);
const ARCHITECT: ConsultantId = ConsultantId(12);

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the overview as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
    /// Window in days during which a closed process is reported as recently closed.
    #[arg(long)]
    pub(crate) recently_closed_window_days: Option<u32>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        json,
        recently_closed_window_days,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mut config = EngineConfig::default();
    if let Some(window) = recently_closed_window_days {
        config.recently_closed_window_days = window;
    }

    let service = InterviewProcessService::new(
        Arc::new(InMemoryPipelineRepository::default()),
        config,
    );
    seed_pipeline(&service, today)?;
    let overview = service.overview(today)?;

    if json {
        let rendered = serde_json::to_string_pretty(&overview)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_overview(&overview);
    }

    Ok(())
}

fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default())
}

fn seed_pipeline(
    service: &InterviewProcessService<InMemoryPipelineRepository>,
    today: NaiveDate,
) -> Result<(), ProcessServiceError> {
    let lyon = service.register_subsidiary(NewSubsidiary {
        name: "Lyon".to_string(),
        responsible: LYON_RESPONSIBLE,
    })?;

    let open = |name: &str,
                source: Option<Source>|
     -> Result<Process, ProcessServiceError> {
        let candidate = service.register_candidate(NewCandidate {
            name: name.to_string(),
            email: None,
            phone: None,
        })?;
        service.open_process(
            OpenProcessRequest {
                candidate: candidate.id,
                subsidiary: lyon.id,
                contract: ContractTerms::default(),
                source,
            },
            today - Duration::days(20),
        )
    };

    let overdue = open("Margaret Hamilton", None)?;
    let itw = service.schedule_interview(
        overdue.id,
        InterviewDraft {
            interviewers: vec![TECH_LEAD],
            ..InterviewDraft::default()
        },
    )?;
    service.plan_interview(itw.id, at(today - Duration::days(2), 14))?;

    let referral = Some(Source {
        name: "Employee referral".to_string(),
        category: "Network".to_string(),
    });
    let upcoming = open("Dennis Ritchie", referral)?;
    let first = service.schedule_interview(
        upcoming.id,
        InterviewDraft {
            planned_date: Some(at(today - Duration::days(6), 10)),
            interviewers: vec![TECH_LEAD],
            ..InterviewDraft::default()
        },
    )?;
    service.record_minute(
        first.id,
        MinuteEntry {
            interviewer: TECH_LEAD,
            minute: "Excellent systems knowledge.".to_string(),
            minute_format: MinuteFormat::PlainText,
            suggested_interviewer: Some(ARCHITECT),
            next_state: InterviewNextState::Go,
        },
    )?;
    service.schedule_interview(
        upcoming.id,
        InterviewDraft {
            planned_date: Some(at(today + Duration::days(3), 16)),
            next_state: Some(InterviewNextState::Planned),
            interviewers: vec![ARCHITECT],
            ..InterviewDraft::default()
        },
    )?;

    let declined = open("Alan Kay", None)?;
    let screening = service.schedule_interview(
        declined.id,
        InterviewDraft {
            planned_date: Some(at(today - Duration::days(9), 11)),
            interviewers: vec![ARCHITECT],
            ..InterviewDraft::default()
        },
    )?;
    service.record_minute(
        screening.id,
        MinuteEntry {
            interviewer: ARCHITECT,
            minute: String::new(),
            minute_format: MinuteFormat::Markdown,
            suggested_interviewer: None,
            next_state: InterviewNextState::NoGo,
        },
    )?;
    service.close_process(declined.id, today - Duration::days(4))?;

    open("Barbara Liskov", None)?;

    Ok(())
}

fn render_overview(overview: &PipelineOverview) {
    println!("Hiring pipeline overview for {}", overview.today);

    println!("\nActive processes ({})", overview.active.len());
    for entry in &overview.active {
        println!(
            "- {} | next: {} | responsible: {}",
            entry.title,
            entry.next_action_display,
            join_consultants(&entry.responsible)
        );
    }

    println!("\nLate processes ({})", overview.late.len());
    for entry in &overview.late {
        println!("- {}", entry.title);
    }

    println!("\nRecently closed ({})", overview.recently_closed.len());
    for entry in &overview.recently_closed {
        println!("- {}", entry.title);
    }

    println!(
        "\nInterviews needing attention ({})",
        overview.interviews_needing_attention.len()
    );
    for interview in &overview.interviews_needing_attention {
        let planned = interview
            .planned_date
            .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unplanned".to_string());
        println!(
            "- {} | {} | planned {} | {} minute(s)",
            interview.title, interview.next_state_label, planned, interview.minutes_recorded
        );
    }
}

fn join_consultants(consultants: &[ConsultantId]) -> String {
    if consultants.is_empty() {
        return "nobody assigned".to_string();
    }
    consultants
        .iter()
        .map(ConsultantId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_pipeline_exercises_every_bucket() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date");
        let service = InterviewProcessService::new(
            Arc::new(InMemoryPipelineRepository::default()),
            EngineConfig::default(),
        );
        seed_pipeline(&service, today).expect("pipeline seeds");

        let overview = service.overview(today).expect("overview builds");
        assert_eq!(overview.active.len(), 3);
        assert_eq!(overview.late.len(), 1);
        assert_eq!(overview.recently_closed.len(), 1);
        assert_eq!(overview.interviews_needing_attention.len(), 2);
    }

    #[test]
    fn join_consultants_handles_empty_list() {
        assert_eq!(join_consultants(&[]), "nobody assigned");
        assert_eq!(
            join_consultants(&[TECH_LEAD, ARCHITECT]),
            "consultant-11, consultant-12"
        );
    }
}
