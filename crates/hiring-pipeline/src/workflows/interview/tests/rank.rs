use super::common::*;
use crate::workflows::interview::domain::{
    ConsistencyError, InterviewId, InterviewNextState, ProcessId, Rank,
};
use crate::workflows::interview::rank::{next_rank, resolve_rank};

#[test]
fn first_interview_gets_rank_one() {
    assert_eq!(next_rank(&empty_process()), Ok(Rank::FIRST));
}

#[test]
fn scenario_f_second_interview_follows_the_first() {
    let process = process_with(vec![interview(
        1,
        1,
        InterviewNextState::Go,
        None,
        Vec::new(),
    )]);
    assert_eq!(next_rank(&process), Ok(rank(2)));
}

#[test]
fn next_rank_skips_past_gaps_and_explicit_ranks() {
    let process = process_with(vec![
        interview(1, 1, InterviewNextState::Go, None, Vec::new()),
        interview(2, 5, InterviewNextState::Planned, None, Vec::new()),
    ]);
    assert_eq!(next_rank(&process), Ok(rank(6)));
}

#[test]
fn deleted_ranks_are_never_reissued() {
    let mut process = empty_process();
    for id in 1..=3 {
        let itw = interview(
            id,
            next_rank(&process).expect("rank available").get(),
            InterviewNextState::NeedPlanification,
            None,
            Vec::new(),
        );
        process.attach_interview(itw).expect("rank free");
    }

    process
        .detach_interview(InterviewId(3))
        .expect("interview removed");
    assert_eq!(process.last_interview().map(|itw| itw.rank), Some(rank(2)));
    assert_eq!(next_rank(&process), Ok(rank(4)));
}

#[test]
fn explicit_colliding_rank_is_a_consistency_error() {
    let process = process_with(vec![interview(
        1,
        1,
        InterviewNextState::Go,
        None,
        Vec::new(),
    )]);

    assert_eq!(
        resolve_rank(&process, Some(rank(1))),
        Err(ConsistencyError::DuplicateRank {
            process: ProcessId(1),
            rank: rank(1),
        })
    );
    assert_eq!(resolve_rank(&process, Some(rank(4))), Ok(rank(4)));
    assert_eq!(resolve_rank(&process, None), Ok(rank(2)));
}

#[test]
fn rank_successor_stops_at_the_largest_value() {
    assert_eq!(rank(41).next(), Some(rank(42)));
    assert_eq!(rank(u32::MAX).next(), None);
}

#[test]
fn exhausted_history_refuses_an_automatic_rank() {
    let process = process_with(vec![interview(
        1,
        u32::MAX,
        InterviewNextState::Planned,
        None,
        Vec::new(),
    )]);

    let exhausted = ConsistencyError::RanksExhausted {
        process: ProcessId(1),
        last: rank(u32::MAX),
    };
    assert_eq!(next_rank(&process), Err(exhausted.clone()));
    assert_eq!(resolve_rank(&process, None), Err(exhausted));
    assert_eq!(resolve_rank(&process, Some(rank(2))), Ok(rank(2)));
}

#[test]
fn retired_largest_rank_still_blocks_automatic_ranks() {
    let mut process = empty_process();
    process
        .attach_interview(interview(1, u32::MAX, InterviewNextState::Go, None, Vec::new()))
        .expect("rank free");
    process
        .detach_interview(InterviewId(1))
        .expect("interview removed");

    assert!(matches!(
        next_rank(&process),
        Err(ConsistencyError::RanksExhausted { .. })
    ));
}

#[test]
fn attach_keeps_interviews_sorted_and_unique() {
    let mut process = empty_process();
    process
        .attach_interview(interview(1, 4, InterviewNextState::Go, None, Vec::new()))
        .expect("rank free");
    process
        .attach_interview(interview(2, 2, InterviewNextState::NoGo, None, Vec::new()))
        .expect("rank free");

    let ranks: Vec<u32> = process.interviews.iter().map(|itw| itw.rank.get()).collect();
    assert_eq!(ranks, vec![2, 4]);

    let duplicate =
        process.attach_interview(interview(3, 2, InterviewNextState::Go, None, Vec::new()));
    assert!(matches!(
        duplicate,
        Err(ConsistencyError::DuplicateRank { .. })
    ));
}

#[test]
fn attach_rejects_interviews_of_other_processes() {
    let mut process = empty_process();
    let mut foreign = interview(1, 1, InterviewNextState::Go, None, Vec::new());
    foreign.process = ProcessId(99);

    assert!(matches!(
        process.attach_interview(foreign),
        Err(ConsistencyError::ForeignInterview { .. })
    ));
}

#[test]
fn rank_zero_is_rejected() {
    assert_eq!(Rank::new(0), None);
    assert!(serde_json::from_str::<Rank>("0").is_err());
    assert_eq!(serde_json::from_str::<Rank>("3").expect("valid rank"), rank(3));
}

#[test]
fn state_codes_round_trip_through_lookup() {
    assert_eq!(
        InterviewNextState::from_code("np"),
        Some(InterviewNextState::NeedPlanification)
    );
    assert_eq!(InterviewNextState::from_code("NO"), Some(InterviewNextState::NoGo));
    assert_eq!(InterviewNextState::from_code("??"), None);
    assert_eq!(InterviewNextState::default(), InterviewNextState::NeedPlanification);
}
