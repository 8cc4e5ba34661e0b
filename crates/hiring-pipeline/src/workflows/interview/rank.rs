//! Append-only rank allocation for new interviews.

use super::domain::{ConsistencyError, Process, Rank};

/// Rank for the next interview of `process`.
///
/// One past the greater of the current last interview's rank and the highest rank
/// ever issued, so ranks freed by deletions are never handed out again. Fails once
/// the history has reached the largest representable rank.
pub fn next_rank(process: &Process) -> Result<Rank, ConsistencyError> {
    let last_existing = process.last_interview().map(|interview| interview.rank);
    match last_existing.max(process.last_issued_rank) {
        None => Ok(Rank::FIRST),
        Some(last) => last.next().ok_or(ConsistencyError::RanksExhausted {
            process: process.id,
            last,
        }),
    }
}

/// Resolve the rank of a new interview, honoring a caller-provided one when present.
pub fn resolve_rank(process: &Process, requested: Option<Rank>) -> Result<Rank, ConsistencyError> {
    match requested {
        Some(rank) if process.has_rank(rank) => Err(ConsistencyError::DuplicateRank {
            process: process.id,
            rank,
        }),
        Some(rank) => Ok(rank),
        None => next_rank(process),
    }
}
