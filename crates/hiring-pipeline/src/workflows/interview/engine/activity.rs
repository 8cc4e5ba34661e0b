use chrono::NaiveDate;

use super::super::domain::Process;

/// Open processes, or processes whose end date has not been reached yet.
pub fn is_active(process: &Process, today: NaiveDate) -> bool {
    match process.end_date {
        None => true,
        Some(end_date) => end_date > today,
    }
}

/// An active process whose last interview was due today or earlier.
///
/// Recorded minutes are not considered here; see `needs_attention` for the
/// interview-level rule.
pub fn is_late(process: &Process, today: NaiveDate) -> bool {
    if !is_active(process, today) {
        return false;
    }

    let Some(last) = process.last_interview() else {
        return false;
    };

    match last.planned_day() {
        Some(planned) => planned <= today,
        None => false,
    }
}

/// Closed on or before `today`, at most `window_days` ago.
pub fn is_recently_closed(process: &Process, today: NaiveDate, window_days: u32) -> bool {
    let Some(end_date) = process.end_date else {
        return false;
    };
    if end_date > today {
        return false;
    }

    let closed_since = today.signed_duration_since(end_date).num_days();
    closed_since <= i64::from(window_days)
}
