use chrono::NaiveDate;

use super::super::domain::Interview;

/// Past-due interviews either still need a verdict or, once decided, at least
/// one interviewer's minute.
pub fn needs_attention(interview: &Interview, today: NaiveDate) -> bool {
    let Some(planned) = interview.planned_day() else {
        return false;
    };
    if planned >= today {
        return false;
    }

    if interview.next_state.is_pending() {
        return true;
    }

    interview.minutes_recorded() == 0
}
