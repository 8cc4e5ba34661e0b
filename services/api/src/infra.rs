use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_input() {
        assert_eq!(
            parse_date(" 2025-10-15 "),
            Ok(NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date"))
        );
    }

    #[test]
    fn parse_date_reports_bad_input() {
        let err = parse_date("15/10/2025").expect_err("format rejected");
        assert!(err.contains("YYYY-MM-DD"));
    }
}
