//! Alerts for cases left in `Iniciado` too long.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use pqr_model::CaseStatus;
use pqr_store::{DocumentId, StoredCase};

/// Minutes in `Iniciado` before a case is reported.
pub const STUCK_THRESHOLD_MINUTES: i64 = 45;

/// How often the collection is re-evaluated.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// A case that has been in `Iniciado` past the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckAlert {
    pub id: DocumentId,
    pub sn: String,
    pub minutes: i64,
}

/// Evaluates stuck cases, reporting each case at most once per process.
#[derive(Debug)]
pub struct StuckCaseMonitor {
    threshold: TimeDelta,
    alerted: HashSet<DocumentId>,
}

impl Default for StuckCaseMonitor {
    fn default() -> Self {
        Self::new(STUCK_THRESHOLD_MINUTES)
    }
}

impl StuckCaseMonitor {
    pub fn new(threshold_minutes: i64) -> Self {
        Self {
            threshold: TimeDelta::minutes(threshold_minutes),
            alerted: HashSet::new(),
        }
    }

    /// New alerts for `cases` as of `now`.
    pub fn evaluate(&mut self, cases: &[StoredCase], now: DateTime<Utc>) -> Vec<StuckAlert> {
        let mut alerts = Vec::new();
        for case in cases {
            if case.record.status != CaseStatus::Iniciado {
                continue;
            }
            let Some(started) = case.record.work_started_at else {
                continue;
            };
            let elapsed = now - started;
            if elapsed < self.threshold || self.alerted.contains(&case.id) {
                continue;
            }
            self.alerted.insert(case.id.clone());
            tracing::warn!(sn = %case.record.sn, minutes = elapsed.num_minutes(), "case stuck in Iniciado");
            alerts.push(StuckAlert {
                id: case.id.clone(),
                sn: case.record.sn.clone(),
                minutes: elapsed.num_minutes(),
            });
        }
        alerts
    }

    pub fn alerted_count(&self) -> usize {
        self.alerted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqr_model::CaseRecord;

    fn started(minutes_ago: i64, now: DateTime<Utc>) -> StoredCase {
        let mut record = CaseRecord::new("12345");
        record.status = CaseStatus::Iniciado;
        record.work_started_at = Some(now - TimeDelta::minutes(minutes_ago));
        StoredCase::new(DocumentId::from("doc-1"), record)
    }

    #[test]
    fn test_alerts_once_per_case() {
        let now = DateTime::from_timestamp(1_716_000_000, 0).unwrap();
        let cases = vec![started(50, now)];
        let mut monitor = StuckCaseMonitor::default();

        let first = monitor.evaluate(&cases, now);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].minutes, 50);

        let second = monitor.evaluate(&cases, now + TimeDelta::seconds(30));
        assert!(second.is_empty());
        assert_eq!(monitor.alerted_count(), 1);
    }

    #[test]
    fn test_under_threshold_or_other_status_ignored() {
        let now = DateTime::from_timestamp(1_716_000_000, 0).unwrap();
        let mut resolved = started(90, now);
        resolved.record.status = CaseStatus::Resuelto;
        let cases = vec![started(44, now), resolved];
        assert!(StuckCaseMonitor::default().evaluate(&cases, now).is_empty());
    }
}
