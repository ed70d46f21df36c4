//! Dashboard counts.

use std::collections::BTreeMap;

use pqr_model::{CaseRecord, CaseStatus, Priority};
use serde::Serialize;

/// Case counts by status, priority and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseSummary {
    pub total: usize,
    /// Every status in display order, zeros included.
    pub by_status: Vec<(CaseStatus, usize)>,
    pub by_priority: Vec<(Priority, usize)>,
    /// Categories with at least one case, blank ones under "Sin categoría".
    pub by_category: BTreeMap<String, usize>,
    /// Cases in Resuelto or Finalizado.
    pub closed: usize,
}

impl CaseSummary {
    pub fn from_cases<'a>(cases: impl IntoIterator<Item = &'a CaseRecord>) -> Self {
        let mut summary = Self {
            by_status: CaseStatus::ALL.iter().map(|s| (*s, 0)).collect(),
            by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
            ..Self::default()
        };
        for case in cases {
            summary.total += 1;
            if case.status.is_closed() {
                summary.closed += 1;
            }
            if let Some(slot) = summary.by_status.iter_mut().find(|(s, _)| *s == case.status) {
                slot.1 += 1;
            }
            if let Some(slot) = summary
                .by_priority
                .iter_mut()
                .find(|(p, _)| *p == case.priority)
            {
                slot.1 += 1;
            }
            let category = match case.category.trim() {
                "" => "Sin categoría",
                other => other,
            };
            *summary.by_category.entry(category.to_string()).or_default() += 1;
        }
        summary
    }

    pub fn open(&self) -> usize {
        self.total - self.closed
    }

    pub fn count_for(&self, status: CaseStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut a = CaseRecord::new("1");
        a.status = CaseStatus::Resuelto;
        a.priority = Priority::Alta;
        a.category = "Facturación".to_string();
        let b = CaseRecord::new("2");
        let mut c = CaseRecord::new("3");
        c.status = CaseStatus::Escalado;
        c.category = "Facturación".to_string();

        let summary = CaseSummary::from_cases([&a, &b, &c]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.closed, 1);
        assert_eq!(summary.open(), 2);
        assert_eq!(summary.count_for(CaseStatus::Escalado), 1);
        assert_eq!(summary.count_for(CaseStatus::Decretado), 0);
        assert_eq!(summary.by_status.len(), CaseStatus::ALL.len());
        assert_eq!(summary.by_category["Facturación"], 2);
        assert_eq!(summary.by_category["Sin categoría"], 1);
    }
}
