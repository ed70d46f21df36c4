//! Read-only views over the case collection.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use pqr_model::{CaseRecord, CaseStatus, NOT_AVAILABLE, Priority, parse_date};
use pqr_store::StoredCase;
use regex::Regex;

/// First standalone 16- or 20-digit number.
static RELATED_COMPLAINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{16}|\d{20})\b").expect("Invalid related complaint regex"));

/// Criteria for listing cases. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of SN, CUN, name, national id or category.
    pub search: Option<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &CaseRecord) -> bool {
        if self.status.is_some_and(|s| s != case.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != case.priority) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    &case.sn,
                    &case.cun,
                    &case.customer_name,
                    &case.customer_id,
                    &case.category,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

/// Cases matching `filter`, in collection order.
pub fn filter_cases<'a>(cases: &'a [StoredCase], filter: &CaseFilter) -> Vec<&'a StoredCase> {
    cases.iter().filter(|c| filter.matches(&c.record)).collect()
}

/// Age shown for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseAge {
    /// Recomputed from the filing date (decree successors).
    Days(i64),
    /// The ingested `Dia` counter, unchanged.
    Reported(String),
    NotAvailable,
}

impl fmt::Display for CaseAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseAge::Days(days) => write!(f, "{days}"),
            CaseAge::Reported(value) => f.write_str(value),
            CaseAge::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Age of a case in days as of `today`.
///
/// Decree successors restart their clock at their own filing date and count
/// whole days in either direction. Other
/// cases report the externally supplied `Dia` counter as-is.
pub fn case_age(case: &CaseRecord, today: NaiveDate) -> CaseAge {
    let Some(filed) = parse_date(&case.filing_date) else {
        return CaseAge::NotAvailable;
    };
    if case.is_decree_successor() {
        return CaseAge::Days((today - filed).num_days().abs());
    }
    let reported = case.day_counter.trim();
    if reported.is_empty() {
        CaseAge::NotAvailable
    } else {
        CaseAge::Reported(reported.to_string())
    }
}

/// Other cases sharing the national id or the CUN of `target`.
///
/// Advisory only; blank values never match.
pub fn find_duplicates<'a>(cases: &'a [StoredCase], target: &StoredCase) -> Vec<&'a StoredCase> {
    let id = target.record.customer_id.trim();
    let cun = target.record.cun.trim();
    cases
        .iter()
        .filter(|c| c.id != target.id)
        .filter(|c| {
            (!id.is_empty() && c.record.customer_id.trim() == id)
                || (!cun.is_empty() && c.record.cun.trim() == cun)
        })
        .collect()
}

/// Extracts the related complaint number from free text, or `N/A`.
pub fn extract_related_complaint(text: &str) -> String {
    RELATED_COMPLAINT_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqr_store::DocumentId;

    fn stored(id: &str, sn: &str) -> StoredCase {
        StoredCase::new(DocumentId::from(id), CaseRecord::new(sn))
    }

    #[test]
    fn test_related_complaint_first_match() {
        assert_eq!(
            extract_related_complaint("Ver 1234567890123456 y 12345678901234567890"),
            "1234567890123456"
        );
        assert_eq!(
            extract_related_complaint("radicado 12345678901234567890."),
            "12345678901234567890"
        );
    }

    #[test]
    fn test_related_complaint_boundaries() {
        // 17 and 18 digits are not complaint numbers.
        assert_eq!(extract_related_complaint("12345678901234567"), "N/A");
        assert_eq!(extract_related_complaint("x123456789012345678"), "N/A");
        assert_eq!(extract_related_complaint(""), "N/A");
    }

    #[test]
    fn test_age_pass_through_and_recompute() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let mut case = CaseRecord::new("1");
        assert_eq!(case_age(&case, today), CaseAge::NotAvailable);

        case.filing_date = "2024-05-01".to_string();
        case.day_counter = "7".to_string();
        assert_eq!(case_age(&case, today), CaseAge::Reported("7".to_string()));

        case.sn_original = Some("1".to_string());
        assert_eq!(case_age(&case, today), CaseAge::Days(19));
    }

    #[test]
    fn test_future_filing_date_counts_forward() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let mut case = CaseRecord::new("1-D1");
        case.sn_original = Some("1".to_string());
        case.filing_date = "2024-05-23".to_string();
        assert_eq!(case_age(&case, today), CaseAge::Days(3));
    }

    #[test]
    fn test_duplicates_exclude_self_and_blanks() {
        let mut a = stored("a", "1");
        a.record.customer_id = "800123456".to_string();
        let mut b = stored("b", "2");
        b.record.customer_id = "800123456".to_string();
        let mut c = stored("c", "3");
        c.record.cun = "CUN-9".to_string();
        let d = stored("d", "4");
        let cases = vec![a.clone(), b, c, d];

        let found: Vec<_> = find_duplicates(&cases, &a).iter().map(|c| c.record.sn.clone()).collect();
        assert_eq!(found, vec!["2"]);
        assert!(find_duplicates(&cases, &cases[3]).is_empty());
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let mut a = stored("a", "100");
        a.record.customer_name = "JUAN PEREZ".to_string();
        a.record.priority = Priority::Alta;
        let b = stored("b", "200");
        let cases = vec![a, b];

        let filter = CaseFilter {
            search: Some("perez".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_cases(&cases, &filter).len(), 1);

        let filter = CaseFilter {
            priority: Some(Priority::Media),
            ..Default::default()
        };
        assert_eq!(filter_cases(&cases, &filter)[0].record.sn, "200");
    }
}
