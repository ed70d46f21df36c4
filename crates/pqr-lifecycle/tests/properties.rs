//! Property tests for the read-only helpers.

use pqr_lifecycle::{CaseFilter, extract_related_complaint};
use pqr_model::{CaseRecord, NOT_AVAILABLE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn related_complaint_found_between_words(
        number in "[0-9]{16}|[0-9]{20}",
        before in "[a-zA-Z ]{0,20}",
        after in "[a-zA-Z ]{0,20}",
    ) {
        let text = format!("{before} {number} {after}");
        prop_assert_eq!(extract_related_complaint(&text), number);
    }

    #[test]
    fn other_lengths_are_ignored(number in "[0-9]{17,19}") {
        prop_assert_eq!(extract_related_complaint(&format!("ref {number}")), NOT_AVAILABLE);
    }

    #[test]
    fn empty_filter_matches_every_case(sn in "[0-9]{1,12}", name in "[A-Z ]{0,30}") {
        let mut case = CaseRecord::new(sn);
        case.customer_name = name;
        prop_assert!(CaseFilter::default().matches(&case));
    }
}
