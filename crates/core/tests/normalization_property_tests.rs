//! Property-based tests for text folding and difference classification.

use monitor_ppr_core::comparison::{classify, DifferenceStatus};
use monitor_ppr_core::dashboard::{ProgressStatus, ScheduleFilter};
use monitor_ppr_core::extraction::{normalize_header, normalize_text};
use monitor_ppr_core::schedules::MonthlyValues;
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Spanish-looking text with accents, punctuation and irregular spacing.
fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-zÁÉÍÓÚáéíóúÑñÜü0-9 .,:_/()\\-\t]{0,60}"
}

/// Twelve optional monthly values around the tolerance boundary.
fn arb_monthly() -> impl Strategy<Value = MonthlyValues> {
    proptest::array::uniform12(proptest::option::of(-1.0f64..1.0)).prop_map(MonthlyValues)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn normalize_text_is_idempotent(label in arb_label()) {
        let once = normalize_text(&label);
        prop_assert_eq!(normalize_text(&once), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn normalize_header_is_idempotent(label in arb_label()) {
        let once = normalize_header(&label);
        prop_assert_eq!(normalize_header(&once), once);
    }

    #[test]
    fn alert_iff_some_difference_exceeds_tolerance(
        programmed in arb_monthly(),
        executed in arb_monthly(),
    ) {
        let expected = programmed
            .iter()
            .chain(executed.iter())
            .any(|(_, v)| v.is_some_and(|v| v.abs() > 0.1));
        let status = classify(&programmed, &executed);
        prop_assert_eq!(status == DifferenceStatus::Alerta, expected);
        prop_assert_ne!(status, DifferenceStatus::PendienteRevision);
    }

    #[test]
    fn progress_status_is_monotonic(a in 0.0f64..200.0, b in 0.0f64..200.0) {
        let rank = |s: ProgressStatus| match s {
            ProgressStatus::Critical => 0,
            ProgressStatus::Attention => 1,
            ProgressStatus::Ok => 2,
        };
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(ProgressStatus::classify(low)) <= rank(ProgressStatus::classify(high)));
    }

    #[test]
    fn months_outside_calendar_are_skipped(month in 13u32..1000) {
        let filter = ScheduleFilter { month: Some(month), year: None };
        prop_assert_eq!(
            filter.select(&[]),
            monitor_ppr_core::dashboard::ScheduleSelection::Skipped
        );
    }
}
