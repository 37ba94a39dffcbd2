//! Assertions over collected lifecycle entries.

use crate::events::{CollectingLifecycleSink, LifecycleKind};

/// Returns the entry sequence of a run in which every stage completed.
#[must_use]
pub fn expected_success_sequence(stages: &[&str]) -> Vec<(LifecycleKind, String)> {
    stages
        .iter()
        .flat_map(|s| {
            [
                (LifecycleKind::Started, (*s).to_string()),
                (LifecycleKind::Completed, (*s).to_string()),
            ]
        })
        .collect()
}

/// Asserts that exactly `stages` started and completed, pairwise, in order.
pub fn assert_completed_in_order(sink: &CollectingLifecycleSink, stages: &[&str]) {
    let actual = sink.sequence();
    let expected = expected_success_sequence(stages);
    assert_eq!(
        actual, expected,
        "Expected lifecycle {expected:?}, got {actual:?}"
    );
}

/// Asserts that `completed` ran to completion in order, then `failed` started
/// and failed once, and nothing was logged afterwards.
pub fn assert_aborted_at(sink: &CollectingLifecycleSink, completed: &[&str], failed: &str) {
    let mut expected = expected_success_sequence(completed);
    expected.push((LifecycleKind::Started, failed.to_string()));
    expected.push((LifecycleKind::Failed, failed.to_string()));

    let actual = sink.sequence();
    assert_eq!(
        actual, expected,
        "Expected lifecycle {expected:?}, got {actual:?}"
    );
}
