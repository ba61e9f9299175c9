//! Table-driven checks for the reconciler's boundary behavior.

use rstest::rstest;
use schedcache_reconcile::{reconcile, Reconciliation};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[rstest]
#[case::both_empty(&[], &[], &[], &[])]
#[case::cache_empty(&["a", "b"], &[], &["a", "b"], &[])]
#[case::authoritative_empty(&[], &["x"], &[], &["x"])]
#[case::exact_match(&["n1", "n2"], &["n2", "n1"], &[], &[])]
#[case::partial_overlap(&["n1", "n2", "n3"], &["n2", "n3", "n4"], &["n1"], &["n4"])]
#[case::fully_disjoint(&["b", "a"], &["d", "c"], &["a", "b"], &["c", "d"])]
#[case::interleaved(&["a", "c", "e"], &["b", "c", "d"], &["a", "e"], &["b", "d"])]
fn test_reconcile_cases(
    #[case] actual: &[&str],
    #[case] cached: &[&str],
    #[case] missed: &[&str],
    #[case] redundant: &[&str],
) {
    let result = reconcile(&strings(actual), &strings(cached));

    assert_eq!(
        result,
        Reconciliation {
            missed: strings(missed),
            redundant: strings(redundant),
        }
    );
}

#[test]
fn test_report_serializes_both_collections() {
    let result = reconcile(&strings(&["a"]), &strings(&["b"]));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({"missed": ["a"], "redundant": ["b"]}));
}
