//! Custom assertions for points-to results

use flowpta::PointsToResult;
use pretty_assertions::assert_eq;

/// Assert that `test_id` reports exactly `expected` (ascending)
pub fn assert_sites(result: &PointsToResult, test_id: i64, expected: &[i64]) {
    assert!(
        result.get(test_id).is_some(),
        "test {test_id} missing from result:\n{result}"
    );
    assert_eq!(result.sites(test_id), expected.to_vec(), "sites of test {test_id}");
}

/// Assert the full result, one `(test id, sites)` pair per reported test
pub fn assert_result(result: &PointsToResult, expected: &[(i64, &[i64])]) {
    let actual: Vec<(i64, Vec<i64>)> = result
        .iter()
        .map(|(id, sites)| (id, sites.iter().copied().collect()))
        .collect();
    let expected: Vec<(i64, Vec<i64>)> = expected.iter().map(|(id, s)| (*id, s.to_vec())).collect();
    assert_eq!(actual, expected);
}
