use waypoint::stage::StageDescriptor;

/// Assert that a descriptor sequence matches the expected (title, data)
/// pairs, in order.
#[allow(dead_code)]
pub fn assert_timeline(entries: &[StageDescriptor], expected: &[(&str, &str)]) {
    let actual: Vec<(&str, &str)> = entries
        .iter()
        .map(|entry| (entry.title.as_str(), entry.data.as_str()))
        .collect();
    assert_eq!(
        actual, expected,
        "timeline mismatch: expected {expected:?}, got {actual:?}"
    );
}
