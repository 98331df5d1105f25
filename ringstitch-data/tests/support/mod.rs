use std::{fs, path::PathBuf};

/// Epsilon for floating-point coordinate comparisons in tests
const COORDINATE_EPSILON: f64 = 1.0e-7;

/// Directory containing the hand-written OSM XML fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read `<stem>.osm` from the fixtures directory.
pub fn read_fixture(stem: &str) -> String {
    let path = fixtures_dir().join(format!("{stem}.osm"));
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read OSM fixture {path:?}: {err}");
    })
}

/// Compare floating-point coordinates within a small epsilon.
#[expect(
    clippy::float_arithmetic,
    reason = "test delta computation requires float maths"
)]
pub fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= COORDINATE_EPSILON,
        "expected {expected}, got {actual} (|Δ| = {delta})"
    );
}
