//! Local mock of the scoring service: three jittered candidates around a point

use rand::RngExt;

use crate::models::{Coordinate, MockSite};

/// Used when the request carries no coordinate
pub const DEFAULT_BASE: Coordinate = Coordinate {
    lat: -32.2469,
    lng: 148.601,
};

const SITE_COUNT: usize = 3;
const JITTER_SPAN_DEG: f64 = 1.2;
const SUMMARY: &str = "Mock ML site candidate for local testing.";

fn jitter(value: f64) -> f64 {
    value + rand::rng().random_range(-0.5_f64..0.5) * JITTER_SPAN_DEG
}

fn mock_score() -> f64 {
    ((0.7 + rand::rng().random_range(0.0_f64..0.25)) * 100.0).round() / 100.0
}

/// Generate candidate sites around `base` (or [`DEFAULT_BASE`])
#[must_use]
pub fn generate_sites(base: Option<Coordinate>) -> Vec<MockSite> {
    let base = base.unwrap_or(DEFAULT_BASE);

    (1..=SITE_COUNT)
        .map(|i| MockSite {
            id: format!("mock-{i}"),
            lat: jitter(base.lat),
            lng: jitter(base.lng),
            score: mock_score(),
            summary: SUMMARY.to_string(),
        })
        .collect()
}
