//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use truck_site_planner::plan::PlanInput;

/// Site with rent and staff so net and gross figures differ.
pub fn staffed_site(length_m: f64, width_m: f64) -> PlanInput {
    PlanInput {
        site_location: "Test yard".to_string(),
        rent_yuan_per_sqm_month: 2.0,
        staff_count: 4,
        salary_yuan_per_month: 6000.0,
        ..PlanInput::with_site(length_m, width_m)
    }
}

/// A spread of sites covering every gate and band edge.
pub fn geometry_sweep() -> Vec<PlanInput> {
    let lengths = [0.0, 6.0, 11.99, 12.0, 18.0, 42.0, 100.0, 1e6];
    let widths = [0.0, 29.99, 30.0, 44.99, 45.0, 100.0, 495.0, 500.0, 500.01, 1e6];
    lengths
        .iter()
        .flat_map(|&l| widths.iter().map(move |&w| staffed_site(l, w)))
        .collect()
}

/// Relative float comparison.
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}
