//! Planning result record.

use serde::Serialize;

/// Layout, capacity, investment and payback for one planning scenario.
///
/// Every field is always populated. Paybacks are `None` when undefined
/// (non-positive investment or cash flow) and serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub site_area_sqm: f64,

    /// Draw-adjusted stalls per row (same as `stalls_per_row_draw`).
    pub stalls_per_row: u64,
    pub stalls_per_row_raw: u64,
    pub stalls_per_row_draw: u64,
    pub row_count: u32,
    pub layout_note: String,
    pub stalls_total: u64,
    pub stalls_left: u64,
    pub stalls_right: u64,

    /// Piles the layout supports (two stalls per pile).
    pub n_layout: u64,
    /// Piles the grid allocation supports.
    pub n_power: u64,
    pub n_recommend: u64,

    pub power_capacity_kva: f64,
    /// Kept for older consumers; not used by any other figure.
    pub transformer_required_kva: f64,

    pub invest_power_yuan: f64,
    pub invest_civil_yuan: f64,
    pub invest_pile_yuan: f64,
    pub invest_total_yuan: f64,

    pub energy_year_kwh: f64,
    pub revenue_year_yuan: f64,
    pub payback_years: Option<f64>,

    pub rent_year_yuan: f64,
    pub labor_year_yuan: f64,
    pub revenue_net_year_yuan: f64,
    pub payback_net_years: Option<f64>,

    pub notes: Vec<String>,
}
