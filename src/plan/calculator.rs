//! Planning calculator: site geometry and tariffs in, layout and payback out.

use tracing::debug;

use super::input::PlanInput;
use super::layout::StallLayout;
use super::types::PlanResult;
use crate::config::PlanningRules;

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Default, Clone, Copy)]
struct Capex {
    power: f64,
    civil: f64,
    pile: f64,
}

impl Capex {
    fn total(&self) -> f64 {
        self.power + self.civil + self.pile
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Opex {
    rent: f64,
    labor: f64,
}

/// Evaluates `input` with the default planning rules.
pub fn calc_plan(input: &PlanInput) -> PlanResult {
    calc_plan_with(input, &PlanningRules::default())
}

/// Evaluates `input` under `rules`.
///
/// Never fails. A plan that recommends no piles carries zero investment
/// and zero operating figures.
pub fn calc_plan_with(input: &PlanInput, rules: &PlanningRules) -> PlanResult {
    let site_area = finite(input.site_length_m * input.site_width_m);
    let layout = StallLayout::compute(input.site_length_m, input.site_width_m, rules);

    let n_layout = layout.stalls_total / 2;
    let n_power = rules.pile_ceiling();
    let n_recommend = n_layout.min(n_power);
    let piles = n_recommend as f64;
    let power_capacity_kva = finite(piles * rules.kva_per_pile);

    let viable = n_recommend > 0;

    let capex = if viable {
        Capex {
            power: finite(input.power_cost_yuan_per_kva * power_capacity_kva),
            civil: finite(input.civil_cost_yuan_per_sqm * site_area),
            pile: finite(input.pile_cost_yuan_each * piles),
        }
    } else {
        Capex::default()
    };
    let invest_total = finite(capex.total());

    let energy_year = finite(
        piles
            * input.guns_per_pile as f64
            * input.kwh_per_gun_per_day
            * input.days_per_year as f64,
    );
    let revenue_year = finite(input.service_fee_yuan_per_kwh * energy_year);

    let opex = if viable {
        Opex {
            rent: finite(site_area * input.rent_yuan_per_sqm_month * MONTHS_PER_YEAR),
            labor: finite(input.staff_count as f64 * input.salary_yuan_per_month * MONTHS_PER_YEAR),
        }
    } else {
        Opex::default()
    };
    let revenue_net = if viable {
        finite(revenue_year - opex.rent - opex.labor)
    } else {
        0.0
    };

    let mut notes = layout.notes.clone();
    notes.push(format!(
        "Layout: raw stalls per row = floor(length / {:.0}) = {}; drawn stalls per row = {}; rows = {}; stalls = {}; piles (layout) = stalls / 2 = {}.",
        rules.stall_width_m,
        layout.stalls_per_row_raw,
        layout.stalls_per_row_draw,
        layout.row_count,
        layout.stalls_total,
        n_layout
    ));
    notes.push(format!(
        "Power: capacity = piles x {:.0} kVA = {} x {:.0} = {:.0} kVA; power investment = unit cost x capacity = {:.0} x {:.0}.",
        rules.kva_per_pile,
        n_recommend,
        rules.kva_per_pile,
        power_capacity_kva,
        input.power_cost_yuan_per_kva,
        power_capacity_kva
    ));
    if let Some(kva) = rules.grid_allocation_kva {
        notes.push(format!(
            "Grid allocation {kva:.0} kVA supports at most {n_power} pile(s)."
        ));
    }

    if !viable {
        notes.push(
            "Recommended piles = 0: no site works or investment advised (CAPEX set to 0)."
                .to_string(),
        );
    } else {
        if n_recommend < n_layout {
            notes.push(
                "Constrained by power: recommended piles are below the layout maximum.".to_string(),
            );
        }
        if n_recommend < n_power {
            notes.push(
                "Constrained by area or layout: recommended piles are below the power maximum."
                    .to_string(),
            );
        }
        if revenue_net <= 0.0 {
            notes.push(
                "Net operating cash flow <= 0: rent or labour assumptions are high or the service fee is low; the investment may not be recoverable."
                    .to_string(),
            );
        }
    }

    let result = PlanResult {
        site_area_sqm: site_area,
        stalls_per_row: layout.stalls_per_row_draw,
        stalls_per_row_raw: layout.stalls_per_row_raw,
        stalls_per_row_draw: layout.stalls_per_row_draw,
        row_count: layout.row_count,
        layout_note: layout.layout_note,
        stalls_total: layout.stalls_total,
        stalls_left: layout.stalls_left,
        stalls_right: layout.stalls_right,
        n_layout,
        n_power,
        n_recommend,
        power_capacity_kva,
        transformer_required_kva: finite(piles * rules.legacy_kva_per_pile),
        invest_power_yuan: capex.power,
        invest_civil_yuan: capex.civil,
        invest_pile_yuan: capex.pile,
        invest_total_yuan: invest_total,
        energy_year_kwh: energy_year,
        revenue_year_yuan: revenue_year,
        payback_years: payback(invest_total, revenue_year),
        rent_year_yuan: opex.rent,
        labor_year_yuan: opex.labor,
        revenue_net_year_yuan: revenue_net,
        payback_net_years: payback(invest_total, revenue_net),
        notes,
    };

    debug!(
        length_m = input.site_length_m,
        width_m = input.site_width_m,
        rows = result.row_count,
        stalls = result.stalls_total,
        piles = result.n_recommend,
        invest_total_yuan = result.invest_total_yuan,
        revenue_net_year_yuan = result.revenue_net_year_yuan,
        "evaluated plan"
    );

    result
}

/// `investment / cash_flow` when both are strictly positive.
fn payback(investment: f64, cash_flow: f64) -> Option<f64> {
    if investment > 0.0 && cash_flow > 0.0 {
        Some(investment / cash_flow).filter(|years| years.is_finite())
    } else {
        None
    }
}

/// Saturates overflowed products at `±f64::MAX`, keeping their sign. NaN becomes 0.
fn finite(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}
