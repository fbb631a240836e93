//! Plain-text summaries of a plan and its sensitivity sweep.

use std::fmt;

use crate::plan::{PlanInput, PlanResult};
use crate::sensitivity::{SensitivityCell, SensitivitySummary};

/// Yuan per reporting unit (10k yuan).
pub const YUAN_PER_WAN: f64 = 10_000.0;

/// Converts yuan to 10k-yuan reporting units.
pub fn to_wan(yuan: f64) -> f64 {
    yuan / YUAN_PER_WAN
}

/// Renders a payback period, or `N/A` when it is undefined.
pub fn format_payback(years: Option<f64>) -> String {
    match years {
        Some(y) => format!("{y:.2} years"),
        None => "N/A".to_string(),
    }
}

/// Key-value summary of one evaluated plan.
pub struct PlanSummary<'a> {
    pub input: &'a PlanInput,
    pub result: &'a PlanResult,
}

impl<'a> PlanSummary<'a> {
    pub fn new(input: &'a PlanInput, result: &'a PlanResult) -> Self {
        Self { input, result }
    }
}

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = self.input;
        let r = self.result;
        let location = if i.site_location.is_empty() {
            "(unspecified)"
        } else {
            i.site_location.as_str()
        };

        writeln!(f, "--- Site Plan ---")?;
        writeln!(f, "Location:              {location}")?;
        writeln!(
            f,
            "Site:                  {:.1} m x {:.1} m ({:.0} m2)",
            i.site_length_m, i.site_width_m, r.site_area_sqm
        )?;
        writeln!(
            f,
            "Layout:                {} row(s), {} raw / {} drawn stalls per row",
            r.row_count, r.stalls_per_row_raw, r.stalls_per_row_draw
        )?;
        writeln!(
            f,
            "Stalls:                {} (left {}, right {})",
            r.stalls_total, r.stalls_left, r.stalls_right
        )?;
        writeln!(
            f,
            "Piles:                 {} recommended ({} by layout)",
            r.n_recommend, r.n_layout
        )?;
        writeln!(f, "Power capacity:        {:.0} kVA", r.power_capacity_kva)?;
        writeln!(
            f,
            "Investment:            {:.2} 10k yuan (power {:.2}, civil {:.2}, piles {:.2})",
            to_wan(r.invest_total_yuan),
            to_wan(r.invest_power_yuan),
            to_wan(r.invest_civil_yuan),
            to_wan(r.invest_pile_yuan)
        )?;
        writeln!(
            f,
            "Energy per gun:        {:.0} kWh/day x {} gun(s) per pile",
            i.kwh_per_gun_per_day, i.guns_per_pile
        )?;
        writeln!(
            f,
            "Service fee:           {:.2} yuan/kWh",
            i.service_fee_yuan_per_kwh
        )?;
        writeln!(f, "Operating days:        {} per year", i.days_per_year)?;
        writeln!(
            f,
            "Staff:                 {} at {:.0} yuan/month",
            i.staff_count, i.salary_yuan_per_month
        )?;
        writeln!(
            f,
            "Rent rate:             {:.2} yuan/m2/month",
            i.rent_yuan_per_sqm_month
        )?;
        writeln!(f, "Annual energy:         {:.0} kWh", r.energy_year_kwh)?;
        writeln!(
            f,
            "Annual revenue:        {:.2} 10k yuan",
            to_wan(r.revenue_year_yuan)
        )?;
        writeln!(f, "Gross payback:         {}", format_payback(r.payback_years))?;
        writeln!(
            f,
            "Rent / labour:         {:.2} / {:.2} 10k yuan",
            to_wan(r.rent_year_yuan),
            to_wan(r.labor_year_yuan)
        )?;
        writeln!(
            f,
            "Net annual revenue:    {:.2} 10k yuan",
            to_wan(r.revenue_net_year_yuan)
        )?;
        writeln!(f, "Net payback:           {}", format_payback(r.payback_net_years))?;
        write!(f, "Notes:")?;
        for note in &r.notes {
            write!(f, "\n  - {note}")?;
        }
        Ok(())
    }
}

fn describe(cell: &SensitivityCell) -> String {
    format!(
        "{:.0} kWh/gun/day, fee {:.2} yuan/kWh, rent {:.2} yuan/m2/month: net {:.2} 10k yuan/yr, payback {} [{}]",
        cell.kwh_per_gun_per_day,
        cell.service_fee_yuan_per_kwh,
        cell.rent_yuan_per_sqm_month,
        to_wan(cell.revenue_net_year_yuan),
        format_payback(cell.payback_net_years),
        cell.status
    )
}

impl fmt::Display for SensitivitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sensitivity (27 scenarios) ---")?;
        writeln!(f, "Best:     {}", describe(&self.best))?;
        writeln!(f, "Worst:    {}", describe(&self.worst))?;
        writeln!(f, "Typical:  {}", describe(&self.baseline))?;
        write!(f, "Rating:   {}", self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanningRules;
    use crate::plan::calc_plan;
    use crate::sensitivity::SensitivityGrid;

    #[test]
    fn undefined_payback_renders_placeholder() {
        assert_eq!(format_payback(None), "N/A");
        assert_eq!(format_payback(Some(2.345)), "2.35 years");
    }

    #[test]
    fn infeasible_plan_summary_shows_na() {
        let input = PlanInput::with_site(0.0, 0.0);
        let result = calc_plan(&input);
        let text = PlanSummary::new(&input, &result).to_string();
        assert!(text.contains("Gross payback:         N/A"));
        assert!(text.contains("Net payback:           N/A"));
        assert!(text.contains("(unspecified)"));
        assert!(text.contains("Recommended piles = 0"));
    }

    #[test]
    fn summary_reports_money_in_wan() {
        let input = PlanInput::with_site(100.0, 100.0);
        let result = calc_plan(&input);
        let text = PlanSummary::new(&input, &result).to_string();
        let expected = format!("Investment:            {:.2} 10k yuan", result.invest_total_yuan / 1e4);
        assert!(text.contains(&expected), "missing `{expected}` in:\n{text}");
    }

    #[test]
    fn summary_lists_operating_assumptions() {
        let input = PlanInput {
            staff_count: 3,
            salary_yuan_per_month: 5500.0,
            rent_yuan_per_sqm_month: 1.5,
            ..PlanInput::with_site(100.0, 100.0)
        };
        let result = calc_plan(&input);
        let text = PlanSummary::new(&input, &result).to_string();
        assert!(text.contains("Energy per gun:        1000 kWh/day x 2 gun(s) per pile"));
        assert!(text.contains("Service fee:           0.30 yuan/kWh"));
        assert!(text.contains("Operating days:        330 per year"));
        assert!(text.contains("Staff:                 3 at 5500 yuan/month"));
        assert!(text.contains("Rent rate:             1.50 yuan/m2/month"));

        let energy = text.find("Energy per gun:").expect("assumptions present");
        let payback = text.find("Gross payback:").expect("payback present");
        assert!(energy < payback);
    }

    #[test]
    fn sensitivity_summary_lists_three_scenarios() {
        let input = PlanInput::with_site(100.0, 100.0);
        let summary = SensitivityGrid::sweep(&input, &PlanningRules::default()).summary();
        let text = summary.to_string();
        assert!(text.contains("Best:"));
        assert!(text.contains("Worst:"));
        assert!(text.contains("Typical:"));
        assert!(text.lines().last().is_some_and(|l| l.starts_with("Rating:")));
    }
}
