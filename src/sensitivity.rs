//! Sensitivity sweep over energy, service fee and rent.
//!
//! Runs the planning calculator over a fixed 3×3×3 grid and classifies each
//! cell into a traffic-light status. Cells are independent and evaluated in
//! parallel; grid order is preserved (energy outermost, rent innermost).

use std::cmp::Ordering;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::PlanningRules;
use crate::plan::{PlanInput, calc_plan_with};

/// Multipliers applied to `kwh_per_gun_per_day`.
pub const KWH_MULTIPLIERS: [f64; 3] = [0.6, 1.0, 1.2];
/// Multipliers applied to `service_fee_yuan_per_kwh`.
pub const FEE_MULTIPLIERS: [f64; 3] = [0.8, 1.0, 1.2];
/// Rent levels relative to the baseline rent (free, baseline, +50%).
pub const RENT_MULTIPLIERS: [f64; 3] = [0.0, 1.0, 1.5];

/// Net payback above which a cell is red (years).
pub const RED_PAYBACK_YEARS: f64 = 3.0;
/// Net payback above which a cell is yellow (years).
pub const YELLOW_PAYBACK_YEARS: f64 = 2.0;

/// Traffic-light classification of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Red,
    Yellow,
    Green,
}

impl Status {
    /// Classifies a scenario by net revenue and net payback.
    pub fn classify(revenue_net_year_yuan: f64, payback_net_years: Option<f64>) -> Self {
        if revenue_net_year_yuan <= 0.0 {
            return Self::Red;
        }
        match payback_net_years {
            Some(years) if years > RED_PAYBACK_YEARS => Self::Red,
            Some(years) if years > YELLOW_PAYBACK_YEARS => Self::Yellow,
            _ => Self::Green,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        };
        f.write_str(s)
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityCell {
    /// 1-based position in grid order.
    pub index: usize,
    pub kwh_multiplier: f64,
    pub fee_multiplier: f64,
    pub rent_multiplier: f64,
    pub kwh_per_gun_per_day: f64,
    pub service_fee_yuan_per_kwh: f64,
    pub rent_yuan_per_sqm_month: f64,
    pub invest_total_yuan: f64,
    pub revenue_net_year_yuan: f64,
    pub payback_net_years: Option<f64>,
    pub status: Status,
}

impl SensitivityCell {
    /// Whether this is the unscaled baseline point.
    pub fn is_baseline(&self) -> bool {
        self.kwh_multiplier == 1.0 && self.fee_multiplier == 1.0 && self.rent_multiplier == 1.0
    }
}

/// All 27 evaluated cells in grid order.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityGrid {
    cells: Vec<SensitivityCell>,
}

impl SensitivityGrid {
    /// Evaluates the full grid around `input`.
    pub fn sweep(input: &PlanInput, rules: &PlanningRules) -> Self {
        let points: Vec<(f64, f64, f64)> = KWH_MULTIPLIERS
            .iter()
            .flat_map(|&k| {
                FEE_MULTIPLIERS
                    .iter()
                    .flat_map(move |&f| RENT_MULTIPLIERS.iter().map(move |&r| (k, f, r)))
            })
            .collect();

        let cells: Vec<SensitivityCell> = points
            .par_iter()
            .enumerate()
            .map(|(i, &(kwh_m, fee_m, rent_m))| {
                let scenario = PlanInput {
                    kwh_per_gun_per_day: input.kwh_per_gun_per_day * kwh_m,
                    service_fee_yuan_per_kwh: input.service_fee_yuan_per_kwh * fee_m,
                    rent_yuan_per_sqm_month: input.rent_yuan_per_sqm_month * rent_m,
                    ..input.clone()
                };
                let result = calc_plan_with(&scenario, rules);
                SensitivityCell {
                    index: i + 1,
                    kwh_multiplier: kwh_m,
                    fee_multiplier: fee_m,
                    rent_multiplier: rent_m,
                    kwh_per_gun_per_day: scenario.kwh_per_gun_per_day,
                    service_fee_yuan_per_kwh: scenario.service_fee_yuan_per_kwh,
                    rent_yuan_per_sqm_month: scenario.rent_yuan_per_sqm_month,
                    invest_total_yuan: result.invest_total_yuan,
                    revenue_net_year_yuan: result.revenue_net_year_yuan,
                    payback_net_years: result.payback_net_years,
                    status: Status::classify(
                        result.revenue_net_year_yuan,
                        result.payback_net_years,
                    ),
                }
            })
            .collect();

        let grid = Self { cells };
        info!(
            cells = grid.cells.len(),
            red = grid.count(Status::Red),
            yellow = grid.count(Status::Yellow),
            green = grid.count(Status::Green),
            "sensitivity sweep complete"
        );
        grid
    }

    pub fn cells(&self) -> &[SensitivityCell] {
        &self.cells
    }

    /// Number of cells with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    /// The cell at multipliers (1.0, 1.0, 1.0).
    pub fn baseline(&self) -> &SensitivityCell {
        self.cells
            .iter()
            .find(|c| c.is_baseline())
            .unwrap_or(&self.cells[0])
    }

    /// Shortest payback among non-red cells; otherwise the highest net revenue.
    pub fn best(&self) -> &SensitivityCell {
        let recoverable = self
            .cells
            .iter()
            .filter(|c| c.status != Status::Red)
            .filter_map(|c| c.payback_net_years.map(|years| (c, years)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c);

        recoverable
            .or_else(|| first_max_by(self.cells.iter(), |c| c.revenue_net_year_yuan))
            .unwrap_or(&self.cells[0])
    }

    /// Lowest net revenue among red cells; otherwise the longest payback,
    /// falling back to the last cell.
    pub fn worst(&self) -> &SensitivityCell {
        let red = self
            .cells
            .iter()
            .filter(|c| c.status == Status::Red)
            .min_by(|a, b| a.revenue_net_year_yuan.total_cmp(&b.revenue_net_year_yuan));
        if let Some(cell) = red {
            return cell;
        }

        let with_payback = self.cells.iter().filter(|c| c.payback_net_years.is_some());
        first_max_by(with_payback, |c| {
            c.payback_net_years.unwrap_or(f64::NEG_INFINITY)
        })
        .unwrap_or(&self.cells[self.cells.len() - 1])
    }

    /// Baseline, best and worst cells plus the baseline investment rating.
    pub fn summary(&self) -> SensitivitySummary {
        let baseline = self.baseline().clone();
        let rating = InvestmentRating::assess(&baseline);
        SensitivitySummary {
            baseline,
            best: self.best().clone(),
            worst: self.worst().clone(),
            rating,
        }
    }
}

/// First element with the largest key.
fn first_max_by<'a, I, F>(iter: I, key: F) -> Option<&'a SensitivityCell>
where
    I: Iterator<Item = &'a SensitivityCell>,
    F: Fn(&SensitivityCell) -> f64,
{
    let mut best: Option<&SensitivityCell> = None;
    for cell in iter {
        best = match best {
            Some(current) if key(cell).total_cmp(&key(current)) != Ordering::Greater => {
                Some(current)
            }
            _ => Some(cell),
        };
    }
    best
}

/// Overall verdict on the baseline scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentRating {
    Good,
    Fair,
    Poor,
}

impl InvestmentRating {
    /// Good within 3 years, fair within 4, poor beyond or when unrecoverable.
    pub fn assess(cell: &SensitivityCell) -> Self {
        match cell.payback_net_years {
            _ if cell.revenue_net_year_yuan <= 0.0 => Self::Poor,
            Some(years) if years <= 3.0 => Self::Good,
            Some(years) if years <= 4.0 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for InvestmentRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// Three representative scenarios for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivitySummary {
    pub baseline: SensitivityCell,
    pub best: SensitivityCell,
    pub worst: SensitivityCell,
    pub rating: InvestmentRating,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: usize, net: f64, payback: Option<f64>) -> SensitivityCell {
        SensitivityCell {
            index,
            kwh_multiplier: 1.0,
            fee_multiplier: 1.0,
            rent_multiplier: 1.0,
            kwh_per_gun_per_day: 1000.0,
            service_fee_yuan_per_kwh: 0.3,
            rent_yuan_per_sqm_month: 0.0,
            invest_total_yuan: 1.0,
            revenue_net_year_yuan: net,
            payback_net_years: payback,
            status: Status::classify(net, payback),
        }
    }

    fn grid(cells: Vec<SensitivityCell>) -> SensitivityGrid {
        SensitivityGrid { cells }
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(Status::classify(0.0, None), Status::Red);
        assert_eq!(Status::classify(-5.0, Some(1.0)), Status::Red);
        assert_eq!(Status::classify(10.0, Some(3.01)), Status::Red);
        assert_eq!(Status::classify(10.0, Some(3.0)), Status::Yellow);
        assert_eq!(Status::classify(10.0, Some(2.01)), Status::Yellow);
        assert_eq!(Status::classify(10.0, Some(2.0)), Status::Green);
        assert_eq!(Status::classify(10.0, None), Status::Green);
    }

    #[test]
    fn best_prefers_shortest_recoverable_payback() {
        let g = grid(vec![
            cell(1, 100.0, Some(2.5)),
            cell(2, 50.0, Some(1.5)),
            cell(3, 500.0, Some(3.5)),
            cell(4, 80.0, Some(1.5)),
        ]);
        assert_eq!(g.best().index, 2);
    }

    #[test]
    fn best_falls_back_to_highest_net_when_all_red() {
        let g = grid(vec![
            cell(1, -10.0, None),
            cell(2, 40.0, Some(8.0)),
            cell(3, 40.0, Some(9.0)),
            cell(4, 0.0, None),
        ]);
        assert_eq!(g.best().index, 2);
    }

    #[test]
    fn worst_prefers_lowest_red_net() {
        let g = grid(vec![
            cell(1, 100.0, Some(1.0)),
            cell(2, -30.0, None),
            cell(3, -30.0, None),
            cell(4, 20.0, Some(5.0)),
        ]);
        assert_eq!(g.worst().index, 2);
    }

    #[test]
    fn worst_without_red_takes_longest_payback() {
        let g = grid(vec![
            cell(1, 100.0, Some(1.0)),
            cell(2, 90.0, Some(2.5)),
            cell(3, 95.0, Some(2.5)),
        ]);
        assert_eq!(g.worst().index, 2);
    }

    #[test]
    fn worst_falls_back_to_last_cell() {
        let g = grid(vec![cell(1, 100.0, None), cell(2, 90.0, None)]);
        assert_eq!(g.worst().index, 2);
    }

    #[test]
    fn rating_bands() {
        assert_eq!(InvestmentRating::assess(&cell(1, 10.0, Some(2.9))), InvestmentRating::Good);
        assert_eq!(InvestmentRating::assess(&cell(1, 10.0, Some(3.0))), InvestmentRating::Good);
        assert_eq!(InvestmentRating::assess(&cell(1, 10.0, Some(3.5))), InvestmentRating::Fair);
        assert_eq!(InvestmentRating::assess(&cell(1, 10.0, Some(4.5))), InvestmentRating::Poor);
        assert_eq!(InvestmentRating::assess(&cell(1, 10.0, None)), InvestmentRating::Poor);
        assert_eq!(InvestmentRating::assess(&cell(1, -1.0, None)), InvestmentRating::Poor);
    }

    #[test]
    fn sweep_produces_full_grid_in_order() {
        let input = PlanInput {
            rent_yuan_per_sqm_month: 2.0,
            ..PlanInput::with_site(100.0, 100.0)
        };
        let g = SensitivityGrid::sweep(&input, &PlanningRules::default());
        assert_eq!(g.cells().len(), 27);
        for (i, c) in g.cells().iter().enumerate() {
            assert_eq!(c.index, i + 1);
        }
        let first = &g.cells()[0];
        assert_eq!(
            (first.kwh_multiplier, first.fee_multiplier, first.rent_multiplier),
            (0.6, 0.8, 0.0)
        );
        let last = &g.cells()[26];
        assert_eq!(
            (last.kwh_multiplier, last.fee_multiplier, last.rent_multiplier),
            (1.2, 1.2, 1.5)
        );
        assert_eq!(last.rent_yuan_per_sqm_month, 3.0);
    }

    #[test]
    fn baseline_cell_is_the_centre() {
        let g = SensitivityGrid::sweep(&PlanInput::with_site(60.0, 60.0), &PlanningRules::default());
        let b = g.baseline();
        assert_eq!((b.kwh_multiplier, b.fee_multiplier, b.rent_multiplier), (1.0, 1.0, 1.0));
        assert_eq!(b.index, 14);
    }

    #[test]
    fn infeasible_site_is_all_red() {
        let g = SensitivityGrid::sweep(&PlanInput::with_site(5.0, 5.0), &PlanningRules::default());
        assert_eq!(g.count(Status::Red), 27);
        assert_eq!(g.best().status, Status::Red);
        let summary = g.summary();
        assert_eq!(summary.rating, InvestmentRating::Poor);
    }
}
